//! Instruction handlers for the Liquidity Relay
//!
//! Each instruction is in its own module; `custody` holds the token
//! movements they share.

pub mod custody;

pub mod initialize;
pub mod update_config;
pub mod open_custody;
pub mod fund_bounty;
pub mod withdraw_bounty;
pub mod order_liquidity_provision;
pub mod order_liquidity_removal;
pub mod update_oracle;
pub mod execute_order;
pub mod cancel_order;
pub mod update_observation;
pub mod consult;

pub use initialize::*;
pub use update_config::*;
pub use open_custody::*;
pub use fund_bounty::*;
pub use withdraw_bounty::*;
pub use order_liquidity_provision::*;
pub use order_liquidity_removal::*;
pub use update_oracle::*;
pub use execute_order::*;
pub use cancel_order::*;
pub use update_observation::*;
pub use consult::*;
