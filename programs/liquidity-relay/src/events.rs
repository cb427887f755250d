//! Program events for the Liquidity Relay
//!
//! Events are emitted for indexing and off-chain tracking.
//! Executors watch `NewOrder` and `OrderReady` to know when to act.

use anchor_lang::prelude::*;

use crate::state::OrderKind;

/// Emitted when the relayer is initialized
#[event]
pub struct RelayerInitialized {
    /// Relayer owner
    pub owner: Pubkey,
    /// Primary factory program
    pub factory: Pubkey,
    /// Counterpart factory program
    pub counterpart_factory: Pubkey,
    /// Oracle window in seconds
    pub window_size: i64,
    /// Buckets per oracle window
    pub granularity: u16,
    /// Bounty paid per execution (lamports)
    pub execution_bounty: u64,
    /// Initialization timestamp
    pub timestamp: i64,
}

/// Emitted when relayer configuration is updated
#[event]
pub struct ConfigUpdated {
    pub owner: Pubkey,
    pub execution_bounty: u64,
    pub timestamp: i64,
}

/// Emitted when custody is opened for a mint
#[event]
pub struct CustodyOpened {
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub timestamp: i64,
}

/// Emitted when a new order is queued
#[event]
pub struct NewOrder {
    /// Order ID
    pub order_id: u64,
    /// Oracle tracking key assigned to the order
    pub oracle_id: u64,
    /// Provision or removal
    pub kind: OrderKind,
    /// Pair account
    pub pair: Pubkey,
    /// Creation timestamp
    pub timestamp: i64,
}

/// Emitted when an order's oracle update is recorded
#[event]
pub struct OracleUpdated {
    pub order_id: u64,
    pub oracle_id: u64,
    /// Updates recorded for this order so far
    pub observations: u8,
    pub timestamp: i64,
}

/// Emitted when an order completes its observation cycle
#[event]
pub struct OrderReady {
    pub order_id: u64,
    pub timestamp: i64,
}

/// Emitted when an order is executed
#[event]
pub struct ExecutedOrder {
    /// Order ID
    pub order_id: u64,
    /// Amount of token A (or LP tokens) spent from custody
    pub spent_a: u64,
    /// Amount of token B spent from custody
    pub spent_b: u64,
    /// Execution timestamp
    pub timestamp: i64,
}

/// Emitted when the execution bounty is paid
#[event]
pub struct BountyPaid {
    pub order_id: u64,
    pub executor: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

/// Emitted when the bounty float could not cover the execution bounty
#[event]
pub struct BountySkipped {
    pub order_id: u64,
    pub executor: Pubkey,
    /// Lamports available above the rent floor
    pub available: u64,
    pub timestamp: i64,
}

/// Emitted when an order is cancelled
#[event]
pub struct OrderCancelled {
    /// Order ID
    pub order_id: u64,
    /// Owner receiving the refund
    pub owner: Pubkey,
    /// Token A (or LP) returned
    pub refunded_a: u64,
    /// Token B returned
    pub refunded_b: u64,
    /// Cancellation timestamp
    pub timestamp: i64,
}

/// Emitted when the bounty float is topped up
#[event]
pub struct BountyFunded {
    pub funder: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

/// Emitted when the owner withdraws from the bounty float
#[event]
pub struct BountyWithdrawn {
    pub owner: Pubkey,
    pub amount: u64,
    /// Float remaining above the rent floor
    pub remaining: u64,
    pub timestamp: i64,
}
