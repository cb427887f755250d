//! # Liquidity Relay
//!
//! TWAP-gated liquidity provision and removal for AMM pairs
//!
//! ## Overview
//!
//! The relay owner queues orders to add or remove liquidity on a pair. Each
//! order gets its own sliding-window TWAP buffer; once two spaced oracle
//! updates cover the order's window, anyone can execute it. Execution is
//! rejected if the requested amounts stray from the TWAP by more than the
//! order's tolerance, and the executor is paid a fixed bounty.
//!
//! ## Key Features
//!
//! - **Circular observation buffers**: one bucket per period, recurring every window
//! - **Counterfactual cumulatives**: stale pairs are extrapolated to the current time
//! - **Pooled custody**: per-mint vaults with a running committed-funds check
//! - **Empty-pool fast path**: the first deposit into a pair executes immediately
//!
//! ## License
//!
//! MIT License

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod interfaces;
pub mod oracle;
pub mod state;
pub mod utils;

use instructions::*;

declare_id!("LqRe1ay111111111111111111111111111111111111");

#[program]
pub mod liquidity_relay {
    use super::*;

    /// Initialize the relayer configuration
    /// Only callable once; the oracle window cannot change afterwards
    pub fn initialize(ctx: Context<Initialize>, params: RelayerParams) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Update relayer configuration (owner only)
    pub fn update_config(
        ctx: Context<UpdateConfig>,
        new_owner: Option<Pubkey>,
        new_execution_bounty: Option<u64>,
        new_oracle_authority: Option<Pubkey>,
    ) -> Result<()> {
        instructions::update_config::handler(
            ctx,
            new_owner,
            new_execution_bounty,
            new_oracle_authority,
        )
    }

    /// Open pooled custody for a mint
    pub fn open_custody(ctx: Context<OpenCustody>) -> Result<()> {
        instructions::open_custody::handler(ctx)
    }

    /// Add lamports to the execution bounty float
    pub fn fund_bounty(ctx: Context<FundBounty>, amount: u64) -> Result<()> {
        instructions::fund_bounty::handler(ctx, amount)
    }

    /// Withdraw lamports from the bounty float (owner only)
    pub fn withdraw_bounty(ctx: Context<WithdrawBounty>, amount: u64) -> Result<()> {
        instructions::withdraw_bounty::handler(ctx, amount)
    }

    /// Queue a liquidity provision order (owner only)
    ///
    /// Remaining accounts are forwarded to the router when the pool is
    /// empty and the order executes immediately.
    ///
    /// # Returns
    ///
    /// The new order ID
    pub fn order_liquidity_provision<'info>(
        ctx: Context<'_, '_, '_, 'info, OrderLiquidityProvision<'info>>,
        params: OrderParams,
    ) -> Result<u64> {
        instructions::order_liquidity_provision::handler(ctx, params)
    }

    /// Queue a liquidity removal order (owner only)
    ///
    /// # Arguments
    ///
    /// * `liquidity_amount` - LP tokens to burn
    /// * `params` - Pair, expected amounts, tolerance and timing
    ///
    /// # Returns
    ///
    /// The new order ID
    pub fn order_liquidity_removal(
        ctx: Context<OrderLiquidityRemoval>,
        liquidity_amount: u64,
        params: OrderParams,
    ) -> Result<u64> {
        instructions::order_liquidity_removal::handler(ctx, liquidity_amount, params)
    }

    /// Record an oracle update for a pending order
    pub fn update_oracle(ctx: Context<UpdateOracle>, order_id: u64) -> Result<()> {
        instructions::update_oracle::handler(ctx, order_id)
    }

    /// Execute a ready order and collect the bounty
    /// Remaining accounts are forwarded to the router
    pub fn execute_order<'info>(
        ctx: Context<'_, '_, '_, 'info, ExecuteOrder<'info>>,
        order_id: u64,
    ) -> Result<()> {
        instructions::execute_order::handler(ctx, order_id)
    }

    /// Cancel an order and refund its custody (owner only)
    pub fn cancel_order(ctx: Context<CancelOrder>, order_id: u64) -> Result<()> {
        instructions::cancel_order::handler(ctx, order_id)
    }

    /// Sample an oracle buffer without touching any order (oracle authority only)
    pub fn update_observation(ctx: Context<UpdateObservation>, oracle_id: u64) -> Result<()> {
        instructions::update_observation::handler(ctx, oracle_id)
    }

    /// Time-weighted amount of `token_out` for `amount_in` of `token_in`
    pub fn consult(
        ctx: Context<Consult>,
        oracle_id: u64,
        token_in: Pubkey,
        amount_in: u64,
        token_out: Pubkey,
    ) -> Result<u64> {
        instructions::consult::handler(ctx, oracle_id, token_in, amount_in, token_out)
    }
}
