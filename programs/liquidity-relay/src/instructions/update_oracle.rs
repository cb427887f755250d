//! Record an oracle update for a pending order
//!
//! Permissionless. An order needs two updates at least one period apart,
//! together spanning its `max_window_time`, before it can be executed. An
//! update a full window after the first starts the span over.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::RelayerError;
use crate::events::{OracleUpdated, OrderReady};
use crate::interfaces::pair::PairState;
use crate::state::{OracleObservations, Order, Relayer};
use crate::utils::get_timestamp;

#[derive(Accounts)]
#[instruction(order_id: u64)]
pub struct UpdateOracle<'info> {
    #[account(
        seeds = [RELAYER_SEED],
        bump = relayer.bump,
    )]
    pub relayer: Box<Account<'info, Relayer>>,

    #[account(
        mut,
        seeds = [ORDER_SEED, &order_id.to_le_bytes()],
        bump = order.bump,
    )]
    pub order: Box<Account<'info, Order>>,

    #[account(
        mut,
        seeds = [ORACLE_SEED, &order.oracle_id.to_le_bytes()],
        bump = oracle.bump,
    )]
    pub oracle: Box<Account<'info, OracleObservations>>,

    /// Pair sampled by the order's oracle
    /// CHECK: Address pinned to the order; layout checked on load
    #[account(address = order.pair @ RelayerError::InvalidPairAccount)]
    pub pair: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<UpdateOracle>, order_id: u64) -> Result<()> {
    let now = get_timestamp()?;
    let window = ctx.accounts.relayer.window()?;
    let pair = PairState::load(&ctx.accounts.pair.to_account_info(), &ctx.accounts.order.factory)?;

    // Any failure here leaves the order untouched and retryable
    ctx.accounts
        .order
        .ensure_observable(&pair, window.period_size(), now)?;

    let sampled = ctx.accounts.oracle.update(&window, &pair, now)?;
    if !sampled {
        msg!("Oracle bucket already sampled this period");
    }

    let order = &mut ctx.accounts.order;
    let ready = order.record_observation(now, window.window_size())?;

    emit!(OracleUpdated {
        order_id,
        oracle_id: order.oracle_id,
        observations: order.observations,
        timestamp: now,
    });

    msg!("Oracle updated for order {}", order_id);
    msg!("Observations: {}", order.observations);

    if ready {
        emit!(OrderReady {
            order_id,
            timestamp: now,
        });
        msg!("Order {} ready for execution", order_id);
    }

    Ok(())
}
