//! Queue a liquidity removal order
//!
//! Takes the LP tokens into pooled custody and opens the order and its
//! oracle buffer. `amount_a`/`amount_b` are the amounts expected back.
//! Removals always wait for the oracle.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::events::NewOrder;
use crate::instructions::custody;
use crate::instructions::OrderParams;
use crate::interfaces::pair::{pair_exists, PairState};
use crate::state::{Custody, OracleObservations, Order, OrderKind, Relayer};
use crate::utils::*;

#[derive(Accounts)]
pub struct OrderLiquidityRemoval<'info> {
    /// Relayer owner (checked in the handler)
    #[account(mut)]
    pub caller: Signer<'info>,

    #[account(
        mut,
        seeds = [RELAYER_SEED],
        bump = relayer.bump,
    )]
    pub relayer: Box<Account<'info, Relayer>>,

    #[account(
        init,
        payer = caller,
        space = Order::LEN,
        seeds = [ORDER_SEED, &relayer.next_order_id.to_le_bytes()],
        bump
    )]
    pub order: Box<Account<'info, Order>>,

    #[account(
        init,
        payer = caller,
        space = OracleObservations::space(relayer.granularity),
        seeds = [ORACLE_SEED, &relayer.next_oracle_id.to_le_bytes()],
        bump
    )]
    pub oracle: Box<Account<'info, OracleObservations>>,

    /// Pair account
    /// CHECK: Validated against the factory's pair PDA in the handler
    pub pair: UncheckedAccount<'info>,

    /// Router program
    /// CHECK: Validated against the router configured for the factory
    pub router: UncheckedAccount<'info>,

    /// LP custody
    #[account(mut)]
    pub custody_lp: Box<Account<'info, Custody>>,

    #[account(mut)]
    pub vault_lp: Box<Account<'info, TokenAccount>>,

    /// Caller's LP token account
    #[account(mut)]
    pub source_lp: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<OrderLiquidityRemoval>,
    liquidity_amount: u64,
    params: OrderParams,
) -> Result<u64> {
    let now = get_timestamp()?;
    let accounts = &mut *ctx.accounts;

    let pair_info = accounts.pair.to_account_info();
    let exists = pair_exists(&pair_info, &params.factory, &params.token_a, &params.token_b);
    validate_order_request(
        &accounts.relayer,
        &accounts.caller.key(),
        &params,
        Some(liquidity_amount),
        exists,
        now,
    )?;

    let pair = PairState::load(&pair_info, &params.factory)?;
    pair.ensure_tokens(&params.token_a, &params.token_b)?;

    let router = accounts
        .relayer
        .ensure_router(&params.factory, &accounts.router.key())?;

    custody::deposit(
        &accounts.token_program.to_account_info(),
        &accounts.caller.to_account_info(),
        &accounts.source_lp,
        &mut accounts.custody_lp,
        &mut accounts.vault_lp,
        &pair.lp_mint,
        liquidity_amount,
    )?;

    let (order_id, oracle_id) = accounts.relayer.allocate_ids()?;

    let order = &mut accounts.order;
    order.open(
        order_id,
        OrderKind::Removal,
        accounts.caller.key(),
        &params,
        router,
        accounts.pair.key(),
        pair.lp_mint,
        liquidity_amount,
        oracle_id,
        now,
    );
    order.bump = ctx.bumps.order;

    accounts.oracle.open(
        oracle_id,
        params.factory,
        accounts.pair.key(),
        &pair,
        accounts.relayer.granularity,
        ctx.bumps.oracle,
    );

    emit!(NewOrder {
        order_id,
        oracle_id,
        kind: OrderKind::Removal,
        pair: accounts.pair.key(),
        timestamp: now,
    });

    msg!("Removal order created");
    msg!("Order ID: {} (oracle {})", order_id, oracle_id);
    msg!("Liquidity: {}", liquidity_amount);

    Ok(order_id)
}
