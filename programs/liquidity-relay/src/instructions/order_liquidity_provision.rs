//! Queue a liquidity provision order
//!
//! Takes both token amounts into pooled custody and opens the order and its
//! oracle buffer. A provision into an empty pool has no price to protect, so
//! it is executed in the same call.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::errors::RelayerError;
use crate::events::{ExecutedOrder, NewOrder};
use crate::instructions::custody::{self, CustodyAccounts, RelayerSigner, RouterOutput};
use crate::interfaces::pair::{pair_exists, PairState};
use crate::state::{Custody, OracleObservations, Order, OrderEvent, OrderKind, Relayer};
use crate::utils::*;

/// Terms shared by provision and removal orders
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct OrderParams {
    /// Lower mint of the pair
    pub token_a: Pubkey,
    /// Higher mint of the pair
    pub token_b: Pubkey,
    /// Token A to provide (provision) or expected back (removal)
    pub amount_a: u64,
    /// Token B to provide (provision) or expected back (removal)
    pub amount_b: u64,
    /// Allowed deviation from the TWAP in ppm
    pub price_tolerance: u32,
    pub min_reserve_a: u64,
    pub min_reserve_b: u64,
    /// Minimum span the oracle updates must cover (seconds)
    pub max_window_time: i64,
    pub deadline: i64,
    /// Primary or counterpart factory
    pub factory: Pubkey,
}

#[derive(Accounts)]
pub struct OrderLiquidityProvision<'info> {
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

    #[account(mut)]
    pub custody_a: Box<Account<'info, Custody>>,

    #[account(mut)]
    pub vault_a: Box<Account<'info, TokenAccount>>,

    /// Caller's token A account
    #[account(mut)]
    pub source_a: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub custody_b: Box<Account<'info, Custody>>,

    #[account(mut)]
    pub vault_b: Box<Account<'info, TokenAccount>>,

    /// Caller's token B account
    #[account(mut)]
    pub source_b: Box<Account<'info, TokenAccount>>,

    /// Caller's LP account, required when the pool is empty
    #[account(mut)]
    pub lp_recipient: Option<Box<Account<'info, TokenAccount>>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, OrderLiquidityProvision<'info>>,
    params: OrderParams,
) -> Result<u64> {
    let now = get_timestamp()?;
    let router_accounts = ctx.remaining_accounts;
    let bumps = ctx.bumps;
    let accounts = ctx.accounts;

    let pair_info = accounts.pair.to_account_info();
    let exists = pair_exists(&pair_info, &params.factory, &params.token_a, &params.token_b);
    validate_order_request(
        &accounts.relayer,
        &accounts.caller.key(),
        &params,
        None,
        exists,
        now,
    )?;

    let pair = PairState::load(&pair_info, &params.factory)?;
    pair.ensure_tokens(&params.token_a, &params.token_b)?;

    let router = accounts
        .relayer
        .ensure_router(&params.factory, &accounts.router.key())?;

    // Pull both legs into pooled custody
    let token_program = accounts.token_program.to_account_info();
    let caller = accounts.caller.to_account_info();
    custody::deposit(
        &token_program,
        &caller,
        &accounts.source_a,
        &mut accounts.custody_a,
        &mut accounts.vault_a,
        &params.token_a,
        params.amount_a,
    )?;
    custody::deposit(
        &token_program,
        &caller,
        &accounts.source_b,
        &mut accounts.custody_b,
        &mut accounts.vault_b,
        &params.token_b,
        params.amount_b,
    )?;

    let (order_id, oracle_id) = accounts.relayer.allocate_ids()?;

    let order = &mut accounts.order;
    order.open(
        order_id,
        OrderKind::Provision,
        accounts.caller.key(),
        &params,
        router,
        accounts.pair.key(),
        pair.lp_mint,
        0,
        oracle_id,
        now,
    );
    order.bump = bumps.order;

    accounts.oracle.open(
        oracle_id,
        params.factory,
        accounts.pair.key(),
        &pair,
        accounts.relayer.granularity,
        bumps.oracle,
    );

    emit!(NewOrder {
        order_id,
        oracle_id,
        kind: OrderKind::Provision,
        pair: accounts.pair.key(),
        timestamp: now,
    });

    msg!("Provision order created");
    msg!("Order ID: {} (oracle {})", order_id, oracle_id);
    msg!("Amounts: {} / {}", params.amount_a, params.amount_b);

    if !OrderKind::Provision.executes_on_creation(&pair) {
        return Ok(order_id);
    }

    // First deposit sets the price: nothing to wait for
    let next = accounts.order.status.apply(OrderEvent::ExecuteImmediately)?;
    let terms = Order::clone(&accounts.order);
    let (leg_a, leg_b) = terms.custody_legs();
    let leg_b = leg_b.ok_or(RelayerError::MissingCustodyAccount)?;

    let signer = RelayerSigner {
        relayer: accounts.relayer.to_account_info(),
        bump: accounts.relayer.bump,
        token_program,
    };
    let mut legs = [
        CustodyAccounts::new(
            leg_a,
            &terms.owner,
            &mut accounts.custody_a,
            &mut accounts.vault_a,
            &accounts.source_a,
        )?,
        CustodyAccounts::new(
            leg_b,
            &terms.owner,
            &mut accounts.custody_b,
            &mut accounts.vault_b,
            &accounts.source_b,
        )?,
    ];
    let (lp_output, _) = custody::router_outputs(&terms)?;
    let lp_recipient = accounts
        .lp_recipient
        .as_deref_mut()
        .ok_or(RelayerError::MissingOutputAccount)?;
    let mut outputs = [RouterOutput::new(lp_output, &terms.owner, lp_recipient)?];

    let outcomes = signer.settle_with_router(
        &accounts.router.to_account_info(),
        router_accounts,
        &custody::router_call(&terms)?,
        &mut legs,
        &mut outputs,
    )?;

    let order = &mut accounts.order;
    order.status = next;
    order.executed_at = now;

    let relayer = &mut accounts.relayer;
    relayer.total_executed = relayer
        .total_executed
        .checked_add(1)
        .ok_or(RelayerError::MathOverflow)?;

    emit!(ExecutedOrder {
        order_id,
        spent_a: outcomes[0].spent,
        spent_b: outcomes[1].spent,
        timestamp: now,
    });

    msg!("Empty pool: order {} executed immediately", order_id);

    Ok(order_id)
}
