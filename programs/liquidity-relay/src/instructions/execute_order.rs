//! Execute a ready liquidity order
//!
//! Permissionless. The requested amounts are checked against the TWAP, the
//! router performs the add or remove against custody, and the caller is paid
//! the execution bounty if the float covers it. The router's output goes to
//! the order owner's token accounts, never to an account the caller picks.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::errors::RelayerError;
use crate::events::{BountyPaid, BountySkipped, ExecutedOrder};
use crate::instructions::custody::{
    self, BountyOutcome, CustodyAccounts, RelayerSigner, RouterOutput,
};
use crate::interfaces::pair::PairState;
use crate::state::{Custody, OracleObservations, Order, OrderEvent, OrderKind, Relayer};
use crate::utils::*;

#[derive(Accounts)]
#[instruction(order_id: u64)]
pub struct ExecuteOrder<'info> {
    /// Executor collecting the bounty
    #[account(mut)]
    pub executor: Signer<'info>,

    #[account(
        mut,
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
        seeds = [ORACLE_SEED, &order.oracle_id.to_le_bytes()],
        bump = oracle.bump,
    )]
    pub oracle: Box<Account<'info, OracleObservations>>,

    /// CHECK: Address pinned to the order; layout checked on load
    #[account(address = order.pair @ RelayerError::InvalidPairAccount)]
    pub pair: UncheckedAccount<'info>,

    /// CHECK: Address pinned to the order's router
    #[account(executable, address = order.router @ RelayerError::InvalidRouter)]
    pub router: UncheckedAccount<'info>,

    /// Token A custody (provision) or LP custody (removal)
    #[account(mut)]
    pub custody_a: Box<Account<'info, Custody>>,

    #[account(mut)]
    pub vault_a: Box<Account<'info, TokenAccount>>,

    /// Owner's account for unspent token A (or LP)
    #[account(mut)]
    pub refund_a: Box<Account<'info, TokenAccount>>,

    /// Token B custody, provisions only
    #[account(mut)]
    pub custody_b: Option<Box<Account<'info, Custody>>>,

    #[account(mut)]
    pub vault_b: Option<Box<Account<'info, TokenAccount>>>,

    #[account(mut)]
    pub refund_b: Option<Box<Account<'info, TokenAccount>>>,

    /// Owner's LP account (provision) or token A account (removal)
    #[account(mut)]
    pub output_a: Box<Account<'info, TokenAccount>>,

    /// Owner's token B account, removals only
    #[account(mut)]
    pub output_b: Option<Box<Account<'info, TokenAccount>>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, ExecuteOrder<'info>>,
    order_id: u64,
) -> Result<()> {
    let now = get_timestamp()?;
    let router_accounts = ctx.remaining_accounts;
    let accounts = ctx.accounts;

    let next = accounts.order.status.apply(OrderEvent::Execute)?;
    accounts.order.ensure_before_deadline(now)?;

    let terms = Order::clone(&accounts.order);
    let window = accounts.relayer.window()?;
    let pair = PairState::load(&accounts.pair.to_account_info(), &terms.factory)?;

    // Fair token B for token A over the order's window
    let fair_b = accounts.oracle.consult(
        &window,
        &pair,
        now,
        terms.min_consult_span(&window),
        &terms.token_a,
        terms.amount_a,
        &terms.token_b,
    )?;
    check_price_tolerance(terms.amount_b, fair_b, terms.price_tolerance)?;

    let signer = RelayerSigner {
        relayer: accounts.relayer.to_account_info(),
        bump: accounts.relayer.bump,
        token_program: accounts.token_program.to_account_info(),
    };
    let router = accounts.router.to_account_info();
    let call = custody::router_call(&terms)?;

    let (output_a, output_b) = custody::router_outputs(&terms)?;
    let output_a = RouterOutput::new(output_a, &terms.owner, &mut accounts.output_a)?;
    let mut outputs = match output_b {
        Some(output_b) => {
            let output_b = RouterOutput::new(
                output_b,
                &terms.owner,
                accounts
                    .output_b
                    .as_deref_mut()
                    .ok_or(RelayerError::MissingOutputAccount)?,
            )?;
            vec![output_a, output_b]
        }
        None => vec![output_a],
    };

    let (leg_a, leg_b) = terms.custody_legs();
    let leg_a = CustodyAccounts::new(
        leg_a,
        &terms.owner,
        &mut accounts.custody_a,
        &mut accounts.vault_a,
        &accounts.refund_a,
    )?;

    let outcomes = match (terms.kind, leg_b) {
        (OrderKind::Provision, Some(leg_b)) => {
            let leg_b = CustodyAccounts::new(
                leg_b,
                &terms.owner,
                accounts
                    .custody_b
                    .as_deref_mut()
                    .ok_or(RelayerError::MissingCustodyAccount)?,
                accounts
                    .vault_b
                    .as_deref_mut()
                    .ok_or(RelayerError::MissingCustodyAccount)?,
                accounts
                    .refund_b
                    .as_deref()
                    .ok_or(RelayerError::MissingCustodyAccount)?,
            )?;
            signer.settle_with_router(
                &router,
                router_accounts,
                &call,
                &mut [leg_a, leg_b],
                &mut outputs,
            )?
        }
        (OrderKind::Removal, None) => {
            signer.settle_with_router(&router, router_accounts, &call, &mut [leg_a], &mut outputs)?
        }
        _ => return err!(RelayerError::MissingCustodyAccount),
    };

    let spent_a = outcomes.first().map_or(0, |outcome| outcome.spent);
    let spent_b = outcomes.get(1).map_or(0, |outcome| outcome.spent);

    let order = &mut accounts.order;
    order.status = next;
    order.executed_at = now;

    let relayer = &mut accounts.relayer;
    relayer.total_executed = relayer
        .total_executed
        .checked_add(1)
        .ok_or(RelayerError::MathOverflow)?;
    let bounty = relayer.execution_bounty;

    emit!(ExecutedOrder {
        order_id,
        spent_a,
        spent_b,
        timestamp: now,
    });

    msg!("Order {} executed", order_id);
    msg!("Fair amount B: {} (requested {})", fair_b, terms.amount_b);
    msg!("Spent: {} / {}", spent_a, spent_b);

    let executor = accounts.executor.key();
    match custody::pay_bounty(&signer.relayer, &accounts.executor.to_account_info(), bounty) {
        BountyOutcome::Paid(amount) => {
            emit!(BountyPaid {
                order_id,
                executor,
                amount,
                timestamp: now,
            });
            msg!("Bounty paid: {} lamports", amount);
        }
        BountyOutcome::Skipped { available } => {
            emit!(BountySkipped {
                order_id,
                executor,
                available,
                timestamp: now,
            });
            msg!("Bounty skipped: {} lamports available", available);
        }
    }

    Ok(())
}
