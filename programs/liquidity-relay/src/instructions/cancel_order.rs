//! Cancel a pending or ready order (owner only)
//!
//! Returns the order's full custody to the owner's token accounts and
//! releases its commitment. Works past the deadline, which is the only way
//! to recover funds from an expired order.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::errors::RelayerError;
use crate::events::OrderCancelled;
use crate::instructions::custody::{CustodyAccounts, RelayerSigner};
use crate::state::{Custody, Order, OrderEvent, Relayer};
use crate::utils::get_timestamp;

#[derive(Accounts)]
#[instruction(order_id: u64)]
pub struct CancelOrder<'info> {
    /// Relayer owner (must sign)
    #[account(
        constraint = owner.key() == relayer.owner @ RelayerError::CallerNotOwner,
    )]
    pub owner: Signer<'info>,

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

    /// Token A custody (provision) or LP custody (removal)
    #[account(mut)]
    pub custody_a: Box<Account<'info, Custody>>,

    #[account(mut)]
    pub vault_a: Box<Account<'info, TokenAccount>>,

    /// Order owner's account receiving token A (or LP)
    #[account(mut)]
    pub refund_a: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub custody_b: Option<Box<Account<'info, Custody>>>,

    #[account(mut)]
    pub vault_b: Option<Box<Account<'info, TokenAccount>>>,

    #[account(mut)]
    pub refund_b: Option<Box<Account<'info, TokenAccount>>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<CancelOrder>, order_id: u64) -> Result<()> {
    let now = get_timestamp()?;
    let accounts = &mut *ctx.accounts;

    let next = accounts.order.status.apply(OrderEvent::Cancel)?;
    let terms = Order::clone(&accounts.order);

    let signer = RelayerSigner {
        relayer: accounts.relayer.to_account_info(),
        bump: accounts.relayer.bump,
        token_program: accounts.token_program.to_account_info(),
    };

    let (leg_a, leg_b) = terms.custody_legs();
    let leg_a = CustodyAccounts::new(
        leg_a,
        &terms.owner,
        &mut accounts.custody_a,
        &mut accounts.vault_a,
        &accounts.refund_a,
    )?;

    let outcomes = match leg_b {
        Some(leg_b) => {
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
            signer.refund_all(&mut [leg_a, leg_b])?
        }
        None => signer.refund_all(&mut [leg_a])?,
    };

    let refunded_a = outcomes.first().map_or(0, |outcome| outcome.refunded);
    let refunded_b = outcomes.get(1).map_or(0, |outcome| outcome.refunded);

    accounts.order.status = next;

    emit!(OrderCancelled {
        order_id,
        owner: terms.owner,
        refunded_a,
        refunded_b,
        timestamp: now,
    });

    msg!("Order {} cancelled", order_id);
    msg!("Refunded: {} / {}", refunded_a, refunded_b);

    Ok(())
}
