//! Withdraw from the bounty float (owner only)

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::RelayerError;
use crate::events::BountyWithdrawn;
use crate::state::Relayer;
use crate::utils::bounty_float;

#[derive(Accounts)]
pub struct WithdrawBounty<'info> {
    /// Relayer owner (must sign)
    #[account(
        mut,
        constraint = owner.key() == relayer.owner @ RelayerError::CallerNotOwner,
    )]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [RELAYER_SEED],
        bump = relayer.bump,
    )]
    pub relayer: Account<'info, Relayer>,
}

pub fn handler(ctx: Context<WithdrawBounty>, amount: u64) -> Result<()> {
    let relayer = ctx.accounts.relayer.to_account_info();
    let rent_floor = Rent::get()?.minimum_balance(relayer.data_len());

    // The float never includes the rent-exempt minimum
    let available = bounty_float(relayer.lamports(), rent_floor);
    require!(amount <= available, RelayerError::InsufficientBountyFloat);

    **relayer.try_borrow_mut_lamports()? -= amount;
    **ctx.accounts.owner.try_borrow_mut_lamports()? += amount;

    let remaining = bounty_float(relayer.lamports(), rent_floor);

    emit!(BountyWithdrawn {
        owner: ctx.accounts.owner.key(),
        amount,
        remaining,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Bounty float withdrawn");
    msg!("Amount: {} lamports", amount);
    msg!("Remaining: {} lamports", remaining);

    Ok(())
}
