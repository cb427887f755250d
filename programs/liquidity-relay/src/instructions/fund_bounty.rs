//! Top up the execution bounty float
//!
//! Anyone may fund the relayer; lamports above its rent-exempt minimum
//! pay executors.

use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::constants::*;
use crate::errors::RelayerError;
use crate::events::BountyFunded;
use crate::state::Relayer;

#[derive(Accounts)]
pub struct FundBounty<'info> {
    #[account(mut)]
    pub funder: Signer<'info>,

    #[account(
        mut,
        seeds = [RELAYER_SEED],
        bump = relayer.bump,
    )]
    pub relayer: Account<'info, Relayer>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<FundBounty>, amount: u64) -> Result<()> {
    require!(amount > 0, RelayerError::InvalidTokenAmount);

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.funder.to_account_info(),
                to: ctx.accounts.relayer.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(BountyFunded {
        funder: ctx.accounts.funder.key(),
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Bounty float funded with {} lamports", amount);

    Ok(())
}
