//! Update relayer configuration (owner only)
//!
//! The oracle window and the DEX programs are fixed at initialization.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::RelayerError;
use crate::events::ConfigUpdated;
use crate::state::Relayer;

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    /// Relayer owner (must sign)
    #[account(
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

pub fn handler(
    ctx: Context<UpdateConfig>,
    new_owner: Option<Pubkey>,
    new_execution_bounty: Option<u64>,
    new_oracle_authority: Option<Pubkey>,
) -> Result<()> {
    let relayer = &mut ctx.accounts.relayer;

    if let Some(bounty) = new_execution_bounty {
        relayer.execution_bounty = bounty;
        msg!("Execution bounty updated to: {} lamports", bounty);
    }

    if let Some(authority) = new_oracle_authority {
        relayer.oracle_authority = authority;
        msg!("Oracle authority updated to: {}", authority);
    }

    if let Some(owner) = new_owner {
        relayer.owner = owner;
        msg!("Owner updated to: {}", owner);
    }

    emit!(ConfigUpdated {
        owner: relayer.owner,
        execution_bounty: relayer.execution_bounty,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
