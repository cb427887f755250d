//! Refresh an oracle buffer outside of any order
//!
//! Only the oracle authority may call this. The shared buffer is sampled
//! but no order's update count changes.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::RelayerError;
use crate::interfaces::pair::PairState;
use crate::state::{OracleObservations, Relayer};
use crate::utils::get_timestamp;

#[derive(Accounts)]
#[instruction(oracle_id: u64)]
pub struct UpdateObservation<'info> {
    /// Oracle authority (checked in the handler)
    pub authority: Signer<'info>,

    #[account(
        seeds = [RELAYER_SEED],
        bump = relayer.bump,
    )]
    pub relayer: Box<Account<'info, Relayer>>,

    #[account(
        mut,
        seeds = [ORACLE_SEED, &oracle_id.to_le_bytes()],
        bump = oracle.bump,
    )]
    pub oracle: Box<Account<'info, OracleObservations>>,

    /// CHECK: Address pinned to the buffer; layout checked on load
    #[account(address = oracle.pair @ RelayerError::InvalidPairAccount)]
    pub pair: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<UpdateObservation>, oracle_id: u64) -> Result<()> {
    ctx.accounts
        .relayer
        .ensure_oracle_authority(&ctx.accounts.authority.key())?;

    let now = get_timestamp()?;
    let window = ctx.accounts.relayer.window()?;

    let oracle = &mut ctx.accounts.oracle;
    let pair = PairState::load(&ctx.accounts.pair.to_account_info(), &oracle.factory)?;

    if oracle.update(&window, &pair, now)? {
        msg!(
            "Oracle {} sampled into bucket {}",
            oracle_id,
            window.observation_index_of(now)
        );
    } else {
        msg!("Oracle {} already sampled this period", oracle_id);
    }

    Ok(())
}
