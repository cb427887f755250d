//! Read the time-weighted amount out for an oracle
//!
//! The result is returned as instruction return data.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::RelayerError;
use crate::interfaces::pair::PairState;
use crate::state::{OracleObservations, Relayer};
use crate::utils::get_timestamp;

#[derive(Accounts)]
#[instruction(oracle_id: u64)]
pub struct Consult<'info> {
    #[account(
        seeds = [RELAYER_SEED],
        bump = relayer.bump,
    )]
    pub relayer: Box<Account<'info, Relayer>>,

    #[account(
        seeds = [ORACLE_SEED, &oracle_id.to_le_bytes()],
        bump = oracle.bump,
    )]
    pub oracle: Box<Account<'info, OracleObservations>>,

    /// CHECK: Address pinned to the buffer; layout checked on load
    #[account(address = oracle.pair @ RelayerError::InvalidPairAccount)]
    pub pair: UncheckedAccount<'info>,
}

pub fn handler(
    ctx: Context<Consult>,
    _oracle_id: u64,
    token_in: Pubkey,
    amount_in: u64,
    token_out: Pubkey,
) -> Result<u64> {
    let now = get_timestamp()?;
    let window = ctx.accounts.relayer.window()?;
    let oracle = &ctx.accounts.oracle;
    let pair = PairState::load(&ctx.accounts.pair.to_account_info(), &oracle.factory)?;

    // Any sample strictly before now qualifies
    let amount_out = oracle.consult(&window, &pair, now, 1, &token_in, amount_in, &token_out)?;

    msg!("Consult: {} in -> {} out", amount_in, amount_out);

    Ok(amount_out)
}
