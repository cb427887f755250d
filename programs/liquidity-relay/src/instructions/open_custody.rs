//! Open pooled custody for a mint
//!
//! Creates the custody ledger and the vault token account the relayer
//! signs for. Orders can only use mints that have custody open.

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::events::CustodyOpened;
use crate::state::{Custody, Relayer};

#[derive(Accounts)]
pub struct OpenCustody<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        seeds = [RELAYER_SEED],
        bump = relayer.bump,
    )]
    pub relayer: Account<'info, Relayer>,

    pub mint: Account<'info, Mint>,

    #[account(
        init,
        payer = payer,
        space = Custody::LEN,
        seeds = [CUSTODY_SEED, mint.key().as_ref()],
        bump
    )]
    pub custody: Account<'info, Custody>,

    /// Pooled vault, authority is the relayer PDA
    #[account(
        init,
        payer = payer,
        seeds = [VAULT_SEED, mint.key().as_ref()],
        bump,
        token::mint = mint,
        token::authority = relayer,
    )]
    pub vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn handler(ctx: Context<OpenCustody>) -> Result<()> {
    let custody = &mut ctx.accounts.custody;

    custody.mint = ctx.accounts.mint.key();
    custody.vault = ctx.accounts.vault.key();
    custody.committed = 0;
    custody.bump = ctx.bumps.custody;
    custody.vault_bump = ctx.bumps.vault;

    emit!(CustodyOpened {
        mint: custody.mint,
        vault: custody.vault,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Custody opened for mint {}", custody.mint);

    Ok(())
}
