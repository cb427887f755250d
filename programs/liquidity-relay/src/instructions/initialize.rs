//! Initialize the Liquidity Relay
//!
//! This instruction creates the relayer configuration account.
//! Can only be called once; the oracle window is fixed afterwards.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::events::RelayerInitialized;
use crate::oracle::OracleWindow;
use crate::state::Relayer;

/// Construction-time configuration
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RelayerParams {
    pub owner: Pubkey,
    pub factory: Pubkey,
    pub router: Pubkey,
    pub counterpart_factory: Pubkey,
    pub counterpart_router: Pubkey,
    pub oracle_authority: Pubkey,
    pub window_size: i64,
    pub granularity: u16,
    pub execution_bounty: u64,
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Deployer paying for the relayer account
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The relayer config account (PDA)
    #[account(
        init,
        payer = payer,
        space = Relayer::LEN,
        seeds = [RELAYER_SEED],
        bump
    )]
    pub relayer: Account<'info, Relayer>,

    /// System program
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, params: RelayerParams) -> Result<()> {
    let window = OracleWindow::new(params.window_size, params.granularity)?;

    let relayer = &mut ctx.accounts.relayer;

    relayer.owner = params.owner;
    relayer.factory = params.factory;
    relayer.router = params.router;
    relayer.counterpart_factory = params.counterpart_factory;
    relayer.counterpart_router = params.counterpart_router;
    relayer.oracle_authority = params.oracle_authority;
    relayer.window_size = window.window_size();
    relayer.granularity = window.granularity();
    relayer.period_size = window.period_size();
    relayer.execution_bounty = params.execution_bounty;
    relayer.next_order_id = 1;
    relayer.next_oracle_id = 1;
    relayer.total_orders = 0;
    relayer.total_executed = 0;
    relayer.bump = ctx.bumps.relayer;

    emit!(RelayerInitialized {
        owner: relayer.owner,
        factory: relayer.factory,
        counterpart_factory: relayer.counterpart_factory,
        window_size: relayer.window_size,
        granularity: relayer.granularity,
        execution_bounty: relayer.execution_bounty,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Liquidity relay initialized");
    msg!("Owner: {}", relayer.owner);
    msg!(
        "Window: {}s over {} buckets ({}s each)",
        relayer.window_size,
        relayer.granularity,
        relayer.period_size
    );
    msg!("Execution bounty: {} lamports", relayer.execution_bounty);

    Ok(())
}
