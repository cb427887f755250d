//! Custody movements shared by the order instructions
//!
//! Deposits into the pooled vaults, router-driven settlement, refunds and
//! the execution bounty. Every payout leaves each vault at or above its
//! custody's `committed` amount, and every router call must pay the order's
//! output into accounts owned by the order owner.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::RelayerError;
use crate::interfaces::router::{self, AddLiquidityArgs, RemoveLiquidityArgs, RouterCall};
use crate::state::{Custody, CustodyLeg, Order, OrderKind};
use crate::utils::{bounty_float, bounty_payable, min_amount_with_tolerance};

/// Custody, vault and refund destination for one order leg
pub struct CustodyAccounts<'a, 'info> {
    pub custody: &'a mut Account<'info, Custody>,
    pub vault: &'a mut Account<'info, TokenAccount>,
    pub refund: AccountInfo<'info>,
    pub committed: u64,
}

impl<'a, 'info> CustodyAccounts<'a, 'info> {
    /// Match the accounts against the leg; refunds must go to `owner`
    pub fn new(
        leg: CustodyLeg,
        owner: &Pubkey,
        custody: &'a mut Account<'info, Custody>,
        vault: &'a mut Account<'info, TokenAccount>,
        refund: &Account<'info, TokenAccount>,
    ) -> Result<Self> {
        custody.ensure_matches(&leg.mint, &vault.key())?;
        require_keys_eq!(refund.mint, leg.mint, RelayerError::CustodyMismatch);
        require_keys_eq!(refund.owner, *owner, RelayerError::CustodyMismatch);

        Ok(Self {
            custody,
            vault,
            refund: refund.to_account_info(),
            committed: leg.amount,
        })
    }
}

/// Mint and minimum amount the router must deliver to the owner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputLeg {
    pub mint: Pubkey,
    pub minimum: u64,
}

/// Owner token account receiving one router output
pub struct RouterOutput<'a, 'info> {
    pub recipient: &'a mut Account<'info, TokenAccount>,
    pub minimum: u64,
}

impl<'a, 'info> RouterOutput<'a, 'info> {
    pub fn new(
        leg: OutputLeg,
        owner: &Pubkey,
        recipient: &'a mut Account<'info, TokenAccount>,
    ) -> Result<Self> {
        ensure_recipient(&recipient.mint, &recipient.owner, &leg, owner)?;
        Ok(Self {
            recipient,
            minimum: leg.minimum,
        })
    }
}

/// Output accounts must hold the expected mint and belong to the order owner
pub fn ensure_recipient(
    mint: &Pubkey,
    token_owner: &Pubkey,
    leg: &OutputLeg,
    owner: &Pubkey,
) -> Result<()> {
    require_keys_eq!(*mint, leg.mint, RelayerError::InvalidRecipient);
    require_keys_eq!(*token_owner, *owner, RelayerError::InvalidRecipient);
    Ok(())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LegOutcome {
    pub spent: u64,
    pub refunded: u64,
}

/// Split a leg's commitment into what the router pulled from the vault and
/// what goes back to the owner
pub fn leg_settlement(committed: u64, vault_before: u64, vault_after: u64) -> Result<LegOutcome> {
    let spent = vault_before.saturating_sub(vault_after);
    require!(spent <= committed, RelayerError::CommittedFundsExceeded);

    Ok(LegOutcome {
        spent,
        refunded: committed - spent,
    })
}

/// Amount the router paid into an output account
pub fn output_received(balance_before: u64, balance_after: u64, minimum: u64) -> Result<u64> {
    let received = balance_after.saturating_sub(balance_before);
    require!(
        received > 0 && received >= minimum,
        RelayerError::InsufficientRouterOutput
    );
    Ok(received)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BountyOutcome {
    Paid(u64),
    Skipped { available: u64 },
}

/// Pull `amount` from `source` into the pooled vault and commit it
pub fn deposit<'info>(
    token_program: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    source: &Account<'info, TokenAccount>,
    custody: &mut Account<'info, Custody>,
    vault: &mut Account<'info, TokenAccount>,
    mint: &Pubkey,
    amount: u64,
) -> Result<()> {
    custody.ensure_matches(mint, &vault.key())?;
    require_keys_eq!(source.mint, *mint, RelayerError::CustodyMismatch);

    token::transfer(
        CpiContext::new(
            token_program.clone(),
            Transfer {
                from: source.to_account_info(),
                to: vault.to_account_info(),
                authority: authority.clone(),
            },
        ),
        amount,
    )?;

    vault.reload()?;
    custody.commit(amount)?;
    custody.ensure_backed(vault.amount)
}

/// Router instruction for an order, minimums derived from its tolerance
pub fn router_call(order: &Order) -> Result<RouterCall> {
    let amount_a_min = min_amount_with_tolerance(order.amount_a, order.price_tolerance)?;
    let amount_b_min = min_amount_with_tolerance(order.amount_b, order.price_tolerance)?;

    Ok(match order.kind {
        OrderKind::Provision => RouterCall::AddLiquidity(AddLiquidityArgs {
            amount_a_desired: order.amount_a,
            amount_b_desired: order.amount_b,
            amount_a_min,
            amount_b_min,
            deadline: order.deadline,
        }),
        OrderKind::Removal => RouterCall::RemoveLiquidity(RemoveLiquidityArgs {
            liquidity: order.liquidity_amount,
            amount_a_min,
            amount_b_min,
            deadline: order.deadline,
        }),
    })
}

/// What the router must deliver to the owner for an order
///
/// Provisions mint LP tokens; removals pay out both pair tokens, each at
/// least the tolerance-adjusted expected amount.
pub fn router_outputs(order: &Order) -> Result<(OutputLeg, Option<OutputLeg>)> {
    Ok(match order.kind {
        OrderKind::Provision => (
            OutputLeg { mint: order.lp_mint, minimum: 1 },
            None,
        ),
        OrderKind::Removal => (
            OutputLeg {
                mint: order.token_a,
                minimum: min_amount_with_tolerance(order.amount_a, order.price_tolerance)?.max(1),
            },
            Some(OutputLeg {
                mint: order.token_b,
                minimum: min_amount_with_tolerance(order.amount_b, order.price_tolerance)?.max(1),
            }),
        ),
    })
}

/// Relayer PDA acting as vault authority
pub struct RelayerSigner<'info> {
    pub relayer: AccountInfo<'info>,
    pub bump: u8,
    pub token_program: AccountInfo<'info>,
}

impl<'info> RelayerSigner<'info> {
    /// Invoke the router against custody, then settle every leg
    ///
    /// The router sees the relayer, the leg vaults and the owner's output
    /// accounts in fixed positions, followed by `router_accounts`. Each
    /// output must grow by at least its minimum. Whatever the router did not
    /// pull from a vault is refunded to the order owner, and the leg's full
    /// commitment is released.
    pub fn settle_with_router(
        &self,
        router: &AccountInfo<'info>,
        router_accounts: &[AccountInfo<'info>],
        call: &RouterCall,
        legs: &mut [CustodyAccounts<'_, 'info>],
        outputs: &mut [RouterOutput<'_, 'info>],
    ) -> Result<Vec<LegOutcome>> {
        let mut vaults_before = Vec::with_capacity(legs.len());
        for leg in legs.iter_mut() {
            leg.vault.reload()?;
            vaults_before.push(leg.vault.amount);
        }
        let mut outputs_before = Vec::with_capacity(outputs.len());
        for output in outputs.iter_mut() {
            output.recipient.reload()?;
            outputs_before.push(output.recipient.amount);
        }

        let fixed: Vec<AccountInfo<'info>> = legs
            .iter()
            .map(|leg| leg.vault.to_account_info())
            .chain(outputs.iter().map(|output| output.recipient.to_account_info()))
            .collect();

        let bump = [self.bump];
        let seeds: &[&[u8]] = &[RELAYER_SEED, &bump];
        router::invoke(router, &self.relayer, &fixed, router_accounts, call, &[seeds])?;

        for (output, before) in outputs.iter_mut().zip(outputs_before) {
            output.recipient.reload()?;
            let received = output_received(before, output.recipient.amount, output.minimum)?;
            msg!("Router output: {} to {}", received, output.recipient.key());
        }

        legs.iter_mut()
            .zip(vaults_before)
            .map(|(leg, before)| {
                leg.vault.reload()?;
                let outcome = leg_settlement(leg.committed, before, leg.vault.amount)?;
                self.close_leg(leg, outcome)
            })
            .collect()
    }

    /// Return every leg's full commitment to the owner
    pub fn refund_all(&self, legs: &mut [CustodyAccounts<'_, 'info>]) -> Result<Vec<LegOutcome>> {
        legs.iter_mut()
            .map(|leg| {
                leg.vault.reload()?;
                let outcome = LegOutcome {
                    spent: 0,
                    refunded: leg.committed,
                };
                self.close_leg(leg, outcome)
            })
            .collect()
    }

    fn close_leg(
        &self,
        leg: &mut CustodyAccounts<'_, 'info>,
        outcome: LegOutcome,
    ) -> Result<LegOutcome> {
        if outcome.refunded > 0 {
            let bump = [self.bump];
            let seeds: &[&[u8]] = &[RELAYER_SEED, &bump];
            token::transfer(
                CpiContext::new_with_signer(
                    self.token_program.clone(),
                    Transfer {
                        from: leg.vault.to_account_info(),
                        to: leg.refund.clone(),
                        authority: self.relayer.clone(),
                    },
                    &[seeds],
                ),
                outcome.refunded,
            )?;
            leg.vault.reload()?;
        }

        leg.custody.release(leg.committed)?;
        leg.custody.ensure_backed(leg.vault.amount)?;

        Ok(outcome)
    }
}

/// Pay the execution bounty from the relayer float
///
/// Best effort: any failure is logged and reported as skipped so the
/// liquidity action that preceded it stands.
pub fn pay_bounty<'info>(
    relayer: &AccountInfo<'info>,
    executor: &AccountInfo<'info>,
    bounty: u64,
) -> BountyOutcome {
    match try_pay_bounty(relayer, executor, bounty) {
        Ok(outcome) => outcome,
        Err(err) => {
            msg!("Bounty payment failed: {}", err);
            BountyOutcome::Skipped { available: 0 }
        }
    }
}

fn try_pay_bounty<'info>(
    relayer: &AccountInfo<'info>,
    executor: &AccountInfo<'info>,
    bounty: u64,
) -> Result<BountyOutcome> {
    let rent_floor = Rent::get()?.minimum_balance(relayer.data_len());
    transfer_bounty(relayer, executor, bounty, rent_floor)
}

/// Move `bounty` lamports if the float above `rent_floor` covers it
fn transfer_bounty<'info>(
    relayer: &AccountInfo<'info>,
    executor: &AccountInfo<'info>,
    bounty: u64,
    rent_floor: u64,
) -> Result<BountyOutcome> {
    let lamports = relayer.lamports();

    let Some(amount) = bounty_payable(lamports, rent_floor, bounty) else {
        return Ok(BountyOutcome::Skipped {
            available: bounty_float(lamports, rent_floor),
        });
    };

    let debited = lamports
        .checked_sub(amount)
        .ok_or(RelayerError::MathUnderflow)?;
    let credited = executor
        .lamports()
        .checked_add(amount)
        .ok_or(RelayerError::MathOverflow)?;

    let mut from = relayer.try_borrow_mut_lamports()?;
    let mut to = executor.try_borrow_mut_lamports()?;
    **from = debited;
    **to = credited;

    Ok(BountyOutcome::Paid(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(kind: OrderKind) -> Order {
        Order {
            kind,
            amount_a: 1_000,
            amount_b: 4_000,
            liquidity_amount: 2_000,
            price_tolerance: 10_000,
            deadline: 1_700_000_000,
            ..Order::default()
        }
    }

    #[test]
    fn provision_call_applies_tolerance_to_both_amounts() {
        let call = router_call(&order(OrderKind::Provision)).unwrap();
        assert_eq!(
            call,
            RouterCall::AddLiquidity(AddLiquidityArgs {
                amount_a_desired: 1_000,
                amount_b_desired: 4_000,
                amount_a_min: 990,
                amount_b_min: 3_960,
                deadline: 1_700_000_000,
            })
        );
    }

    #[test]
    fn removal_call_burns_liquidity() {
        let call = router_call(&order(OrderKind::Removal)).unwrap();
        assert_eq!(
            call,
            RouterCall::RemoveLiquidity(RemoveLiquidityArgs {
                liquidity: 2_000,
                amount_a_min: 990,
                amount_b_min: 3_960,
                deadline: 1_700_000_000,
            })
        );
    }

    #[test]
    fn removal_outputs_go_to_both_pair_tokens() {
        let removal = Order {
            token_a: Pubkey::new_unique(),
            token_b: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            ..order(OrderKind::Removal)
        };
        let (a, b) = router_outputs(&removal).unwrap();
        assert_eq!(a, OutputLeg { mint: removal.token_a, minimum: 990 });
        assert_eq!(b, Some(OutputLeg { mint: removal.token_b, minimum: 3_960 }));

        let provision = Order { kind: OrderKind::Provision, ..removal };
        let (lp, none) = router_outputs(&provision).unwrap();
        assert_eq!(lp, OutputLeg { mint: provision.lp_mint, minimum: 1 });
        assert!(none.is_none());
    }

    #[test]
    fn outputs_must_be_owner_accounts_of_the_expected_mint() {
        let owner = Pubkey::new_unique();
        let leg = OutputLeg { mint: Pubkey::new_unique(), minimum: 1 };

        ensure_recipient(&leg.mint, &owner, &leg, &owner).unwrap();
        assert_eq!(
            ensure_recipient(&leg.mint, &Pubkey::new_unique(), &leg, &owner).unwrap_err(),
            RelayerError::InvalidRecipient.into()
        );
        assert_eq!(
            ensure_recipient(&Pubkey::new_unique(), &owner, &leg, &owner).unwrap_err(),
            RelayerError::InvalidRecipient.into()
        );
    }

    #[test]
    fn router_output_must_reach_the_owner() {
        assert_eq!(output_received(100, 1_100, 990).unwrap(), 1_000);

        // Output sent elsewhere leaves the owner's balance flat
        assert_eq!(
            output_received(100, 100, 1).unwrap_err(),
            RelayerError::InsufficientRouterOutput.into()
        );
        assert_eq!(
            output_received(100, 1_000, 990).unwrap_err(),
            RelayerError::InsufficientRouterOutput.into()
        );
    }

    #[test]
    fn leg_settlement_refunds_what_the_router_left() {
        assert_eq!(
            leg_settlement(1_000, 5_000, 4_300).unwrap(),
            LegOutcome { spent: 700, refunded: 300 }
        );
        assert_eq!(
            leg_settlement(1_000, 5_000, 5_000).unwrap(),
            LegOutcome { spent: 0, refunded: 1_000 }
        );
        assert_eq!(
            leg_settlement(1_000, 5_000, 6_000).unwrap(),
            LegOutcome { spent: 0, refunded: 1_000 }
        );
        // The router may not dip into other orders' funds
        assert_eq!(
            leg_settlement(1_000, 5_000, 3_999).unwrap_err(),
            RelayerError::CommittedFundsExceeded.into()
        );
    }

    #[test]
    fn settled_leg_keeps_other_commitments_backed() {
        let mut custody = Custody::default();
        custody.commit(1_000).unwrap();
        custody.commit(500).unwrap();
        let vault_before = 1_500;

        let outcome = leg_settlement(1_000, vault_before, 800).unwrap();
        let vault_after_refund = 800 - outcome.refunded;
        custody.release(1_000).unwrap();

        assert_eq!(vault_after_refund, 500);
        custody.ensure_backed(vault_after_refund).unwrap();
        assert_eq!(
            custody.ensure_backed(vault_after_refund - 1).unwrap_err(),
            RelayerError::CommittedFundsExceeded.into()
        );
    }

    const RENT_FLOOR: u64 = 1_000_000;

    #[test]
    fn bounty_skipped_when_float_is_short() {
        let (relayer_key, executor_key, owner) =
            (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let (mut relayer_lamports, mut executor_lamports) = (RENT_FLOOR + 5_000, 42u64);
        let (mut d0, mut d1) = (Vec::<u8>::new(), Vec::<u8>::new());
        let relayer = AccountInfo::new(&relayer_key, false, true, &mut relayer_lamports, &mut d0, &owner, false, 0);
        let executor = AccountInfo::new(&executor_key, true, true, &mut executor_lamports, &mut d1, &owner, false, 0);

        assert_eq!(
            transfer_bounty(&relayer, &executor, 10_000, RENT_FLOOR).unwrap(),
            BountyOutcome::Skipped { available: 5_000 }
        );
        assert_eq!(relayer.lamports(), RENT_FLOOR + 5_000);
        assert_eq!(executor.lamports(), 42);
    }

    #[test]
    fn bounty_moves_exactly_the_configured_amount() {
        let (relayer_key, executor_key, owner) =
            (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let (mut relayer_lamports, mut executor_lamports) = (RENT_FLOOR + 25_000, 42u64);
        let (mut d0, mut d1) = (Vec::<u8>::new(), Vec::<u8>::new());
        let relayer = AccountInfo::new(&relayer_key, false, true, &mut relayer_lamports, &mut d0, &owner, false, 0);
        let executor = AccountInfo::new(&executor_key, true, true, &mut executor_lamports, &mut d1, &owner, false, 0);

        assert_eq!(
            transfer_bounty(&relayer, &executor, 10_000, RENT_FLOOR).unwrap(),
            BountyOutcome::Paid(10_000)
        );
        assert_eq!(relayer.lamports(), RENT_FLOOR + 15_000);
        assert_eq!(executor.lamports(), 10_042);

        // Exactly at the floor: the float covers the bounty once more, then nothing
        transfer_bounty(&relayer, &executor, 15_000, RENT_FLOOR).unwrap();
        assert_eq!(relayer.lamports(), RENT_FLOOR);
        assert_eq!(
            transfer_bounty(&relayer, &executor, 1, RENT_FLOOR).unwrap(),
            BountyOutcome::Skipped { available: 0 }
        );
    }
}
