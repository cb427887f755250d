//! Utility functions for the Liquidity Relay
//!
//! Helper functions for request validation, tolerance math and the
//! execution bounty.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::RelayerError;
use crate::instructions::OrderParams;
use crate::state::Relayer;

/// Validate an order request before any state changes
///
/// Checks run in a fixed order and the first failure aborts the call:
/// factory, caller, pair, token order, amounts, tolerance, deadline, window
/// time. The window time leaves at least one period of the oracle window
/// free, so the first sample of a span is never overwritten by the last.
///
/// # Arguments
///
/// * `relayer` - Relayer configuration
/// * `caller` - Signer creating the order
/// * `params` - Requested order terms
/// * `liquidity` - LP amount for removals, `None` for provisions
/// * `pair_exists` - Whether the supplied pair account is the factory's pair
/// * `now` - Current Unix timestamp
pub fn validate_order_request(
    relayer: &Relayer,
    caller: &Pubkey,
    params: &OrderParams,
    liquidity: Option<u64>,
    pair_exists: bool,
    now: i64,
) -> Result<()> {
    require!(
        relayer.router_for(&params.factory).is_some(),
        RelayerError::InvalidFactory
    );
    require_keys_eq!(*caller, relayer.owner, RelayerError::CallerNotOwner);
    require!(
        params.token_a != params.token_b && pair_exists,
        RelayerError::InvalidPair
    );
    require!(params.token_a < params.token_b, RelayerError::InvalidTokenOrder);

    match liquidity {
        None => require!(
            params.amount_a > 0 && params.amount_b > 0,
            RelayerError::InvalidTokenAmount
        ),
        Some(liquidity) => require!(
            liquidity > 0 && params.amount_a > 0 && params.amount_b > 0,
            RelayerError::InvalidLiquidityAmount
        ),
    }

    validate_price_tolerance(params.price_tolerance)?;
    require!(params.deadline >= now, RelayerError::DeadlineReached);

    let window = relayer.window()?;
    require!(
        params.max_window_time >= 0
            && params.max_window_time <= window.window_size() - window.period_size(),
        RelayerError::InvalidWindowTime
    );
    Ok(())
}

/// Validate tolerance is within 0..=100% in ppm
pub fn validate_price_tolerance(price_tolerance: u32) -> Result<()> {
    require!(
        price_tolerance <= MAX_PRICE_TOLERANCE,
        RelayerError::InvalidTolerance
    );
    Ok(())
}

/// Check a requested amount against the oracle-implied fair amount
///
/// Fails when `|requested - fair| * 1e6 > tolerance * fair`.
///
/// # Arguments
///
/// * `requested` - Amount the order asks for
/// * `fair` - Amount implied by the TWAP
/// * `price_tolerance` - Allowed deviation in ppm
pub fn check_price_tolerance(requested: u64, fair: u64, price_tolerance: u32) -> Result<()> {
    let deviation = requested.abs_diff(fair) as u128;

    let scaled_deviation = deviation
        .checked_mul(PARTS_PER_MILLION as u128)
        .ok_or(RelayerError::MathOverflow)?;
    let allowed = (price_tolerance as u128)
        .checked_mul(fair as u128)
        .ok_or(RelayerError::MathOverflow)?;

    require!(
        scaled_deviation <= allowed,
        RelayerError::PriceToleranceExceeded
    );
    Ok(())
}

/// Minimum amount accepted by the router for a tolerance
///
/// `amount - amount * tolerance / 1e6`
pub fn min_amount_with_tolerance(amount: u64, price_tolerance: u32) -> Result<u64> {
    let slack = (amount as u128)
        .checked_mul(price_tolerance as u128)
        .ok_or(RelayerError::MathOverflow)?
        / PARTS_PER_MILLION as u128;

    (amount as u128)
        .checked_sub(slack)
        .and_then(|min| u64::try_from(min).ok())
        .ok_or_else(|| error!(RelayerError::MathUnderflow))
}

/// Lamports the relayer can spend without dropping below rent exemption
pub fn bounty_float(lamports: u64, rent_floor: u64) -> u64 {
    lamports.saturating_sub(rent_floor)
}

/// Bounty actually payable from the float, if it covers the full amount
///
/// # Returns
///
/// `Some(bounty)` when the float covers it, `None` otherwise
pub fn bounty_payable(lamports: u64, rent_floor: u64, bounty: u64) -> Option<u64> {
    (bounty_float(lamports, rent_floor) >= bounty).then_some(bounty)
}

/// Get current Unix timestamp
pub fn get_timestamp() -> Result<i64> {
    Ok(Clock::get()?.unix_timestamp)
}
