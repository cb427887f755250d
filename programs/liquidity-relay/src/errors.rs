//! Custom error codes for the Liquidity Relay
//!
//! Error codes are organized by category:
//! - Validation errors: rejected input, resubmit corrected
//! - Timing errors: transient, retry later
//! - Reserve errors: transient, wait for pool liquidity
//! - State errors: the order is in the wrong lifecycle stage
//! - Custody errors: committed-funds accounting
//! - Integration errors: external pair and router accounts

use anchor_lang::prelude::*;

#[error_code]
pub enum RelayerError {
    // =========================================================================
    // Validation Errors
    // =========================================================================

    /// Factory is neither the primary nor the counterpart factory
    #[msg("Factory is not configured on this relayer")]
    InvalidFactory,

    /// Signer is not the relayer owner
    #[msg("Unauthorized: caller is not the relayer owner")]
    CallerNotOwner,

    /// Signer is not the relayer's oracle authority
    #[msg("Unauthorized: caller is not the oracle authority")]
    InvalidOracleAuthority,

    /// Identical tokens, or no pair exists for them under the factory
    #[msg("Pair does not exist for the given tokens")]
    InvalidPair,

    /// Tokens must be supplied in ascending order
    #[msg("Tokens must be supplied in canonical ascending order")]
    InvalidTokenOrder,

    /// Provision amounts must be greater than 0
    #[msg("Token amounts must be greater than 0")]
    InvalidTokenAmount,

    /// Removal liquidity and expected amounts must be greater than 0
    #[msg("Liquidity and expected amounts must be greater than 0")]
    InvalidLiquidityAmount,

    /// Price tolerance above 1,000,000 ppm
    #[msg("Price tolerance must be between 0 and 1000000 ppm")]
    InvalidTolerance,

    /// Window time must leave the first sample in the buffer
    #[msg("Window time must be between 0 and window size minus one period")]
    InvalidWindowTime,

    /// Deadline is in the past
    #[msg("Order deadline reached")]
    DeadlineReached,

    /// Granularity is zero or above the account size bound
    #[msg("Granularity must be between 1 and the maximum bucket count")]
    InvalidGranularity,

    /// Window size is not a positive multiple of granularity
    #[msg("Window size must be evenly divisible by granularity")]
    WindowNotEvenlyDivisible,

    /// Token is not one of the oracle's pair tokens
    #[msg("Token is not tracked by this oracle")]
    InvalidToken,

    // =========================================================================
    // Timing Errors
    // =========================================================================

    /// Oracle updates must be at least one period apart
    #[msg("Oracle period has not elapsed since the last update")]
    PeriodNotElapsed,

    /// No bucket inside the window predates the current time
    #[msg("Missing historical observation")]
    MissingHistoricalObservation,

    /// Clock returned a timestamp the oracle cannot use
    #[msg("Invalid timestamp")]
    InvalidTimestamp,

    // =========================================================================
    // Reserve Errors
    // =========================================================================

    /// Pool reserves are below the order's minimums
    #[msg("Pool reserves are below the order minimum")]
    ReserveTooLow,

    // =========================================================================
    // State Errors
    // =========================================================================

    /// Order is not waiting on oracle updates
    #[msg("Order is not pending")]
    OrderNotPending,

    /// Order has not completed its oracle observation cycle
    #[msg("Order is not ready for execution")]
    OrderNotReady,

    /// Order was already executed
    #[msg("Order is already executed")]
    OrderAlreadyExecuted,

    /// Order was cancelled by the owner
    #[msg("Order is cancelled")]
    OrderIsCancelled,

    /// Requested amounts deviate from the oracle price by more than the tolerance
    #[msg("Price deviation exceeds order tolerance")]
    PriceToleranceExceeded,

    // =========================================================================
    // Custody Errors
    // =========================================================================

    /// Custody, vault or refund account does not match the order
    #[msg("Custody account does not match the order")]
    CustodyMismatch,

    /// A custody account required by this order kind was not supplied
    #[msg("Missing custody account")]
    MissingCustodyAccount,

    /// Output account is not the order owner's account for the expected mint
    #[msg("Router output account does not belong to the order owner")]
    InvalidRecipient,

    /// An output account required by this order kind was not supplied
    #[msg("Missing router output account")]
    MissingOutputAccount,

    /// Router did not pay the order's output into the owner's account
    #[msg("Router output below the order minimum")]
    InsufficientRouterOutput,

    /// Payout would leave a vault below its committed amount
    #[msg("Payout exceeds committed funds")]
    CommittedFundsExceeded,

    /// Bounty float cannot cover the requested amount
    #[msg("Insufficient bounty float")]
    InsufficientBountyFloat,

    /// Arithmetic overflow in calculation
    #[msg("Arithmetic overflow in calculation")]
    MathOverflow,

    /// Arithmetic underflow in calculation
    #[msg("Arithmetic underflow in calculation")]
    MathUnderflow,

    // =========================================================================
    // Integration Errors
    // =========================================================================

    /// Router does not match the order's factory
    #[msg("Router does not match the order configuration")]
    InvalidRouter,

    /// Pair account could not be read
    #[msg("Invalid pair account")]
    InvalidPairAccount,

    /// Router instruction data could not be encoded
    #[msg("Failed to serialize router instruction")]
    SerializationFailed,
}
