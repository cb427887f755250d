//! Program constants for the Liquidity Relay
//!
//! Centralized location for all magic numbers and configuration values.

// =============================================================================
// Seeds for PDA derivation
// =============================================================================

/// Seed for the relayer config PDA
pub const RELAYER_SEED: &[u8] = b"relayer";

/// Seed for order PDAs
pub const ORDER_SEED: &[u8] = b"order";

/// Seed for oracle observation buffer PDAs
pub const ORACLE_SEED: &[u8] = b"oracle";

/// Seed for per-mint custody PDAs
pub const CUSTODY_SEED: &[u8] = b"custody";

/// Seed for per-mint vault token accounts
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed the factory program uses for its pair accounts
pub const PAIR_SEED: &[u8] = b"pair";

// =============================================================================
// Tolerance
// =============================================================================

/// Parts-per-million denominator (100% = 1_000_000 ppm)
pub const PARTS_PER_MILLION: u64 = 1_000_000;

/// Maximum price tolerance (100%)
pub const MAX_PRICE_TOLERANCE: u32 = 1_000_000;

// =============================================================================
// Oracle
// =============================================================================

/// Fractional bits of the Q64.64 prices kept in the accumulators
pub const Q64_RESOLUTION: u32 = 64;

/// Mask selecting the fractional half of a Q64.64 value
pub const Q64_FRACTION_MASK: u128 = u64::MAX as u128;

/// Upper bound on buckets per buffer; keeps oracle accounts under the
/// 10 KiB CPI allocation limit
pub const MAX_GRANULARITY: u16 = 240;

/// Oracle updates required before an order can leave `Pending`
pub const REQUIRED_OBSERVATIONS: u8 = 2;

// =============================================================================
// Router instructions
// =============================================================================

/// Router instruction used to add liquidity
pub const ROUTER_ADD_LIQUIDITY: &str = "add_liquidity";

/// Router instruction used to remove liquidity
pub const ROUTER_REMOVE_LIQUIDITY: &str = "remove_liquidity";
