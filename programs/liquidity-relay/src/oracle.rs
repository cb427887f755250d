//! Sliding-window TWAP oracle math
//!
//! Observations live in fixed-size circular buffers, one bucket per period.
//! Prices are unsigned Q64.64 fixed point held in `u128`; cumulative
//! accumulators wrap on overflow, so every difference between two of them
//! is taken with wrapping subtraction.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::RelayerError;
use crate::interfaces::pair::PairState;

/// One bucket of an observation buffer
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Observation {
    /// Timestamp of the sample; 0 marks an empty bucket
    pub timestamp: i64,
    /// Token 0 price accumulator at `timestamp`
    pub price_0_cumulative: u128,
    /// Token 1 price accumulator at `timestamp`
    pub price_1_cumulative: u128,
}

impl Observation {
    pub const LEN: usize = 8 + // timestamp
        16 + // price_0_cumulative
        16;  // price_1_cumulative

    pub fn is_populated(&self) -> bool {
        self.timestamp > 0
    }
}

/// Cumulative price pair, both in Q64.64 seconds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CumulativePrices {
    pub price_0: u128,
    pub price_1: u128,
}

/// Which accumulator a consult reads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceDirection {
    /// Token 0 in, token 1 out (reads the token 0 accumulator)
    ZeroForOne,
    /// Token 1 in, token 0 out (reads the token 1 accumulator)
    OneForZero,
}

/// Window geometry shared by every buffer of a relayer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OracleWindow {
    window_size: i64,
    granularity: u16,
    period_size: i64,
}

impl OracleWindow {
    /// Validate and build the window
    ///
    /// Fails if `granularity` is 0 (or above [`MAX_GRANULARITY`]) and if
    /// `window_size` is not a positive multiple of `granularity`.
    pub fn new(window_size: i64, granularity: u16) -> Result<Self> {
        require!(
            granularity > 0 && granularity <= MAX_GRANULARITY,
            RelayerError::InvalidGranularity
        );
        require!(
            window_size > 0 && window_size % granularity as i64 == 0,
            RelayerError::WindowNotEvenlyDivisible
        );

        Ok(Self {
            window_size,
            granularity,
            period_size: window_size / granularity as i64,
        })
    }

    pub fn window_size(&self) -> i64 {
        self.window_size
    }

    pub fn granularity(&self) -> u16 {
        self.granularity
    }

    pub fn period_size(&self) -> i64 {
        self.period_size
    }

    /// Absolute period number of a timestamp
    pub fn epoch_period(&self, timestamp: i64) -> i64 {
        timestamp.div_euclid(self.period_size)
    }

    /// Bucket holding samples taken at `timestamp`
    ///
    /// Periodic in `window_size`: `t` and `t + window_size` share a bucket.
    pub fn observation_index_of(&self, timestamp: i64) -> usize {
        self.epoch_period(timestamp)
            .rem_euclid(self.granularity as i64) as usize
    }
}

/// Encode `numerator / denominator` as Q64.64
///
/// Returns `None` for an empty reserve, where no price exists.
pub fn encode_price(numerator: u64, denominator: u64) -> Option<u128> {
    if numerator == 0 || denominator == 0 {
        return None;
    }
    Some(((numerator as u128) << Q64_RESOLUTION) / denominator as u128)
}

/// Extrapolate accumulators from the pair's last sync to `now`
///
/// The pair only folds its instantaneous price into the accumulators when
/// it is touched. Between touches the reserve ratio is constant, so the
/// accumulator it *would* hold at `now` is the last value plus that ratio
/// times the elapsed time.
pub fn counterfactual_cumulative(
    reserves: (u64, u64),
    last_cumulative: CumulativePrices,
    last_timestamp: i64,
    now: i64,
) -> CumulativePrices {
    let elapsed = now.saturating_sub(last_timestamp);
    if elapsed <= 0 {
        return last_cumulative;
    }

    let (reserve_0, reserve_1) = reserves;
    match (
        encode_price(reserve_1, reserve_0),
        encode_price(reserve_0, reserve_1),
    ) {
        (Some(price_0), Some(price_1)) => {
            let elapsed = elapsed as u128;
            CumulativePrices {
                price_0: last_cumulative
                    .price_0
                    .wrapping_add(price_0.wrapping_mul(elapsed)),
                price_1: last_cumulative
                    .price_1
                    .wrapping_add(price_1.wrapping_mul(elapsed)),
            }
        }
        _ => last_cumulative,
    }
}

/// Accumulators of `pair` as of `now`
pub fn current_cumulative_prices(pair: &PairState, now: i64) -> CumulativePrices {
    counterfactual_cumulative(
        (pair.reserve_0, pair.reserve_1),
        CumulativePrices {
            price_0: pair.price_0_cumulative_last,
            price_1: pair.price_1_cumulative_last,
        },
        pair.block_timestamp_last,
        now,
    )
}

/// Average Q64.64 price between two accumulator readings
pub fn average_price(start: u128, end: u128, elapsed: i64) -> Result<u128> {
    require!(elapsed > 0, RelayerError::MissingHistoricalObservation);
    Ok(end.wrapping_sub(start) / elapsed as u128)
}

/// `floor(price * amount / 2^64)` without intermediate overflow
pub fn decode_amount(price: u128, amount_in: u64) -> Result<u64> {
    let amount = amount_in as u128;
    let integer = (price >> Q64_RESOLUTION)
        .checked_mul(amount)
        .ok_or(RelayerError::MathOverflow)?;
    let fraction = ((price & Q64_FRACTION_MASK) * amount) >> Q64_RESOLUTION;

    let total = integer
        .checked_add(fraction)
        .ok_or(RelayerError::MathOverflow)?;
    u64::try_from(total).map_err(|_| error!(RelayerError::MathOverflow))
}

/// Write a sample into the bucket for `now`
///
/// Returns `false` when the bucket already holds a sample from the same
/// period; the buffer is left untouched in that case.
pub fn record_observation(
    buffer: &mut [Observation],
    window: &OracleWindow,
    current: CumulativePrices,
    now: i64,
) -> Result<bool> {
    require!(now > 0, RelayerError::InvalidTimestamp);
    require!(
        buffer.len() == window.granularity() as usize,
        RelayerError::InvalidGranularity
    );

    let slot = &mut buffer[window.observation_index_of(now)];
    if slot.is_populated() && window.epoch_period(slot.timestamp) == window.epoch_period(now) {
        return Ok(false);
    }

    *slot = Observation {
        timestamp: now,
        price_0_cumulative: current.price_0,
        price_1_cumulative: current.price_1,
    };
    Ok(true)
}

/// Oldest sample still inside the window, strictly before `now`
pub fn first_observation_in_window<'a>(
    buffer: &'a [Observation],
    window: &OracleWindow,
    now: i64,
) -> Option<&'a Observation> {
    buffer
        .iter()
        .filter(|observation| observation.is_populated())
        .filter(|observation| {
            let elapsed = now.saturating_sub(observation.timestamp);
            elapsed > 0 && elapsed <= window.window_size()
        })
        .min_by_key(|observation| observation.timestamp)
}

/// Time-weighted amount out for `amount_in`
///
/// The oldest sample in the window must be at least `min_elapsed` seconds
/// old; a younger one averages over too little history to stand in for the
/// window.
pub fn consult_buffer(
    buffer: &[Observation],
    window: &OracleWindow,
    current: CumulativePrices,
    now: i64,
    min_elapsed: i64,
    direction: PriceDirection,
    amount_in: u64,
) -> Result<u64> {
    let first = first_observation_in_window(buffer, window, now)
        .ok_or(RelayerError::MissingHistoricalObservation)?;
    let elapsed = now - first.timestamp;
    require!(
        elapsed >= min_elapsed,
        RelayerError::MissingHistoricalObservation
    );

    let average = match direction {
        PriceDirection::ZeroForOne => {
            average_price(first.price_0_cumulative, current.price_0, elapsed)?
        }
        PriceDirection::OneForZero => {
            average_price(first.price_1_cumulative, current.price_1, elapsed)?
        }
    };

    decode_amount(average, amount_in)
}
