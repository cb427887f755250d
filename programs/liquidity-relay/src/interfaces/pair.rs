//! Read-only mirror of the DEX pair account
//!
//! The pair is owned by its factory program and laid out as an 8-byte
//! discriminator followed by the Borsh fields below. Trailing padding is
//! ignored.

use anchor_lang::prelude::*;

use crate::constants::PAIR_SEED;
use crate::errors::RelayerError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PairState {
    pub token_0_mint: Pubkey,
    pub token_1_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub reserve_0: u64,
    pub reserve_1: u64,
    /// Last time the pair folded its price into the accumulators
    pub block_timestamp_last: i64,
    pub price_0_cumulative_last: u128,
    pub price_1_cumulative_last: u128,
}

impl PairState {
    pub const DISCRIMINATOR_LEN: usize = 8;

    /// Deserialize a pair account owned by `factory`
    pub fn load(pair: &AccountInfo, factory: &Pubkey) -> Result<Self> {
        require_keys_eq!(*pair.owner, *factory, RelayerError::InvalidPairAccount);

        let data = pair.try_borrow_data()?;
        require!(
            data.len() > Self::DISCRIMINATOR_LEN,
            RelayerError::InvalidPairAccount
        );

        let mut payload: &[u8] = &data[Self::DISCRIMINATOR_LEN..];
        Self::deserialize(&mut payload).map_err(|_| error!(RelayerError::InvalidPairAccount))
    }

    /// No liquidity yet: the first deposit sets the price
    pub fn is_empty(&self) -> bool {
        self.reserve_0 == 0 && self.reserve_1 == 0
    }

    pub fn ensure_tokens(&self, token_0: &Pubkey, token_1: &Pubkey) -> Result<()> {
        require_keys_eq!(self.token_0_mint, *token_0, RelayerError::InvalidPair);
        require_keys_eq!(self.token_1_mint, *token_1, RelayerError::InvalidPair);
        Ok(())
    }
}

/// Sort two mints the way the factory keys its pairs
pub fn sort_tokens(token_a: Pubkey, token_b: Pubkey) -> (Pubkey, Pubkey) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

/// Pair PDA the factory derives for two mints
pub fn pair_address(factory: &Pubkey, token_a: &Pubkey, token_b: &Pubkey) -> Pubkey {
    let (token_0, token_1) = sort_tokens(*token_a, *token_b);
    Pubkey::find_program_address(&[PAIR_SEED, token_0.as_ref(), token_1.as_ref()], factory).0
}

/// Whether `pair` is a live pair account of `factory` for the two mints
pub fn pair_exists(pair: &AccountInfo, factory: &Pubkey, token_a: &Pubkey, token_b: &Pubkey) -> bool {
    token_a != token_b
        && *pair.key == pair_address(factory, token_a, token_b)
        && pair.owner == factory
        && !pair.data_is_empty()
}
