//! CPI bindings for the DEX router
//!
//! The router is an Anchor program, so its instruction data is the 8-byte
//! sighash of `global:<name>` followed by the Borsh-encoded arguments.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::invoke_signed,
};
use solana_program::hash::hash;

use crate::constants::{ROUTER_ADD_LIQUIDITY, ROUTER_REMOVE_LIQUIDITY};
use crate::errors::RelayerError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct AddLiquidityArgs {
    pub amount_a_desired: u64,
    pub amount_b_desired: u64,
    pub amount_a_min: u64,
    pub amount_b_min: u64,
    pub deadline: i64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RemoveLiquidityArgs {
    pub liquidity: u64,
    pub amount_a_min: u64,
    pub amount_b_min: u64,
    pub deadline: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouterCall {
    AddLiquidity(AddLiquidityArgs),
    RemoveLiquidity(RemoveLiquidityArgs),
}

impl RouterCall {
    pub fn name(&self) -> &'static str {
        match self {
            RouterCall::AddLiquidity(_) => ROUTER_ADD_LIQUIDITY,
            RouterCall::RemoveLiquidity(_) => ROUTER_REMOVE_LIQUIDITY,
        }
    }

    pub fn data(&self) -> Result<Vec<u8>> {
        let mut data = sighash(self.name()).to_vec();
        match self {
            RouterCall::AddLiquidity(args) => args.serialize(&mut data),
            RouterCall::RemoveLiquidity(args) => args.serialize(&mut data),
        }
        .map_err(|_| error!(RelayerError::SerializationFailed))?;
        Ok(data)
    }
}

/// Anchor instruction discriminator
pub fn sighash(name: &str) -> [u8; 8] {
    let preimage = format!("global:{name}");
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    discriminator
}

/// Build the router instruction
///
/// Accounts are laid out as `authority` (the only signer the relayer lends),
/// then `fixed` (leg vaults and output accounts, all writable), then `extra`
/// as supplied by the caller. The router reads its sources and destinations
/// from the fixed positions, so callers cannot redirect them.
pub fn instruction(
    router: &Pubkey,
    authority: &AccountInfo,
    fixed: &[AccountInfo],
    extra: &[AccountInfo],
    call: &RouterCall,
) -> Result<Instruction> {
    let mut metas = Vec::with_capacity(1 + fixed.len() + extra.len());
    metas.push(AccountMeta::new(*authority.key, true));
    metas.extend(fixed.iter().map(|account| AccountMeta::new(*account.key, false)));
    metas.extend(extra.iter().map(|account| AccountMeta {
        pubkey: *account.key,
        is_signer: account.is_signer || account.key == authority.key,
        is_writable: account.is_writable,
    }));

    Ok(Instruction {
        program_id: *router,
        accounts: metas,
        data: call.data()?,
    })
}

/// Invoke the router with the relayer PDA signing
pub fn invoke<'info>(
    router: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    fixed: &[AccountInfo<'info>],
    extra: &[AccountInfo<'info>],
    call: &RouterCall,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let ix = instruction(router.key, authority, fixed, extra, call)?;

    let mut infos = Vec::with_capacity(2 + fixed.len() + extra.len());
    infos.push(authority.clone());
    infos.extend_from_slice(fixed);
    infos.extend_from_slice(extra);
    infos.push(router.clone());
    invoke_signed(&ix, &infos, signer_seeds)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sighash_matches_anchor_discriminator() {
        let expected = hash(b"global:add_liquidity").to_bytes();
        assert_eq!(sighash(ROUTER_ADD_LIQUIDITY), expected[..8]);
        assert_ne!(sighash(ROUTER_ADD_LIQUIDITY), sighash(ROUTER_REMOVE_LIQUIDITY));
    }

    #[test]
    fn encodes_remove_liquidity() {
        let call = RouterCall::RemoveLiquidity(RemoveLiquidityArgs {
            liquidity: 10,
            amount_a_min: 2,
            amount_b_min: 3,
            deadline: 1_700_000_000,
        });
        let data = call.data().unwrap();

        assert_eq!(data.len(), 8 + 8 * 4);
        assert_eq!(data[..8], sighash(ROUTER_REMOVE_LIQUIDITY));
        assert_eq!(data[8..16], 10u64.to_le_bytes());
        assert_eq!(data[32..], 1_700_000_000i64.to_le_bytes());
    }

    fn add_call() -> RouterCall {
        RouterCall::AddLiquidity(AddLiquidityArgs {
            amount_a_desired: 1,
            amount_b_desired: 2,
            amount_a_min: 1,
            amount_b_min: 2,
            deadline: 0,
        })
    }

    #[test]
    fn fixed_accounts_lead_and_only_authority_signs() {
        let router = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let keys: Vec<Pubkey> = (0..5).map(|_| Pubkey::new_unique()).collect();
        let (mut l0, mut l1, mut l2, mut l3, mut l4) = (0u64, 0u64, 0u64, 0u64, 0u64);
        let (mut d0, mut d1, mut d2, mut d3, mut d4) = (
            Vec::<u8>::new(),
            Vec::<u8>::new(),
            Vec::<u8>::new(),
            Vec::<u8>::new(),
            Vec::<u8>::new(),
        );
        let authority = AccountInfo::new(&keys[0], false, false, &mut l0, &mut d0, &owner, false, 0);
        let vault = AccountInfo::new(&keys[1], false, false, &mut l1, &mut d1, &owner, false, 0);
        let output = AccountInfo::new(&keys[2], false, false, &mut l2, &mut d2, &owner, false, 0);
        let pair = AccountInfo::new(&keys[3], false, false, &mut l3, &mut d3, &owner, false, 0);
        let writable = AccountInfo::new(&keys[4], false, true, &mut l4, &mut d4, &owner, false, 0);

        let ix = instruction(
            &router,
            &authority,
            &[vault, output],
            &[pair, writable],
            &add_call(),
        )
        .unwrap();

        assert_eq!(ix.program_id, router);
        let order: Vec<Pubkey> = ix.accounts.iter().map(|meta| meta.pubkey).collect();
        assert_eq!(order, keys);

        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        for meta in &ix.accounts[1..3] {
            assert!(!meta.is_signer && meta.is_writable);
        }
        assert!(!ix.accounts[3].is_signer && !ix.accounts[3].is_writable);
        assert!(!ix.accounts[4].is_signer && ix.accounts[4].is_writable);
    }

    #[test]
    fn extra_accounts_cannot_take_the_output_position() {
        let router = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let (authority_key, output_key, other_key) =
            (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let (mut l0, mut l1, mut l2) = (0u64, 0u64, 0u64);
        let (mut d0, mut d1, mut d2) = (Vec::<u8>::new(), Vec::<u8>::new(), Vec::<u8>::new());
        let authority = AccountInfo::new(&authority_key, false, true, &mut l0, &mut d0, &owner, false, 0);
        let output = AccountInfo::new(&output_key, false, true, &mut l1, &mut d1, &owner, false, 0);
        let other = AccountInfo::new(&other_key, false, true, &mut l2, &mut d2, &owner, false, 0);

        // Whatever the caller appends lands after the owner's output
        let ix = instruction(&router, &authority, &[output], &[other], &add_call()).unwrap();
        assert_eq!(ix.accounts[1].pubkey, output_key);
        assert_eq!(ix.accounts[2].pubkey, other_key);
        assert!(!ix.accounts[2].is_signer);
    }
}
