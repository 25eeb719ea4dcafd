//! Vault address derivation.
//!
//! A vault lives at the program derived address of `[VAULT_SEED, owner]`.
//! The address is off the ed25519 curve, so no private key exists for it and
//! only this program can authorize changes to it. Any client holding the
//! owner and program identities can recompute it without an on-chain lookup.

use anchor_lang::prelude::*;

use crate::constants::VAULT_SEED;
use crate::error::VaultError;

/// Returns the vault address for `owner` together with its canonical bump.
///
/// Bumps are searched from 255 downward and the first one producing an
/// off-curve address wins.
pub fn derive_vault_address(owner: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, owner.as_ref()], program_id)
}

/// Recomputes the vault address from a bump that is already known.
pub fn vault_address_with_bump(owner: &Pubkey, bump: u8, program_id: &Pubkey) -> Result<Pubkey> {
    Pubkey::create_program_address(&[VAULT_SEED, owner.as_ref(), &[bump]], program_id)
        .map_err(|_| error!(VaultError::InvalidVaultAddress))
}
