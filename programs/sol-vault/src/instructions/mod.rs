pub mod deposit;
pub mod validate;
pub mod withdraw;

pub use validate::*;

use anchor_lang::prelude::*;

/// Everything a handler needs once the accounts have passed validation.
pub struct VaultContext<'a, 'info> {
    pub program_id: &'a Pubkey,
    pub accounts: VaultAccounts<'a, 'info>,
    /// Canonical bump of the vault address
    pub bump: u8,
}
