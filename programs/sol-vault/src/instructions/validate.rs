use anchor_lang::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::account_info::next_account_info;
use anchor_lang::system_program;

use crate::error::VaultError;
use crate::instruction::VaultInstruction;
use crate::pda::derive_vault_address;

/// The fixed account list shared by every vault instruction.
pub struct VaultAccounts<'a, 'info> {
    pub owner: &'a AccountInfo<'info>,
    pub vault: &'a AccountInfo<'info>,
    pub system_program: &'a AccountInfo<'info>,
}

impl<'a, 'info> VaultAccounts<'a, 'info> {
    pub fn parse(accounts: &'a [AccountInfo<'info>]) -> Result<Self> {
        let accounts_iter = &mut accounts.iter();

        Ok(Self {
            owner: next_account_info(accounts_iter)?,
            vault: next_account_info(accounts_iter)?,
            system_program: next_account_info(accounts_iter)?,
        })
    }

    /// Checks account roles for `instruction` and returns the vault's canonical bump.
    ///
    /// Nothing is written here; every check runs before a handler touches an account.
    pub fn validate(&self, program_id: &Pubkey, instruction: &VaultInstruction) -> Result<u8> {
        require!(self.owner.is_signer, VaultError::Unauthorized);

        let (expected_vault, bump) = derive_vault_address(self.owner.key, program_id);
        require_keys_eq!(*self.vault.key, expected_vault, VaultError::InvalidVaultAddress);

        require!(self.vault.is_writable, VaultError::NotWritable);

        if let VaultInstruction::Withdraw = instruction {
            require!(
                self.vault.owner == program_id && self.vault.lamports() > 0,
                VaultError::VaultEmptyOrUninitialized
            );
        }

        require_keys_eq!(
            *self.system_program.key,
            system_program::ID,
            ErrorCode::InvalidProgramId
        );

        Ok(bump)
    }
}
