use anchor_lang::prelude::*;

use crate::error::VaultError;

/// Record stored in a created vault account.
///
/// The account's lamports are always the rent-exempt reserve for this record
/// plus `balance`.
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct VaultState {
    /// The owner whose identity seeds the vault address
    pub owner: Pubkey,
    /// Deposited lamports currently held, excluding the rent-exempt reserve
    pub balance: u64,
    /// Canonical bump found when the vault was created
    pub bump: u8,
}

impl VaultState {
    pub const LEN: usize = 8 + // discriminator
        32 + // owner
        8 + // balance
        1; // bump

    pub fn load(vault: &AccountInfo) -> Result<Self> {
        let data = vault.try_borrow_data()?;
        Self::try_deserialize(&mut &data[..])
    }

    /// Loads the record and checks it was written for `owner`.
    pub fn load_for(vault: &AccountInfo, owner: &Pubkey) -> Result<Self> {
        let state = Self::load(vault)?;
        require_keys_eq!(state.owner, *owner, VaultError::OwnerMismatch);
        Ok(state)
    }

    pub fn store(&self, vault: &AccountInfo) -> Result<()> {
        let mut data = vault.try_borrow_mut_data()?;
        self.try_serialize(&mut &mut data[..])
    }
}

/// Lifecycle stage of a vault account, as observed at the start of an instruction.
#[derive(Debug)]
pub enum VaultStatus {
    /// Nothing has been created at the vault address yet. It may still hold
    /// lamports sent there by anyone.
    Uninitialized,
    /// The program owns the account and its record is readable. A balance of
    /// zero is the empty shell left behind by a withdrawal.
    Funded(VaultState),
}

impl VaultStatus {
    pub fn of(vault: &AccountInfo, owner: &Pubkey, program_id: &Pubkey) -> Result<Self> {
        if vault.owner == program_id {
            return Ok(Self::Funded(VaultState::load_for(vault, owner)?));
        }
        Ok(Self::Uninitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::solana_program::program_error::ProgramError;

    #[test]
    fn record_survives_store_and_load() {
        let key = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mut lamports = 0;
        let mut data = vec![0u8; VaultState::LEN];
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &crate::ID, false, 0);

        let state = VaultState {
            owner,
            balance: 7,
            bump: 254,
        };
        state.store(&info).unwrap();

        assert_eq!(VaultState::load(&info).unwrap(), state);
    }

    #[test]
    fn record_for_another_owner_is_rejected() {
        let key = Pubkey::new_unique();
        let mut lamports = 0;
        let mut data = vec![0u8; VaultState::LEN];
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &crate::ID, false, 0);

        VaultState {
            owner: Pubkey::new_unique(),
            balance: 1,
            bump: 255,
        }
        .store(&info)
        .unwrap();

        let err = VaultState::load_for(&info, &Pubkey::new_unique()).unwrap_err();
        assert_eq!(
            ProgramError::from(err),
            ProgramError::Custom(VaultError::OwnerMismatch.into())
        );
    }

    #[test]
    fn system_owned_vault_is_uninitialized() {
        let key = Pubkey::new_unique();
        let system = anchor_lang::solana_program::system_program::ID;
        let mut lamports = 5_000;
        let mut data = vec![];
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &system, false, 0);

        let status = VaultStatus::of(&info, &Pubkey::new_unique(), &crate::ID).unwrap();
        assert!(matches!(status, VaultStatus::Uninitialized));
    }
}
