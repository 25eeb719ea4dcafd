//! Wire format of the vault program and client-side instruction builders.
//!
//! | Tag | Instruction | Payload                  |
//! |-----|-------------|--------------------------|
//! | `0` | Deposit     | `u64` amount, little end |
//! | `1` | Withdraw    | none                     |
//!
//! Every instruction takes the same accounts, by position:
//!
//! 0. `[signer, writable]` owner
//! 1. `[writable]` vault, derived from the owner
//! 2. `[]` system program

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};

use crate::constants::{DEPOSIT_TAG, WITHDRAW_TAG};
use crate::error::VaultError;
use crate::pda::derive_vault_address;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultInstruction {
    /// Moves `amount` from the owner into its vault, creating the vault on first use.
    Deposit { amount: u64 },
    /// Moves the whole vault balance back to the owner.
    Withdraw,
}

impl VaultInstruction {
    /// Parses instruction data. Lengths must match the tag exactly.
    pub fn unpack(input: &[u8]) -> Result<Self> {
        let (&tag, rest) = input.split_first().ok_or(VaultError::Malformed)?;

        match tag {
            DEPOSIT_TAG => {
                let amount = <[u8; 8]>::try_from(rest)
                    .map(u64::from_le_bytes)
                    .map_err(|_| VaultError::Malformed)?;
                Ok(Self::Deposit { amount })
            }
            WITHDRAW_TAG if rest.is_empty() => Ok(Self::Withdraw),
            _ => err!(VaultError::Malformed),
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        match self {
            Self::Deposit { amount } => {
                let mut data = Vec::with_capacity(9);
                data.push(DEPOSIT_TAG);
                data.extend_from_slice(&amount.to_le_bytes());
                data
            }
            Self::Withdraw => vec![WITHDRAW_TAG],
        }
    }
}

/// Builds a deposit of `amount` from `owner` into its vault.
pub fn deposit(program_id: &Pubkey, owner: &Pubkey, amount: u64) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vault_account_metas(program_id, owner),
        data: VaultInstruction::Deposit { amount }.pack(),
    }
}

/// Builds a withdrawal of the full vault balance back to `owner`.
pub fn withdraw(program_id: &Pubkey, owner: &Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vault_account_metas(program_id, owner),
        data: VaultInstruction::Withdraw.pack(),
    }
}

// The owner is writable because its lamports change on both paths.
fn vault_account_metas(program_id: &Pubkey, owner: &Pubkey) -> Vec<AccountMeta> {
    let (vault, _) = derive_vault_address(owner, program_id);

    vec![
        AccountMeta::new(*owner, true),
        AccountMeta::new(vault, false),
        AccountMeta::new_readonly(anchor_lang::system_program::ID, false),
    ]
}
