use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    #[msg("Instruction data is malformed")]
    Malformed,
    #[msg("Owner account must sign")]
    Unauthorized,
    #[msg("Vault account is not the address derived for this owner")]
    InvalidVaultAddress,
    #[msg("Vault account must be writable")]
    NotWritable,
    #[msg("Vault is empty or not initialized")]
    VaultEmptyOrUninitialized,
    #[msg("Vault balance would overflow")]
    ArithmeticOverflow,
    #[msg("Vault holds nothing to withdraw")]
    NothingToWithdraw,
    #[msg("Vault record belongs to a different owner")]
    OwnerMismatch,
    #[msg("Owner cannot cover the deposit")]
    InsufficientFunds,
}
