/// Seed prefix for every vault address.
pub const VAULT_SEED: &[u8] = b"vault";

/// First byte of a deposit instruction, followed by a little-endian u64 amount.
pub const DEPOSIT_TAG: u8 = 0;

/// Sole byte of a withdraw instruction.
pub const WITHDRAW_TAG: u8 = 1;
