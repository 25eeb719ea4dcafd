use anchor_lang::prelude::*;

use crate::error::VaultError;
use crate::instructions::VaultContext;
use crate::pda::vault_address_with_bump;
use crate::state::VaultState;

/// Returns the whole vault balance to its owner, leaving the rent-exempt shell behind.
pub fn handler(ctx: &VaultContext) -> Result<()> {
    let owner = ctx.accounts.owner;
    let vault = ctx.accounts.vault;

    let mut state = VaultState::load_for(vault, owner.key)?;
    let amount = state.balance;
    require!(amount > 0, VaultError::NothingToWithdraw);

    // The vault has no key to sign with. Recomputing its address from the
    // stored seeds is what authorizes moving lamports out of it.
    let authority = vault_address_with_bump(owner.key, state.bump, ctx.program_id)?;
    require_keys_eq!(authority, *vault.key, VaultError::InvalidVaultAddress);

    let vault_lamports = vault
        .lamports()
        .checked_sub(amount)
        .ok_or(VaultError::ArithmeticOverflow)?;
    let owner_lamports = owner
        .lamports()
        .checked_add(amount)
        .ok_or(VaultError::ArithmeticOverflow)?;

    **vault.try_borrow_mut_lamports()? = vault_lamports;
    **owner.try_borrow_mut_lamports()? = owner_lamports;

    state.balance = 0;
    state.store(vault)?;

    msg!("Withdraw successful!");
    msg!("Withdrawn: {} lamports", amount);
    msg!("Owner: {}", owner.key);

    Ok(())
}
