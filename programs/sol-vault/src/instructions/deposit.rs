use anchor_lang::prelude::*;
use anchor_lang::system_program::{
    allocate, assign, create_account, transfer, Allocate, Assign, CreateAccount, Transfer,
};

use crate::constants::VAULT_SEED;
use crate::error::VaultError;
use crate::instructions::VaultContext;
use crate::state::{VaultState, VaultStatus};

/// Funds the owner's vault with `amount`, creating it first when needed.
///
/// Either way the vault exists afterwards and its balance grew by exactly `amount`.
pub fn handler(ctx: &VaultContext, amount: u64) -> Result<()> {
    let accounts = &ctx.accounts;

    match VaultStatus::of(accounts.vault, accounts.owner.key, ctx.program_id)? {
        VaultStatus::Uninitialized => create_vault(ctx, amount),
        VaultStatus::Funded(state) => top_up_vault(ctx, state, amount),
    }
}

/// The owner may be drained to zero, but the runtime aborts any transfer that
/// leaves it holding less than its own rent-exempt minimum.
fn require_owner_can_pay(owner: &AccountInfo, cost: u64) -> Result<()> {
    if cost == 0 {
        return Ok(());
    }

    let remaining = owner
        .lamports()
        .checked_sub(cost)
        .ok_or(VaultError::InsufficientFunds)?;
    require!(
        remaining == 0 || remaining >= Rent::get()?.minimum_balance(owner.data_len()),
        VaultError::InsufficientFunds
    );

    Ok(())
}

fn create_vault(ctx: &VaultContext, amount: u64) -> Result<()> {
    let owner = ctx.accounts.owner;
    let vault = ctx.accounts.vault;
    let system_program = ctx.accounts.system_program;

    let reserve = Rent::get()?.minimum_balance(VaultState::LEN);
    let required = reserve
        .checked_add(amount)
        .ok_or(VaultError::ArithmeticOverflow)?;

    let bump = [ctx.bump];
    let seeds: &[&[u8]] = &[VAULT_SEED, owner.key.as_ref(), &bump];
    let signer_seeds = &[seeds];

    let existing = vault.lamports();
    if existing == 0 {
        require_owner_can_pay(owner, required)?;

        create_account(
            CpiContext::new_with_signer(
                system_program.clone(),
                CreateAccount {
                    from: owner.clone(),
                    to: vault.clone(),
                },
                signer_seeds,
            ),
            required,
            VaultState::LEN as u64,
            ctx.program_id,
        )?;
    } else {
        // Someone already sent lamports here, so the account exists and
        // create_account would fail. Lamports above the reserve are not credited.
        let funding = reserve
            .saturating_sub(existing)
            .checked_add(amount)
            .ok_or(VaultError::ArithmeticOverflow)?;
        require_owner_can_pay(owner, funding)?;

        if funding > 0 {
            transfer(
                CpiContext::new(
                    system_program.clone(),
                    Transfer {
                        from: owner.clone(),
                        to: vault.clone(),
                    },
                ),
                funding,
            )?;
        }

        allocate(
            CpiContext::new_with_signer(
                system_program.clone(),
                Allocate {
                    account_to_allocate: vault.clone(),
                },
                signer_seeds,
            ),
            VaultState::LEN as u64,
        )?;

        assign(
            CpiContext::new_with_signer(
                system_program.clone(),
                Assign {
                    account_to_assign: vault.clone(),
                },
                signer_seeds,
            ),
            ctx.program_id,
        )?;
    }

    let state = VaultState {
        owner: *owner.key,
        balance: amount,
        bump: ctx.bump,
    };
    state.store(vault)?;

    msg!("Vault created: {}", vault.key);
    msg!("Deposited: {} lamports", amount);
    msg!("Rent-exempt reserve: {} lamports", reserve);

    Ok(())
}

fn top_up_vault(ctx: &VaultContext, mut state: VaultState, amount: u64) -> Result<()> {
    let owner = ctx.accounts.owner;
    let vault = ctx.accounts.vault;

    let balance = state
        .balance
        .checked_add(amount)
        .ok_or(VaultError::ArithmeticOverflow)?;
    vault
        .lamports()
        .checked_add(amount)
        .ok_or(VaultError::ArithmeticOverflow)?;
    require_owner_can_pay(owner, amount)?;

    if amount > 0 {
        transfer(
            CpiContext::new(
                ctx.accounts.system_program.clone(),
                Transfer {
                    from: owner.clone(),
                    to: vault.clone(),
                },
            ),
            amount,
        )?;
    }

    state.balance = balance;
    state.store(vault)?;

    msg!("Deposit successful!");
    msg!("Deposited: {} lamports", amount);
    msg!("Vault balance: {} lamports", balance);

    Ok(())
}
