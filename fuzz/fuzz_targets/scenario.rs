//! Random Deposit/Withdraw sequences checked against a model of one vault.

use arbitrary::Arbitrary;
use sol_vault::instruction::VaultInstruction;
use sol_vault::VaultError;
use solana_sdk::signature::Signer;

use crate::{
    assert_vault_error, deposit, get_lamports, get_vault_state, send_raw,
    setup_complete_environment, vault_rent_reserve, wallet_rent_floor, withdraw,
    withdraw_unsigned, BanksClientError, FuzzResult, OwnerAccounts, ProgramTestContext,
    OWNER_STARTING_LAMPORTS,
};

/// Operations per iteration are capped; each one waits for a fresh blockhash.
pub const MAX_OPS: usize = 8;

/// Raw payloads are cut to this length to stay well inside a transaction
const MAX_RAW_LEN: usize = 64;

/// One step against the owner's vault
#[derive(Debug, Clone, Arbitrary)]
pub enum VaultOp {
    /// Deposit, amount reduced modulo twice the owner's starting lamports
    Deposit { amount: u64 },
    Withdraw,
    /// Withdraw naming the owner without its signature
    WithdrawUnsigned,
    /// Arbitrary instruction data; only malformed payloads are sent
    Raw { data: Vec<u8> },
}

/// Fuzzable input for a vault session
#[derive(Debug, Clone, Arbitrary)]
pub struct VaultFuzzInput {
    pub ops: Vec<VaultOp>,
}

/// What the model says an operation must do
#[derive(Debug, Clone, Copy)]
enum Expected {
    Created { amount: u64 },
    ToppedUp { amount: u64 },
    Withdrawn { amount: u64 },
    Rejected(VaultError),
}

/// Balances observed around one operation
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    owner: u64,
    vault: u64,
    record: Option<u64>,
}

async fn snapshot(
    context: &mut ProgramTestContext,
    accounts: &OwnerAccounts,
) -> FuzzResult<Snapshot> {
    Ok(Snapshot {
        owner: get_lamports(context, &accounts.owner.pubkey()).await?,
        vault: get_lamports(context, &accounts.vault).await?,
        record: get_vault_state(context, &accounts.vault)
            .await?
            .map(|state| state.balance),
    })
}

/// Whether the owner can pay `cost` without being left below `floor`
fn owner_can_pay(owner: u64, cost: u64, floor: u64) -> bool {
    match owner.checked_sub(cost) {
        Some(remaining) => cost == 0 || remaining == 0 || remaining >= floor,
        None => false,
    }
}

fn expect_deposit(before: &Snapshot, reserve: u64, floor: u64, amount: u64) -> Expected {
    match before.record {
        None => match reserve.checked_add(amount) {
            Some(required) if owner_can_pay(before.owner, required, floor) => {
                Expected::Created { amount }
            }
            Some(_) => Expected::Rejected(VaultError::InsufficientFunds),
            None => Expected::Rejected(VaultError::ArithmeticOverflow),
        },
        Some(balance) if balance.checked_add(amount).is_none() => {
            Expected::Rejected(VaultError::ArithmeticOverflow)
        }
        Some(_) if !owner_can_pay(before.owner, amount, floor) => {
            Expected::Rejected(VaultError::InsufficientFunds)
        }
        Some(_) => Expected::ToppedUp { amount },
    }
}

fn expect_withdraw(before: &Snapshot) -> Expected {
    match before.record {
        None => Expected::Rejected(VaultError::VaultEmptyOrUninitialized),
        Some(0) => Expected::Rejected(VaultError::NothingToWithdraw),
        Some(amount) => Expected::Withdrawn { amount },
    }
}

fn check(
    expected: Expected,
    result: Result<(), BanksClientError>,
    before: &Snapshot,
    after: &Snapshot,
    reserve: u64,
) {
    match expected {
        Expected::Rejected(error) => {
            assert_vault_error(result, error);
            assert_eq!(before.owner, after.owner, "rejected op moved owner lamports");
            assert_eq!(before.vault, after.vault, "rejected op moved vault lamports");
            assert_eq!(before.record, after.record, "rejected op changed the record");
        }
        Expected::Created { amount } => {
            assert!(result.is_ok(), "deposit creating the vault failed: {result:?}");
            assert_eq!(after.owner, before.owner - reserve - amount);
            assert_eq!(after.vault, reserve + amount);
            assert_eq!(after.record, Some(amount));
        }
        Expected::ToppedUp { amount } => {
            assert!(result.is_ok(), "deposit into existing vault failed: {result:?}");
            assert_eq!(
                before.owner + before.vault,
                after.owner + after.vault,
                "CRITICAL: lamports created or destroyed by deposit"
            );
            assert_eq!(after.vault, before.vault + amount);
            assert_eq!(after.record, before.record.map(|b| b + amount));
        }
        Expected::Withdrawn { amount } => {
            assert!(result.is_ok(), "withdraw failed: {result:?}");
            assert_eq!(
                before.owner + before.vault,
                after.owner + after.vault,
                "CRITICAL: lamports created or destroyed by withdraw"
            );
            assert_eq!(after.owner, before.owner + amount);
            assert_eq!(after.vault, reserve, "shell should keep exactly the reserve");
            assert_eq!(after.record, Some(0));
        }
    }
}

/// Runs one session: a fresh bank, one owner, up to `MAX_OPS` operations
pub async fn fuzz_vault_once(input: VaultFuzzInput) -> FuzzResult<()> {
    let (mut env, accounts) = setup_complete_environment().await?;
    let reserve = vault_rent_reserve(&mut env.context).await?;
    let floor = wallet_rent_floor(&mut env.context).await?;
    let program_id = env.program_id;

    for op in input.ops.into_iter().take(MAX_OPS) {
        let before = snapshot(&mut env.context, &accounts).await?;

        let (expected, result) = match op {
            VaultOp::Deposit { amount } => {
                let amount = amount % (2 * OWNER_STARTING_LAMPORTS);
                let expected = expect_deposit(&before, reserve, floor, amount);
                let result = deposit(&mut env.context, &program_id, &accounts.owner, amount).await;
                (expected, result)
            }
            VaultOp::Withdraw => {
                let expected = expect_withdraw(&before);
                let result = withdraw(&mut env.context, &program_id, &accounts.owner).await;
                (expected, result)
            }
            VaultOp::WithdrawUnsigned => {
                let expected = Expected::Rejected(VaultError::Unauthorized);
                let owner = accounts.owner.pubkey();
                let result = withdraw_unsigned(&mut env.context, &program_id, &owner).await;
                (expected, result)
            }
            VaultOp::Raw { mut data } => {
                data.truncate(MAX_RAW_LEN);
                if VaultInstruction::unpack(&data).is_ok() {
                    continue;
                }
                let expected = Expected::Rejected(VaultError::Malformed);
                let result = send_raw(&mut env.context, &program_id, &accounts.owner, data).await;
                (expected, result)
            }
        };

        let after = snapshot(&mut env.context, &accounts).await?;
        println!(
            "{:?}: owner {} -> {}, vault {} -> {}",
            expected, before.owner, after.owner, before.vault, after.vault
        );
        check(expected, result, &before, &after, reserve);
    }

    Ok(())
}
