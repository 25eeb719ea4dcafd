use anchor_lang::{AccountDeserialize, AccountSerialize};
use sol_vault::instruction as vault_instruction;
use sol_vault::state::VaultState;
use solana_program_test::*;
use solana_sdk::{
    account::Account,
    instruction::{Instruction, InstructionError},
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_program,
    transaction::{Transaction, TransactionError},
};

pub mod scenario;

// Re-export for convenience
pub use solana_program_test::{BanksClientError, ProgramTestContext};

pub type FuzzResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Lamports every test owner starts with
pub const OWNER_STARTING_LAMPORTS: u64 = 100 * LAMPORTS_PER_SOL;

/// Test environment with program loaded
pub struct FuzzTestEnv {
    pub program_id: Pubkey,
    pub context: ProgramTestContext,
}

/// A funded owner and the vault address derived for it
#[derive(Debug)]
pub struct OwnerAccounts {
    pub owner: Keypair,
    pub vault: Pubkey,
    pub bump: u8,
}

// ============================================================================
// Core Setup Functions
// ============================================================================

/// Program test with the vault program running natively in-process
pub fn vault_program_test() -> ProgramTest {
    let mut program_test = ProgramTest::new(
        "sol_vault",
        sol_vault::id(),
        processor!(sol_vault::process_instruction),
    );
    program_test.prefer_bpf(false);
    program_test
}

/// Starts a bank from a prepared program test
pub async fn start(program_test: ProgramTest) -> FuzzTestEnv {
    let context = program_test.start_with_context().await;

    FuzzTestEnv {
        program_id: sol_vault::id(),
        context,
    }
}

/// Creates the basic program test environment with the vault program loaded
pub async fn setup_program_test() -> FuzzTestEnv {
    start(vault_program_test()).await
}

/// Funds a fresh owner from the test payer
pub async fn setup_owner(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    lamports: u64,
) -> FuzzResult<OwnerAccounts> {
    let owner = Keypair::new();
    let (vault, bump) = derive_vault_pda(program_id, &owner.pubkey());

    let ix = solana_sdk::system_instruction::transfer(
        &context.payer.pubkey(),
        &owner.pubkey(),
        lamports,
    );
    send_instruction(context, ix, &[]).await?;

    Ok(OwnerAccounts { owner, vault, bump })
}

/// Sets up everything: bank + one owner holding `OWNER_STARTING_LAMPORTS`
pub async fn setup_complete_environment() -> FuzzResult<(FuzzTestEnv, OwnerAccounts)> {
    let mut env = setup_program_test().await;
    let owner = setup_owner(&mut env.context, &env.program_id, OWNER_STARTING_LAMPORTS).await?;
    Ok((env, owner))
}

/// System-owned wallet account for seeding a program test before it starts
pub fn wallet_account(lamports: u64) -> Account {
    Account {
        lamports,
        data: vec![],
        owner: system_program::ID,
        executable: false,
        rent_epoch: 0,
    }
}

/// Program-owned vault account holding `state`, for seeding a program test
pub fn vault_account(state: &VaultState, lamports: u64) -> FuzzResult<Account> {
    let mut data = Vec::with_capacity(VaultState::LEN);
    state.try_serialize(&mut data)?;

    Ok(Account {
        lamports,
        data,
        owner: sol_vault::id(),
        executable: false,
        rent_epoch: 0,
    })
}

// ============================================================================
// Transaction Helpers
// ============================================================================

/// Sends one instruction paid for by the test payer.
///
/// The payer covers fees so owner balances move only by what the program moves.
/// Each call waits for a fresh blockhash, so identical instructions can be resent.
pub async fn send_instruction(
    context: &mut ProgramTestContext,
    ix: Instruction,
    signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let blockhash = context.get_new_latest_blockhash().await?;

    let mut all_signers = vec![&context.payer];
    all_signers.extend_from_slice(signers);

    let tx = Transaction::new_signed_with_payer(
        &[ix],
        Some(&context.payer.pubkey()),
        &all_signers,
        blockhash,
    );

    context.banks_client.process_transaction(tx).await
}

pub async fn deposit(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    owner: &Keypair,
    amount: u64,
) -> Result<(), BanksClientError> {
    let ix = vault_instruction::deposit(program_id, &owner.pubkey(), amount);
    send_instruction(context, ix, &[owner]).await
}

pub async fn withdraw(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    owner: &Keypair,
) -> Result<(), BanksClientError> {
    let ix = vault_instruction::withdraw(program_id, &owner.pubkey());
    send_instruction(context, ix, &[owner]).await
}

/// Withdraw naming `owner` without its signature
pub async fn withdraw_unsigned(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    owner: &Pubkey,
) -> Result<(), BanksClientError> {
    let mut ix = vault_instruction::withdraw(program_id, owner);
    ix.accounts[0].is_signer = false;
    send_instruction(context, ix, &[]).await
}

/// Sends arbitrary instruction data with the regular account list
pub async fn send_raw(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    owner: &Keypair,
    data: Vec<u8>,
) -> Result<(), BanksClientError> {
    let mut ix = vault_instruction::withdraw(program_id, &owner.pubkey());
    ix.data = data;
    send_instruction(context, ix, &[owner]).await
}

// ============================================================================
// PDA Derivation Helpers
// ============================================================================

/// Derive vault PDA
pub fn derive_vault_pda(program_id: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    sol_vault::derive_vault_address(owner, program_id)
}

// ============================================================================
// Account State Verification Helpers
// ============================================================================

/// Lamports held by `account`, zero if it does not exist
pub async fn get_lamports(context: &mut ProgramTestContext, account: &Pubkey) -> FuzzResult<u64> {
    Ok(context.banks_client.get_balance(*account).await?)
}

/// Fetch the vault record, `None` while the vault has not been created
pub async fn get_vault_state(
    context: &mut ProgramTestContext,
    vault: &Pubkey,
) -> FuzzResult<Option<VaultState>> {
    let Some(account) = context.banks_client.get_account(*vault).await? else {
        return Ok(None);
    };
    if account.data.is_empty() {
        return Ok(None);
    }

    let state = VaultState::try_deserialize(&mut account.data.as_ref())?;
    Ok(Some(state))
}

/// Rent-exempt reserve kept in every created vault
pub async fn vault_rent_reserve(context: &mut ProgramTestContext) -> FuzzResult<u64> {
    let rent = context.banks_client.get_rent().await?;
    Ok(rent.minimum_balance(VaultState::LEN))
}

/// Smallest non-zero balance a data-less wallet may be left with
pub async fn wallet_rent_floor(context: &mut ProgramTestContext) -> FuzzResult<u64> {
    let rent = context.banks_client.get_rent().await?;
    Ok(rent.minimum_balance(0))
}

// ============================================================================
// Error Helpers
// ============================================================================

/// The instruction error behind a failed transaction, if any
pub fn instruction_error(err: &BanksClientError) -> Option<&InstructionError> {
    match err {
        BanksClientError::TransactionError(TransactionError::InstructionError(_, e))
        | BanksClientError::SimulationError {
            err: TransactionError::InstructionError(_, e),
            ..
        } => Some(e),
        _ => None,
    }
}

/// The program's custom error code behind a failed transaction, if any
pub fn custom_error_code(err: &BanksClientError) -> Option<u32> {
    match instruction_error(err) {
        Some(InstructionError::Custom(code)) => Some(*code),
        _ => None,
    }
}

/// Asserts that `result` failed with `expected`
pub fn assert_vault_error(result: Result<(), BanksClientError>, expected: sol_vault::VaultError) {
    match result {
        Ok(()) => panic!("expected {expected:?}, transaction succeeded"),
        Err(e) => assert_eq!(
            custom_error_code(&e),
            Some(u32::from(expected)),
            "expected {expected:?}, got {e:?}"
        ),
    }
}
