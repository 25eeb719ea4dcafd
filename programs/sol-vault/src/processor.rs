use anchor_lang::prelude::*;
use anchor_lang::solana_program::entrypoint::ProgramResult;

use crate::instruction::VaultInstruction;
use crate::instructions::{deposit, withdraw, VaultAccounts, VaultContext};

/// Program entrypoint: decode, validate, then run the matching handler.
///
/// Any error aborts the whole instruction; the runtime discards every write made
/// before it.
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    process(program_id, accounts, instruction_data).map_err(|e| {
        e.log();
        e.into()
    })
}

fn process(program_id: &Pubkey, accounts: &[AccountInfo], instruction_data: &[u8]) -> Result<()> {
    let instruction = VaultInstruction::unpack(instruction_data)?;
    msg!("Instruction: {:?}", instruction);

    let accounts = VaultAccounts::parse(accounts)?;
    let bump = accounts.validate(program_id, &instruction)?;

    let ctx = VaultContext {
        program_id,
        accounts,
        bump,
    };

    match instruction {
        VaultInstruction::Deposit { amount } => deposit::handler(&ctx, amount),
        VaultInstruction::Withdraw => withdraw::handler(&ctx),
    }
}
