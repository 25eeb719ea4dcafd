pub mod constants;
pub mod error;
pub mod instruction;
pub mod instructions;
pub mod pda;
pub mod processor;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use error::*;
pub use pda::*;
pub use processor::process_instruction;
pub use state::*;

declare_id!("SsLs4JcUzhftkoMSuTSsdNJazY6X8uV3KmEV56tmfpw");

#[cfg(not(feature = "no-entrypoint"))]
anchor_lang::solana_program::entrypoint!(process_instruction);
