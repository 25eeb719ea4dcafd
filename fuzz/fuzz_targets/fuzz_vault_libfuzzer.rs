#![no_main]

use fuzz_helpers::scenario::{fuzz_vault_once, VaultFuzzInput};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: VaultFuzzInput| {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        if let Err(e) = fuzz_vault_once(input).await {
            eprintln!("Fuzz iteration failed: {}", e);
        }
    });
});
