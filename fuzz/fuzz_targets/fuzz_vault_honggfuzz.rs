use arbitrary::{Arbitrary, Unstructured};
use fuzz_helpers::scenario::{fuzz_vault_once, VaultFuzzInput};
use honggfuzz::fuzz;

fn main() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    loop {
        fuzz!(|data: &[u8]| {
            let Ok(input) = VaultFuzzInput::arbitrary(&mut Unstructured::new(data)) else {
                return;
            };
            runtime.block_on(async {
                if let Err(e) = fuzz_vault_once(input).await {
                    eprintln!("Fuzz iteration failed: {}", e);
                }
            });
        });
    }
}
