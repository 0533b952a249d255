use catalog_db::{migrations, SampleCatalog, SqlCatalogStore, VerificationResult};

use crate::commands::{open_pool, prepare, CommandResult, StepFailure};

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let store = SqlCatalogStore::new(pool.clone());
        let seeded = SampleCatalog::load(&store)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;
        let verification = SampleCatalog::verify(&store)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        pool.close().await;

        if !verification.all_present {
            return Err(("seed_verification", verification_failure_message(&verification), 6u8));
        }
        Ok::<usize, StepFailure>(seeded.inserted)
    });

    match result {
        Ok(0) => CommandResult::success(
            "seed",
            "catalog already populated; sample products verified, nothing inserted",
        ),
        Ok(inserted) => CommandResult::success(
            "seed",
            format!("sample catalog loaded: {inserted} products inserted and verified"),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn verification_failure_message(verification: &VerificationResult) -> String {
    let missing = verification
        .checks
        .iter()
        .filter_map(|(name, present)| (!present).then_some(*name))
        .collect::<Vec<_>>();

    if missing.is_empty() {
        "sample catalog verification failed".to_string()
    } else {
        format!("sample products missing from catalog: {}", missing.join(", "))
    }
}
