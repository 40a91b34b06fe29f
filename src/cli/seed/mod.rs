//! Seed command - load documents into the knowledge collection

use std::path::Path;

use anyhow::bail;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::vector_store::VectorStoreKind;

pub async fn run(config: AppConfig, file: &Path) -> anyhow::Result<()> {
    ensure_persistent_store(&config)?;
    init_logging(&config.logging);

    let state = crate::create_app_state_with_config(&config).await?;
    let report = state.seeder.seed_file(file).await?;

    info!(file = %file.display(), "Seed file processed");
    println!(
        "Inserted {} documents ({} embedded), {} failed",
        report.inserted,
        report.embedded,
        report.failed.len()
    );

    for (id, reason) in &report.failed {
        println!("  {}: {}", id, reason);
    }

    Ok(())
}

/// The in-memory store lives only as long as this process
fn ensure_persistent_store(config: &AppConfig) -> anyhow::Result<()> {
    if config.store.kind == VectorStoreKind::InMemory {
        bail!(
            "seed needs a persistent store (store.type = \"pgvector\"); \
             with the in-memory store set seed.path and run serve instead"
        );
    }

    Ok(())
}
