//! Import command handler

use anyhow::Context;
use std::path::Path;

use crate::config::Config;
use crate::db::Store;
use crate::services::{ImportService, SeaOrmImportService};

pub async fn cmd_import(config: &Config, path: &str) -> anyhow::Result<()> {
    let file_path = Path::new(path);

    if !file_path.is_file() {
        println!("File does not exist: {}", path);
        return Ok(());
    }

    let content = tokio::fs::read_to_string(file_path)
        .await
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    let importer = SeaOrmImportService::new(config.import.incomplete_records);

    let txn = store.begin().await?;
    let summary = match importer.import_text(&txn, &content).await {
        Ok(summary) => summary,
        Err(e) => {
            println!("✗ Import failed, nothing was written: {}", e);
            return Ok(());
        }
    };
    txn.commit().await?;

    println!(
        "✓ Imported {} of {} records from {}",
        summary.imported,
        summary.total,
        file_path.display()
    );
    println!("  New movies: {}", summary.created_movies);
    println!("  New actors: {}", summary.created_actors);
    if summary.skipped > 0 {
        println!("  Skipped:    {}", summary.skipped);
    }
    println!("{:-<60}", "");

    for movie in &summary.movies {
        let cast = movie
            .actors
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!("[{}] {} ({}, {})", movie.id, movie.title, movie.year, movie.format);
        if !cast.is_empty() {
            println!("      {}", cast);
        }
    }

    Ok(())
}
