//! CLI administration tool for shortlink.
//!
//! Provides commands for inspecting and removing short URLs, viewing
//! statistics, and performing database checks without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all short URLs with their access counts
//! cargo run --bin admin -- list
//!
//! # Show a single short URL
//! cargo run --bin admin -- show aB3xYz
//!
//! # Delete a short URL (prompts unless --yes)
//! cargo run --bin admin -- delete aB3xYz
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (`DATABASE_URL` or `DB_*`,
//! optional `REDIS_URL` / `REDIS_*`). Deletes go through the resolution
//! service so the cached entry is invalidated as well.

use shortlink::application::services::{ResolutionError, ResolutionService};
use shortlink::config::{Config, load_from_env, mask_connection_string};
use shortlink::domain::entities::UrlRecord;
use shortlink::infrastructure::persistence::PgUrlRepository;
use shortlink::server::{connect_cache, connect_pool};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

type Service = ResolutionService<PgUrlRepository>;

/// CLI tool for managing shortlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// List all short URLs with access counts
    List,

    /// Show a single short URL
    Show {
        /// Short code
        code: String,
    },

    /// Delete a short URL
    Delete {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_from_env()?;

    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Db { action } => handle_db_action(action, &pool, &config).await?,
        command => {
            let cache = connect_cache(&config).await;
            let repository = Arc::new(PgUrlRepository::with_timeout(
                Arc::new(pool.clone()),
                config.store_timeout(),
            ));
            let service = ResolutionService::new(repository, cache);

            run_command(command, &service).await?;
        }
    }

    pool.close().await;
    Ok(())
}

/// Dispatches short URL commands through the resolution service.
async fn run_command(command: Commands, service: &Service) -> Result<()> {
    match command {
        Commands::List => list_urls(service).await,
        Commands::Show { code } => show_url(service, &code).await,
        Commands::Delete { code, yes } => delete_url(service, &code, yes).await,
        Commands::Stats => handle_stats(service).await,
        Commands::Db { .. } => Ok(()),
    }
}

/// Lists every short URL, newest first.
///
/// # Output Format
///
/// ```text
/// 📋 Short URLs
///
///   Code    Accesses   Created            URL
///   ─────────────────────────────────────────────────────────────────
///   aB3xYz  42         2025-01-15 10:30   https://example.com/page
/// ```
async fn list_urls(service: &Service) -> Result<()> {
    println!("{}", "📋 Short URLs".bright_blue().bold());
    println!();

    let records = service.list_all_with_stats().await?;

    if records.is_empty() {
        println!("{}", "  No short URLs found".yellow());
        return Ok(());
    }

    println!(
        "  {:<7} {:<10} {:<18} {}",
        "Code".bright_white().bold(),
        "Accesses".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for record in &records {
        println!(
            "  {:<7} {:<10} {:<18} {}",
            record.short_code.cyan(),
            record.access_count.to_string().bright_green(),
            record
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            record.original_url
        );
    }

    println!();
    println!(
        "  Total: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_url(service: &Service, code: &str) -> Result<()> {
    match service.get(code).await {
        Ok(record) => {
            print_record(&record);
            Ok(())
        }
        Err(ResolutionError::NotFound(_)) => {
            println!("{}", format!("❌ Short code '{}' not found", code).red());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_record(record: &UrlRecord) {
    println!("{}", "🔗 Short URL".bright_blue().bold());
    println!();
    println!("  Code:     {}", record.short_code.cyan());
    println!("  URL:      {}", record.original_url.bright_white());
    println!(
        "  Accesses: {}",
        record.access_count.to_string().bright_green().bold()
    );
    println!(
        "  Created:  {}",
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Updated:  {}",
        record.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
}

/// Deletes a short URL after confirmation.
///
/// # Safety
///
/// - Shows the record first so the operator sees what is removed
/// - Requires confirmation (default: No) unless `--yes`
async fn delete_url(service: &Service, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Short URL".bright_blue().bold());
    println!();

    let record = match service.get(code).await {
        Ok(record) => record,
        Err(ResolutionError::NotFound(_)) => {
            println!("{}", format!("❌ Short code '{}' not found", code).red());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    print_record(&record);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this short URL?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service.delete(code).await?;

    println!("{}", "✅ Short URL deleted".green().bold());
    println!();

    Ok(())
}

/// Displays record and access totals.
async fn handle_stats(service: &Service) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let records = service.list_all_with_stats().await?;
    let total_accesses: i64 = records.iter().map(|r| r.access_count).sum();

    println!(
        "  Short URLs:    {}",
        records.len().to_string().bright_green().bold()
    );
    println!(
        "  Accesses:      {}",
        total_accesses.to_string().bright_green().bold()
    );

    if let Some(top) = records.iter().max_by_key(|r| r.access_count)
        && top.access_count > 0
    {
        println!(
            "  Most accessed: {} ({})",
            top.short_code.cyan(),
            top.access_count.to_string().bright_white()
        );
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());
            println!(
                "  {}",
                mask_connection_string(&config.database_url).bright_black()
            );

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
