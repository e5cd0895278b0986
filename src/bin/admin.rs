//! CLI administration tool for carrier-rates.
//!
//! Manages API tokens, inspects carriers and checks the database without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin admin -- token create --name "Checkout service"
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "Checkout service"
//! cargo run --bin admin -- carrier list --page 2
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`
//! - `TOKEN_SIGNING_SECRET`: required by `token create`; must match the server

use carrier_rates::application::services::auth_service::hash_token;
use carrier_rates::config::Config;
use carrier_rates::domain::query::CarrierQuery;
use carrier_rates::domain::repositories::{CarrierRepository, TokenRepository};
use carrier_rates::infrastructure::persistence::{PgCarrierRepository, PgTokenRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

const TOKEN_LEN: usize = 48;

/// CLI tool for managing carrier-rates.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Inspect carriers
    Carrier {
        #[command(subcommand)]
        action: CarrierAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Token name (e.g., "Checkout service")
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum CarrierAction {
    /// List carriers ordered by id
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 25)]
        page_size: u32,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Carrier { action } => handle_carrier_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));

    match action {
        TokenAction::Create { name, yes } => create_token(&repo, name, yes).await,
        TokenAction::List => list_tokens(&repo).await,
        TokenAction::Revoke { name_or_id } => revoke_token(&repo, name_or_id).await,
    }
}

/// Creates a new API token with interactive prompts.
///
/// The raw token is printed once; only its HMAC-SHA256 hash is stored.
async fn create_token(repo: &PgTokenRepository, name: Option<String>, yes: bool) -> Result<()> {
    let secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;
    if secret.is_empty() {
        anyhow::bail!("TOKEN_SIGNING_SECRET must not be empty");
    }

    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Checkout service")
            .interact_text()?,
    };

    if repo
        .find_by_name(&token_name)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .is_some()
    {
        anyhow::bail!("A token named '{}' already exists", token_name);
    }

    let token_value = generate_token();

    println!("{}", "Token details:".bright_white().bold());
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  Save this token now. It cannot be shown again."
            .red()
            .bold()
    );
    println!();

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(&secret, &token_value)
        .map_err(|e| anyhow::anyhow!("Failed to hash token: {}", e))?;

    repo.create(&token_name, &token_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "✅ Token created".green().bold());
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/v1/carriers",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<17} {:<17} {:<8}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(82).bright_black());

    for token in &tokens {
        let status = if token.is_revoked() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<5} {:<30} {:<17} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", tokens.len().to_string().bright_white().bold());

    Ok(())
}

/// Revokes a token by ID (numeric input) or exact name.
async fn revoke_token(repo: &PgTokenRepository, name_or_id: String) -> Result<()> {
    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.is_revoked() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let revoked = repo
        .revoke(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    if revoked {
        println!("{}", "✅ Token revoked".green().bold());
    } else {
        println!("{}", "⚠️  Token was revoked concurrently".yellow());
    }

    Ok(())
}

async fn handle_carrier_action(action: CarrierAction, pool: &PgPool) -> Result<()> {
    let repo = PgCarrierRepository::new(Arc::new(pool.clone()));

    match action {
        CarrierAction::List { page, page_size } => {
            if page == 0 || page_size == 0 {
                anyhow::bail!("--page and --page-size must be at least 1");
            }

            let query = CarrierQuery {
                page,
                ..CarrierQuery::first_page(page_size)
            };
            let result = repo
                .find_all_paginate(&query)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list carriers: {}", e))?;

            println!("{}", "🚚 Carriers".bright_blue().bold());
            println!();

            if result.items.is_empty() {
                println!("{}", "  No carriers on this page".yellow());
                return Ok(());
            }

            println!(
                "  {:<5} {:<24} {:<16} {:>10} {:>10} {:<4}",
                "ID".bright_white().bold(),
                "Name".bright_white().bold(),
                "Code".bright_white().bold(),
                "Base".bright_white().bold(),
                "Per kg".bright_white().bold(),
                "Cur".bright_white().bold()
            );
            println!("  {}", "─".repeat(76).bright_black());

            for carrier in &result.items {
                println!(
                    "  {:<5} {:<24} {:<16} {:>10} {:>10} {:<4}",
                    carrier.id.to_string().bright_black(),
                    carrier.name.cyan(),
                    carrier.code,
                    carrier.base_fee_cents,
                    carrier.per_kg_cents,
                    carrier.currency
                );
            }

            println!();
            println!(
                "  Page {} of {} ({} carriers)",
                result.page,
                result.total_pages(),
                result.total.to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let carriers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM carriers")
                .fetch_one(pool)
                .await?;
            let active_tokens: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL:    {}", version.bright_white());
            println!("  Carriers:      {}", carriers.to_string().bright_green());
            println!("  Active tokens: {}", active_tokens.to_string().bright_green());
            println!();
        }
    }

    Ok(())
}

/// Generates a random 48-character alphanumeric token.
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();

        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token());
    }
}
