// src/main.rs

//! thriftwatch: marketplace listing watcher CLI.
//!
//! Searches a marketplace for configured terms and delivers fresh,
//! not-yet-seen listings to a Telegram channel.

mod error;
mod models;
mod pipeline;
mod render;
mod services;
mod store;
mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::{filter_recent, run_batch};
use crate::services::{HttpMarketplace, Marketplace, SearchRequest, TelegramClient, extract};
use crate::store::RedisSeenStore;

#[derive(Parser, Debug)]
#[command(name = "thriftwatch", version, about = "Marketplace listing watcher")]
struct Cli {
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the configured terms and deliver fresh listings
    Run {
        /// Log what would be sent without sending or marking anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Search one term and print the extracted listings as JSON
    Search { term: String },
    /// Render the notifications one term would produce, without sending
    Preview { term: String },
    /// Validate the configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match cli.command {
        Command::Run { dry_run } => run(&cli.config, dry_run).await,
        Command::Search { term } => search(&cli.config, &term).await,
        Command::Preview { term } => preview(&cli.config, &term).await,
        Command::Validate => validate(&cli.config),
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn build_request(config: &Config, term: &str) -> SearchRequest {
    let mut request = SearchRequest::new(term, config.search.count);
    for collection in &config.search.collections {
        request = request.filter("collections", collection);
    }
    request
}

async fn run(path: &str, dry_run: bool) -> Result<()> {
    let config = Arc::new(Config::load_or_default(path));
    config.validate()?;

    let market = HttpMarketplace::new(config.clone())?;
    let store = RedisSeenStore::connect(&config.store).await?;
    let delivery = TelegramClient::new(config.clone())?;

    let outcome = run_batch(&config, &market, &store, &delivery, dry_run).await?;
    log::info!(
        "Batch finished: {} delivered, {} already seen, {} dropped, {} delivery failures",
        outcome.delivered,
        outcome.skipped_seen,
        outcome.dropped_invalid,
        outcome.delivery_failures
    );
    Ok(())
}

async fn search(path: &str, term: &str) -> Result<()> {
    let config = Arc::new(Config::load_or_default(path));
    let market = HttpMarketplace::new(config.clone())?;

    let cards = market.search(&build_request(&config, term)).await?;
    for card in &cards {
        let listing = extract::extract_from_card(card, &config.search);
        println!("{}", serde_json::to_string_pretty(&listing.debug_json())?);
    }
    Ok(())
}

async fn preview(path: &str, term: &str) -> Result<()> {
    let config = Arc::new(Config::load_or_default(path));
    let market = HttpMarketplace::new(config.clone())?;

    let cards = market.search(&build_request(&config, term)).await?;
    let listings: Vec<_> = cards
        .iter()
        .map(|card| extract::extract_from_card(card, &config.search))
        .collect();
    let recent = filter_recent(
        listings,
        chrono::Duration::days(config.listing.recency_days as i64),
    );

    for listing in &recent {
        match render::render(listing, &config.message) {
            Ok(payload) => {
                if let Some(photo) = &payload.photo_url {
                    println!("photo: {photo}");
                }
                println!("{}\n", payload.text);
            }
            Err(error) => log::warn!("Skipping {}: {error}", listing.id),
        }
    }
    Ok(())
}

fn validate(path: &str) -> Result<()> {
    let config = Config::load(path)?;
    config.validate()?;
    println!(
        "Configuration OK: {} terms, {} per run",
        config.search.terms.len(),
        config.search.terms_per_run
    );
    Ok(())
}
