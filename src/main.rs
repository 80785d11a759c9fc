//! Gleaner main entry point
//!
//! This is the command-line interface for the Gleaner crawl engine.

use anyhow::{bail, Context};
use clap::Parser;
use gleaner::config::{load_config_with_hash, Config};
use gleaner::crawler::{Crawler, DemoFetcher, FetchPipeline, HttpFetcher, PageFetcher, DEMO_SEEDS};
use gleaner::output::{
    configured_sinks, export_all, extract_articles, extract_contacts, extract_products,
    SessionAggregator,
};
use gleaner::storage::{SqliteStorage, Storage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Gleaner: a bounded, polite crawl engine
///
/// Gleaner crawls breadth-first from a set of seed URLs within depth and page
/// budgets, rate limits and retries every request, and extracts titles,
/// headings, contacts, prices and dates from each page.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version = "1.0.0")]
#[command(about = "A bounded, polite crawl engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl built-in sample pages instead of the network
    #[arg(long)]
    demo: bool,

    /// Override the page budget from the configuration
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    max_pages: Option<u64>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show the latest run recorded in the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages as usize;
    }
    if cli.demo && config.seeds.is_empty() {
        config.seeds = DEMO_SEEDS.iter().map(|s| s.to_string()).collect();
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash, cli.demo, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective settings and seeds
fn handle_dry_run(config: &Config) {
    println!("=== Gleaner Dry Run ===\n");

    println!("Crawler Configuration:");
    if !config.crawler.base_url.is_empty() {
        println!("  Base URL: {}", config.crawler.base_url);
    }
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max links per page: {}", config.crawler.max_links_per_page);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );

    println!("\nFetch:");
    println!("  Requests per second: {}", config.fetch.requests_per_second);
    println!("  Rate limit scope: {:?}", config.fetch.rate_limit_scope);
    println!(
        "  Retries: {} (delay {}ms, backoff x{})",
        config.fetch.max_retries, config.fetch.retry_delay_ms, config.fetch.backoff_factor
    );
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nPolicy:");
    if config.policy.allowed_domains.is_empty() {
        println!("  Allowed domains: any");
    } else {
        println!("  Allowed domains: {}", config.policy.allowed_domains.join(", "));
    }
    println!("  Blocked patterns: {}", config.policy.blocked_patterns.len());

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        let verdict = if gleaner::url::should_scrape(
            seed,
            &config.policy.allowed_domains,
            &config.policy.blocked_patterns,
        ) {
            "ok"
        } else {
            "rejected"
        };
        println!("  - {} ({})", seed, verdict);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows the latest run from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let Some(path) = &config.output.database_path else {
        bail!("--stats needs output.database-path in the configuration");
    };
    println!("Database: {}\n", path);

    let storage = SqliteStorage::new(Path::new(path))
        .with_context(|| format!("failed to open {}", path))?;
    let Some(run) = storage.get_latest_run()? else {
        println!("No runs recorded");
        return Ok(());
    };

    println!("Run {} ({})", run.id, run.status);
    println!("  Started: {}", run.started_at);
    println!(
        "  Finished: {}",
        run.finished_at.as_deref().unwrap_or("not finished")
    );
    println!("  Config hash: {}", run.config_hash);
    println!("  Pages scraped: {}", run.pages_scraped);
    println!("  Errors: {}", run.error_count);

    let mut summary: Vec<(String, u64)> = storage.get_error_summary(run.id)?.into_iter().collect();
    summary.sort();
    for (kind, count) in summary {
        println!("    {}: {}", kind, count);
    }

    if run.id > 1 {
        let unchanged = storage.find_unchanged_urls(run.id)?;
        println!("  Unchanged since earlier runs: {} pages", unchanged.len());
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    config_hash: &str,
    demo: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    if config.seeds.is_empty() {
        bail!("no seed URLs configured (add `seeds` or use --demo)");
    }

    let fetch_config = config.fetch_config();
    let fetcher: Arc<dyn PageFetcher> = if demo {
        tracing::info!("Demo mode: serving built-in sample pages");
        Arc::new(DemoFetcher::new())
    } else {
        Arc::new(
            HttpFetcher::from_config(&config.user_agent, fetch_config.timeout)
                .context("failed to build HTTP client")?,
        )
    };

    let pipeline = FetchPipeline::new(fetcher, &fetch_config);
    let mut crawler = Crawler::new(config.crawl_config(), pipeline);
    crawler.crawl(&config.seeds)?;

    let token = crawler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing in-flight fetches");
            token.cancel();
        }
    });

    while let Some(item) = crawler.next_item().await {
        if !quiet {
            println!(
                "[{}] depth {} | {} | {}",
                crawler.aggregator().stats().pages_scraped,
                item.depth,
                item.display_title(),
                item.url
            );
        }
    }

    let final_state = crawler.state();
    let session = crawler.into_aggregator();

    if !quiet {
        println!("\n{}", session.generate_report());
        print_insights(&session);
    }

    let sinks = configured_sinks(&config.output, config_hash, final_state);
    let (_, failures) = export_all(&sinks, &session);
    if failures > 0 {
        bail!("{} of {} output sinks failed", failures, sinks.len());
    }

    Ok(())
}

fn print_insights(session: &SessionAggregator) {
    let products = extract_products(session.items());
    if !products.is_empty() {
        println!("\nProducts ({}):", products.len());
        for product in &products {
            println!("  - {}: ${}", product.title, product.price);
        }
    }

    let contacts = extract_contacts(session.items());
    if !contacts.is_empty() {
        println!("\nContacts:");
        for email in &contacts.emails {
            println!("  - {}", email);
        }
        for phone in &contacts.phones {
            println!("  - {}", phone);
        }
    }

    let articles = extract_articles(session.items());
    if !articles.is_empty() {
        println!("\nArticles ({}):", articles.len());
        for article in &articles {
            println!(
                "  - {} ({}, {} words)",
                article.title, article.date, article.word_count
            );
        }
    }
}
