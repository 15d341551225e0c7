//! docquarry main entry point
//!
//! This is the command-line interface for the crawl, index and ask stages.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docquarry::config::{load_config_with_hash, Config, Credentials};
use docquarry::crawler::crawl;
use docquarry::embedding::index_documents;
use docquarry::index::PineconeClient;
use docquarry::llm::OpenAiClient;
use docquarry::output::{load_documents, print_report, print_statistics, DocumentStatistics};
use docquarry::retrieval::Retriever;
use futures::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// docquarry: documentation crawler and question answering
///
/// Crawls a documentation site into a JSON record, indexes that record in a
/// vector database, and answers questions from the closest pages.
#[derive(Parser, Debug)]
#[command(name = "docquarry")]
#[command(version)]
#[command(about = "Crawl, index and query a documentation site", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the site and write the document record
    Crawl,

    /// Embed the document record into the vector index
    Index,

    /// Answer a question from the indexed documentation
    Ask {
        /// The question to answer
        question: String,

        /// Print the answer token by token as it is generated
        #[arg(long)]
        stream: bool,
    },

    /// Validate config and show what would be crawled without crawling
    DryRun,

    /// Show statistics for an existing document record
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::Crawl => handle_crawl(&config).await,
        Command::Index => handle_index(&config).await,
        Command::Ask { question, stream } => handle_ask(&config, &question, stream).await,
        Command::DryRun => handle_dry_run(&config),
        Command::Stats => handle_stats(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docquarry=info,warn"),
            1 => EnvFilter::new("docquarry=debug,info"),
            2 => EnvFilter::new("docquarry=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles `crawl`: walks the site and prints the run report
async fn handle_crawl(config: &Config) -> Result<()> {
    tracing::info!("Starting crawl at {}", config.crawler.seed());

    let report = crawl(config).await.context("Crawl failed")?;
    print_report(&report);
    println!(
        "Scraped {} pages. Data saved to {}",
        report.documents, config.output.documents_path
    );

    Ok(())
}

/// Handles `index`: embeds every document and upserts it
async fn handle_index(config: &Config) -> Result<()> {
    let credentials = Credentials::from_env().context("Indexing needs API credentials")?;
    let documents = load_documents(Path::new(&config.output.documents_path))
        .context("Failed to read document record")?;

    let openai = OpenAiClient::new(&credentials.openai_api_key)
        .with_embedding_model(&config.embedding.model);
    let index = PineconeClient::new(&credentials.pinecone_api_key)
        .ensure_index(&credentials.index_name, &config.embedding)
        .await
        .with_context(|| format!("Failed to open index {}", credentials.index_name))?;

    let count = index_documents(&documents, &openai, &index)
        .await
        .context("Indexing failed")?;
    println!(
        "Indexed {} documents into {}",
        count, credentials.index_name
    );

    Ok(())
}

/// Handles `ask`: retrieves context and prints the answer
async fn handle_ask(config: &Config, question: &str, stream: bool) -> Result<()> {
    let credentials = Credentials::from_env().context("Asking needs API credentials")?;
    let completion_model = credentials.resolve_completion_model(&config.retrieval)?;

    let openai = OpenAiClient::new(&credentials.openai_api_key)
        .with_embedding_model(&config.embedding.model)
        .with_completion_model(completion_model);
    let pinecone = PineconeClient::new(&credentials.pinecone_api_key);
    let description = pinecone
        .describe_index(&credentials.index_name)
        .await
        .with_context(|| format!("Failed to open index {}", credentials.index_name))?;
    let index = pinecone.index(&description.host);

    let retriever = Retriever::new(&openai, &index, &openai, config.retrieval.top_k);

    if stream {
        let mut answer = retriever.ask_stream(question).await?;
        let mut stdout = std::io::stdout();
        while let Some(chunk) = answer.chunks.next().await {
            let chunk = chunk.context("Answer stream failed")?;
            if chunk.done {
                break;
            }
            write!(stdout, "{}", chunk.delta)?;
            stdout.flush()?;
        }
        writeln!(stdout)?;
        print_sources(&answer.sources);
    } else {
        let answer = retriever.ask(question).await?;
        println!("{}", answer.text);
        print_sources(&answer.sources);
    }

    Ok(())
}

fn print_sources(sources: &[String]) {
    if sources.is_empty() {
        return;
    }
    println!("\nSources:");
    for url in sources {
        println!("  - {}", url);
    }
}

/// Handles `dry-run`: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<()> {
    println!("=== docquarry Dry Run ===\n");

    let crawler = &config.crawler;
    println!("Crawler Configuration:");
    println!("  Base domain: {}", crawler.base_domain);
    println!("  Base URL: {}", crawler.base_url);
    println!("  Seed: {}", crawler.seed());
    println!("  Politeness delay: {}ms", crawler.politeness_delay_ms);
    println!(
        "  Max pages: {}",
        crawler
            .max_pages
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
    );
    println!(
        "  Max depth: {}",
        crawler
            .max_depth
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
    );
    println!(
        "  Title: {} (fallback \"{}\")",
        crawler.title_selector, crawler.title_placeholder
    );
    println!(
        "  Content: {} (fallback \"{}\")",
        crawler.content_selector, crawler.content_placeholder
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Documents: {}", config.output.documents_path);

    println!("\nEmbedding:");
    println!(
        "  Model: {} ({} dimensions, {})",
        config.embedding.model, config.embedding.dimension, config.embedding.metric
    );
    println!(
        "  Serverless: {}/{}",
        config.embedding.cloud, config.embedding.region
    );

    println!("\nRetrieval:");
    println!("  Top K: {}", config.retrieval.top_k);

    println!("\nCredentials:");
    match Credentials::from_env() {
        Ok(credentials) => {
            println!("  Index: {}", credentials.index_name);
            match credentials.resolve_completion_model(&config.retrieval) {
                Ok(model) => println!("  Completion model: {}", model),
                Err(e) => println!("  ✗ {}", e),
            }
        }
        Err(e) => println!("  ✗ {} (crawl does not need credentials)", e),
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", crawler.seed());

    Ok(())
}

/// Handles `stats`: summarizes the document record
fn handle_stats(config: &Config) -> Result<()> {
    println!("Documents: {}\n", config.output.documents_path);

    let documents = load_documents(Path::new(&config.output.documents_path))
        .context("Failed to read document record")?;
    let stats = DocumentStatistics::from_documents(&documents, &config.crawler);
    print_statistics(&stats);

    Ok(())
}
