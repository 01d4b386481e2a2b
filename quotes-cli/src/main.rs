//! Quotes CLI - manage a JSON quote file from the command line

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use quotes_core::{JsonFileStore, NewQuote, Quote, QuoteId, QuoteStore};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "quotes")]
#[command(about = "Quotes - manage a JSON quote collection")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Quote data file
    #[arg(short, long, global = true, default_value = "data.json")]
    data: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List every quote
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show a single quote
    Show {
        /// Quote id
        id: QuoteId,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Add a new quote
    Add {
        /// Quote text
        #[arg(long)]
        quote: String,

        /// Author
        #[arg(long)]
        author: String,
    },

    /// Replace the text and author of a quote
    Edit {
        /// Quote id
        id: QuoteId,

        /// New quote text
        #[arg(long)]
        quote: String,

        /// New author
        #[arg(long)]
        author: String,
    },

    /// Remove a quote
    Remove {
        /// Quote id
        id: QuoteId,
    },

    /// Show a random quote
    Random {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Count stored quotes
    Count,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("quotes=debug,quotes_core=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let store = JsonFileStore::open(&cli.data)
        .await
        .with_context(|| format!("Failed to open quote file: {}", cli.data.display()))?;
    debug!("Using quote file {}", store.path().display());

    match cli.command {
        Commands::List { format } => {
            let quotes = store.list_quotes().await?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&quotes)?),
                Format::Text => {
                    if quotes.is_empty() {
                        println!("{} No quotes stored", "!".yellow());
                    }
                    for quote in &quotes {
                        print_quote(quote);
                    }
                }
            }
        }
        Commands::Show { id, format } => {
            let quote = require(&store, id).await?;
            emit(&quote, format)?;
        }
        Commands::Add { quote, author } => {
            let new_quote = NewQuote::from_parts(Some(quote), Some(author))?;
            let quote = store.create_quote(new_quote).await?;
            println!("{} Added quote {}", "✓".green(), quote.id);
        }
        Commands::Edit { id, quote, author } => {
            let mut existing = require(&store, id).await?;
            existing.apply(NewQuote::from_parts(Some(quote), Some(author))?);
            store.update_quote(&existing).await?;
            println!("{} Updated quote {}", "✓".green(), id);
        }
        Commands::Remove { id } => {
            require(&store, id).await?;
            store.delete_quote(id).await?;
            println!("{} Removed quote {}", "✓".green(), id);
        }
        Commands::Random { format } => match store.random_quote().await? {
            Some(quote) => emit(&quote, format)?,
            None => bail!("No quotes available"),
        },
        Commands::Count => {
            println!("{}", store.count().await?);
        }
    }

    Ok(())
}

async fn require(store: &JsonFileStore, id: QuoteId) -> Result<Quote> {
    match store.get_quote(id).await? {
        Some(quote) => Ok(quote),
        None => bail!("Quote {} not found", id),
    }
}

fn emit(quote: &Quote, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(quote)?),
        Format::Text => print_quote(quote),
    }
    Ok(())
}

fn print_quote(quote: &Quote) {
    println!("{} \"{}\"", format!("#{}", quote.id).blue().bold(), quote.quote);
    println!("   - {}", quote.author);
}
