mod catalog;
mod orders;
mod setup;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use orderdesk_core::Department;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "orderdesk-cli")]
#[command(about = "Operator tools for the internal order desk")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print an argon2 hash for the credentials file
    HashPassword {
        /// Password to hash; read from stdin when omitted
        password: Option<String>,
    },
    /// Fetch the Shopify catalog and list orderable skus
    Catalog {
        /// Only list skus this department may order (label or code)
        #[arg(long)]
        department: Option<Department>,
    },
    /// Read the order sheet and print the next free order number
    OrderNumber {
        /// Department label or code (e.g. Marketing, MKT)
        #[arg(long)]
        department: Department,
        /// Order date as YYYY-MM-DD; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Load configuration and credentials and print them redacted
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let level = std::env::var("ORDERDESK_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::HashPassword { password }) => setup::run_hash_password(password)?,
        Some(Commands::Catalog { department }) => catalog::run_catalog(department).await?,
        Some(Commands::OrderNumber { department, date }) => {
            orders::run_order_number(department, date).await?;
        }
        Some(Commands::CheckConfig) => setup::run_check_config()?,
        None => println!("orderdesk-cli: pass --help to list commands"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
