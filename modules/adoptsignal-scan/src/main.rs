use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use adoptsignal_common::{CompanyRef, Config, SourceId};
use adoptsignal_scan::{batch, scanner::Scanner};

#[derive(Parser)]
#[command(name = "scan", about = "Product-adoption signal scanner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fast check of one company (highest-signal sources only).
    Check {
        company: String,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        org: Option<String>,
    },
    /// Full multi-source scan of one company.
    Scan {
        company: String,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        org: Option<String>,
        /// Comma-separated source subset (default: all configured).
        #[arg(long, value_delimiter = ',')]
        sources: Option<Vec<String>>,
    },
    /// Scan a JSON file of CRM company records, preserving order.
    Batch { file: PathBuf },
    /// Report which sources are configured and reachable.
    Status,
}

fn company_ref(name: String, domain: Option<String>, org: Option<String>) -> CompanyRef {
    CompanyRef {
        name,
        domain,
        github_org: org,
    }
}

fn parse_sources(raw: Option<Vec<String>>) -> Result<Option<Vec<SourceId>>> {
    let Some(raw) = raw else { return Ok(None) };
    let sources = raw
        .iter()
        .map(|s| {
            SourceId::from_str_loose(s).with_context(|| format!("unknown source: {s}"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(sources))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("adoptsignal=info".parse()?))
        .init();

    let config = Config::from_env();
    config.log_redacted();

    let scanner = Scanner::from_config(&config)?;
    let cli = Cli::parse();

    match cli.command {
        Command::Check {
            company,
            domain,
            org,
        } => {
            let result = scanner
                .scan_fast(&company_ref(company, domain, org))
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Scan {
            company,
            domain,
            org,
            sources,
        } => {
            let sources = parse_sources(sources)?;
            let result = scanner
                .scan(&company_ref(company, domain, org), sources.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Batch { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let records: Vec<serde_json::Value> =
                serde_json::from_str(&raw).context("batch file must be a JSON array")?;
            let companies = batch::parse_crm_records(&records)?;
            info!(companies = companies.len(), "Loaded batch file");

            let results = batch::scan_companies(&scanner, &companies, None).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Status => {
            let status = scanner.status().await;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}
