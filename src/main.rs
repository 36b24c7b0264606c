use ledger_import::{ImportOptions, InMemoryLedger, Transaction, TransactionImporter};

use anyhow::{bail, Context};
use clap::Parser;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::stdout;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "ledger-import",
    about = "Import transaction CSV files, creating missing categories"
)]
struct CliArgs {
    /// CSV files to import, in order. Each file is removed once imported.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Rows buffered between the file reader and the validator
    #[arg(long, default_value_t = 100)]
    channel_capacity: usize,
}

#[derive(Serialize)]
struct TransactionRow<'a> {
    id: String,
    title: &'a str,
    #[serde(rename = "type")]
    kind: String,
    value: Decimal,
    category: &'a str,
}

impl<'a> From<&'a Transaction> for TransactionRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            title: &tx.title,
            kind: tx.kind.to_string(),
            value: tx.value,
            category: &tx.category.title,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args.log_level);

    for path in &args.files {
        validate_csv_file(path)?;
    }

    import_files(&args).await
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn validate_csv_file(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        bail!("File '{}' does not exist", path.display());
    }

    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        bail!("File '{}' is not a CSV file", path.display());
    }

    Ok(())
}

async fn import_files(args: &CliArgs) -> anyhow::Result<()> {
    let ledger = InMemoryLedger::new();
    let importer = TransactionImporter::new(ledger.category_store(), ledger.transaction_store())
        .with_options(ImportOptions {
            channel_capacity: args.channel_capacity,
        });

    let mut writer = csv::Writer::from_writer(stdout());

    for path in &args.files {
        let created = importer
            .import(path)
            .await
            .with_context(|| format!("Importing '{}'", path.display()))?;

        for tx in &created {
            writer.serialize(TransactionRow::from(tx))?;
        }
        writer.flush()?;
    }

    Ok(())
}
