use clap::Parser;
use minibank::infrastructure::in_memory::{InMemoryAccountStore, InMemoryAgreementStore};
use minibank::interfaces::batch::BatchRunner;
use minibank::interfaces::csv::account_writer::AccountWriter;
use minibank::interfaces::csv::operation_reader::OperationReader;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file
    input: PathBuf,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let runner = BatchRunner::new(
        Box::new(InMemoryAgreementStore::new()),
        Box::new(InMemoryAccountStore::new()),
    );

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    let mut applied = 0usize;
    for (row, op_result) in reader.operations().enumerate() {
        let line = row + 2;
        match op_result {
            Ok(op) => match runner.apply(op).await {
                Ok(()) => applied += 1,
                Err(e) => warn!(line, "Error applying operation: {}", e),
            },
            Err(e) => warn!(line, "Error reading operation: {}", e),
        }
    }
    info!(applied, "batch finished");

    let accounts = runner.into_accounts().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = AccountWriter::new(stdout.lock());
    writer.write_accounts(accounts).into_diagnostic()?;

    Ok(())
}
