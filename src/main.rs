use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use teller::application::dispatcher::{Dispatcher, DispatcherConfig};
use teller::application::engine::AccountEngine;
use teller::infrastructure::in_memory::InMemoryLedger;
use teller::infrastructure::journal::Journal;
use teller::interfaces::csv::operation_reader::OperationReader;
use teller::interfaces::statement;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file (columns: op, amount, loan_type)
    input: PathBuf,

    /// Append-only journal file, created if absent
    #[arg(long, default_value = "transaction_log.txt")]
    journal_file: PathBuf,

    /// Worker pool size
    #[arg(long, default_value_t = 3)]
    workers: usize,

    /// Sleep out each operation's simulated processing time
    #[arg(long)]
    simulate_delay: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let journal = Journal::with_file(cli.journal_file)
        .await
        .into_diagnostic()?;
    let engine = Arc::new(AccountEngine::new(
        Box::new(InMemoryLedger::new()),
        journal,
    ));
    let dispatcher = Dispatcher::spawn(
        engine.clone(),
        DispatcherConfig {
            workers: cli.workers,
            simulate_delay: cli.simulate_delay,
            ..Default::default()
        },
    );

    // Stream operations through the pool. Rows that fail validation become
    // journal lines, exactly like a rejected operation; the run continues.
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    for op_result in reader.operations() {
        match op_result {
            Ok(op) => {
                if let Err(e) = dispatcher.submit(op).await {
                    eprintln!("Error submitting operation: {e}");
                }
            }
            Err(e) => {
                engine.journal().record(&e.to_string()).await;
            }
        }
    }
    dispatcher.drain().await;

    let snapshot = engine.snapshot().await;
    let history = engine.history().await.into_diagnostic()?;
    print!("{}", statement::render(&snapshot, &history));

    Ok(())
}
