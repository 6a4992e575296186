use clap::Parser;
use miette::{IntoDiagnostic, Result};
use monetizer::application::monetizer::Monetizer;
use monetizer::config::MonetizerConfig;
use monetizer::domain::notification::PaymentChunk;
use monetizer::domain::payer::PayerId;
use monetizer::error::Result as MonetizerResult;
use monetizer::infrastructure::loopback::LoopbackTransport;
use monetizer::interfaces::csv::balance_writer::BalanceWriter;
use monetizer::interfaces::csv::event_reader::{EventKind, EventReader, LedgerEvent};
use monetizer::logging::{DEFAULT_FILTER, init_tracing};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::warn;

const REPLAY_PREFIX: &str = "private.replay";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input events CSV file (kind, target, amount)
    input: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-payer balance cap. Overrides `max_balance` from the config file.
    #[arg(long)]
    max_balance: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(DEFAULT_FILTER).into_diagnostic()?;

    let mut config = match &cli.config {
        Some(path) => MonetizerConfig::load(path).into_diagnostic()?,
        None => MonetizerConfig::default(),
    };
    if let Some(max_balance) = cli.max_balance {
        config.max_balance = Some(max_balance);
    }

    let transport = LoopbackTransport::new(REPLAY_PREFIX);
    let monetizer = Monetizer::new(&config, Box::new(transport.clone())).into_diagnostic()?;

    // Replay events
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = EventReader::new(file);
    for event in reader.events() {
        match event {
            Ok(event) => {
                if let Err(e) = apply(&monetizer, &transport, event).await {
                    warn!(error = %e, "Error processing event");
                }
            }
            Err(e) => {
                warn!(error = %e, "Error reading event");
            }
        }
    }

    let balances = monetizer.ledger().snapshot();
    let stdout = io::stdout();
    let mut writer = BalanceWriter::new(stdout.lock());
    writer.write_balances(&balances).into_diagnostic()?;

    Ok(())
}

async fn apply(
    monetizer: &Monetizer,
    transport: &LoopbackTransport,
    event: LedgerEvent,
) -> MonetizerResult<()> {
    match event.kind {
        EventKind::Payment => {
            let chunk = PaymentChunk::new(event.target, event.amount);
            transport.deliver(monetizer, chunk).await?;
        }
        EventKind::Spend => {
            let price = event.amount.parse()?;
            monetizer.spend(&PayerId::from(event.target), price)?;
        }
    }
    Ok(())
}
