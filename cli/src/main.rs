use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use expense_splitter::{
    allocate_cents, content_type_for, format_money, to_cents, EntryUpdate, ExpenseFlow,
    ExpenseService, GuestSessionWatcher, ReceiptScanService, SplitApiClient, SplitOutcome,
    SplitterConfig, UserContext,
};
use log::info;
use shared::{Participant, SplitType};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Equal,
    Amount,
    Percentage,
    Share,
}

impl From<Mode> for SplitType {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Equal => SplitType::Equal,
            Mode::Amount => SplitType::Amount,
            Mode::Percentage => SplitType::Percentage,
            Mode::Share => SplitType::Share,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "splitter", version, about = "Split an expense between friends")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a split locally
    Split(SplitArgs),
    /// Compute a split and save it as an expense
    Submit {
        #[command(flatten)]
        split: SplitArgs,
    },
    /// Open a guest session and list guests as they join
    GuestSession {
        /// How long to keep the session open
        #[arg(long, default_value_t = 120)]
        seconds: u64,
    },
    /// Extract the text of a receipt image
    ScanReceipt {
        image: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// Total amount of the expense
    #[arg(long)]
    total: String,

    #[arg(long, value_enum, default_value_t = Mode::Equal)]
    mode: Mode,

    /// Who paid; always the first participant
    #[arg(long, default_value = "me")]
    payer: String,

    /// Other participants, in order
    #[arg(long = "participant")]
    participants: Vec<String>,

    /// Amount, percentage or share per participant, payer first
    #[arg(long = "value")]
    values: Vec<String>,

    /// Participants left out of an equal split
    #[arg(long = "exclude")]
    excluded: Vec<String>,

    #[arg(long, default_value = "Expense")]
    description: String,
}

fn participant_id(name: &str) -> String {
    format!("participant::{}", name.trim().to_lowercase().replace(' ', "-"))
}

/// Walk a flow up to the split inputs for the given arguments
fn build_flow(args: &SplitArgs, config: &SplitterConfig) -> Result<ExpenseFlow> {
    let user = UserContext::new(participant_id(&args.payer), args.payer.clone());
    let mut flow = ExpenseFlow::with_currency_symbol(user, config.currency_symbol.clone());

    flow.start()?;
    flow.set_description(&args.description)?;
    flow.set_total_input(&args.total)?;
    for name in &args.participants {
        let participant = Participant::new(participant_id(name), name.clone());
        if !flow.add_participant(participant)? {
            bail!("Participant {:?} is listed more than once", name);
        }
    }
    flow.continue_to_split_mode()
        .with_context(|| format!("Cannot split a total of {:?}", args.total))?;

    let mode = SplitType::from(args.mode);
    flow.select_split_mode(mode)?;

    if mode == SplitType::Equal {
        let participants = flow.draft().map(|d| d.participants.clone()).unwrap_or_default();
        for name in &args.excluded {
            let index = participants
                .iter()
                .position(|p| p.name == *name)
                .with_context(|| format!("Unknown participant to exclude: {}", name))?;
            flow.set_included(index, false)?;
        }
    } else {
        for (index, value) in args.values.iter().enumerate() {
            if flow.set_entry_input(index, value)? == EntryUpdate::Rejected {
                bail!("Value {:?} for participant {} was rejected", value, index + 1);
            }
        }
    }

    Ok(flow)
}

fn print_split(flow: &ExpenseFlow) {
    let (Some(draft), Some(outcome)) = (flow.draft(), flow.split()) else {
        return;
    };
    let symbol = flow.currency_symbol();
    let cents: Vec<_> = match outcome.submission_error() {
        None => allocate_cents(draft.display_total(), outcome.amounts()),
        Some(_) => outcome.amounts().iter().copied().map(to_cents).collect(),
    };

    let rows = draft.participants.iter().zip(outcome.amounts()).zip(&cents);
    for ((participant, exact), rounded) in rows {
        println!(
            "{:<20} {:>12}   (exact {})",
            participant.name,
            format_money(*rounded, symbol),
            exact.normalize()
        );
    }

    match &outcome {
        SplitOutcome::Equal(split) if split.no_one_selected() => println!("No one selected"),
        SplitOutcome::Amount(split) => {
            println!("Remaining: {}", format_money(split.remaining, symbol))
        }
        SplitOutcome::Percentage(split) => {
            println!("Remaining: {}%", split.remaining_percentage.normalize())
        }
        SplitOutcome::Share(split) => println!("Total shares: {}", split.total_shares.normalize()),
        SplitOutcome::Equal(_) => {}
    }

    match outcome.submission_error() {
        Some(error) => println!("Not ready to submit: {}", error),
        None => println!("Ready to submit"),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = SplitterConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Split(args) => {
            let flow = build_flow(&args, &config)?;
            print_split(&flow);
        }
        Command::Submit { split } => {
            let mut flow = build_flow(&split, &config)?;
            print_split(&flow);

            let service = ExpenseService::new(SplitApiClient::new(&config)?);
            let response = service.submit(&mut flow).await?;
            println!("Saved expense {}", response.expense_id);
        }
        Command::GuestSession { seconds } => {
            let client = Arc::new(SplitApiClient::new(&config)?);
            let poll_interval = config.guest_poll_interval();
            let watcher =
                GuestSessionWatcher::open(client, &config.join_base_url, poll_interval).await?;
            println!("Guests can join at {}", watcher.join_url());

            let mut updates = watcher.subscribe();
            let deadline = tokio::time::sleep(Duration::from_secs(seconds));
            tokio::pin!(deadline);

            loop {
                tokio::select! {
                    _ = &mut deadline => break,
                    _ = tokio::signal::ctrl_c() => break,
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let guests = updates.borrow_and_update().clone();
                        let names: Vec<&str> = guests.iter().map(|g| g.name.as_str()).collect();
                        println!("Joined so far: {}", names.join(", "));
                    }
                }
            }

            let guests = watcher.close().await?;
            println!("Session closed with {} guests", guests.len());
        }
        Command::ScanReceipt { image } => {
            let bytes = std::fs::read(&image)
                .with_context(|| format!("Failed to read {}", image.display()))?;
            let service = ReceiptScanService::new(
                SplitApiClient::new(&config)?,
                config.receipt_poll_interval(),
                config.receipt_max_polls,
            );
            let text = service.scan(bytes, content_type_for(&image)).await?;
            println!("{}", text);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    info!("Running {:?}", cli.command);
    run(cli).await
}
