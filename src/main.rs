//! rankstat - Calendar-aligned search position reports with rolling billing intervals

use clap::Parser;
use rankstat::{
    billing::billing_intervals,
    calendar::CalendarWindow,
    cli::{Cli, Command, IntervalsArgs, ReportArgs, WindowArgs},
    data_loader::DataLoader,
    error::{RankstatError, Result},
    output::get_formatter,
    report::ReportBuilder,
    types::{CostMode, DailyDate},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Quiet by default; --verbose raises to info, RUST_LOG still wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("rankstat=info")
        } else {
            EnvFilter::new("rankstat=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let today = cli.resolve_today()?;
    info!("Using {} as today", today);

    let output = match &cli.command {
        Command::Report(args) => run_report(args, today, cli.mode, cli.json).await?,
        Command::Intervals(args) => run_intervals(args, today, cli.json),
        Command::Window(args) => run_window(args, today, cli.json)?,
    };

    println!("{output}");
    Ok(())
}

async fn run_report(
    args: &ReportArgs,
    today: DailyDate,
    mode: CostMode,
    json: bool,
) -> Result<String> {
    info!("Running {} report", args.period);

    let mut loader = DataLoader::new(&args.positions, &args.keywords);
    if let Some(path) = &args.aggregates {
        loader = loader.with_aggregates(path);
    }
    let input = loader.load().await?;

    let mut builder = ReportBuilder::new(args.anchor, today)
        .with_period(args.period_selector())
        .completed_only(args.completed_only)
        .with_cost_mode(mode);
    if let Some((start, end)) = args.custom_range()? {
        builder = builder.with_custom_range(start, end);
    }

    let report = builder.build(input.records, &input.keywords, input.aggregates)?;
    Ok(get_formatter(json).format_report(&report))
}

fn run_intervals(args: &IntervalsArgs, today: DailyDate, json: bool) -> String {
    let until = args.until.unwrap_or(today);
    let intervals = billing_intervals(args.anchor, until);
    info!("Generated {} intervals up to {}", intervals.len(), until);
    get_formatter(json).format_intervals(&intervals)
}

fn run_window(args: &WindowArgs, today: DailyDate, json: bool) -> Result<String> {
    let selector = args.period_selector()?;
    let window = CalendarWindow::for_selector(selector, today)
        .ok_or_else(|| RankstatError::InvalidPeriod(selector.kind.to_string()))?;
    Ok(get_formatter(json).format_window(&window))
}
