// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use presence_check::{build_matcher, load_inputs, write_outputs, CheckConfig, CheckInputs, MatchMode, MatchStats};

/// Flag free-text records that mention someone from an identity roster
#[derive(Parser)]
#[command(name = "presence-check")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate the records and write the output files
    Check(CheckArgs),

    /// Annotate the records and browse the result in the terminal
    View(CheckArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// CSV with the free-text records
    #[arg(short, long)]
    records: Option<PathBuf>,

    /// CSV with the identity roster
    #[arg(short = 'R', long)]
    roster: Option<PathBuf>,

    /// Annotated CSV output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also render a highlighted HTML table
    #[arg(long)]
    html: Option<PathBuf>,

    /// Also write a JSON run summary
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Matching rules: legacy (historical) or strict
    #[arg(short, long)]
    mode: Option<MatchMode>,

    /// Free-text column of the records file
    #[arg(long)]
    text_column: Option<String>,

    /// Annotation column written to the output
    #[arg(long)]
    presence_column: Option<String>,
}

impl CheckArgs {
    /// Command line values win over the config file
    fn apply(self, config: &mut CheckConfig) {
        if let Some(records) = self.records {
            config.records_path = Some(records);
        }
        if let Some(roster) = self.roster {
            config.roster_path = Some(roster);
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(html) = self.html {
            config.html_path = Some(html);
        }
        if let Some(summary) = self.summary {
            config.summary_path = Some(summary);
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(column) = self.text_column {
            config.columns.text = column;
        }
        if let Some(column) = self.presence_column {
            config.columns.presence = column;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => CheckConfig::from_file(path)?,
        None => CheckConfig::default(),
    };

    match cli.command {
        Commands::Check(args) => {
            args.apply(&mut config);
            run_check(&config)
        }
        Commands::View(args) => {
            args.apply(&mut config);
            run_view(&config)
        }
    }
}

/// Load both tables and annotate every record, with a progress bar
fn annotate(config: &CheckConfig) -> Result<(CheckInputs, MatchStats)> {
    println!("📂 Reading records and roster...");
    let mut inputs = load_inputs(config)?;
    println!(
        "✓ {} records, {} identities",
        inputs.records.len(),
        inputs.identities.len()
    );

    let matcher = build_matcher(config, &inputs.identities)?;

    println!("\n🔍 Matching ({} mode)...", matcher.mode());
    let progress = ProgressBar::new(inputs.records.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records")?
            .progress_chars("=>-"),
    );

    let stats = matcher.annotate_with_progress(&mut inputs.records, |done| {
        progress.set_position(done as u64)
    });
    progress.finish_and_clear();

    println!("✓ {}", stats.summary());
    Ok((inputs, stats))
}

fn run_check(config: &CheckConfig) -> Result<()> {
    let (inputs, stats) = annotate(config)?;

    println!("\n💾 Writing results...");
    write_outputs(config, &inputs, &stats)?;

    println!("✓ {}", config.output_path.display());
    if let Some(html) = &config.html_path {
        println!("✓ {}", html.display());
    }
    if let Some(summary) = &config.summary_path {
        println!("✓ {}", summary.display());
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_view(config: &CheckConfig) -> Result<()> {
    let (inputs, _) = annotate(config)?;

    let mut app = ui::App::new(inputs.records, inputs.identities, config.labels.clone());
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_view(_config: &CheckConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: presence-check check --html report.html");
    std::process::exit(1);
}
