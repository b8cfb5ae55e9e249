use biodash::logging::{self, Verbosity};
use biodash::report::{self, Report};
use biodash::trace::Trace;
use biodash::{source, DashboardConfig, PageState};
use chrono::Local;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "biodash")]
#[command(
    author,
    version,
    about = "Belly Button Biodiversity dashboard: top OTUs, bubble chart and sample metadata"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    source: SourceArgs,

    /// Sample to show first (default: first name in the dataset)
    #[arg(short, long)]
    sample: Option<String>,

    /// Output report file (.html, .json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for auto-generated reports
    #[arg(long, default_value = "biodash-reports")]
    report_dir: PathBuf,

    /// Don't write a report, only print the sample
    #[arg(long)]
    no_report: bool,

    /// Don't prompt to open report
    #[arg(long)]
    no_open: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Only show errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(ClapArgs, Debug, Default)]
struct SourceArgs {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset URL
    #[arg(long, global = true, conflicts_with = "file")]
    url: Option<String>,

    /// Read the dataset from a local JSON file
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Fetch timeout in seconds (default: none)
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start interactive web UI
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Don't open a browser
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let args = Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    let config = match build_config(&args.source) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    // Handle subcommands first
    if let Some(Command::Serve { port, no_open }) = args.command {
        if let Err(e) = biodash::serve::start(port, config, !no_open) {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    let source = match source::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if !args.quiet {
        eprintln!("\x1b[1mBiodash - Belly Button Biodiversity\x1b[0m");
        eprintln!("{}", "─".repeat(70));
        eprintln!("Fetching {}", source.describe());
    }

    let dataset = match runtime.block_on(source.fetch_dataset()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to load dataset: {}", e);
            std::process::exit(1);
        }
    };

    let mut report = Report::build(&config, &dataset, &source.describe());
    if let Some(ref sample) = args.sample {
        if !report.select_initial(sample) {
            warn!(
                sample = %sample,
                showing = report.initial.as_deref().unwrap_or("nothing"),
                "sample not listed in dataset"
            );
        }
    }

    if !args.quiet {
        let s = &report.summary;
        eprintln!(
            "Found {} sample(s), {} with OTU data, {} with metadata, {} distinct OTUs\n",
            s.names, s.with_sample, s.with_metadata, s.distinct_otus
        );
        match report.initial.as_deref().and_then(|s| report.view(s)) {
            Some(view) => print_sample(&view.sample, &view.page, &config),
            None => eprintln!("Dataset lists no samples."),
        }
    }

    if args.no_report && args.output.is_none() {
        return;
    }

    // Determine report path
    let report_path = match args.output {
        Some(ref output) => output.clone(),
        None => {
            std::fs::create_dir_all(&args.report_dir).ok();
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            args.report_dir.join(format!("biodash_{}.html", timestamp))
        }
    };

    if let Err(e) = report::generate(&report_path, &report) {
        eprintln!("Failed to write report: {}", e);
        std::process::exit(1);
    }
    if !args.quiet {
        eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", report_path.display());
    }

    if !args.no_open && !args.quiet {
        eprint!("\nOpen report in browser? [Y/n] ");
        io::stderr().flush().ok();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_ok() {
            let input = input.trim().to_lowercase();
            if input.is_empty() || input == "y" || input == "yes" {
                if let Err(e) = open::that(&report_path) {
                    eprintln!("Failed to open report: {}", e);
                }
            }
        }
    }
}

fn build_config(args: &SourceArgs) -> biodash::Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(ref url) = args.url {
        config.dataset_url = url.clone();
        config.dataset_file = None;
    }
    if let Some(ref file) = args.file {
        config.dataset_file = Some(file.clone());
    }
    if args.timeout.is_some() {
        config.timeout_secs = args.timeout;
    }
    config.validate()?;
    Ok(config)
}

fn print_sample(sample: &str, page: &PageState, config: &DashboardConfig) {
    let targets = &config.targets;
    println!("\x1b[1mSample {}\x1b[0m", sample);

    if let Some(Trace::Bar(bar)) = page.chart(&targets.bar).map(|c| c.trace()) {
        if bar.is_empty() {
            println!("  (no OTU data)");
        }
        // the trace is bottom-up for plotting; print it top-down
        for (rank, i) in (0..bar.len()).rev().enumerate() {
            println!(
                "  {:>2}. {:<10} {:>8}  {}",
                rank + 1,
                bar.y[i],
                bar.x[i],
                truncate(&bar.text[i], 45)
            );
        }
    }
    if let Some(Trace::Bubble(bubble)) = page.chart(&targets.bubble).map(|c| c.trace()) {
        println!("  {} OTUs in bubble chart", bubble.len());
    }

    println!();
    for line in page.panel_text(&targets.metadata) {
        println!("  {}", line);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
