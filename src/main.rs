use clap::Parser;
use colored::Colorize;
use prune_directory::pruner::{self, PruneOptions, TracingEvents};
use prune_directory::size::{self, SizeFormat, format_size_with};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prune-directory")]
#[command(about = "Delete the oldest files in a directory until it fits a size budget")]
#[command(version)]
struct Cli {
    /// The directory to prune
    #[arg(env = "PRUNE_DIRECTORY_DIRECTORY")]
    directory: PathBuf,

    /// 100MiB, 512MiB, 1GiB, ...
    #[arg(
        long,
        env = "PRUNE_DIRECTORY_MAX_SIZE",
        default_value = "100MiB",
        value_parser = size::parse_size
    )]
    max_size: u64,

    /// Report sizes in decimal units (kB, MB) instead of binary (KiB, MiB)
    #[arg(long)]
    si: bool,

    /// Separator used in reported sizes
    #[arg(long, default_value_t = '.')]
    decimal_separator: char,

    /// Show what would be deleted without deleting
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let directory = std::path::absolute(&cli.directory).unwrap_or_else(|err| {
        eprintln!(
            "{} Invalid path {}: {}",
            "error:".red().bold(),
            cli.directory.display(),
            err
        );
        std::process::exit(1);
    });

    let format = SizeFormat {
        si: cli.si,
        decimal_separator: cli.decimal_separator,
    };
    let options = PruneOptions {
        dry_run: cli.dry_run,
    };
    let mut events = TracingEvents { format };

    let summary = match pruner::prune(&directory, cli.max_size, &options, &mut events) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    if summary.reports.is_empty() {
        return;
    }

    let label = if cli.dry_run {
        "Dry run:".yellow().bold()
    } else {
        "Done!".green().bold()
    };
    println!(
        "{} Freed {} in {} files, {} remaining",
        label,
        format_size_with(summary.freed(), format).green().bold(),
        summary.reports.len().to_string().green(),
        format_size_with(summary.remaining_total, format)
    );
}
