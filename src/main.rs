//! CLI entry point for treecmp

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use treecmp::{
    ConsoleFormat, Destinations, Equality, Error, OutputConfig, WalkerConfig, compare_trees, report,
};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "treecmp")]
#[command(about = "Compare two directory trees: entries only in A, only in B, and differing")]
#[command(
    after_help = "Exit status: 0 if the trees are equivalent, 1 if differences were found,\n\
                  2 on invalid arguments or missing directories, 3 if the report could not be written."
)]
#[command(version)]
struct Args {
    /// First directory (A)
    #[arg(value_name = "DIR_A")]
    dir_a: PathBuf,

    /// Second directory (B)
    #[arg(value_name = "DIR_B")]
    dir_b: PathBuf,

    /// Compare file contents by checksum instead of size (reads every file)
    #[arg(short = 'c', long = "checksum")]
    checksum: bool,

    /// Write the differences as CSV to PATH
    #[arg(short = 'o', long = "csv", value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Exclude entries matching PATTERN (can be used multiple times)
    /// Matched against the relative path and the file name; matching
    /// directories are skipped entirely
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Also list entries that are the same in both trees
    #[arg(short = 's', long = "same")]
    same: bool,

    /// Output the report as JSON
    #[arg(long = "json")]
    json: bool,

    /// Print no report; only the exit status (and CSV, if requested)
    #[arg(short = 'q', long = "quiet", conflicts_with_all = ["json", "same"])]
    quiet: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Number of parallel workers per tree
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// Increase diagnostic output (-v lists skipped entries, -vv adds debug detail)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "treecmp=info,warn",
        _ => "treecmp=debug,info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .init();
}

/// Resolve a user-supplied path against the working directory.
fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

fn run(args: &Args) -> Result<treecmp::ExitStatus, Error> {
    let mode = if args.checksum {
        Equality::Checksum
    } else {
        Equality::Metadata
    };

    let walker_config = WalkerConfig {
        exclude_patterns: args.exclude.clone(),
        checksum: args.checksum,
        parallel_workers: args.jobs,
    };

    let result = compare_trees(
        &absolutize(&args.dir_a),
        &absolutize(&args.dir_b),
        walker_config,
        mode,
    )?;

    let output_config = OutputConfig {
        use_color: !args.json && should_use_color(args.color),
        show_same: args.same,
        format: if args.json {
            ConsoleFormat::Json
        } else {
            ConsoleFormat::Text
        },
        roots: Some((
            args.dir_a.display().to_string(),
            args.dir_b.display().to_string(),
        )),
    };
    let destinations = Destinations {
        console: !args.quiet,
        csv_path: args.csv.as_deref().map(absolutize),
    };

    Ok(report(&result, &destinations, &output_config)?)
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);
    debug!(?args, "parsed arguments");

    match run(&args) {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("treecmp: {}", e);
            e.exit_status().into()
        }
    }
}
