//! u-seating CLI
//!
//! Maintains a relation book (pairwise guest ratings, 1-5) in a JSON file
//! and searches for the best round-table seating.
//!
//! # Commands
//!
//! - `init`: create a relation book for a guest list
//! - `rate`: set the rating of one pair, or prompt for every unrated pair
//! - `fill`: rate every unrated pair with a default
//! - `show`: print guests, ratings, and unrated pairs
//! - `solve`: run the multi-start annealing search

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use u_seating::layout::render_svg;
use u_seating::relations::{RelationBook, DEFAULT_RATING, MAX_RATING, MIN_RATING};
use u_seating::sa::{AnnealConfig, Direction, MultiRunConfig, MultiRunner};
use u_seating::{Result, SeatingError};

/// Round-table seating optimizer
#[derive(Parser)]
#[command(name = "u-seating")]
#[command(version)]
#[command(about = "Seat guests around a table by pairwise familiarity")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a relation book with no ratings
    Init {
        /// Relation book path
        file: PathBuf,
        /// Comma-separated guest names
        #[arg(long, value_delimiter = ',', required = true)]
        guests: Vec<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set the rating (1-5) of a pair of guests
    Rate {
        file: PathBuf,
        #[arg(required_unless_present = "missing")]
        a: Option<String>,
        #[arg(required_unless_present = "missing")]
        b: Option<String>,
        #[arg(required_unless_present = "missing")]
        score: Option<i64>,
        /// Prompt on stdin for every unrated pair, saving after each answer
        #[arg(long, conflicts_with_all = ["a", "b", "score"])]
        missing: bool,
    },
    /// Rate every unrated pair
    Fill {
        file: PathBuf,
        #[arg(long, default_value_t = i64::from(DEFAULT_RATING))]
        score: i64,
    },
    /// Show guests, ratings, and unrated pairs
    Show { file: PathBuf },
    /// Search for the best seating
    Solve(SolveArgs),
}

#[derive(clap::Args)]
struct SolveArgs {
    /// Relation book path
    file: PathBuf,
    /// Optimization direction: max or min
    #[arg(long, default_value = "max")]
    direction: Direction,
    /// Number of independent annealing runs
    #[arg(long, default_value_t = MultiRunConfig::default().trials)]
    trials: usize,
    /// Initial temperature
    #[arg(long, default_value_t = AnnealConfig::default().initial_temperature)]
    t0: f64,
    /// Minimum temperature
    #[arg(long, default_value_t = AnnealConfig::default().min_temperature)]
    tmin: f64,
    /// Geometric cooling factor in (0, 1)
    #[arg(long, default_value_t = AnnealConfig::default().alpha)]
    alpha: f64,
    /// Base random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Run trials on all cores (needs the `parallel` feature)
    #[arg(long)]
    parallel: bool,
    /// Rate unrated pairs with this score instead of failing
    #[arg(long)]
    fill_default: Option<i64>,
    /// Write an SVG drawing of the table
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Init {
            file,
            guests,
            force,
        } => {
            if file.exists() && !force {
                return Err(SeatingError::InvalidConfig(format!(
                    "{} already exists (use --force to overwrite)",
                    file.display()
                )));
            }
            let book = RelationBook::new(guests)?;
            book.save(&file)?;
            println!(
                "created {} with {} guests, {} pairs to rate",
                file.display(),
                book.guests().len(),
                book.missing_pairs().len()
            );
        }
        Commands::Rate {
            file,
            missing: true,
            ..
        } => {
            let mut book = RelationBook::load(&file)?;
            let stdin = io::stdin();
            let rated = rate_missing(&mut book, stdin.lock(), io::stdout(), |book| {
                book.save(&file)
            })?;
            let left = book.missing_pairs().len();
            println!("rated {rated} pairs, {left} still unrated");
        }
        Commands::Rate {
            file,
            a: Some(a),
            b: Some(b),
            score: Some(score),
            ..
        } => {
            let mut book = RelationBook::load(&file)?;
            let previous = book.set(&a, &b, score)?;
            book.save(&file)?;
            match previous {
                Some(old) => println!("{a} - {b}: {old} -> {score}"),
                None => println!("{a} - {b}: {score}"),
            }
        }
        Commands::Rate { .. } => {
            return Err(SeatingError::InvalidConfig(
                "rate needs <A> <B> <SCORE> or --missing".to_string(),
            ));
        }
        Commands::Fill { file, score } => {
            let mut book = RelationBook::load(&file)?;
            let filled = book.fill_missing(score)?;
            book.save(&file)?;
            println!("rated {filled} pairs with {score}");
        }
        Commands::Show { file } => show(&file)?,
        Commands::Solve(args) => solve(args)?,
    }
    Ok(())
}

/// Asks for a rating of each unrated pair in turn.
///
/// Unparseable or out-of-range answers are asked again. Stops early at end
/// of input. `on_rated` runs after every accepted rating.
fn rate_missing<R, W, F>(
    book: &mut RelationBook,
    input: R,
    mut out: W,
    mut on_rated: F,
) -> Result<usize>
where
    R: BufRead,
    W: Write,
    F: FnMut(&RelationBook) -> Result<()>,
{
    let mut lines = input.lines();
    let mut rated = 0;
    for (a, b) in book.missing_pairs() {
        loop {
            write!(out, "rating {MIN_RATING}-{MAX_RATING} for {a} and {b}: ")?;
            out.flush()?;
            let Some(line) = lines.next().transpose()? else {
                writeln!(out)?;
                return Ok(rated);
            };
            match line.trim().parse::<i64>() {
                Ok(score) if (i64::from(MIN_RATING)..=i64::from(MAX_RATING)).contains(&score) => {
                    book.set(&a, &b, score)?;
                    on_rated(book)?;
                    rated += 1;
                    break;
                }
                _ => writeln!(out, "enter a whole number from {MIN_RATING} to {MAX_RATING}")?,
            }
        }
    }
    Ok(rated)
}

fn show(file: &Path) -> Result<()> {
    let book = RelationBook::load(file)?;
    println!("guests ({}): {}", book.guests().len(), book.guests().join(", "));
    for pair in book.pairs() {
        println!("  {} - {}: {}", pair.a, pair.b, pair.score);
    }
    let missing = book.missing_pairs();
    if missing.is_empty() {
        println!("all pairs rated");
    } else {
        println!("unrated pairs ({}):", missing.len());
        for (a, b) in missing {
            println!("  {a} - {b}");
        }
    }
    Ok(())
}

fn solve(args: SolveArgs) -> Result<()> {
    let mut book = RelationBook::load(&args.file)?;
    if let Some(score) = args.fill_default {
        let filled = book.fill_missing(score)?;
        if filled > 0 {
            info!(filled, score, "defaulted unrated pairs");
        }
    }
    let matrix = book.to_matrix()?;

    let anneal = AnnealConfig::default()
        .with_initial_temperature(args.t0)
        .with_min_temperature(args.tmin)
        .with_alpha(args.alpha)
        .with_direction(args.direction);
    let mut multi = MultiRunConfig::default()
        .with_trials(args.trials)
        .with_parallel(args.parallel);
    if let Some(seed) = args.seed {
        multi = multi.with_seed(seed);
    }

    let result = MultiRunner::run(&matrix, &matrix.identity_arrangement(), &anneal, &multi)?;
    let seating = result.seating(&matrix);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&seating)?);
    } else {
        println!("optimal arrangement: {}", seating.guests.join(", "));
        println!("total familiarity: {}", seating.score);
        println!(
            "start score: {} | trials: {} | seed: {}",
            result.start_score,
            result.trials(),
            result.seed
        );
    }

    if let Some(path) = args.svg {
        fs::write(&path, render_svg(&seating, 600))?;
        info!(path = %path.display(), "wrote seating drawing");
    }
    Ok(())
}
