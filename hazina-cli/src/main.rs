use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hazina_core::{savings_plan, CalculatorOutcome, CheckIn};
use hazina_finance::{
    format_money, write_transactions_csv, RuleTable, SpendingInsights, StatementParser,
};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod output;
mod state;

use config::{Config, OutputFormat};
use output::{render_table, StatementReport};

/// Used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str =
    "warn,hazina_core=info,hazina_ingest=info,hazina_finance=info,hazina_cli=info";

#[derive(Parser, Debug)]
#[command(
    name = "hazina",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("HAZINA_BUILD_SHA"), ")"),
    about = "M-Pesa statement spending analysis and savings tracking"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default ~/.hazina/config.toml
    Init,

    /// Summarize spending in statement text files (already extracted from PDF)
    Parse {
        /// Text files to parse; `-` reads stdin
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// TOML rule table to use instead of the configured/built-in one
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Output format (default from config: table)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print the effective category rule table as TOML
    Rules {
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// How long until a savings target is reached
    Calc {
        #[arg(long)]
        target: Decimal,

        #[arg(long, default_value = "0")]
        current: Decimal,

        /// Amount saved per month
        #[arg(long)]
        monthly: Decimal,
    },

    /// Log today's saving and update the check-in streak
    Checkin {
        amount: Decimal,

        #[arg(long, default_value = "")]
        note: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Init => config::init_config()?,

        Command::Parse { files, rules, format } => {
            let cfg = config::load_config()?;
            let format = format.unwrap_or(cfg.default_format);
            check_inputs(&files, format)?;
            let table = load_rules(rules.as_deref(), &cfg)?;
            let parser = Arc::new(StatementParser::new(table)?);
            let reports = parse_all(parser, files, &cfg.currency).await?;
            print_reports(&reports, format, &cfg.currency)?;
        }

        Command::Rules { rules } => {
            let cfg = config::load_config()?;
            let table = load_rules(rules.as_deref(), &cfg)?;
            print!("{}", table.to_toml_string()?);
        }

        Command::Calc {
            target,
            current,
            monthly,
        } => {
            let cfg = config::load_config()?;
            let cur = cfg.currency.as_str();
            match savings_plan(target, current, monthly)? {
                CalculatorOutcome::AlreadyReached => {
                    println!("Target of {} already reached.", format_money(target, cur));
                }
                CalculatorOutcome::Plan(plan) => {
                    println!("Remaining: {}", format_money(plan.remaining, cur));
                    println!("Months:    {:.1}", plan.months);
                    println!("Days:      {:.0}", plan.days.ceil());
                    println!("Weekly:    {}", format_money(plan.weekly, cur));
                    println!("Daily:     {}", format_money(plan.daily, cur));
                }
            }
        }

        Command::Checkin { amount, note } => {
            let cfg = config::load_config()?;
            let today = hazina_core::time::today_in(&cfg.timezone)?;
            let path = state::savings_path()?;

            let mut log = state::read_savings_log(&path)?;
            let outcome = log.record(today, amount, &note)?;
            state::write_savings_log(&path, &log)?;

            let cur = cfg.currency.as_str();
            let saved_today = log.saved_on(today).unwrap_or(amount);
            println!(
                "Saved {} today ({} so far today).",
                format_money(amount, cur),
                format_money(saved_today, cur)
            );
            let streak = &log.streak;
            match outcome {
                CheckIn::Started => println!("Streak started: 1 day."),
                CheckIn::Extended => {
                    println!("Streak: {} days (longest {}).", streak.current, streak.longest)
                }
                CheckIn::AlreadyCheckedIn => {
                    println!("Already checked in today. Streak: {} days.", streak.current)
                }
                CheckIn::Reset => println!("New streak: 1 day (longest {}).", streak.longest),
            }
            println!("Total saved: {}", format_money(log.total_saved(), cur));
        }
    }

    Ok(())
}

/// `--rules` wins over the configured file, which wins over the built-in table
fn load_rules(cli_path: Option<&Path>, cfg: &Config) -> Result<RuleTable> {
    let path = cli_path.map(Path::to_path_buf).or_else(|| cfg.rules_file.clone());
    match path {
        Some(p) => {
            debug!(path = %p.display(), "loading rule table");
            RuleTable::from_path(&p).with_context(|| format!("loading rules from {}", p.display()))
        }
        None => Ok(RuleTable::builtin()?),
    }
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

/// Stdin can only be read once, and CSV has room for one statement
fn check_inputs(files: &[PathBuf], format: OutputFormat) -> Result<()> {
    if files.iter().filter(|p| is_stdin(p)).count() > 1 {
        bail!("`-` (stdin) can only be given once");
    }
    if format == OutputFormat::Csv && files.len() > 1 {
        bail!("CSV output takes one statement at a time");
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    let bytes = if is_stdin(path) {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf).context("reading stdin")?;
        buf
    } else {
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))?
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// One blocking parse per file; reports come back in argument order
async fn parse_all(
    parser: Arc<StatementParser>,
    files: Vec<PathBuf>,
    currency: &str,
) -> Result<Vec<StatementReport>> {
    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let parser = Arc::clone(&parser);
            let currency = currency.to_string();
            tokio::task::spawn_blocking(move || -> Result<StatementReport> {
                let text = read_input(&path)?;
                let summary = parser.parse(&text);
                let insights = SpendingInsights::from_summary(&summary, &currency);
                Ok(StatementReport {
                    source: path.display().to_string(),
                    summary,
                    insights,
                })
            })
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.await.context("parse task panicked")??);
    }
    Ok(reports)
}

fn print_reports(reports: &[StatementReport], format: OutputFormat, currency: &str) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for (i, r) in reports.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", render_table(r, currency));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(reports)?);
        }
        OutputFormat::Csv => {
            let stdout = std::io::stdout();
            for r in reports {
                write_transactions_csv(&r.summary, stdout.lock())?;
            }
        }
    }
    Ok(())
}
