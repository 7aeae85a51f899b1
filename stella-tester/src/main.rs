mod policy;
mod reports;
mod simulation;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use policy::PolicyKind;
use reports::{generate_console_report, generate_json_report, generate_markdown_report};
use simulation::{RunSummary, SimulationConfig, run_chain, verify_determinism};
use stella_game::{ActionId, Ending, GameConfig};

#[derive(Debug, Parser)]
#[command(name = "stella-tester", version = "0.3.0")]
#[command(about = "Automated QA testing for Daily Stella - deterministic headless play")]
struct Args {
    /// Dates to play (comma-separated): ISO dates, "today", or start..end ranges
    #[arg(long, default_value = "2025-11-19..2025-11-25")]
    dates: String,

    /// Policies to run (comma-separated): rotate, single, caretaker, random, or "all"
    #[arg(long, default_value = "rotate")]
    policies: String,

    /// Favorite action for the single policy
    #[arg(long, value_parser = parse_action, default_value = "pet")]
    favorite: ActionId,

    /// Seconds of think time before every action
    #[arg(long, default_value_t = 1.5)]
    think_time: f64,

    /// Actions per day before the tester goes quiet and lets the window expire
    #[arg(long, default_value_t = 40)]
    max_actions: u32,

    /// Seed for the random policy
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// JSON game config overriding the embedded defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the replay determinism comparison
    #[arg(long)]
    skip_replay_check: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    announce_banner();

    let dates = expand_dates(&args.dates)?;
    let kinds = expand_policies(&args.policies)?;
    let mut cfg = SimulationConfig::for_dates(dates);
    cfg.think_seconds = args.think_time;
    cfg.max_actions = args.max_actions;
    cfg.favorite = args.favorite;
    cfg.seed = args.seed;
    cfg.game = load_game_config(args.config.as_deref())?;

    let start_time = Instant::now();
    let runs = run_policies(&args, &cfg, &kinds);

    match args.report.as_str() {
        "json" => generate_json_report(&runs)?,
        "markdown" => generate_markdown_report(&runs),
        _ => generate_console_report(&runs, start_time.elapsed()),
    }

    if runs.iter().any(|r| !r.passed()) {
        std::process::exit(1);
    }

    Ok(())
}

fn announce_banner() {
    println!("{}", "🐾 Daily Stella Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn run_policies(args: &Args, cfg: &SimulationConfig, kinds: &[PolicyKind]) -> Vec<RunSummary> {
    println!("{}", "🧠 Running Policy Chains".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let mut runs = Vec::new();
    for kind in kinds.iter().copied() {
        println!("Playing {} days as {}", cfg.dates.len(), kind.label().bold());
        let mut run = run_chain(cfg, kind);
        if !args.skip_replay_check {
            run.violations.extend(verify_determinism(cfg, kind));
        }
        if args.verbose {
            print_days(&run);
        }
        runs.push(run);
    }
    runs
}

fn print_days(run: &RunSummary) {
    for day in &run.days {
        println!(
            "  {} seed {}: {} after {} actions in {:.1}s (streak {})",
            day.date,
            day.seed,
            day.ending.map_or("unfinished", Ending::key),
            day.actions,
            day.elapsed_seconds,
            day.streak
        );
    }
}

fn expand_dates(raw: &str) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some((start, end)) = token.split_once("..") {
            let start = parse_date_token(start)?;
            let end = parse_date_token(end)?;
            if end < start {
                bail!("empty date range '{token}'");
            }
            let mut cursor = start;
            while cursor <= end {
                push_unique(&mut dates, cursor);
                match cursor.succ_opt() {
                    Some(next) => cursor = next,
                    None => break,
                }
            }
        } else {
            push_unique(&mut dates, parse_date_token(token)?);
        }
    }
    if dates.is_empty() {
        bail!("no dates selected");
    }
    Ok(dates)
}

fn parse_date_token(raw: &str) -> Result<NaiveDate> {
    if raw.eq_ignore_ascii_case("today") {
        return Ok(stella_game::today());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date '{raw}'"))
}

fn push_unique(dates: &mut Vec<NaiveDate>, date: NaiveDate) {
    if !dates.contains(&date) {
        dates.push(date);
    }
}

fn expand_policies(raw: &str) -> Result<Vec<PolicyKind>> {
    let mut kinds: Vec<PolicyKind> = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token.eq_ignore_ascii_case("all") {
            for kind in PolicyKind::ALL {
                if !kinds.contains(kind) {
                    kinds.push(*kind);
                }
            }
            continue;
        }
        let kind = PolicyKind::from_str(token, true)
            .map_err(|err| anyhow!("unknown policy '{token}': {err}"))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        bail!("no policies selected");
    }
    Ok(kinds)
}

fn parse_action(raw: &str) -> Result<ActionId, String> {
    raw.parse().map_err(|()| {
        format!("unknown action '{raw}' (one of: feed, play, pet, groom, treat, nap)")
    })
}

fn load_game_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default_config());
    };
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    GameConfig::from_json(&raw).with_context(|| format!("parsing config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_ranges_expand_inclusively() {
        let dates = expand_dates("2025-11-19..2025-11-21,2025-11-25").unwrap();
        let expected: Vec<NaiveDate> = [19, 20, 21, 25]
            .iter()
            .map(|d| NaiveDate::from_ymd_opt(2025, 11, *d).unwrap())
            .collect();
        assert_eq!(dates, expected);
    }

    #[test]
    fn duplicate_dates_collapse() {
        let dates = expand_dates("2025-11-19,2025-11-19..2025-11-20").unwrap();
        assert_eq!(dates.len(), 2);
    }

    #[test]
    fn reversed_ranges_and_garbage_are_rejected() {
        assert!(expand_dates("2025-11-21..2025-11-19").is_err());
        assert!(expand_dates("next tuesday").is_err());
        assert!(expand_dates("").is_err());
    }

    #[test]
    fn all_token_expands_every_policy_once() {
        let kinds = expand_policies("rotate,all").unwrap();
        assert_eq!(kinds.len(), PolicyKind::ALL.len());
        assert_eq!(kinds[0], PolicyKind::Rotate);
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(expand_policies("speedrun").is_err());
        assert!(expand_policies("").is_err());
    }
}
