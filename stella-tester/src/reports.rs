use anyhow::Result;
use colored::Colorize;
use std::time::Duration;

use stella_game::Ending;

use crate::simulation::RunSummary;

pub fn generate_console_report(runs: &[RunSummary], total_duration: Duration) {
    println!();
    println!("{}", "📊 Simulation Results Summary".bright_cyan().bold());
    println!("{}", "=============================".cyan());

    let total_runs = runs.len();
    let passed_runs = runs.iter().filter(|r| r.passed()).count();
    let failed_runs = total_runs - passed_runs;

    // Overall stats
    println!("Total runs: {total_runs}");
    println!("Passed: {}", passed_runs.to_string().green());
    println!("Failed: {}", failed_runs.to_string().red());
    #[allow(clippy::cast_precision_loss)]
    let success_rate = (passed_runs as f64 / total_runs as f64) * 100.0;
    println!("Success rate: {success_rate:.1}%");
    println!("Total time: {total_duration:?}");
    println!();

    // Individual results
    for run in runs {
        let status = if run.passed() {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        let timed_out = count_endings(run, Ending::TimedOut);
        let collapsed = count_endings(run, Ending::PatienceExhausted);
        let total_actions: u32 = run.days.iter().map(|d| d.actions).sum();

        println!("{} {}", status, run.policy.bold());
        println!("   Days played: {}", run.days.len());
        println!("   Total actions: {total_actions}");
        println!("   Endings: {timed_out} timed out, {collapsed} patience collapses");
        if let Some(best) = run.best_clear() {
            println!("   Best clear: {best:.1}s");
        }

        if !run.violations.is_empty() {
            println!("   Violations:");
            for violation in &run.violations {
                println!("     • {}", violation.red());
            }
        }
        println!();
    }

    // Clear-time summary
    let mut clears: Vec<(&str, f64)> = runs
        .iter()
        .filter_map(|r| r.best_clear().map(|t| (r.policy.as_str(), t)))
        .collect();
    clears.sort_by(|a, b| a.1.total_cmp(&b.1));
    if let (Some(fastest), Some(slowest)) = (clears.first(), clears.last()) {
        println!("{}", "⚡ Clear Times".bright_yellow().bold());
        println!("{}", "=============".yellow());
        println!("Fastest: {} ({:.1}s)", fastest.0.green(), fastest.1);
        println!("Slowest: {} ({:.1}s)", slowest.0.yellow(), slowest.1);
    }
}

pub fn generate_json_report(runs: &[RunSummary]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(runs)?;
    println!("{json_output}");
    Ok(())
}

pub fn generate_markdown_report(runs: &[RunSummary]) {
    println!("# Daily Stella Simulation Results\n");

    let total_runs = runs.len();
    let passed_runs = runs.iter().filter(|r| r.passed()).count();
    let failed_runs = total_runs - passed_runs;

    println!("## Summary\n");
    println!("- **Total runs**: {total_runs}");
    println!("- **Passed**: {passed_runs}");
    println!("- **Failed**: {failed_runs}");
    #[allow(clippy::cast_precision_loss)]
    let success_rate = (passed_runs as f64 / total_runs as f64) * 100.0;
    println!("- **Success rate**: {success_rate:.1}%\n");

    println!("## Detailed Results\n");

    for run in runs {
        let status = if run.passed() { "✅" } else { "❌" };

        let timed_out = count_endings(run, Ending::TimedOut);
        let collapsed = count_endings(run, Ending::PatienceExhausted);
        let total_actions: u32 = run.days.iter().map(|d| d.actions).sum();

        println!("### {} {}\n", status, run.policy);
        println!("- **Days played**: {}", run.days.len());
        println!("- **Total actions**: {total_actions}");
        println!("- **Endings**: {timed_out} timed out, {collapsed} patience collapses");
        if let Some(best) = run.best_clear() {
            println!("- **Best clear**: {best:.1}s");
        }

        if !run.violations.is_empty() {
            println!("- **Violations**:");
            for violation in &run.violations {
                println!("  - {violation}");
            }
        }
        println!();
    }
}

fn count_endings(run: &RunSummary, ending: Ending) -> usize {
    run.days
        .iter()
        .filter(|d| d.ending == Some(ending))
        .count()
}
