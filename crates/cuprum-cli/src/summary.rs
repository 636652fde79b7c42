//! Console summary of a finished run.

use cuprum_core::{AnalysisReport, PersistOutcome};

/// Prints the headline findings: top strategy, best pricing day, best week,
/// then where the full report landed.
pub fn print_summary(report: &AnalysisReport, outcome: &PersistOutcome) {
    let rule = "=".repeat(60);
    println!("{rule}");
    println!("ANALYSIS SUMMARY");
    println!("{rule}");
    println!(
        "Period: {} to {} ({} trading days)",
        report.period.start, report.period.end, report.period.total_days
    );
    println!("Average price: {:.2}", report.overall_stats.mean);

    if let Some(top) = report.strategies.first() {
        println!();
        println!("Top Pricing Strategy:");
        println!("  {}", top.name);
        println!(
            "  Expected Performance vs Monthly Avg: {:+.2}%",
            top.avg_performance_vs_monthly
        );
        println!("  Success Rate: {:.1}%", top.success_rate);
        println!("  Risk Level: {}", top.risk_level);
    }

    if let Some(best_day) = report.weekday_performance.first() {
        println!();
        println!("Best Day to Price:");
        println!(
            "  {} beats the monthly average {:.1}% of the time",
            best_day.weekday, best_day.beats_monthly_avg_pct
        );
    }

    if let Some(best_week) = report.week_performance.first() {
        println!();
        println!("Best Week to Price:");
        println!(
            "  {}: {:+.2}% vs the monthly average",
            best_week.week, best_week.avg_performance_vs_month
        );
    }

    println!();
    println!("Full results saved to {}", outcome.output_path.display());
    if let Some(backup) = &outcome.backup_path {
        println!("Previous report backed up to {}", backup.display());
    }
}
