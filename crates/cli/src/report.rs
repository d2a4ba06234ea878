//! Human-readable run summaries.

use contracts::RunResult;

/// How many failed ids are listed before the rest is elided
const MAX_LISTED_FAILURES: usize = 20;

/// Print a load run summary to stdout
pub fn print_summary(result: &RunResult, target: &str) {
    println!("\n┌──────────────────────────────────────────────┐");
    println!("│                 Load Run Summary             │");
    println!("└──────────────────────────────────────────────┘\n");

    println!("  Target:      {target}");
    println!("  Duration:    {:.3}s", result.duration.as_secs_f64());
    println!("  Dispatched:  {}", result.total);
    println!("  Succeeded:   {}", result.succeeded());
    println!(
        "  Failed:      {} ({:.2}%)",
        result.failed.len(),
        result.failure_rate()
    );
    println!("  Throughput:  {:.2} req/s", result.throughput);

    if !result.failed.is_empty() {
        println!("\n  Failed ids:");
        for id in result.failed.iter().take(MAX_LISTED_FAILURES) {
            println!("    - {id}");
        }
        let rest = result.failed.len().saturating_sub(MAX_LISTED_FAILURES);
        if rest > 0 {
            println!("    … and {rest} more");
        }
    }

    println!();
}
