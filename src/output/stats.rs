//! Text rendering of the crawl summary

use crate::output::CrawlSummary;
use std::fmt::Write;

/// Renders the summary as the text block printed after a crawl
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Link Audit Summary ===\n");
    let _ = writeln!(out, "Total URLs checked: {}", summary.total);
    let _ = writeln!(out, "OK: {}", summary.ok_count);
    let _ = writeln!(out, "Redirected: {}", summary.redirect_count);
    let _ = writeln!(out, "Broken (404): {}", summary.broken_count);
    let _ = writeln!(out, "Errors: {}", summary.error_count);

    if !summary.by_category.is_empty() {
        let _ = writeln!(out, "\nBy Issue Type:");

        // Sort categories by count (descending), ties in category order
        let mut counts: Vec<_> = summary.by_category.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1));

        for (category, count) in counts {
            let percentage = (*count as f64 / summary.total as f64) * 100.0;
            let _ = writeln!(out, "  {}: {} ({:.1}%)", category, count, percentage);
        }
    }

    let _ = writeln!(
        out,
        "\nHealthy: {:.1}% ({} / {} URLs)",
        summary.ok_rate(),
        summary.ok_count,
        summary.total
    );

    out
}

/// Prints the summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", format_summary(summary));
}
