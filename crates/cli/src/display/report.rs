use std::path::Path;

use strz_core::actions::{ActionOutcome, ActionReport, RunSummary};

/// One line per report, paths shown relative to `base`.
pub fn format_report(report: &ActionReport, base: &Path) -> String {
    let relative = |path: &Path| path.strip_prefix(base).unwrap_or(path).display().to_string();

    match &report.result {
        Ok(ActionOutcome::Created(path)) => format!("✅ Created {}", relative(path)),
        Ok(ActionOutcome::Modified(path)) => format!("📝 Updated {}", relative(path)),
        Ok(ActionOutcome::Skipped {
            path: Some(path),
            reason,
        }) => format!("⏭️  Skipped {} ({})", relative(path), reason),
        Ok(ActionOutcome::Skipped { path: None, reason }) => {
            format!("⏭️  Skipped {} ({})", report.description, reason)
        }
        Err(e) => format!("❌ Failed {}: {}", report.description, e),
    }
}

pub fn print_summary(summary: &RunSummary, base: &Path) {
    for report in &summary.reports {
        println!("   {}", format_report(report, base));
    }
    println!(
        "\n{} done, {} skipped, {} failed",
        summary.performed(),
        summary.skipped(),
        summary.failed()
    );
}
