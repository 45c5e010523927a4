//! Human-Readable Output
//!
//! Terminal output with one block per instance:
//! - Rounded result with its relative uncertainty
//! - Iteration and outlier counts for the real pass
//! - The subtracted dry-run baseline, if one was measured
//! - A marker when the iteration cap stopped the pass early

use crate::report::{InstanceReport, Report};

/// Format a report for terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Steadybench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    for result in &report.results {
        format_instance(&mut output, result);
        output.push('\n');
    }

    let summary = &report.summary;
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "{} instance(s), {} converged, {} iterations in {:.0} ms\n",
        summary.instances, summary.converged, summary.total_iterations, summary.total_duration_ms
    ));

    output
}

fn format_instance(output: &mut String, result: &InstanceReport) {
    let status_icon = match (&result.result, result.converged()) {
        (None, _) => "⊘",
        (Some(_), true) => "✓",
        (Some(_), false) => "!",
    };
    let Some(measurement) = &result.result else {
        output.push_str(&format!("  {} {}: not measured\n", status_icon, result.name));
        return;
    };

    match &result.real {
        Some(real) => output.push_str(&format!(
            "  {} {}: {} s ({} good of {} samples, {} outliers rejected)\n",
            status_icon, result.name, measurement, real.n_good, real.iterations, real.rejected
        )),
        None => output.push_str(&format!("  {} {}: {} s\n", status_icon, result.name, measurement)),
    }

    if let Some(rel) = measurement.relative_uncertainty() {
        output.push_str(&format!("      relative uncertainty: {:.1}%\n", rel * 100.0));
    }
    if !result.converged() {
        output.push_str("      precision not reached: stopped at max_iterations\n");
    }

    if let Some(dry) = &result.dry {
        output.push_str(&format!(
            "      baseline: {} s subtracted ({} dry iterations)\n",
            dry.result, dry.iterations
        ));
    }
}

/// Unrounded `name value uncertainty` lines, one per measured instance
pub fn format_raw_output(report: &Report) -> String {
    report
        .results
        .iter()
        .filter_map(|r| {
            r.result.map(|m| {
                let (value, uncertainty) = m.raw();
                format!("{}\t{}\t{}\n", r.name, value, uncertainty)
            })
        })
        .collect()
}
