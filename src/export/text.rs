//! Human-readable text report writer.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::ExportError;
use crate::eol::EolMethod;
use crate::report::BatteryReport;

/// Render the report as plain text.
pub fn render_report(report: &BatteryReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    let _ = writeln!(out, "Battery Degradation Report");
    let _ = writeln!(out, "==========================");
    if let Some(file) = &summary.file {
        let _ = writeln!(out, "File:                {file}");
    }
    if let Some(cell_id) = &report.metadata.cell_id {
        let _ = writeln!(out, "Cell:                {cell_id}");
    }
    let _ = writeln!(
        out,
        "Nominal capacity:    {:.3} Ah",
        summary.nominal_capacity_in_ah
    );
    let _ = writeln!(out, "Recorded cycles:     {}", summary.num_cycles_recorded);
    let _ = writeln!(out, "Last SOH:            {:.4}", summary.last_soh);
    let _ = writeln!(out);

    let _ = writeln!(out, "End of Life");
    let _ = writeln!(out, "-----------");
    let _ = writeln!(out, "Method:              {}", summary.eol_method);
    match summary.eol {
        Some(eol) => {
            let _ = writeln!(out, "EOL cycle:           {eol}");
        }
        None => {
            let _ = writeln!(out, "EOL cycle:           not reached");
        }
    }
    if summary.eol_method == EolMethod::Regression {
        if let Some(pred) = summary.eol_pred_float {
            let _ = writeln!(out, "Regression estimate: {pred:.2}");
        }
    }
    match summary.rul_cycles_from_last_record {
        Some(rul) => {
            let _ = writeln!(out, "RUL:                 {rul} cycles");
        }
        None => {
            let _ = writeln!(out, "RUL:                 n/a");
        }
    }
    let _ = writeln!(out);

    let health = &report.battery_health;
    let _ = writeln!(out, "Health");
    let _ = writeln!(out, "------");
    match (health.health_score, &health.health_status) {
        (Some(score), Some(status)) => {
            let _ = writeln!(out, "Score:               {score:.1} ({status})");
        }
        _ => {
            let _ = writeln!(out, "Score:               n/a");
        }
    }
    if let Some(retention) = health.capacity_retention {
        let _ = writeln!(out, "Capacity retention:  {retention:.1}%");
    }
    if health.degradation_indicators.is_empty() {
        let _ = writeln!(out, "Indicators:          none");
    } else {
        let labels: Vec<&str> = health
            .degradation_indicators
            .iter()
            .map(|i| i.as_str())
            .collect();
        let _ = writeln!(out, "Indicators:          {}", labels.join(", "));
    }
    let _ = writeln!(out);

    let fade = &report.capacity_fade;
    if let Some(pct) = fade.capacity_fade_percentage {
        let _ = writeln!(out, "Capacity Fade");
        let _ = writeln!(out, "-------------");
        let _ = writeln!(out, "Total fade:          {pct:.2}%");
        if let Some(rate) = fade.capacity_fade_rate_per_cycle {
            let _ = writeln!(out, "Fade rate:           {rate:.4}%/cycle");
        }
        let _ = writeln!(out);
    }

    if let Some(projection) = &report.statistics.cycle_life_projection {
        let _ = writeln!(out, "Cycle-Life Projection");
        let _ = writeln!(out, "---------------------");
        match projection.projected_eol_cycle {
            Some(cycle) => {
                let _ = writeln!(out, "Projected EOL cycle: {cycle}");
            }
            None => {
                let _ = writeln!(out, "Projected EOL cycle: n/a");
            }
        }
        let _ = writeln!(
            out,
            "Confidence (R²):     {:.3}",
            projection.confidence
        );
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Recent SOH");
    let _ = writeln!(out, "----------");
    let start = summary.soh_series.len().saturating_sub(10);
    for (offset, soh) in summary.soh_series[start..].iter().enumerate() {
        let _ = writeln!(out, "  cycle {:>5}: {soh:.4}", start + offset + 1);
    }

    out
}

/// Write the text report to a file.
pub fn write_report(report: &BatteryReport, path: &Path) -> Result<(), ExportError> {
    fs::write(path, render_report(report))?;
    Ok(())
}
