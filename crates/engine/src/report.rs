//! Ranking and report serialization: top-10 CTR and CPA tables as CSV.

use std::fs;
use std::path::Path;

use adreport_core::error::{AggregatorError, AggregatorResult};
use adreport_core::types::{round4, ReportRow};
use tracing::info;

/// Column order and names are a stability contract for downstream
/// consumers; do not reorder.
const REPORT_HEADER: &str =
    "campaign_id,total_impressions,total_clicks,total_spend,total_conversions,CTR,CPA";

const TOP_N: usize = 10;

impl crate::Aggregation {
    /// Write `top10_ctr.csv` and `top10_cpa.csv` under `dir`, creating the
    /// directory (and parents) if absent. Existing files are overwritten.
    ///
    /// The CTR report ranks every campaign, CTR descending. The CPA report
    /// ranks only campaigns with at least one conversion, CPA ascending.
    /// Both are truncated to 10 rows; ties keep first-seen order (the sorts
    /// are stable and rows are built in first-seen order). An empty
    /// aggregation produces header-only files, not an error.
    pub fn write_reports(&self, dir: impl AsRef<Path>) -> AggregatorResult<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            AggregatorError::Destination(format!("cannot create {}: {e}", dir.display()))
        })?;

        let metrics = self.compute_metrics();
        let rows: Vec<ReportRow> = self
            .campaigns()
            .map(|(id, totals)| {
                let m = &metrics[id];
                ReportRow {
                    campaign_id: id.to_string(),
                    total_impressions: totals.impressions,
                    total_clicks: totals.clicks,
                    total_spend: round4(totals.spend),
                    total_conversions: totals.conversions,
                    ctr: m.ctr,
                    cpa: m.cpa,
                }
            })
            .collect();

        let mut by_ctr = rows.clone();
        by_ctr.sort_by(|a, b| b.ctr.total_cmp(&a.ctr));
        by_ctr.truncate(TOP_N);
        let ctr_path = dir.join("top10_ctr.csv");
        write_report(&ctr_path, &by_ctr)?;
        info!(path = %ctr_path.display(), rows = by_ctr.len(), "CTR report written");

        // Campaigns with no conversions have no CPA and are excluded, not
        // ranked as zero-cost.
        let mut by_cpa: Vec<ReportRow> = rows.into_iter().filter(|r| r.cpa.is_some()).collect();
        by_cpa.sort_by(|a, b| {
            a.cpa
                .unwrap_or(f64::INFINITY)
                .total_cmp(&b.cpa.unwrap_or(f64::INFINITY))
        });
        by_cpa.truncate(TOP_N);
        let cpa_path = dir.join("top10_cpa.csv");
        write_report(&cpa_path, &by_cpa)?;
        info!(path = %cpa_path.display(), rows = by_cpa.len(), "CPA report written");

        Ok(())
    }
}

fn write_report(path: &Path, rows: &[ReportRow]) -> AggregatorResult<()> {
    let mut out = String::from(REPORT_HEADER);
    out.push('\n');
    for row in rows {
        // An absent CPA serializes as an empty cell, never as 0.
        let cpa = row.cpa.map(|v| v.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            escape_field(&row.campaign_id),
            row.total_impressions,
            row.total_clicks,
            row.total_spend,
            row.total_conversions,
            row.ctr,
            cpa,
        ));
    }
    fs::write(path, out)
        .map_err(|e| AggregatorError::Destination(format!("cannot write {}: {e}", path.display())))
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
