use serde::{Deserialize, Serialize};

/// Running totals accumulated for one campaign during ingestion.
///
/// Counter fields are summed as wide integers; spend is summed as a float
/// (consumers compare spend with a tolerance, not bit-exactly).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignTotals {
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub conversions: u64,
}

/// Efficiency metrics derived from a campaign's totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CampaignMetrics {
    /// Click-through rate: clicks / impressions, 0.0 when the campaign had
    /// no impressions.
    pub ctr: f64,
    /// Cost per acquisition: spend / conversions. `None` when the campaign
    /// had no conversions; never collapsed to a zero or sentinel value, so
    /// such campaigns can be excluded from CPA rankings.
    pub cpa: Option<f64>,
}

/// One output row joining a campaign's raw totals with its derived metrics.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub campaign_id: String,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub total_spend: f64,
    pub total_conversions: u64,
    pub ctr: f64,
    pub cpa: Option<f64>,
}

/// Round to four decimal places, half away from zero. Metrics are rounded
/// once at derivation so repeated reads return identical values.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.016_424_8), 0.0164);
        assert_eq!(round4(33.205_238_1), 33.2052);
        assert_eq!(round4(0.000_05), 0.0001);
        assert_eq!(round4(2.0), 2.0);
    }
}
