//! Metric derivation: CTR and CPA per campaign, with explicit
//! zero-denominator policies.

use std::collections::HashMap;

use adreport_core::types::{round4, CampaignMetrics};

use crate::Aggregation;

impl Aggregation {
    /// Derive CTR and CPA for every campaign.
    ///
    /// A campaign with no impressions gets `ctr == 0.0`; a campaign with no
    /// conversions gets `cpa == None`, which excludes it from the CPA
    /// ranking downstream. Values are rounded to 4 decimal places here, at
    /// derivation. Pure with respect to the aggregation: repeated calls
    /// return identical maps.
    pub fn compute_metrics(&self) -> HashMap<String, CampaignMetrics> {
        self.campaigns()
            .map(|(id, totals)| {
                let ctr = if totals.impressions > 0 {
                    round4(totals.clicks as f64 / totals.impressions as f64)
                } else {
                    0.0
                };
                let cpa = (totals.conversions > 0)
                    .then(|| round4(totals.spend / totals.conversions as f64));
                (id.to_string(), CampaignMetrics { ctr, cpa })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> Aggregation {
        let input = "\
campaign_id,date,impressions,clicks,spend,conversions
CMP025,2024-01-01,3653,60,64.29,2
CMP020,2024-01-01,24465,764,1394.62,42
CMP019,2024-01-02,7214,236,135.93,21";
        Aggregation::from_reader(Cursor::new(input)).unwrap()
    }

    #[test]
    fn test_ctr_and_cpa_formulas() {
        let metrics = sample().compute_metrics();
        assert_eq!(metrics.len(), 3);

        let m25 = &metrics["CMP025"];
        assert_eq!(m25.ctr, round4(60.0 / 3653.0));
        assert_eq!(m25.cpa, Some(round4(64.29 / 2.0)));

        let m20 = &metrics["CMP020"];
        assert_eq!(m20.cpa, Some(round4(1394.62 / 42.0)));
        assert_eq!(m20.cpa, Some(33.2052));
    }

    #[test]
    fn test_zero_impressions_means_zero_ctr() {
        let input = "campaign_id,date,impressions,clicks,spend,conversions\n\
                     CMP001,2024-01-01,0,0,10.0,1";
        let agg = Aggregation::from_reader(Cursor::new(input)).unwrap();
        let metrics = agg.compute_metrics();
        assert_eq!(metrics["CMP001"].ctr, 0.0);
    }

    #[test]
    fn test_zero_conversions_means_absent_cpa() {
        let input = "campaign_id,date,impressions,clicks,spend,conversions\n\
                     CMP001,2024-01-01,1000,50,99.99,0";
        let agg = Aggregation::from_reader(Cursor::new(input)).unwrap();
        let metrics = agg.compute_metrics();
        assert_eq!(metrics["CMP001"].cpa, None);
        assert_eq!(metrics["CMP001"].ctr, 0.05);
    }

    #[test]
    fn test_idempotent() {
        let agg = sample();
        let first = agg.compute_metrics();
        let second = agg.compute_metrics();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_aggregation_yields_empty_metrics() {
        let agg = Aggregation::from_reader(Cursor::new(
            "campaign_id,date,impressions,clicks,spend,conversions",
        ))
        .unwrap();
        assert!(agg.compute_metrics().is_empty());
    }
}
