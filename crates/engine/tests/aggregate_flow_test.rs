//! Integration test for the full aggregate -> metrics -> reports flow,
//! from a CSV file on disk to the two ranked report files.

#[cfg(test)]
mod tests {
    use adreport_core::types::round4;
    use adreport_engine::Aggregation;
    use std::fs;

    const SAMPLE: &str = "\
campaign_id,date,impressions,clicks,spend,conversions
CMP025,2024-01-01,3653,60,64.29,2
CMP020,2024-01-01,24465,764,1394.62,42
CMP019,2024-01-02,7214,236,135.93,21
CMP025,2024-01-02,1347,40,35.71,1
CMP007,2024-01-02,5000,100,75.00,0
";

    #[test]
    fn test_csv_to_reports() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ad_data.csv");
        fs::write(&input, SAMPLE).unwrap();

        let agg = Aggregation::from_csv_path(&input).unwrap();
        assert_eq!(agg.len(), 4);

        // CMP025 appears twice; totals are sums across both rows.
        let c25 = agg.campaign("CMP025").unwrap();
        assert_eq!(c25.impressions, 5000);
        assert_eq!(c25.clicks, 100);
        assert_eq!(c25.conversions, 3);
        assert!((c25.spend - 100.0).abs() < 1e-9);

        let metrics = agg.compute_metrics();
        assert_eq!(metrics["CMP025"].ctr, round4(100.0 / 5000.0));
        assert_eq!(metrics["CMP020"].cpa, Some(round4(1394.62 / 42.0)));
        assert_eq!(metrics["CMP007"].cpa, None);

        let out = dir.path().join("reports");
        agg.write_reports(&out).unwrap();

        let ctr: Vec<String> = fs::read_to_string(out.join("top10_ctr.csv"))
            .unwrap()
            .lines()
            .map(String::from)
            .collect();
        assert_eq!(
            ctr[0],
            "campaign_id,total_impressions,total_clicks,total_spend,total_conversions,CTR,CPA"
        );
        // All four campaigns rank by CTR; CMP019 leads with 236/7214.
        assert_eq!(ctr.len(), 5);
        assert!(ctr[1].starts_with("CMP019,"));

        // CMP007 converted nothing, so it is absent from the CPA ranking.
        let cpa = fs::read_to_string(out.join("top10_cpa.csv")).unwrap();
        assert_eq!(cpa.lines().count(), 4);
        assert!(!cpa.contains("CMP007"));

        // Non-increasing CTR and non-decreasing CPA down the files.
        let ctrs: Vec<f64> = ctr[1..]
            .iter()
            .map(|l| l.split(',').nth(5).unwrap().parse().unwrap())
            .collect();
        assert!(ctrs.windows(2).all(|w| w[0] >= w[1]));
        let cpas: Vec<f64> = cpa
            .lines()
            .skip(1)
            .map(|l| l.split(',').nth(6).unwrap().parse().unwrap())
            .collect();
        assert!(cpas.windows(2).all(|w| w[0] <= w[1]));
    }
}
