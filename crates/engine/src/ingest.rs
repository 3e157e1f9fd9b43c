//! Streaming ingestion: reduce a CSV of campaign events into per-campaign
//! running totals in a single forward pass.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use adreport_core::error::{AggregatorError, AggregatorResult};
use adreport_core::types::CampaignTotals;
use tracing::debug;

/// Column positions resolved from the header row. Columns are addressed by
/// name, so their order in the input does not matter; extra columns (e.g.
/// `date`) are ignored.
struct ColumnLayout {
    campaign_id: usize,
    impressions: usize,
    clicks: usize,
    spend: usize,
    conversions: usize,
}

impl ColumnLayout {
    fn from_header(header: &str) -> AggregatorResult<Self> {
        let names = split_fields(header);
        let find = |name: &str| {
            names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| AggregatorError::Source(format!("missing required column '{name}'")))
        };
        Ok(Self {
            campaign_id: find("campaign_id")?,
            impressions: find("impressions")?,
            clicks: find("clicks")?,
            spend: find("spend")?,
            conversions: find("conversions")?,
        })
    }
}

/// Result of one aggregation pass: totals keyed by `campaign_id`, with
/// first-seen order retained. First-seen order is the documented tie-break
/// for equal metric values in the rankings.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    totals: HashMap<String, CampaignTotals>,
    order: Vec<String>,
}

impl Aggregation {
    /// Open `path` and aggregate it. An unreadable file surfaces as a
    /// `Source` error before any row is consumed.
    pub fn from_csv_path(path: impl AsRef<Path>) -> AggregatorResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| AggregatorError::Source(format!("cannot open {}: {e}", path.display())))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Aggregate every record of `reader`, grouping by `campaign_id`.
    ///
    /// The first line must be a header naming at least `campaign_id`,
    /// `impressions`, `clicks`, `spend` and `conversions`. Any unparsable
    /// numeric field aborts the pass with a `Parse` error carrying the
    /// offending 1-based line number; no partial result is returned.
    pub fn from_reader(reader: impl BufRead) -> AggregatorResult<Self> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(AggregatorError::Source(
                    "input is empty, a header row is required".to_string(),
                ))
            }
        };
        let layout = ColumnLayout::from_header(header.trim_end_matches('\r'))?;

        let mut agg = Aggregation::default();
        for (idx, line) in lines.enumerate() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            let line_no = idx + 2; // 1-based, line 1 is the header
            if line.is_empty() {
                continue;
            }
            let fields = split_fields(line);
            agg.consume(&layout, &fields, line_no)?;
        }

        debug!(campaigns = agg.len(), "aggregation pass complete");
        Ok(agg)
    }

    fn consume(
        &mut self,
        layout: &ColumnLayout,
        fields: &[String],
        line: usize,
    ) -> AggregatorResult<()> {
        let campaign_id = field(fields, layout.campaign_id, "campaign_id", line)?;
        let impressions = parse_u64(fields, layout.impressions, "impressions", line)?;
        let clicks = parse_u64(fields, layout.clicks, "clicks", line)?;
        let spend = parse_f64(fields, layout.spend, "spend", line)?;
        let conversions = parse_u64(fields, layout.conversions, "conversions", line)?;

        let totals = match self.totals.entry(campaign_id.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                self.order.push(campaign_id.to_string());
                e.insert(CampaignTotals::default())
            }
        };
        totals.impressions += impressions;
        totals.clicks += clicks;
        totals.spend += spend;
        totals.conversions += conversions;
        Ok(())
    }

    /// The full id-to-totals mapping.
    pub fn totals(&self) -> &HashMap<String, CampaignTotals> {
        &self.totals
    }

    /// Totals for a single campaign, if it appeared in the input.
    pub fn campaign(&self, campaign_id: &str) -> Option<&CampaignTotals> {
        self.totals.get(campaign_id)
    }

    /// Number of distinct campaigns seen.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Campaigns in first-seen order.
    pub fn campaigns(&self) -> impl Iterator<Item = (&str, &CampaignTotals)> {
        self.order.iter().map(|id| (id.as_str(), &self.totals[id]))
    }
}

fn field<'a>(
    fields: &'a [String],
    index: usize,
    name: &str,
    line: usize,
) -> AggregatorResult<&'a str> {
    fields
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| AggregatorError::Parse {
            line,
            message: format!("row too short, no value for column '{name}'"),
        })
}

fn parse_u64(fields: &[String], index: usize, name: &str, line: usize) -> AggregatorResult<u64> {
    let raw = field(fields, index, name, line)?;
    raw.trim()
        .parse::<u64>()
        .map_err(|_| AggregatorError::Parse {
            line,
            message: format!("invalid integer '{raw}' in column '{name}'"),
        })
}

fn parse_f64(fields: &[String], index: usize, name: &str, line: usize) -> AggregatorResult<f64> {
    let raw = field(fields, index, name, line)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| AggregatorError::Parse {
            line,
            message: format!("invalid number '{raw}' in column '{name}'"),
        })
}

/// Split one CSV record into fields. Double-quoted fields may contain
/// commas; a doubled quote inside a quoted field is an escaped quote.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
