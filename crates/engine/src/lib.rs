//! Streaming aggregation engine for ad-campaign event files.
//!
//! One forward pass over a CSV of per-period campaign events produces an
//! [`Aggregation`]: per-campaign running totals keyed by `campaign_id`.
//! From there, CTR and CPA are derived with explicit zero-denominator
//! policies, and two ranked top-10 reports are serialized to disk.
//!
//! Memory is bounded by the number of distinct campaigns, not by input
//! size. An `Aggregation` is immutable once built; process independent
//! files with independent values.

pub mod ingest;
mod metrics;
mod report;

pub use ingest::Aggregation;
