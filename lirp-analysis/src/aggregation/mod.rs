//! Solver-comparison summary tables.
//!
//! Each instance contributes one observation per solver variant to the bucket
//! `(period, demand tier, variant)` of the table selected by its retailer and
//! depot tiers. Gaps are always measured against the baseline's lower bound.

mod accumulator;
pub mod export;
pub use accumulator::*;

use crate::error::AnalysisResult;
use crate::instance_key::{InstanceKey, TableKind};
use crate::results::{InstanceResults, SolverVariant};
use lirp_structs::config::AggregationConfig;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Recorded { table: TableKind, improved: bool },
    /// The label carries neither retailer marker.
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationStats {
    pub instances_processed: usize,
    pub instances_skipped: usize,
    pub instances_rejected: usize,
    /// Instances where a split variant matched or beat the baseline gap.
    pub improved: BTreeMap<TableKind, usize>,
}

impl AggregationStats {
    pub fn improved_in(&self, table: TableKind) -> usize {
        self.improved.get(&table).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct AggregationReport {
    pub tables: Vec<FinalizedTable>,
    pub stats: AggregationStats,
}

impl AggregationReport {
    pub fn table(&self, kind: TableKind) -> Option<&FinalizedTable> {
        self.tables.iter().find(|t| t.kind == kind)
    }
}

pub struct ResultAggregator {
    config: AggregationConfig,
    tables: BTreeMap<TableKind, SummaryTable>,
    stats: AggregationStats,
}

impl ResultAggregator {
    pub fn new(config: AggregationConfig) -> Self {
        Self {
            config,
            tables: TableKind::ALL
                .into_iter()
                .map(|kind| (kind, SummaryTable::new(kind)))
                .collect(),
            stats: AggregationStats::default(),
        }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    pub fn stats(&self) -> &AggregationStats {
        &self.stats
    }

    pub fn table(&self, kind: TableKind) -> &SummaryTable {
        &self.tables[&kind]
    }

    /// Routes one instance into its table. Fails, without touching any table,
    /// when the baseline lower bound is not positive.
    pub fn ingest(&mut self, results: &InstanceResults) -> AnalysisResult<IngestOutcome> {
        let key = match InstanceKey::parse(&results.label) {
            Some(key) => key,
            None => {
                self.skip(&results.label);
                return Ok(IngestOutcome::Skipped);
            }
        };
        let gaps = results.gaps()?;
        let kind = key.table();
        let table = self
            .tables
            .entry(kind)
            .or_insert_with(|| SummaryTable::new(kind));
        for variant in SolverVariant::ALL {
            let observation = GapObservation {
                gap: gaps.get(variant),
                baseline_gap: gaps.baseline,
                resolution_time: results.result(variant).resolution_time,
            };
            table.record(
                BucketKey {
                    period: key.period,
                    demand: key.demand,
                    variant,
                },
                &observation,
                self.config.optimal_gap_threshold,
            );
        }
        self.stats.instances_processed += 1;

        let improved = gaps.improves_on_baseline();
        if improved {
            *self.stats.improved.entry(kind).or_default() += 1;
            info!(
                "Improved gap ({}) on '{}': solver {:.6} ({}s), split {:.6} ({}s), lm {:.6} ({}s)",
                kind,
                results.label,
                gaps.baseline,
                results.baseline.resolution_time,
                gaps.split,
                results.split.resolution_time,
                gaps.local_move,
                results.local_move.resolution_time
            );
        }
        Ok(IngestOutcome::Recorded {
            table: kind,
            improved,
        })
    }

    /// Counts a label that routes to no table.
    pub fn skip(&mut self, label: &str) {
        debug!("Skipping '{}': no retailer marker", label);
        self.stats.instances_skipped += 1;
    }

    /// Records an instance dropped in isolation mode.
    pub fn reject(&mut self, label: &str, reason: &dyn std::fmt::Display) {
        warn!("Rejected instance '{}': {}", label, reason);
        self.stats.instances_rejected += 1;
    }

    pub fn finalize(&self) -> AggregationReport {
        let divisor = self.config.legacy_sample_divisor;
        let tables: Vec<FinalizedTable> = self
            .tables
            .values()
            .map(|table| table.finalize(divisor))
            .collect();
        for table in &tables {
            for (key, bucket) in table.mismatched_buckets() {
                if bucket.samples == 0 {
                    debug!(
                        "{}: bucket ({}p, {}, {}) is empty",
                        table.kind, key.period, key.demand, key.variant
                    );
                    continue;
                }
                warn!(
                    "{}: bucket ({}p, {}, {}) holds {} samples but averages divide by {}",
                    table.kind, key.period, key.demand, key.variant, bucket.samples, divisor
                );
            }
        }
        AggregationReport {
            tables,
            stats: self.stats.clone(),
        }
    }
}
