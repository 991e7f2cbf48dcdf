use crate::instance_key::{DemandTier, PeriodCount, TableKind};
use crate::results::SolverVariant;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    pub period: PeriodCount,
    pub demand: DemandTier,
    pub variant: SolverVariant,
}

/// One variant's gap in one instance, with the baseline gap it is compared to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapObservation {
    pub gap: f64,
    pub baseline_gap: f64,
    pub resolution_time: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct GapAccumulator {
    /// Sum of the non-optimal gaps.
    pub gap_sum: f64,
    pub max_gap: f64,
    pub count_optimal: u32,
    pub count_better_or_equal: u32,
    pub samples: u32,
    pub non_optimal_samples: u32,
    pub time_sum: f64,
}

impl GapAccumulator {
    pub fn record(self, observation: &GapObservation, optimal_gap_threshold: f64) -> Self {
        let mut next = self;
        next.samples += 1;
        next.time_sum += observation.resolution_time;
        if observation.gap < optimal_gap_threshold {
            next.count_optimal += 1;
        } else {
            next.gap_sum += observation.gap;
            next.max_gap = next.max_gap.max(observation.gap);
            next.non_optimal_samples += 1;
        }
        // the baseline compares against itself and always counts
        if observation.gap <= observation.baseline_gap {
            next.count_better_or_equal += 1;
        }
        next
    }

    pub fn finalize(&self, legacy_divisor: u32) -> FinalizedBucket {
        FinalizedBucket {
            count_optimal: self.count_optimal,
            avg_gap: self.gap_sum / legacy_divisor as f64,
            avg_gap_observed: if self.non_optimal_samples > 0 {
                self.gap_sum / self.non_optimal_samples as f64
            } else {
                0.0
            },
            max_gap: self.max_gap,
            count_better_or_equal: self.count_better_or_equal,
            avg_time: if self.samples > 0 {
                self.time_sum / self.samples as f64
            } else {
                0.0
            },
            samples: self.samples,
            divisor_mismatch: self.samples != legacy_divisor,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FinalizedBucket {
    pub count_optimal: u32,
    /// Gap sum over the fixed dataset divisor.
    pub avg_gap: f64,
    /// Gap sum over the number of non-optimal samples actually seen.
    pub avg_gap_observed: f64,
    pub max_gap: f64,
    pub count_better_or_equal: u32,
    pub avg_time: f64,
    pub samples: u32,
    pub divisor_mismatch: bool,
}

/// Fixed-shape table: every (period, demand, variant) bucket exists from the start.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub kind: TableKind,
    buckets: BTreeMap<BucketKey, GapAccumulator>,
}

impl SummaryTable {
    pub fn new(kind: TableKind) -> Self {
        let mut buckets = BTreeMap::new();
        for period in PeriodCount::ALL {
            for demand in DemandTier::ALL {
                for variant in SolverVariant::ALL {
                    buckets.insert(
                        BucketKey {
                            period,
                            demand,
                            variant,
                        },
                        GapAccumulator::default(),
                    );
                }
            }
        }
        Self { kind, buckets }
    }

    pub fn get(&self, key: &BucketKey) -> Option<&GapAccumulator> {
        self.buckets.get(key)
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&BucketKey, &GapAccumulator)> {
        self.buckets.iter()
    }

    pub fn record(
        &mut self,
        key: BucketKey,
        observation: &GapObservation,
        optimal_gap_threshold: f64,
    ) {
        let bucket = self.buckets.entry(key).or_default();
        *bucket = bucket.record(observation, optimal_gap_threshold);
    }

    pub fn finalize(&self, legacy_divisor: u32) -> FinalizedTable {
        FinalizedTable {
            kind: self.kind,
            legacy_divisor,
            buckets: self
                .buckets
                .iter()
                .map(|(key, acc)| (*key, acc.finalize(legacy_divisor)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedTable {
    pub kind: TableKind,
    pub legacy_divisor: u32,
    buckets: BTreeMap<BucketKey, FinalizedBucket>,
}

impl FinalizedTable {
    pub fn get(
        &self,
        period: PeriodCount,
        demand: DemandTier,
        variant: SolverVariant,
    ) -> Option<&FinalizedBucket> {
        self.buckets.get(&BucketKey {
            period,
            demand,
            variant,
        })
    }

    /// Rows ordered by period, then demand tier, then solver variant.
    pub fn rows(&self) -> impl Iterator<Item = (&BucketKey, &FinalizedBucket)> {
        self.buckets.iter()
    }

    pub fn mismatched_buckets(&self) -> impl Iterator<Item = (&BucketKey, &FinalizedBucket)> {
        self.buckets.iter().filter(|(_, b)| b.divisor_mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(gap: f64, baseline_gap: f64) -> GapObservation {
        GapObservation {
            gap,
            baseline_gap,
            resolution_time: 10.0,
        }
    }

    #[test]
    fn test_optimal_gap_counts_but_does_not_accumulate() {
        let acc = GapAccumulator::default().record(&observation(0.00005, 0.00005), 1e-4);
        assert_eq!(acc.count_optimal, 1);
        assert_eq!(acc.gap_sum, 0.0);
        assert_eq!(acc.max_gap, 0.0);
        assert_eq!(acc.non_optimal_samples, 0);
        assert_eq!(acc.count_better_or_equal, 1);
    }

    #[test]
    fn test_non_optimal_gap_accumulates() {
        let acc = GapAccumulator::default()
            .record(&observation(0.02, 0.01), 1e-4)
            .record(&observation(0.05, 0.05), 1e-4)
            .record(&observation(0.01, 0.03), 1e-4);
        assert_eq!(acc.count_optimal, 0);
        assert!((acc.gap_sum - 0.08).abs() < 1e-12);
        assert_eq!(acc.max_gap, 0.05);
        assert_eq!(acc.count_better_or_equal, 2);
        assert_eq!(acc.samples, 3);
        assert_eq!(acc.time_sum, 30.0);
    }

    #[test]
    fn test_record_is_pure() {
        let before = GapAccumulator::default();
        let after = before.record(&observation(0.3, 0.3), 1e-4);
        assert_eq!(before, GapAccumulator::default());
        assert_ne!(before, after);
    }

    #[test]
    fn test_finalize_uses_legacy_divisor() {
        let acc = GapAccumulator::default()
            .record(&observation(0.09, 0.09), 1e-4)
            .record(&observation(0.0, 0.0), 1e-4);
        let bucket = acc.finalize(9);
        assert!((bucket.avg_gap - 0.01).abs() < 1e-12);
        assert!((bucket.avg_gap_observed - 0.09).abs() < 1e-12);
        assert_eq!(bucket.avg_time, 10.0);
        assert!(bucket.divisor_mismatch);
    }

    #[test]
    fn test_empty_bucket_finalizes_to_zero() {
        let bucket = GapAccumulator::default().finalize(9);
        assert_eq!(bucket.avg_gap, 0.0);
        assert_eq!(bucket.avg_gap_observed, 0.0);
        assert_eq!(bucket.avg_time, 0.0);
        assert_eq!(bucket.samples, 0);
    }

    #[test]
    fn test_table_is_fixed_shape() {
        let table = SummaryTable::new(TableKind::Retailers25Depots6);
        assert_eq!(table.buckets().count(), 27);
        let finalized = table.finalize(9);
        assert_eq!(finalized.rows().count(), 27);
        assert_eq!(finalized.mismatched_buckets().count(), 27);
        let first = finalized.rows().next().unwrap().0;
        assert_eq!(first.period, PeriodCount::Seven);
        assert_eq!(first.demand, DemandTier::Low);
        assert_eq!(first.variant, SolverVariant::Baseline);
    }
}
