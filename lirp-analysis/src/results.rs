use crate::error::{AnalysisError, AnalysisResult};
use lirp_structs::core::SolverResultFile;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SolverVariant {
    /// The solver run on the full model. Its lower bound is the shared reference.
    Baseline,
    SplitHeuristic,
    SplitWithLocalMove,
}

impl SolverVariant {
    pub const ALL: [SolverVariant; 3] = [
        SolverVariant::Baseline,
        SolverVariant::SplitHeuristic,
        SolverVariant::SplitWithLocalMove,
    ];

    pub fn short_name(&self) -> &'static str {
        match self {
            SolverVariant::Baseline => "Solver",
            SolverVariant::SplitHeuristic => "Split",
            SolverVariant::SplitWithLocalMove => "Split+LM",
        }
    }
}

impl fmt::Display for SolverVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    pub objective_total: f64,
    pub lower_bound: f64,
    pub resolution_time: f64,
}

impl From<&SolverResultFile> for SolverResult {
    fn from(file: &SolverResultFile) -> Self {
        Self {
            objective_total: file.objective_value.total,
            lower_bound: file.lower_bound,
            resolution_time: file.resolution_time,
        }
    }
}

/// The three solver results recorded for one instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InstanceResults {
    pub label: String,
    pub baseline: SolverResult,
    pub split: SolverResult,
    pub local_move: SolverResult,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantGaps {
    pub baseline: f64,
    pub split: f64,
    pub local_move: f64,
}

impl VariantGaps {
    pub fn get(&self, variant: SolverVariant) -> f64 {
        match variant {
            SolverVariant::Baseline => self.baseline,
            SolverVariant::SplitHeuristic => self.split,
            SolverVariant::SplitWithLocalMove => self.local_move,
        }
    }

    /// True when either split variant is at least as good as the baseline.
    pub fn improves_on_baseline(&self) -> bool {
        self.split <= self.baseline || self.local_move <= self.baseline
    }
}

impl InstanceResults {
    pub fn result(&self, variant: SolverVariant) -> &SolverResult {
        match variant {
            SolverVariant::Baseline => &self.baseline,
            SolverVariant::SplitHeuristic => &self.split,
            SolverVariant::SplitWithLocalMove => &self.local_move,
        }
    }

    /// Relative gaps of every variant against the baseline's lower bound.
    pub fn gaps(&self) -> AnalysisResult<VariantGaps> {
        let lower_bound = self.baseline.lower_bound;
        if !(lower_bound > 0.0) || !lower_bound.is_finite() {
            return Err(AnalysisError::invalid_input(
                &self.label,
                format!("baseline lower bound must be positive, got {}", lower_bound),
            ));
        }
        for variant in SolverVariant::ALL {
            let result = self.result(variant);
            if !result.objective_total.is_finite() || !result.resolution_time.is_finite() {
                return Err(AnalysisError::invalid_input(
                    &self.label,
                    format!("{} result holds a non-finite value", variant),
                ));
            }
        }
        let gap = |result: &SolverResult| (result.objective_total - lower_bound) / lower_bound;
        Ok(VariantGaps {
            baseline: gap(&self.baseline),
            split: gap(&self.split),
            local_move: gap(&self.local_move),
        })
    }
}
