use crate::serializable_record;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

serializable_record! {
    AnalysisConfig {
        #[serde(default)]
        aggregation: AggregationConfig,
        #[serde(default)]
        solver_files: SolverFilesConfig,
    }
}

serializable_record! {
    AggregationConfig {
        #[serde(default = "default_optimal_gap_threshold")]
        optimal_gap_threshold: f64,
        #[serde(default = "default_legacy_sample_divisor")]
        legacy_sample_divisor: u32,
        #[serde(default)]
        isolate_invalid_records: bool,
    }
}

serializable_record! {
    SolverFilesConfig {
        #[serde(default = "default_baseline_file")]
        baseline: String,
        #[serde(default = "default_split_file")]
        split: String,
        #[serde(default = "default_local_move_file")]
        local_move: String,
    }
}

fn default_optimal_gap_threshold() -> f64 {
    1e-4
}

fn default_legacy_sample_divisor() -> u32 {
    9
}

fn default_baseline_file() -> String {
    "NoSplit_sol.json".to_string()
}

fn default_split_file() -> String {
    "Split[0,100]_sol.json".to_string()
}

fn default_local_move_file() -> String {
    "LM-Split[0,100]_sol.json".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            aggregation: AggregationConfig::default(),
            solver_files: SolverFilesConfig::default(),
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            optimal_gap_threshold: default_optimal_gap_threshold(),
            legacy_sample_divisor: default_legacy_sample_divisor(),
            isolate_invalid_records: false,
        }
    }
}

impl Default for SolverFilesConfig {
    fn default() -> Self {
        Self {
            baseline: default_baseline_file(),
            split: default_split_file(),
            local_move: default_local_move_file(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        let aggregation = &self.aggregation;
        if !(aggregation.optimal_gap_threshold >= 0.0) {
            return Err(anyhow!(
                "optimal_gap_threshold must be a non-negative number, got {}",
                aggregation.optimal_gap_threshold
            ));
        }
        if aggregation.legacy_sample_divisor == 0 {
            return Err(anyhow!("legacy_sample_divisor must be positive"));
        }
        for (variant, file) in [
            ("baseline", &self.solver_files.baseline),
            ("split", &self.solver_files.split),
            ("local_move", &self.solver_files.local_move),
        ] {
            if file.is_empty() {
                return Err(anyhow!("solver_files.{} must not be empty", variant));
            }
        }
        Ok(())
    }
}
