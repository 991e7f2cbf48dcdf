pub mod aggregation;
pub mod demand_surface;
pub mod error;
pub mod instance;
pub mod instance_key;
pub mod loader;
pub mod results;

pub use aggregation::{AggregationReport, AggregationStats, ResultAggregator};
pub use demand_surface::{DemandGrid, DemandSurfaceSynthesizer};
pub use error::{AnalysisError, AnalysisResult};
pub use instance::{CitySource, Point, ProblemInstance};
pub use instance_key::{DemandTier, InstanceKey, PeriodCount, TableKind};
pub use results::{InstanceResults, SolverResult, SolverVariant};
