//! Demand-intensity surface used to visualise where client demand concentrates.
//!
//! Every cell blends a jittered ambient term with a distance-shaped term. Each
//! city pulls demand towards itself through `Φ(5000 / d², 0, size)`, the normal
//! CDF with zero mean and the city size as scale, so larger cities decay more
//! gently with distance. The scale-as-size parameterisation is kept as-is.

use crate::error::{AnalysisError, AnalysisResult};
use crate::instance::{Point, ProblemInstance};
use ndarray::Array2;
use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal};
use std::io::Write;
use tracing::debug;

pub const INFLUENCE_NUMERATOR: f64 = 5000.0;
const AMBIENT_SHARE: f64 = 0.25;
const SHAPE_SHARE: f64 = 0.75;
const JITTER_LOW: f64 = 0.75;
const JITTER_SPAN: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct DemandGrid {
    values: Array2<f64>,
}

impl DemandGrid {
    pub fn grid_size(&self) -> usize {
        self.values.nrows()
    }

    /// Intensity of the cell centred at `(x + 0.5, y + 0.5)`.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[[x, y]]
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// One row per x index.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.values.outer_iter().map(|row| row.to_vec()).collect()
    }

    /// Writes one CSV record per x index, without a header.
    pub fn write_csv<W: Write>(&self, writer: W) -> AnalysisResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        for row in self.values.outer_iter() {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn value_bounds(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

struct CityKernel {
    position: Point,
    size: f64,
    cdf: Normal,
}

pub struct DemandSurfaceSynthesizer {
    grid_size: usize,
    total_city_weight: f64,
    kernels: Vec<CityKernel>,
}

impl DemandSurfaceSynthesizer {
    pub fn new(instance: &ProblemInstance) -> AnalysisResult<Self> {
        let mut kernels = Vec::with_capacity(instance.cities.len());
        for city in &instance.cities {
            // a zero scale has no CDF; such a city adds nothing to any cell
            if city.size == 0.0 {
                continue;
            }
            let cdf = Normal::new(0.0, city.size).map_err(|e| {
                AnalysisError::invalid_input(
                    &instance.name,
                    format!("city size {} is not a valid scale: {}", city.size, e),
                )
            })?;
            kernels.push(CityKernel {
                position: city.coordinates,
                size: city.size,
                cdf,
            });
        }
        Ok(Self {
            grid_size: instance.grid_size,
            total_city_weight: instance.total_city_weight(),
            kernels,
        })
    }

    pub fn total_city_weight(&self) -> f64 {
        self.total_city_weight
    }

    /// Sum of the size-weighted city influences at `center`.
    pub fn intensity_at(&self, center: Point) -> f64 {
        self.kernels
            .iter()
            .map(|kernel| {
                let distance = kernel.position.distance(&center);
                let influence = if distance == 0.0 {
                    1.0
                } else {
                    kernel.cdf.cdf(INFLUENCE_NUMERATOR / (distance * distance))
                };
                kernel.size * influence
            })
            .sum()
    }

    /// Half-open range `[lo, hi)` every synthesized cell falls into.
    pub fn value_range(&self) -> (f64, f64) {
        if self.total_city_weight > 0.0 {
            (
                AMBIENT_SHARE * JITTER_LOW + SHAPE_SHARE * 0.5 * JITTER_LOW,
                AMBIENT_SHARE * (JITTER_LOW + JITTER_SPAN)
                    + SHAPE_SHARE * (JITTER_LOW + JITTER_SPAN),
            )
        } else {
            (0.0, 1.0)
        }
    }

    /// Scans x outer, y inner. Draws two uniforms per cell when cities carry
    /// weight, one otherwise.
    pub fn synthesize<R: Rng>(&self, rng: &mut R) -> DemandGrid {
        let n = self.grid_size;
        let mut values = Array2::<f64>::zeros((n, n));
        for x in 0..n {
            for y in 0..n {
                values[[x, y]] = if self.total_city_weight > 0.0 {
                    let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                    let intensity = self.intensity_at(center);
                    let ambient =
                        AMBIENT_SHARE * (JITTER_LOW + JITTER_SPAN * rng.gen::<f64>());
                    let shape = SHAPE_SHARE * intensity / self.total_city_weight
                        * (JITTER_LOW + JITTER_SPAN * rng.gen::<f64>());
                    ambient + shape
                } else {
                    rng.gen::<f64>()
                };
            }
        }
        debug!(
            "Synthesized {}x{} demand grid from {} cities (total weight {})",
            n,
            n,
            self.kernels.len(),
            self.total_city_weight
        );
        DemandGrid { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::CitySource;
    use rand::{rngs::SmallRng, SeedableRng};

    fn instance(grid_size: usize, cities: Vec<(f64, f64, f64)>) -> ProblemInstance {
        ProblemInstance::new(
            "test",
            grid_size,
            vec![Point::new(0.0, 0.0)],
            cities
                .into_iter()
                .map(|(x, y, size)| CitySource {
                    coordinates: Point::new(x, y),
                    size,
                })
                .collect(),
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_matches_cell_formula() {
        let inst = instance(3, vec![(1.0, 2.0, 4.0), (2.5, 0.5, 9.0)]);
        let synthesizer = DemandSurfaceSynthesizer::new(&inst).unwrap();
        let grid = synthesizer.synthesize(&mut SmallRng::seed_from_u64(11));

        let mut rng = SmallRng::seed_from_u64(11);
        let total = 13.0;
        for x in 0..3 {
            for y in 0..3 {
                let cx = x as f64 + 0.5;
                let cy = y as f64 + 0.5;
                let mut intensity = 0.0;
                for &(px, py, size) in &[(1.0, 2.0, 4.0), (2.5, 0.5, 9.0)] {
                    let d: f64 = ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt();
                    let normal = Normal::new(0.0, size).unwrap();
                    intensity += if d == 0.0 {
                        size
                    } else {
                        size * normal.cdf(5000.0 / (d * d))
                    };
                }
                let r1: f64 = rng.gen();
                let r2: f64 = rng.gen();
                let expected =
                    0.25 * (0.75 + 0.5 * r1) + 0.75 * intensity / total * (0.75 + 0.5 * r2);
                assert!((grid.get(x, y) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_same_seed_same_grid() {
        let inst = instance(8, vec![(3.0, 3.0, 2.0)]);
        let synthesizer = DemandSurfaceSynthesizer::new(&inst).unwrap();
        let a = synthesizer.synthesize(&mut SmallRng::seed_from_u64(5));
        let b = synthesizer.synthesize(&mut SmallRng::seed_from_u64(5));
        let c = synthesizer.synthesize(&mut SmallRng::seed_from_u64(6));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_weighted_cells_within_range() {
        let inst = instance(
            40,
            vec![(10.0, 10.0, 5.0), (30.0, 25.0, 20.0), (0.0, 40.0, 1.0)],
        );
        let synthesizer = DemandSurfaceSynthesizer::new(&inst).unwrap();
        let (lo, hi) = synthesizer.value_range();
        assert_eq!((lo, hi), (0.46875, 1.25));
        for seed in 0..5 {
            let grid = synthesizer.synthesize(&mut SmallRng::seed_from_u64(seed));
            let (min, max) = grid.value_bounds();
            assert!(min >= lo, "min {} below {}", min, lo);
            assert!(max < hi, "max {} not below {}", max, hi);
        }
    }

    #[test]
    fn test_no_cities_is_uniform_unit_interval() {
        let inst = instance(100, vec![]);
        let synthesizer = DemandSurfaceSynthesizer::new(&inst).unwrap();
        assert_eq!(synthesizer.value_range(), (0.0, 1.0));
        for seed in [1u64, 2, 3] {
            let grid = synthesizer.synthesize(&mut SmallRng::seed_from_u64(seed));
            let mut bins = [0usize; 10];
            for &v in grid.values().iter() {
                assert!((0.0..1.0).contains(&v));
                bins[(v * 10.0) as usize] += 1;
            }
            let expected = 10_000.0 / 10.0;
            let chi_square: f64 = bins
                .iter()
                .map(|&observed| (observed as f64 - expected).powi(2) / expected)
                .sum();
            // 9 degrees of freedom, p = 0.0001
            assert!(chi_square < 33.72, "chi-square {} for seed {}", chi_square, seed);
        }
    }

    #[test]
    fn test_zero_size_cities_take_uniform_branch() {
        let inst = instance(4, vec![(1.0, 1.0, 0.0), (2.0, 2.0, 0.0)]);
        let synthesizer = DemandSurfaceSynthesizer::new(&inst).unwrap();
        assert_eq!(synthesizer.total_city_weight(), 0.0);
        let grid = synthesizer.synthesize(&mut SmallRng::seed_from_u64(9));
        let mut rng = SmallRng::seed_from_u64(9);
        for x in 0..4 {
            for y in 0..4 {
                assert_eq!(grid.get(x, y), rng.gen::<f64>());
            }
        }
    }

    #[test]
    fn test_city_on_cell_centre_contributes_full_size() {
        let inst = instance(4, vec![(1.5, 1.5, 3.0)]);
        let synthesizer = DemandSurfaceSynthesizer::new(&inst).unwrap();
        assert_eq!(synthesizer.intensity_at(Point::new(1.5, 1.5)), 3.0);
    }

    #[test]
    fn test_larger_city_flattens_influence() {
        let small = instance(1, vec![(0.0, 0.0, 1.0)]);
        let large = instance(1, vec![(0.0, 0.0, 100.0)]);
        let far = Point::new(60.0, 80.0);
        let small_influence = DemandSurfaceSynthesizer::new(&small)
            .unwrap()
            .intensity_at(far);
        let large_influence = DemandSurfaceSynthesizer::new(&large)
            .unwrap()
            .intensity_at(far)
            / 100.0;
        assert!(small_influence > large_influence);
        assert!(large_influence > 0.5);
    }

    #[test]
    fn test_write_csv() {
        let inst = instance(3, vec![]);
        let grid = DemandSurfaceSynthesizer::new(&inst)
            .unwrap()
            .synthesize(&mut SmallRng::seed_from_u64(4));
        let mut buffer = Vec::new();
        grid.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        let first: Vec<f64> = lines[0].split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(first, grid.rows()[0]);
    }

    #[test]
    fn test_rows_follow_x_index() {
        let inst = instance(2, vec![]);
        let grid = DemandSurfaceSynthesizer::new(&inst)
            .unwrap()
            .synthesize(&mut SmallRng::seed_from_u64(1));
        let rows = grid.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], grid.get(1, 0));
        assert_eq!(grid.grid_size(), 2);
    }
}
