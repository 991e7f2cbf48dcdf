use crate::error::{AnalysisError, AnalysisResult};
use lirp_structs::core::{InstanceFile, SiteRecord};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<&SiteRecord> for Point {
    fn from(site: &SiteRecord) -> Self {
        Point::new(site.coordinates.0, site.coordinates.1)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CitySource {
    pub coordinates: Point,
    pub size: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProblemInstance {
    pub name: String,
    pub grid_size: usize,
    pub depots: Vec<Point>,
    pub cities: Vec<CitySource>,
    pub clients: Vec<Point>,
}

impl ProblemInstance {
    pub fn new(
        name: impl Into<String>,
        grid_size: usize,
        depots: Vec<Point>,
        cities: Vec<CitySource>,
        clients: Vec<Point>,
    ) -> AnalysisResult<Self> {
        let instance = Self {
            name: name.into(),
            grid_size,
            depots,
            cities,
            clients,
        };
        instance.validate()?;
        Ok(instance)
    }

    /// Builds an instance from the generator's JSON layout, using the first depot layer.
    pub fn from_file(name: impl Into<String>, file: &InstanceFile) -> AnalysisResult<Self> {
        let name = name.into();
        let layer = file
            .first_depot_layer()
            .ok_or_else(|| AnalysisError::invalid_input(&name, "instance has no depot layer"))?;
        let map_size = layer.map_size().copied().ok_or_else(|| {
            AnalysisError::invalid_input(&name, "first depot layer has no map size")
        })?;
        if !(map_size >= 1.0) || map_size.fract() != 0.0 || !map_size.is_finite() {
            return Err(AnalysisError::invalid_input(
                &name,
                format!("map size must be a positive integer, got {}", map_size),
            ));
        }

        let cities_record = &file.clients.cities;
        if cities_record.sites.len() != cities_record.sizes.len() {
            return Err(AnalysisError::invalid_input(
                &name,
                format!(
                    "{} city sites but {} city sizes",
                    cities_record.sites.len(),
                    cities_record.sizes.len()
                ),
            ));
        }
        let cities = cities_record
            .sites
            .iter()
            .zip(cities_record.sizes.iter())
            .map(|(site, &size)| CitySource {
                coordinates: site.into(),
                size,
            })
            .collect();

        Self::new(
            name,
            map_size as usize,
            layer.sites.iter().map(Point::from).collect(),
            cities,
            file.clients.sites.iter().map(Point::from).collect(),
        )
    }

    pub fn total_city_weight(&self) -> f64 {
        self.cities.iter().map(|c| c.size).sum()
    }

    fn validate(&self) -> AnalysisResult<()> {
        if self.grid_size == 0 {
            return Err(AnalysisError::invalid_input(
                &self.name,
                "grid size must be positive",
            ));
        }
        for (idx, city) in self.cities.iter().enumerate() {
            if !(city.size >= 0.0) || !city.size.is_finite() {
                return Err(AnalysisError::invalid_input(
                    &self.name,
                    format!("city {} has invalid size {}", idx, city.size),
                ));
            }
            if !city.coordinates.x.is_finite() || !city.coordinates.y.is_finite() {
                return Err(AnalysisError::invalid_input(
                    &self.name,
                    format!("city {} has non-finite coordinates", idx),
                ));
            }
        }
        if !self.total_city_weight().is_finite() {
            return Err(AnalysisError::invalid_input(
                &self.name,
                "total city size overflows",
            ));
        }
        Ok(())
    }
}
