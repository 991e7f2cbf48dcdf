//! Serde models of the files written by the LIRP instance generator and solver.
//!
//! Field names follow the on-disk JSON keys, several of which contain spaces.

use crate::serializable_record;
use serde::{Deserialize, Serialize};

// Instance file
serializable_record! {
    InstanceFile {
        #[serde(rename = "depots layers")]
        depots_layers: Vec<DepotLayerRecord>,
        clients: ClientsRecord,
    }
}
serializable_record! {
    DepotLayerRecord {
        sites: Vec<SiteRecord>,
        #[serde(rename = "map size")]
        map_size: Option<f64>,
    }
}
serializable_record! {
    ClientsRecord {
        cities: CitiesRecord,
        sites: Vec<SiteRecord>,
    }
}
serializable_record! {
    CitiesRecord {
        sites: Vec<SiteRecord>,
        sizes: Vec<f64>,
    }
}
serializable_record! {
    SiteRecord {
        coordinates: (f64, f64),
    }
}

impl InstanceFile {
    pub fn first_depot_layer(&self) -> Option<&DepotLayerRecord> {
        self.depots_layers.first()
    }
}

// Solver result file
serializable_record! {
    SolverResultFile {
        #[serde(rename = "objective value")]
        objective_value: ObjectiveValueRecord,
        #[serde(rename = "LB")]
        lower_bound: f64,
        #[serde(rename = "resolution time")]
        resolution_time: f64,
    }
}
serializable_record! {
    ObjectiveValueRecord {
        total: f64,
    }
}
