//! Classification of instance labels such as
//! `2l3dc0-25r-1c-30p-GauL_5c736014-4296-4cc1-9685-7290e3709e92`.
//!
//! The generator encodes the experimental design in substrings of the label.
//! All of the substring matching lives in [`InstanceKey::parse`].

use serde::{Deserialize, Serialize};
use std::fmt;

const TEN_RETAILERS: &str = "10r";
const TWENTY_FIVE_RETAILERS: &str = "25r";
const THREE_DEPOTS: &str = "3dc0";
const SEVEN_PERIODS: &str = "7p-";
const FOURTEEN_PERIODS: &str = "14p-";
const LOW_DEMAND: &str = "L_";
const MEDIUM_DEMAND: &str = "M_";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RetailerTier {
    Ten,
    TwentyFive,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DepotTier {
    Three,
    Six,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodCount {
    Seven,
    Fourteen,
    Thirty,
}

impl PeriodCount {
    pub const ALL: [PeriodCount; 3] = [
        PeriodCount::Seven,
        PeriodCount::Fourteen,
        PeriodCount::Thirty,
    ];

    pub fn periods(&self) -> u32 {
        match self {
            PeriodCount::Seven => 7,
            PeriodCount::Fourteen => 14,
            PeriodCount::Thirty => 30,
        }
    }
}

impl fmt::Display for PeriodCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.periods())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DemandTier {
    Low,
    Medium,
    High,
}

impl DemandTier {
    pub const ALL: [DemandTier; 3] = [DemandTier::Low, DemandTier::Medium, DemandTier::High];
}

impl fmt::Display for DemandTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DemandTier::Low => "L",
            DemandTier::Medium => "M",
            DemandTier::High => "H",
        };
        write!(f, "{}", label)
    }
}

/// One summary table per retailer/depot combination of the experimental design.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    Retailers10Depots3,
    Retailers25Depots3,
    Retailers25Depots6,
}

impl TableKind {
    pub const ALL: [TableKind; 3] = [
        TableKind::Retailers10Depots3,
        TableKind::Retailers25Depots3,
        TableKind::Retailers25Depots6,
    ];

    /// Stem used for exported file names.
    pub fn file_stem(&self) -> &'static str {
        match self {
            TableKind::Retailers10Depots3 => "gaps_10r_3dc",
            TableKind::Retailers25Depots3 => "gaps_25r_3dc",
            TableKind::Retailers25Depots6 => "gaps_25r_6dc",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TableKind::Retailers10Depots3 => "10 retailers, 3 depots",
            TableKind::Retailers25Depots3 => "25 retailers, 3 depots",
            TableKind::Retailers25Depots6 => "25 retailers, 6 depots",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    pub retailers: RetailerTier,
    pub depots: DepotTier,
    pub period: PeriodCount,
    pub demand: DemandTier,
}

impl InstanceKey {
    /// Returns `None` for labels carrying neither retailer marker.
    ///
    /// Missing period markers default to 30 periods, missing demand markers
    /// to the high tier and a missing `3dc0` marker to six depots.
    pub fn parse(label: &str) -> Option<Self> {
        let retailers = if label.contains(TEN_RETAILERS) {
            RetailerTier::Ten
        } else if label.contains(TWENTY_FIVE_RETAILERS) {
            RetailerTier::TwentyFive
        } else {
            return None;
        };
        let depots = if label.contains(THREE_DEPOTS) {
            DepotTier::Three
        } else {
            DepotTier::Six
        };
        let period = if label.contains(SEVEN_PERIODS) {
            PeriodCount::Seven
        } else if label.contains(FOURTEEN_PERIODS) {
            PeriodCount::Fourteen
        } else {
            PeriodCount::Thirty
        };
        let demand = if label.contains(LOW_DEMAND) {
            DemandTier::Low
        } else if label.contains(MEDIUM_DEMAND) {
            DemandTier::Medium
        } else {
            DemandTier::High
        };
        Some(Self {
            retailers,
            depots,
            period,
            demand,
        })
    }

    pub fn table(&self) -> TableKind {
        match (self.retailers, self.depots) {
            (RetailerTier::Ten, _) => TableKind::Retailers10Depots3,
            (RetailerTier::TwentyFive, DepotTier::Three) => TableKind::Retailers25Depots3,
            (RetailerTier::TwentyFive, DepotTier::Six) => TableKind::Retailers25Depots6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_small_instance() {
        let key =
            InstanceKey::parse("2l3dc0-25r-1c-30p-GauL_5c736014-4296-4cc1-9685-7290e3709e92")
                .unwrap();
        assert_eq!(key.retailers, RetailerTier::TwentyFive);
        assert_eq!(key.depots, DepotTier::Three);
        assert_eq!(key.period, PeriodCount::Thirty);
        assert_eq!(key.demand, DemandTier::Low);
        assert_eq!(key.table(), TableKind::Retailers25Depots3);
    }

    #[test]
    fn test_parse_six_depots_medium() {
        let key = InstanceKey::parse("2l6dc0-25r-1c-14p-GauM_ab12").unwrap();
        assert_eq!(key.depots, DepotTier::Six);
        assert_eq!(key.period, PeriodCount::Fourteen);
        assert_eq!(key.demand, DemandTier::Medium);
        assert_eq!(key.table(), TableKind::Retailers25Depots6);
    }

    #[test]
    fn test_parse_ten_retailers_high_by_default() {
        let key = InstanceKey::parse("2l3dc0-10r-1c-7p-GauH_ff00").unwrap();
        assert_eq!(key.retailers, RetailerTier::Ten);
        assert_eq!(key.period, PeriodCount::Seven);
        assert_eq!(key.demand, DemandTier::High);
        assert_eq!(key.table(), TableKind::Retailers10Depots3);
    }

    #[test]
    fn test_ten_retailers_ignore_depot_marker_for_routing() {
        let key = InstanceKey::parse("2l6dc0-10r-1c-30p-Gau_0").unwrap();
        assert_eq!(key.depots, DepotTier::Six);
        assert_eq!(key.table(), TableKind::Retailers10Depots3);
    }

    #[test]
    fn test_unmarked_label_is_skipped() {
        assert_eq!(InstanceKey::parse("2l3dc0-50r-1c-30p-GauL_x"), None);
        assert_eq!(InstanceKey::parse("README"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(PeriodCount::Fourteen.to_string(), "14");
        assert_eq!(DemandTier::Medium.to_string(), "M");
        assert_eq!(TableKind::Retailers25Depots6.file_stem(), "gaps_25r_6dc");
    }
}
