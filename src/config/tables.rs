//! Built-in reference tables: age-cohort outcomes and regional capacity.
//!
//! The age table lists, per ten-year cohort, the share of the population,
//! the case-fatality rate, and the share of cases needing hospital care.
//! The region table lists resident population and hospital beds for the
//! Australian states and territories, the national total, and the Diamond
//! Princess cruise ship (tracked separately in case reporting, with no
//! resident population or beds).
use serde::{Deserialize, Serialize};

/// One age cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGroupConfig {
    pub age_group: String,
    /// Share of the population in this cohort.
    pub proportion: f64,
    /// Case-fatality rate with adequate care.
    pub mortality: f64,
    /// Share of cases requiring hospitalization.
    pub hospitalization_rate: f64,
}

/// Population and bed capacity for one reporting region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub name: String,
    pub population: u64,
    pub hospital_beds: u64,
}

const AGE_TABLE: [(&str, f64, f64, f64); 9] = [
    ("0-9", 0.121, 0.00002, 0.001),
    ("10-19", 0.128, 0.00006, 0.003),
    ("20-29", 0.137, 0.0003, 0.012),
    ("30-39", 0.133, 0.0008, 0.032),
    ("40-49", 0.124, 0.0015, 0.049),
    ("50-59", 0.131, 0.006, 0.102),
    ("60-69", 0.116, 0.022, 0.166),
    ("70-79", 0.072, 0.051, 0.243),
    ("80+", 0.038, 0.093, 0.273),
];

const REGION_TABLE: [(&str, u64, u64); 10] = [
    ("New South Wales", 7_317_500, 28_391),
    ("Victoria", 5_640_900, 20_025),
    ("Queensland", 4_599_400, 17_063),
    ("Western Australia", 2_366_900, 8_449),
    ("South Australia", 1_659_800, 6_556),
    ("Tasmania", 511_000, 2_008),
    ("Australian Capital Territory", 366_900, 1_441),
    ("Northern Territory", 231_200, 908),
    ("From Diamond Princess", 0, 0),
    ("Australia", 24_600_000, 91_683),
];

/// Built-in age cohorts, youngest first.
pub fn default_age_groups() -> Vec<AgeGroupConfig> {
    AGE_TABLE
        .iter()
        .map(|&(label, proportion, mortality, hospitalization_rate)| AgeGroupConfig {
            age_group: label.to_string(),
            proportion,
            mortality,
            hospitalization_rate,
        })
        .collect()
}

/// Built-in regions with population and hospital bed counts. Regions without
/// a resident population carry zeros.
pub fn default_regions() -> Vec<RegionConfig> {
    REGION_TABLE
        .iter()
        .map(|&(name, population, hospital_beds)| RegionConfig {
            name: name.to_string(),
            population,
            hospital_beds,
        })
        .collect()
}
