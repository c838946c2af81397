//! Planner configuration.
//!
//! This module defines everything the planner receives from the outside world:
//! - `CropKind`: the closed set of crops a field can grow.
//! - `CropCosts` / `CropTable`: how much water and fertilizer one application costs per crop.
//! - `FieldSpec` / `Configuration`: the farm to plan for, plus optional crop overrides and
//!   search settings, loadable from a TOML file.
//! - `SearchSettings`: expansion budget and heuristic selection for the search engine.
use crate::heuristics::Heuristic;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on the number of fields a configuration may declare.
pub const MAX_FIELDS: usize = 10;

/// Expansion budget used when a configuration does not set one.
pub const DEFAULT_MAX_EXPANSIONS: usize = 10_000;

const CROP_COUNT: usize = 6;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// The crops a field can be planted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropKind {
    Wheat,
    Corn,
    Soy,
    Potato,
    Carrot,
    Tomato,
}

impl CropKind {
    /// Every crop, in table order.
    pub const ALL: [CropKind; CROP_COUNT] = [
        CropKind::Wheat,
        CropKind::Corn,
        CropKind::Soy,
        CropKind::Potato,
        CropKind::Carrot,
        CropKind::Tomato,
    ];

    /// Lowercase name, as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            CropKind::Wheat => "wheat",
            CropKind::Corn => "corn",
            CropKind::Soy => "soy",
            CropKind::Potato => "potato",
            CropKind::Carrot => "carrot",
            CropKind::Tomato => "tomato",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CropKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CropKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| ConfigError::Validation(format!("Unknown crop '{}'", s)))
    }
}

/// Resources consumed by a single irrigation or fertilization of one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropCosts {
    pub water: u32,
    pub fertilizer: u32,
}

impl CropCosts {
    pub const fn new(water: u32, fertilizer: u32) -> Self {
        CropCosts { water, fertilizer }
    }
}

/// Immutable lookup from crop to per-application costs.
///
/// The table always holds an entry for every `CropKind`, so lookups cannot fail.
/// It is passed explicitly into the transition function and the search; there is no
/// global cost table.
///
/// # Examples
/// ```
/// use farm_planner::config::{CropCosts, CropKind, CropTable};
///
/// let table = CropTable::default().with_override(CropKind::Tomato, CropCosts::new(1, 1));
/// assert_eq!(table.costs(CropKind::Tomato), CropCosts::new(1, 1));
/// assert_eq!(table.costs(CropKind::Corn), CropCosts::new(3, 2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CropTable {
    costs: [CropCosts; CROP_COUNT],
}

impl Default for CropTable {
    fn default() -> Self {
        CropTable {
            costs: [
                CropCosts::new(2, 1), // wheat
                CropCosts::new(3, 2), // corn
                CropCosts::new(2, 2), // soy
                CropCosts::new(3, 3), // potato
                CropCosts::new(2, 2), // carrot
                CropCosts::new(4, 3), // tomato
            ],
        }
    }
}

impl CropTable {
    /// A table where every crop costs the same.
    pub fn uniform(costs: CropCosts) -> Self {
        CropTable {
            costs: [costs; CROP_COUNT],
        }
    }

    /// Returns the costs of one application for `kind`.
    pub fn costs(&self, kind: CropKind) -> CropCosts {
        self.costs[kind.index()]
    }

    /// Returns a copy of the table with the entry for `kind` replaced.
    pub fn with_override(mut self, kind: CropKind, costs: CropCosts) -> Self {
        self.costs[kind.index()] = costs;
        self
    }

    /// Checks that every crop has strictly positive costs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in CropKind::ALL {
            let costs = self.costs(kind);
            if costs.water == 0 || costs.fertilizer == 0 {
                return Err(ConfigError::Validation(format!(
                    "Crop '{}' must have positive water and fertilizer costs, found {}/{}",
                    kind, costs.water, costs.fertilizer
                )));
            }
        }
        Ok(())
    }
}

/// Tunables for the search engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Maximum number of states the search may expand before giving up.
    pub max_expansions: usize,
    /// Estimator used to order the frontier.
    pub heuristic: Heuristic,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            heuristic: Heuristic::default(),
        }
    }
}

/// One field as declared by the caller. Every field starts as a fresh seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub id: u32,
    pub crop: CropKind,
}

impl FieldSpec {
    pub fn new(id: u32, crop: CropKind) -> Self {
        FieldSpec { id, crop }
    }
}

/// A complete planning request.
///
/// Crop overrides are keyed by crop name so that an unknown name surfaces as a
/// validation error naming the offending crop.
///
/// # Examples
/// ```
/// use farm_planner::config::{Configuration, CropKind};
///
/// let config = Configuration::from_toml_str(r#"
///     water = 20
///     fertilizer = 15
///
///     [[fields]]
///     id = 1
///     crop = "wheat"
///
///     [crops.wheat]
///     water = 1
///     fertilizer = 1
/// "#).unwrap();
/// assert_eq!(config.fields.len(), 1);
/// assert_eq!(config.crop_table().unwrap().costs(CropKind::Wheat).water, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub water: u32,
    pub fertilizer: u32,
    pub fields: Vec<FieldSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub crops: BTreeMap<String, CropCosts>,
    #[serde(default)]
    pub search: SearchSettings,
}

impl Configuration {
    /// Creates a configuration with the default crop table and search settings.
    pub fn new(fields: Vec<FieldSpec>, water: u32, fertilizer: u32) -> Self {
        Configuration {
            water,
            fertilizer,
            fields,
            crops: BTreeMap::new(),
            search: SearchSettings::default(),
        }
    }

    /// Overrides the costs of one crop for this run.
    pub fn with_crop_override(mut self, kind: CropKind, costs: CropCosts) -> Self {
        self.crops.insert(kind.name().to_string(), costs);
        self
    }

    pub fn with_search(mut self, search: SearchSettings) -> Self {
        self.search = search;
        self
    }

    /// Reads and validates a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Configuration = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the crop table for this run: defaults with the configured overrides applied.
    pub fn crop_table(&self) -> Result<CropTable, ConfigError> {
        let mut table = CropTable::default();
        for (name, costs) in &self.crops {
            let kind: CropKind = name.parse()?;
            table = table.with_override(kind, *costs);
        }
        table.validate()?;
        Ok(table)
    }

    /// Rejects input the search must never see.
    ///
    /// # Returns
    /// * `Ok(())` if the configuration is plannable.
    /// * `Err(ConfigError::Validation)` if:
    ///     - there are no fields, or more than `MAX_FIELDS`,
    ///     - a field id is 0 or appears twice,
    ///     - a crop override names an unknown crop or has a zero cost,
    ///     - the expansion budget is 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::Validation(
                "At least one field is required".to_string(),
            ));
        }
        if self.fields.len() > MAX_FIELDS {
            return Err(ConfigError::Validation(format!(
                "Too many fields. Expected at most {}, found {}",
                MAX_FIELDS,
                self.fields.len()
            )));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.id == 0 {
                return Err(ConfigError::Validation(
                    "Field ids must be positive".to_string(),
                ));
            }
            if !seen.insert(field.id) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate field id {}",
                    field.id
                )));
            }
        }

        if self.search.max_expansions == 0 {
            return Err(ConfigError::Validation(
                "max_expansions must be positive".to_string(),
            ));
        }

        self.crop_table().map(|_| ())
    }

    /// Generates a reproducible random farm.
    ///
    /// Between 1 and `max_fields` fields are planted with random crops. Pools are drawn
    /// around what the default crop table needs to bring every field to harvest, so some
    /// farms are solvable and some are short on water or fertilizer.
    pub fn random_with_seed(seed: u64, max_fields: usize) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let table = CropTable::default();
        let field_count = rng.gen_range(1..=max_fields.clamp(1, MAX_FIELDS));

        let fields: Vec<FieldSpec> = (1..=field_count as u32)
            .map(|id| FieldSpec::new(id, random_crop(&mut rng)))
            .collect();

        // Three growth stages, one application of each input per stage.
        let (water_needed, fertilizer_needed) = fields.iter().fold((0, 0), |(w, f), field| {
            let costs = table.costs(field.crop);
            (w + 3 * costs.water, f + 3 * costs.fertilizer)
        });

        let water = rng.gen_range(water_needed * 3 / 4..=water_needed + 4);
        let fertilizer = rng.gen_range(fertilizer_needed * 3 / 4..=fertilizer_needed + 4);

        Configuration::new(fields, water, fertilizer)
    }
}

fn random_crop(rng: &mut impl Rng) -> CropKind {
    CropKind::ALL[rng.gen_range(0..CropKind::ALL.len())]
}
