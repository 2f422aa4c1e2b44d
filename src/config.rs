/// Service configuration loader - parses flood.toml
///
/// Separates thresholds, river geometry sources and the rule table path
/// from code, so a new basin can be analysed by editing one file. Command
/// line flags override the numeric settings (see `main.rs`).
///
/// ```toml
/// rain_threshold = 50.0
/// river_margin = 1000.0
/// skill_table = "data/rainToSkillTabel.csv"
///
/// [projection]
/// utm_zone = 32
/// hemisphere = "north"
///
/// [[river]]
/// name = "Saar"
/// geometry = "data/saar.json"
/// ```
///
/// Relative paths are resolved against the directory holding the file.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::classifier::ClassifierConfig;
use crate::model::FloodError;
use crate::projection::{Hemisphere, Utm};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "flood.toml";

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FloodConfig {
    #[serde(default = "default_rain_threshold")]
    pub rain_threshold: f64,

    #[serde(default = "default_river_margin")]
    pub river_margin: f64,

    /// Rain-to-skill table; no advisories are produced without one.
    #[serde(default)]
    pub skill_table: Option<PathBuf>,

    #[serde(default)]
    pub projection: ProjectionConfig,

    /// Rivers in evaluation order.
    #[serde(default, rename = "river")]
    pub rivers: Vec<RiverSource>,
}

/// UTM zone used for both river geometry and observation coordinates.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    pub utm_zone: u8,
    #[serde(default = "default_hemisphere")]
    pub hemisphere: Hemisphere,
}

/// One named river and the Overpass response holding its geometry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiverSource {
    pub name: String,
    pub geometry: PathBuf,
}

fn default_rain_threshold() -> f64 {
    ClassifierConfig::default().rain_threshold
}

fn default_river_margin() -> f64 {
    ClassifierConfig::default().river_margin
}

fn default_hemisphere() -> Hemisphere {
    Hemisphere::North
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        let utm = Utm::default();
        ProjectionConfig {
            utm_zone: utm.zone,
            hemisphere: utm.hemisphere,
        }
    }
}

impl Default for FloodConfig {
    fn default() -> Self {
        FloodConfig {
            rain_threshold: default_rain_threshold(),
            river_margin: default_river_margin(),
            skill_table: None,
            projection: ProjectionConfig::default(),
            rivers: Vec::new(),
        }
    }
}

impl FloodConfig {
    /// Parses configuration text. Paths are returned as written.
    pub fn parse(text: &str) -> Result<Self, FloodError> {
        let config: FloodConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file, resolving relative paths against its
    /// directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FloodError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::parse(&contents)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_paths(base))
    }

    /// Checks settings that parse but cannot drive a run. `main` calls this
    /// again after command line overrides are applied.
    pub fn validate(&self) -> Result<(), FloodError> {
        for (key, value) in [
            ("rain_threshold", self.rain_threshold),
            ("river_margin", self.river_margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FloodError::InvalidConfig(format!(
                    "{} must be a finite, non-negative number, got {}",
                    key, value
                )));
            }
        }
        if !(1..=60).contains(&self.projection.utm_zone) {
            return Err(FloodError::InvalidConfig(format!(
                "UTM zone must be 1-60, got {}",
                self.projection.utm_zone
            )));
        }
        if let Some(dup) = self
            .rivers
            .iter()
            .enumerate()
            .find(|(i, r)| self.rivers[..*i].iter().any(|other| other.name == r.name))
        {
            return Err(FloodError::InvalidConfig(format!(
                "river {:?} is configured twice",
                dup.1.name
            )));
        }
        Ok(())
    }

    fn resolve_paths(mut self, base: &Path) -> Self {
        self.skill_table = self.skill_table.map(|p| base.join(p));
        for river in &mut self.rivers {
            river.geometry = base.join(&river.geometry);
        }
        self
    }

    pub fn classifier(&self) -> ClassifierConfig {
        ClassifierConfig {
            rain_threshold: self.rain_threshold,
            river_margin: self.river_margin,
        }
    }

    pub fn utm(&self) -> Utm {
        Utm::new(self.projection.utm_zone, self.projection.hemisphere)
    }
}
