/// Core data types for the flood triage service.
///
/// This module defines the shared domain model imported by all other modules:
/// weather observations, location identity, rainfall ranges, skill levels,
/// and the crate-wide error type. It performs no I/O.

use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Time constants
// ---------------------------------------------------------------------------

/// Length of one observation step, in seconds.
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Number of hourly readings retained by a rolling rain window.
pub const RAIN_WINDOW_HOURS: usize = 24;

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// A single hourly weather observation for one location.
///
/// Corresponds to one row of the observation export. `rain_1h` is absent
/// when no rain was measured; the rolling window treats that as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub location_name: String,
    pub timestamp: i64, // unix seconds, multiple of 3600
    pub latitude: f64,
    pub longitude: f64,
    pub rain_1h: Option<f64>,
    pub weather_description: String,
}

impl Observation {
    /// The identity key of the series this observation belongs to.
    pub fn location(&self) -> Location {
        Location {
            name: self.location_name.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Hourly rainfall with the "absent means dry" rule applied.
    pub fn rain_or_zero(&self) -> f64 {
        self.rain_1h.unwrap_or(0.0)
    }
}

/// Identity of an observation series.
///
/// Equality is exact on all three fields. Two stations with the same name
/// a metre apart are different locations; two rows with identical
/// coordinates are the same one no matter how they were produced.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.latitude, self.longitude)
    }
}

// ---------------------------------------------------------------------------
// Rainfall ranges
// ---------------------------------------------------------------------------

/// A rainfall-amount interval used by rule matching.
///
/// Either end may be infinite. Inclusive ranges test `start <= v <= stop`,
/// exclusive ones `start < v < stop`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloatRange {
    pub start: f64,
    pub stop: f64,
    pub inclusive: bool,
}

impl FloatRange {
    /// Matches every finite amount.
    pub fn any() -> Self {
        FloatRange { start: f64::NEG_INFINITY, stop: f64::INFINITY, inclusive: false }
    }

    /// Open-ended above `start`, excluding `start` itself.
    pub fn above(start: f64) -> Self {
        FloatRange { start, stop: f64::INFINITY, inclusive: false }
    }

    pub fn closed(start: f64, stop: f64) -> Self {
        FloatRange { start, stop, inclusive: true }
    }

    pub fn exactly(value: f64) -> Self {
        FloatRange::closed(value, value)
    }

    pub fn check(&self, value: f64) -> bool {
        if self.inclusive {
            self.start <= value && value <= self.stop
        } else {
            self.start < value && value < self.stop
        }
    }
}

// ---------------------------------------------------------------------------
// Skill levels
// ---------------------------------------------------------------------------

/// Rescue-personnel training required, in ascending order.
///
/// Derived `Ord` follows declaration order, so combining several matching
/// rules is a plain `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SkillLevel {
    None,
    Basic,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// Parses a rule-table label.
    ///
    /// Case-insensitive; spaces and underscores are interchangeable and the
    /// trailing "skills" word is optional, so "Basic Skills", "BASIC_SKILLS"
    /// and "basic" all resolve to `Basic`.
    pub fn from_label(label: &str) -> Result<Self, FloodError> {
        let normalized = label.trim().to_uppercase().replace(' ', "_");
        let bare = normalized.strip_suffix("_SKILLS").unwrap_or(&normalized);

        match bare {
            "NONE" => Ok(SkillLevel::None),
            "BASIC" => Ok(SkillLevel::Basic),
            "INTERMEDIATE" => Ok(SkillLevel::Intermediate),
            "ADVANCED" => Ok(SkillLevel::Advanced),
            _ => Err(FloodError::UnknownSkillLabel(label.to_string())),
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillLevel::None => write!(f, "None"),
            SkillLevel::Basic => write!(f, "Basic Skills"),
            SkillLevel::Intermediate => write!(f, "Intermediate Skills"),
            SkillLevel::Advanced => write!(f, "Advanced Skills"),
        }
    }
}

/// One row of the rain-to-skill table.
#[derive(Debug, Clone, PartialEq)]
pub struct RainToSkillRule {
    pub rain_range: FloatRange,
    pub weather_description: String, // exact match, no trimming
    pub skill: SkillLevel,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort a classification run.
///
/// Every variant is fatal: skipping a record would break the hourly
/// continuity of its series and every rolling sum computed after it.
#[derive(Error, Debug)]
pub enum FloodError {
    /// A location's series is not a contiguous hourly sequence.
    /// `expected` is `None` when the timestamp is not hour-aligned at all.
    #[error("Continuity error for {location}: expected dt={}, but found dt={found}",
        .expected.map(|e| e.to_string()).unwrap_or_else(|| "<hour-aligned>".to_string()))]
    Continuity {
        location: String,
        expected: Option<i64>,
        found: i64,
    },

    /// A rule names a skill level outside the known enumeration.
    #[error("Unknown skill level label: {0:?}")]
    UnknownSkillLabel(String),

    /// A rule's rainfall expression is not one of `-`, `>x`, `lo-hi`, `x`.
    #[error("Malformed rainfall range: {0:?}")]
    MalformedRange(String),

    /// A required field was empty.
    #[error("Missing value for field '{field}' on line {line}")]
    MissingField { field: &'static str, line: u64 },

    /// A field was present but could not be interpreted.
    #[error("Invalid value {value:?} for field '{field}' on line {line}")]
    InvalidField {
        field: &'static str,
        line: u64,
        value: String,
    },

    /// A required column is absent from a table header.
    #[error("Missing column: {0:?}")]
    MissingColumn(String),

    /// River geometry could not be turned into a usable polyline.
    #[error("River geometry error: {0}")]
    RiverGeometry(String),

    /// Configuration parsed but holds unusable settings.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
