/// flood_triage: rain and river flood classification with rescue-skill advisories.
///
/// # Module structure
///
/// ```text
/// flood_triage
/// ├── model       — shared data types (Observation, Location, SkillLevel, FloodError, …)
/// ├── config      — service configuration loader (flood.toml)
/// ├── logging     — `log` backend (console + optional file)
/// ├── projection  — geographic → planar projection (UTM, identity)
/// ├── river       — river polyline model: distance and along-river position
/// ├── rules       — rain-to-skill rule table
/// ├── ingest
/// │   ├── observations — hourly weather export (CSV)
/// │   ├── overpass     — river geometry (Overpass API JSON)
/// │   └── fixtures (test only) — representative input files
/// ├── analysis
/// │   ├── window     — rolling 24h rainfall per location
/// │   ├── groupings  — series ordering and hourly grouping
/// │   └── classifier — two-pass flood classification
/// └── report      — text and JSON rendering
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod projection;
pub mod report;
pub mod river;
pub mod rules;
