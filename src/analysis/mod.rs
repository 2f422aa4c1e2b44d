/// Flood analysis for the flood triage service.
///
/// Submodules:
/// - `window`     — rolling 24h rainfall per location
/// - `groupings`  — series ordering, hourly grouping, window tracking
/// - `classifier` — two-pass rain/river flood classification and skill advisories

pub mod classifier;
pub mod groupings;
pub mod window;
