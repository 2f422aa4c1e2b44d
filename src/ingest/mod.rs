/// Readers for the service's input files.
///
/// Submodules:
/// - `observations` — hourly weather export (CSV) → `Observation`s
/// - `overpass`     — Overpass API relation JSON → projected `RiverModel`
/// - `fixtures`     — representative input files (test only)

pub mod fixtures;
pub mod observations;
pub mod overpass;
