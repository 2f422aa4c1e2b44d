/// Flood classification over a batch of hourly observations.
///
/// # Passes
///
/// 1. **Rain pass**: walk the hourly groups in series order. After each
///    window update, a location whose rolling 24h rain reaches the
///    threshold is rain-flooded, and every river it lies near records the
///    location's along-river position as a candidate anchor (the minimum,
///    i.e. most upstream, wins). The skill table is consulted for every row
///    of the group and the highest level becomes an advisory.
///
/// 2. **River pass**: only once pass 1 has seen the whole batch: every
///    tracked location that is not rain-flooded is river-flooded on each
///    river it lies near whose anchor is at or upstream of it.
///
/// Running pass 2 eagerly inside pass 1 would make the result depend on
/// the order locations are visited in.

use serde::Serialize;
use std::collections::HashSet;

use crate::analysis::groupings::{hourly_groups, sort_observations, HourlyGroup, WindowTracker};
use crate::analysis::window::LocationWindow;
use crate::model::{FloodError, Location, Observation, SkillLevel};
use crate::projection::Projection;
use crate::river::RiverModel;
use crate::rules::SkillRuleTable;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Numeric parameters of a classification run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    /// Rolling 24h rainfall at or above which a location is rain-flooded.
    pub rain_threshold: f64,

    /// A location is near a river when strictly closer than this, in
    /// projected units (metres for UTM).
    pub river_margin: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            rain_threshold: 50.0,
            river_margin: 1000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A location flooded because it lies downstream of a flood on `river`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiverFlood {
    pub location: Location,
    pub river: String,
}

/// Required rescue skill for a location at one observation hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillAdvisory {
    pub location: Location,
    pub skill: SkillLevel,
    pub observed_at: i64,
    pub rain_24h: f64,
}

/// Most upstream rain-flood position found near a river.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiverAnchor {
    pub river: String,
    pub position: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassificationReport {
    /// In order of first detection.
    pub rain_flooded: Vec<Location>,
    /// In order of first sight of the location, then river order.
    pub river_flooded: Vec<RiverFlood>,
    /// In series order.
    pub advisories: Vec<SkillAdvisory>,
    /// One per river that received an anchor, in river order.
    pub anchors: Vec<RiverAnchor>,
    /// Final window of every tracked location, in order of first sight.
    pub windows: Vec<LocationWindow>,
}

impl ClassificationReport {
    pub fn is_rain_flooded(&self, location: &Location) -> bool {
        self.rain_flooded.contains(location)
    }

    /// Rivers on which `location` was classified river-flooded.
    pub fn river_floods_for<'a>(&'a self, location: &'a Location) -> impl Iterator<Item = &'a str> {
        self.river_flooded
            .iter()
            .filter(move |f| &f.location == location)
            .map(|f| f.river.as_str())
    }

    pub fn anchor(&self, river: &str) -> Option<f64> {
        self.anchors.iter().find(|a| a.river == river).map(|a| a.position)
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Owns the per-run state: location windows and one anchor slot per river.
pub struct FloodClassifier<'a, P: Projection> {
    config: ClassifierConfig,
    rivers: &'a [RiverModel],
    rules: &'a SkillRuleTable,
    projection: &'a P,

    tracker: WindowTracker,
    anchors: Vec<Option<f64>>,
    rain_flooded: Vec<Location>,
    rain_flooded_set: HashSet<Location>,
    advisories: Vec<SkillAdvisory>,
}

impl<'a, P: Projection> FloodClassifier<'a, P> {
    pub fn new(
        config: ClassifierConfig,
        rivers: &'a [RiverModel],
        rules: &'a SkillRuleTable,
        projection: &'a P,
    ) -> Self {
        FloodClassifier {
            config,
            rivers,
            rules,
            projection,
            tracker: WindowTracker::new(),
            anchors: vec![None; rivers.len()],
            rain_flooded: Vec::new(),
            rain_flooded_set: HashSet::new(),
            advisories: Vec::new(),
        }
    }

    /// Current anchor of each river, in river order.
    pub fn anchors(&self) -> &[Option<f64>] {
        &self.anchors
    }

    /// Pass 1 step for one hourly group. Groups must arrive in series order.
    pub fn observe(&mut self, group: &HourlyGroup<'_>) -> Result<(), FloodError> {
        let rain_24h = self.tracker.advance(group)?.rain_24h();

        if rain_24h >= self.config.rain_threshold {
            self.mark_rain_flooded(&group.location, rain_24h);
        }

        let skill = group
            .weather_descriptions()
            .map(|weather| self.rules.best_skill(rain_24h, weather))
            .max()
            .unwrap_or(SkillLevel::None);

        if skill > SkillLevel::None {
            self.advisories.push(SkillAdvisory {
                location: group.location.clone(),
                skill,
                observed_at: group.last_timestamp(),
                rain_24h,
            });
        }

        Ok(())
    }

    fn mark_rain_flooded(&mut self, location: &Location, rain_24h: f64) {
        if self.rain_flooded_set.insert(location.clone()) {
            log::info!("Rain flood at {}: {:.1} in 24h", location, rain_24h);
            self.rain_flooded.push(location.clone());
        }

        let point = self.projection.project(location.latitude, location.longitude);
        for (river, anchor) in self.rivers.iter().zip(self.anchors.iter_mut()) {
            let approach = river.closest_approach(&point);
            if approach.distance < self.config.river_margin {
                let current = anchor.unwrap_or(f64::INFINITY);
                if approach.position < current {
                    log::debug!(
                        "{} anchor moved to {:.1} by {}",
                        river.name(),
                        approach.position,
                        location
                    );
                    *anchor = Some(approach.position);
                }
            }
        }
    }

    /// Pass 2: river-flood test over every tracked location.
    pub fn finish(self) -> ClassificationReport {
        let mut river_flooded = Vec::new();

        for window in self.tracker.windows() {
            let location = &window.location;
            if self.rain_flooded_set.contains(location) {
                continue;
            }

            let point = self.projection.project(location.latitude, location.longitude);
            for (river, anchor) in self.rivers.iter().zip(self.anchors.iter()) {
                let Some(anchor) = anchor else { continue };
                let approach = river.closest_approach(&point);
                if approach.distance < self.config.river_margin && approach.position >= *anchor {
                    river_flooded.push(RiverFlood {
                        location: location.clone(),
                        river: river.name().to_string(),
                    });
                }
            }
        }

        let anchors = self
            .rivers
            .iter()
            .zip(self.anchors.iter())
            .filter_map(|(river, anchor)| {
                anchor.map(|position| RiverAnchor {
                    river: river.name().to_string(),
                    position,
                })
            })
            .collect();

        log::info!(
            "Classified {} locations: {} rain-flooded, {} river floods, {} advisories",
            self.tracker.len(),
            self.rain_flooded.len(),
            river_flooded.len(),
            self.advisories.len()
        );

        ClassificationReport {
            rain_flooded: self.rain_flooded,
            river_flooded,
            advisories: self.advisories,
            anchors,
            windows: self.tracker.into_windows(),
        }
    }
}

/// Sorts, groups and classifies a batch of observations in one call.
pub fn classify<P: Projection>(
    mut observations: Vec<Observation>,
    config: ClassifierConfig,
    rivers: &[RiverModel],
    rules: &SkillRuleTable,
    projection: &P,
) -> Result<ClassificationReport, FloodError> {
    sort_observations(&mut observations);

    let mut classifier = FloodClassifier::new(config, rivers, rules, projection);
    for group in hourly_groups(&observations) {
        classifier.observe(&group)?;
    }

    Ok(classifier.finish())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
