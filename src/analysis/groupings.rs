/// Observation ordering, hourly grouping and per-location window tracking.
///
/// `sort_observations` puts a flat record list into series order, and
/// `hourly_groups` cuts it into runs that share a location and an hour.
/// Several rows for the same hour (one per reported weather condition) land
/// in one group; they share the hour's rainfall and each contributes its
/// weather description to the skill lookup.
///
/// `WindowTracker` then feeds the groups into per-location rolling windows,
/// enforcing that every location advances by exactly one hour per group.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::analysis::window::LocationWindow;
use crate::model::{FloodError, Location, Observation, SECONDS_PER_HOUR};

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Series order: location (name, latitude, longitude), then timestamp, then
/// weather description.
///
/// Rain amount is not part of the key: rows for the same hour stay
/// adjacent whatever their rainfall, and a conflicting duplicate fails
/// in `WindowTracker::advance`.
fn series_order(a: &Observation, b: &Observation) -> Ordering {
    a.location_name
        .cmp(&b.location_name)
        .then_with(|| a.latitude.total_cmp(&b.latitude))
        .then_with(|| a.longitude.total_cmp(&b.longitude))
        .then_with(|| a.timestamp.cmp(&b.timestamp))
        .then_with(|| a.weather_description.cmp(&b.weather_description))
}

/// Stable sort into series order.
pub fn sort_observations(observations: &mut [Observation]) {
    observations.sort_by(series_order);
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// A maximal run of sorted observations sharing location and timestamp.
#[derive(Debug, Clone)]
pub struct HourlyGroup<'a> {
    pub location: Location,
    pub timestamp: i64,
    pub observations: &'a [Observation],
}

impl HourlyGroup<'_> {
    /// Rainfall for the hour, taken from the first row of the run.
    pub fn rain_1h(&self) -> f64 {
        self.observations.first().map(Observation::rain_or_zero).unwrap_or(0.0)
    }

    /// Timestamp of the last row of the run.
    pub fn last_timestamp(&self) -> i64 {
        self.observations.last().map(|o| o.timestamp).unwrap_or(self.timestamp)
    }

    pub fn weather_descriptions(&self) -> impl Iterator<Item = &str> {
        self.observations.iter().map(|o| o.weather_description.as_str())
    }

    /// Rows for one hour must agree on rainfall; otherwise the hour has
    /// been reported twice with different data.
    fn check_consistent_rain(&self) -> Result<(), FloodError> {
        let rain = self.rain_1h();
        match self.observations.iter().find(|o| o.rain_or_zero() != rain) {
            Some(dup) => Err(FloodError::Continuity {
                location: self.location.to_string(),
                expected: Some(self.timestamp + SECONDS_PER_HOUR),
                found: dup.timestamp,
            }),
            None => Ok(()),
        }
    }
}

fn same_hour(a: &Observation, b: &Observation) -> bool {
    a.timestamp == b.timestamp
        && a.location_name == b.location_name
        && a.latitude.to_bits() == b.latitude.to_bits()
        && a.longitude.to_bits() == b.longitude.to_bits()
}

/// Splits series-ordered observations into hourly groups.
///
/// The input must already be sorted with `sort_observations`; unsorted
/// input is not detected here but surfaces as a continuity error once the
/// groups reach a `WindowTracker`.
pub fn hourly_groups(sorted: &[Observation]) -> Vec<HourlyGroup<'_>> {
    sorted
        .chunk_by(same_hour)
        .map(|run| HourlyGroup {
            location: run[0].location(),
            timestamp: run[0].timestamp,
            observations: run,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Window tracking
// ---------------------------------------------------------------------------

/// Per-location rolling windows, in order of first sight.
#[derive(Debug, Default)]
pub struct WindowTracker {
    windows: Vec<LocationWindow>,
    index: HashMap<Location, usize>,
}

impl WindowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one hourly group into its location's window, opening the
    /// window on first sight. Returns the updated window.
    pub fn advance(&mut self, group: &HourlyGroup<'_>) -> Result<&LocationWindow, FloodError> {
        group.check_consistent_rain()?;

        let idx = match self.index.get(&group.location) {
            Some(&idx) => idx,
            None => {
                let window = LocationWindow::open(group.location.clone(), group.timestamp)?;
                log::debug!("Opened rain window for {} at dt={}", group.location, group.timestamp);
                self.windows.push(window);
                self.index.insert(group.location.clone(), self.windows.len() - 1);
                self.windows.len() - 1
            }
        };

        let window = &mut self.windows[idx];
        window.push(group.timestamp, group.rain_1h())?;
        Ok(window)
    }

    pub fn get(&self, location: &Location) -> Option<&LocationWindow> {
        self.index.get(location).map(|&idx| &self.windows[idx])
    }

    /// All tracked windows in order of first sight.
    pub fn windows(&self) -> &[LocationWindow] {
        &self.windows
    }

    pub fn into_windows(self) -> Vec<LocationWindow> {
        self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_718_668_800; // 2024-06-18 00:00 UTC
    const H: i64 = SECONDS_PER_HOUR;

    fn obs(name: &str, hour: i64, rain: Option<f64>, weather: &str) -> Observation {
        Observation {
            location_name: name.to_string(),
            timestamp: T0 + hour * H,
            latitude: 49.2,
            longitude: 7.0,
            rain_1h: rain,
            weather_description: weather.to_string(),
        }
    }

    fn run(observations: &mut Vec<Observation>) -> Result<WindowTracker, FloodError> {
        sort_observations(observations);
        let mut tracker = WindowTracker::new();
        for group in hourly_groups(observations) {
            tracker.advance(&group)?;
        }
        Ok(tracker)
    }

    // --- Ordering -------------------------------------------------------------

    #[test]
    fn test_sort_orders_by_location_then_time() {
        let mut records = vec![
            obs("Zweibrücken", 0, None, "clear sky"),
            obs("Homburg", 2, None, "clear sky"),
            obs("Homburg", 0, None, "clear sky"),
            obs("Homburg", 1, None, "clear sky"),
        ];
        sort_observations(&mut records);
        let order: Vec<(&str, i64)> = records
            .iter()
            .map(|o| (o.location_name.as_str(), (o.timestamp - T0) / H))
            .collect();
        assert_eq!(order, vec![("Homburg", 0), ("Homburg", 1), ("Homburg", 2), ("Zweibrücken", 0)]);
    }

    #[test]
    fn test_sort_ignores_rain_amount() {
        let mut records = vec![
            obs("Homburg", 0, Some(9.0), "rain"),
            obs("Homburg", 0, Some(1.0), "rain"),
        ];
        sort_observations(&mut records);
        assert_eq!(records[0].rain_1h, Some(9.0), "stable sort must keep input order on rain-only ties");
    }

    // --- Grouping -------------------------------------------------------------

    #[test]
    fn test_duplicate_hour_rows_form_one_group() {
        let mut records = vec![
            obs("Homburg", 0, Some(2.0), "light rain"),
            obs("Homburg", 0, Some(2.0), "mist"),
            obs("Homburg", 1, Some(3.0), "light rain"),
        ];
        sort_observations(&mut records);
        let groups = hourly_groups(&records);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].observations.len(), 2);
        let weathers: Vec<&str> = groups[0].weather_descriptions().collect();
        assert_eq!(weathers, vec!["light rain", "mist"]);
        assert_eq!(groups[0].rain_1h(), 2.0);
    }

    #[test]
    fn test_nearby_coordinates_are_separate_locations() {
        let mut a = obs("Homburg", 0, None, "clear sky");
        let mut b = obs("Homburg", 0, None, "clear sky");
        a.latitude = 49.3200;
        b.latitude = 49.3201;
        let records = vec![a, b];
        assert_eq!(hourly_groups(&records).len(), 2);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(hourly_groups(&[]).is_empty());
    }

    // --- Window tracking ------------------------------------------------------

    #[test]
    fn test_tracker_sums_contiguous_series() {
        let mut records: Vec<Observation> =
            (0..5).map(|h| obs("Homburg", h, Some(h as f64), "rain")).collect();
        records.push(obs("Homburg", 2, Some(2.0), "moderate rain"));

        let tracker = run(&mut records).expect("contiguous series");
        assert_eq!(tracker.len(), 1);
        let window = tracker.windows().first().expect("one window");
        assert_eq!(window.rain_24h(), 0.0 + 1.0 + 2.0 + 3.0 + 4.0);
        assert_eq!(window.window_end, T0 + 4 * H);
    }

    #[test]
    fn test_missing_rain_counts_as_zero() {
        let mut records = vec![
            obs("Homburg", 0, Some(4.0), "rain"),
            obs("Homburg", 1, None, "overcast clouds"),
            obs("Homburg", 2, Some(1.0), "rain"),
        ];
        let tracker = run(&mut records).unwrap();
        assert_eq!(tracker.windows()[0].rain_24h(), 5.0);
    }

    #[test]
    fn test_third_observation_skipping_an_hour_fails() {
        let mut records = vec![
            obs("Homburg", 0, Some(1.0), "rain"),
            obs("Homburg", 1, Some(1.0), "rain"),
            obs("Homburg", 3, Some(1.0), "rain"),
        ];
        let err = run(&mut records).unwrap_err();
        match err {
            FloodError::Continuity { expected, found, .. } => {
                assert_eq!(expected, Some(T0 + 2 * H));
                assert_eq!(found, T0 + 3 * H);
            }
            other => panic!("expected continuity error, got {:?}", other),
        }
    }

    #[test]
    fn test_conflicting_duplicate_hour_fails() {
        let mut records = vec![
            obs("Homburg", 0, Some(1.0), "rain"),
            obs("Homburg", 0, Some(7.0), "heavy rain"),
        ];
        let err = run(&mut records).unwrap_err();
        assert!(matches!(err, FloodError::Continuity { found, .. } if found == T0));
    }

    #[test]
    fn test_locations_are_tracked_independently() {
        let mut records = vec![
            obs("Homburg", 0, Some(1.0), "rain"),
            obs("Neunkirchen", 5, Some(2.0), "rain"),
            obs("Homburg", 1, Some(1.0), "rain"),
            obs("Neunkirchen", 6, Some(2.0), "rain"),
        ];
        let tracker = run(&mut records).unwrap();
        assert_eq!(tracker.len(), 2);

        let neunkirchen = obs("Neunkirchen", 0, None, "").location();
        let window = tracker.get(&neunkirchen).expect("Neunkirchen tracked");
        assert_eq!(window.rain_24h(), 4.0);
        assert_eq!(window.window_start, T0 + 4 * H);
    }
}
