/// Rolling 24-hour rainfall window per location.
///
/// A `LocationWindow` is opened on the first hourly group seen for a
/// location and extended by exactly one hour per subsequent group. It keeps
/// the most recent `RAIN_WINDOW_HOURS` hourly amounts and their sum.
///
/// Timestamps bracket the retained readings: a window holding `n` readings
/// spans `window_end - window_start == 3600 * n` seconds, the first reading
/// covering the hour that ends at `window_start + 3600`.

use serde::Serialize;
use std::collections::VecDeque;

use crate::model::{FloodError, Location, RAIN_WINDOW_HOURS, SECONDS_PER_HOUR};

#[derive(Debug, Clone, Serialize)]
pub struct LocationWindow {
    pub location: Location,
    pub window_start: i64,
    pub window_end: i64,
    rain: VecDeque<f64>,
    rain_24h: f64,
}

impl LocationWindow {
    /// Opens an empty window whose first reading will be for `timestamp`.
    ///
    /// Fails with a continuity error if `timestamp` is not hour-aligned or
    /// has no preceding hour in `i64`.
    pub fn open(location: Location, timestamp: i64) -> Result<Self, FloodError> {
        let before = match timestamp.checked_sub(SECONDS_PER_HOUR) {
            Some(before) if timestamp % SECONDS_PER_HOUR == 0 => before,
            _ => {
                return Err(FloodError::Continuity {
                    location: location.to_string(),
                    expected: None,
                    found: timestamp,
                });
            }
        };

        Ok(LocationWindow {
            location,
            window_start: before,
            window_end: before,
            rain: VecDeque::with_capacity(RAIN_WINDOW_HOURS + 1),
            rain_24h: 0.0,
        })
    }

    /// Timestamp the next reading must carry; `None` once the window has
    /// reached the last representable hour.
    pub fn next_expected(&self) -> Option<i64> {
        self.window_end.checked_add(SECONDS_PER_HOUR)
    }

    /// Appends the reading for `timestamp`.
    ///
    /// `timestamp` must be exactly one hour after the current window end;
    /// gaps, repeats and regressions fail with `FloodError::Continuity`
    /// and leave the window untouched.
    pub fn push(&mut self, timestamp: i64, rain_1h: f64) -> Result<f64, FloodError> {
        let expected = self.next_expected();
        if expected != Some(timestamp) {
            return Err(FloodError::Continuity {
                location: self.location.to_string(),
                expected,
                found: timestamp,
            });
        }

        self.window_end = timestamp;
        self.rain.push_back(rain_1h);
        if self.rain.len() > RAIN_WINDOW_HOURS {
            self.rain.pop_front();
            self.window_start += SECONDS_PER_HOUR;
        }

        // Resummed rather than updated incrementally so float error can't accumulate
        self.rain_24h = self.rain.iter().sum();
        Ok(self.rain_24h)
    }

    /// Sum of the retained hourly readings.
    pub fn rain_24h(&self) -> f64 {
        self.rain_24h
    }

    /// Retained hourly readings, oldest first.
    pub fn readings(&self) -> impl Iterator<Item = f64> + '_ {
        self.rain.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rain.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000 - 1_700_000_000 % SECONDS_PER_HOUR;

    fn merzig() -> Location {
        Location {
            name: "Merzig".to_string(),
            latitude: 49.44,
            longitude: 6.64,
        }
    }

    #[test]
    fn test_open_then_first_push_spans_one_hour() {
        let mut w = LocationWindow::open(merzig(), T0).expect("aligned timestamp");
        assert!(w.is_empty());
        assert_eq!(w.next_expected(), Some(T0));

        w.push(T0, 1.5).expect("first reading");
        assert_eq!(w.window_start, T0 - SECONDS_PER_HOUR);
        assert_eq!(w.window_end, T0);
        assert_eq!(w.rain_24h(), 1.5);
    }

    #[test]
    fn test_rolling_sum_covers_last_24_hours() {
        let mut w = LocationWindow::open(merzig(), T0).unwrap();
        for h in 0..30 {
            w.push(T0 + h * SECONDS_PER_HOUR, h as f64).unwrap();
        }
        // hours 6..=29 retained
        let expected: f64 = (6..30).map(|h| h as f64).sum();
        assert_eq!(w.len(), RAIN_WINDOW_HOURS);
        assert_eq!(w.rain_24h(), expected);
        assert_eq!(w.readings().next(), Some(6.0));
    }

    #[test]
    fn test_span_tracks_retained_readings() {
        let mut w = LocationWindow::open(merzig(), T0).unwrap();
        for h in 0..40 {
            w.push(T0 + h * SECONDS_PER_HOUR, 0.5).unwrap();
            assert_eq!(
                w.window_end - w.window_start,
                SECONDS_PER_HOUR * w.len() as i64,
                "span must match readings after hour {}",
                h
            );
        }
    }

    #[test]
    fn test_gap_is_a_continuity_error() {
        let mut w = LocationWindow::open(merzig(), T0).unwrap();
        w.push(T0, 1.0).unwrap();
        w.push(T0 + SECONDS_PER_HOUR, 1.0).unwrap();

        let err = w.push(T0 + 3 * SECONDS_PER_HOUR, 1.0).unwrap_err();
        match err {
            FloodError::Continuity { expected, found, .. } => {
                assert_eq!(expected, Some(T0 + 2 * SECONDS_PER_HOUR));
                assert_eq!(found, T0 + 3 * SECONDS_PER_HOUR);
            }
            other => panic!("expected continuity error, got {:?}", other),
        }
        assert_eq!(w.len(), 2, "rejected reading must not be appended");
    }

    #[test]
    fn test_repeated_hour_is_a_continuity_error() {
        let mut w = LocationWindow::open(merzig(), T0).unwrap();
        w.push(T0, 1.0).unwrap();
        assert!(w.push(T0, 1.0).is_err());
        assert!(w.push(T0 - SECONDS_PER_HOUR, 1.0).is_err());
    }

    #[test]
    fn test_misaligned_timestamp_is_rejected_on_open() {
        let err = LocationWindow::open(merzig(), T0 + 60).unwrap_err();
        assert!(matches!(err, FloodError::Continuity { expected: None, .. }));
    }

    #[test]
    fn test_earliest_hour_cannot_be_opened() {
        let earliest = i64::MIN - i64::MIN % SECONDS_PER_HOUR;
        let err = LocationWindow::open(merzig(), earliest).unwrap_err();
        assert!(matches!(err, FloodError::Continuity { expected: None, found, .. } if found == earliest));
    }

    #[test]
    fn test_no_reading_follows_the_latest_hour() {
        let latest = i64::MAX - i64::MAX % SECONDS_PER_HOUR;
        let mut w = LocationWindow::open(merzig(), latest).expect("aligned timestamp");
        w.push(latest, 2.0).expect("last representable hour");
        assert_eq!(w.next_expected(), None);

        let err = w.push(latest, 2.0).unwrap_err();
        assert!(matches!(err, FloodError::Continuity { expected: None, .. }));
        assert_eq!(w.len(), 1);
    }
}
