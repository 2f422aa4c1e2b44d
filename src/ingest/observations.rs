/// Hourly weather observation export reader.
///
/// Reads the comma-separated history export into `Observation`s. Columns
/// are located by header name, so the export may carry any number of
/// extra columns in any order. Only `rain_1h` may be empty; every other
/// required field must be present, and any bad row aborts the whole read
/// rather than leaving a hole in the hourly series.

use csv::{ReaderBuilder, StringRecord};
use std::fs;
use std::path::Path;

use crate::model::{FloodError, Observation};

const COL_NAME: &str = "city_name";
const COL_DT: &str = "dt";
const COL_LAT: &str = "lat";
const COL_LON: &str = "lon";
const COL_RAIN: &str = "rain_1h";
const COL_WEATHER: &str = "weather_description";

/// Column positions resolved from the header row.
struct Columns {
    name: usize,
    dt: usize,
    lat: usize,
    lon: usize,
    rain: usize,
    weather: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, FloodError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| FloodError::MissingColumn(name.to_string()))
        };

        Ok(Columns {
            name: find(COL_NAME)?,
            dt: find(COL_DT)?,
            lat: find(COL_LAT)?,
            lon: find(COL_LON)?,
            rain: find(COL_RAIN)?,
            weather: find(COL_WEATHER)?,
        })
    }
}

/// Non-empty raw value of a required field.
fn required<'r>(
    record: &'r StringRecord,
    idx: usize,
    field: &'static str,
    line: u64,
) -> Result<&'r str, FloodError> {
    match record.get(idx).map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FloodError::MissingField { field, line }),
    }
}

fn finite(raw: &str, field: &'static str, line: u64) -> Result<f64, FloodError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FloodError::InvalidField {
            field,
            line,
            value: raw.to_string(),
        }),
    }
}

fn parse_row(record: &StringRecord, cols: &Columns) -> Result<Observation, FloodError> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);

    let location_name = required(record, cols.name, COL_NAME, line)?.to_string();

    let raw_dt = required(record, cols.dt, COL_DT, line)?;
    let timestamp = raw_dt.parse::<i64>().map_err(|_| FloodError::InvalidField {
        field: COL_DT,
        line,
        value: raw_dt.to_string(),
    })?;

    let latitude = finite(required(record, cols.lat, COL_LAT, line)?, COL_LAT, line)?;
    let longitude = finite(required(record, cols.lon, COL_LON, line)?, COL_LON, line)?;

    let rain_1h = match record.get(cols.rain).map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(finite(raw, COL_RAIN, line)?),
        _ => None,
    };

    // Description is compared verbatim against the rule table
    let weather_description = match record.get(cols.weather) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => return Err(FloodError::MissingField { field: COL_WEATHER, line }),
    };

    Ok(Observation {
        location_name,
        timestamp,
        latitude,
        longitude,
        rain_1h,
        weather_description,
    })
}

/// Parses an observation export from its CSV text.
pub fn parse_observations_csv(text: &str) -> Result<Vec<Observation>, FloodError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let cols = Columns::resolve(rdr.headers()?)?;

    let mut observations = Vec::new();
    for row in rdr.records() {
        let record = row?;
        observations.push(parse_row(&record, &cols)?);
    }

    Ok(observations)
}

/// Reads and parses an observation export file.
pub fn load_observations<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>, FloodError> {
    let content = fs::read_to_string(path.as_ref())?;
    let observations = parse_observations_csv(&content)?;
    log::info!(
        "Read {} observations from {}",
        observations.len(),
        path.as_ref().display()
    );
    Ok(observations)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
