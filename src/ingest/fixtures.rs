/// Test fixtures: representative input files, truncated to the minimum
/// needed to exercise the readers.
///
/// Observation export shape (OpenWeather bulk history, comma-separated):
///   dt, dt_iso, city_name, lat, lon, ..., rain_1h, ..., weather_description
///   - `dt` is unix seconds, hour-aligned
///   - `rain_1h` is empty when no rain was recorded
///   - one row per (hour, weather condition), so an hour can repeat
///
/// Rule table shape (semicolon-separated, exported with a BOM):
///   Weather Description;amount of rain;Required Skill Level
///
/// River geometry shape (Overpass API `out geom` for one relation):
///   elements[0].members[].geometry[] is {lat, lon}; nodes have no geometry

/// Two Saarland stations, three hours each. Merzig reports two weather
/// conditions for its second hour; Saarlouis has a dry hour.
#[cfg(test)]
pub(crate) fn fixture_observations_csv() -> &'static str {
    "dt,dt_iso,city_name,lat,lon,temp,rain_1h,weather_main,weather_description\n\
     1718668800,2024-06-18 00:00:00 +0000 UTC,Merzig,49.4431,6.6383,14.2,1.25,Rain,light rain\n\
     1718672400,2024-06-18 01:00:00 +0000 UTC,Merzig,49.4431,6.6383,14.0,4.1,Rain,moderate rain\n\
     1718672400,2024-06-18 01:00:00 +0000 UTC,Merzig,49.4431,6.6383,14.0,4.1,Mist,mist\n\
     1718676000,2024-06-18 02:00:00 +0000 UTC,Merzig,49.4431,6.6383,13.8,0.3,Rain,light rain\n\
     1718668800,2024-06-18 00:00:00 +0000 UTC,Saarlouis,49.3164,6.7490,15.1,2,Rain,light rain\n\
     1718672400,2024-06-18 01:00:00 +0000 UTC,Saarlouis,49.3164,6.7490,15.0,,Clouds,overcast clouds\n\
     1718676000,2024-06-18 02:00:00 +0000 UTC,Saarlouis,49.3164,6.7490,14.7,0.5,Rain,light rain\n"
}

/// Five rules covering an exact value, a closed interval, an open-ended
/// range and the "any amount" dash.
#[cfg(test)]
pub(crate) fn fixture_rule_table_csv() -> &'static str {
    "\u{feff}Weather Description;amount of rain;Required Skill Level\n\
     light rain;0-10;Basic Skills\n\
     moderate rain;10-30;Intermediate Skills\n\
     heavy intensity rain;>30;Advanced Skills\n\
     overcast clouds;0;None\n\
     thunderstorm;-;Intermediate Skills\n"
}

/// A two-way relation with a node member (no geometry) between two ways.
#[cfg(test)]
pub(crate) fn fixture_overpass_relation_json() -> &'static str {
    r#"{
      "version": 0.6,
      "generator": "Overpass API",
      "elements": [
        {
          "type": "relation",
          "id": 1234567,
          "members": [
            {
              "type": "way",
              "ref": 11,
              "role": "main_stream",
              "geometry": [
                { "lat": 49.10, "lon": 7.00 },
                { "lat": 49.11, "lon": 7.00 }
              ]
            },
            { "type": "node", "ref": 99, "role": "source" },
            {
              "type": "way",
              "ref": 12,
              "role": "main_stream",
              "geometry": [
                { "lat": 49.11, "lon": 7.00 },
                { "lat": 49.12, "lon": 7.01 }
              ]
            }
          ],
          "tags": { "name": "Blies", "type": "waterway", "waterway": "river" }
        }
      ]
    }"#
}
