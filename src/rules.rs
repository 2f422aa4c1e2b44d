/// Rain-to-skill rule table.
///
/// Rules are data: each row pairs a rainfall range and a weather
/// description with the rescue-skill level it calls for. Lookup evaluates
/// every row and combines the matches by maximum, so the table can be
/// reordered freely without changing any answer.
///
/// Table file format (semicolon-delimited, optional UTF-8 BOM):
///
/// ```text
/// Weather Description;amount of rain;Required Skill Level
/// light rain;0-10;Basic Skills
/// heavy intensity rain;>30;Advanced Skills
/// thunderstorm;-;Intermediate Skills
/// ```

use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

use crate::model::{FloatRange, FloodError, RainToSkillRule, SkillLevel};

const COL_WEATHER: &str = "Weather Description";
const COL_SKILL: &str = "Required Skill Level";
const COL_RAIN: &str = "amount of rain";

// ---------------------------------------------------------------------------
// Range expressions
// ---------------------------------------------------------------------------

/// Parses a rainfall-range expression.
///
/// | expression | range                  |
/// |------------|------------------------|
/// | `-`        | (−∞, +∞), any amount   |
/// | `>x`       | (x, +∞)                |
/// | `lo-hi`    | [lo, hi]               |
/// | `x`        | [x, x]                 |
pub fn parse_rain_range(expr: &str) -> Result<FloatRange, FloodError> {
    let r = expr.trim();
    let malformed = || FloodError::MalformedRange(expr.to_string());
    let number = |s: &str| s.trim().parse::<f64>().map_err(|_| malformed());

    if r == "-" {
        Ok(FloatRange::any())
    } else if let Some(rest) = r.strip_prefix('>') {
        Ok(FloatRange::above(number(rest)?))
    } else if let Some((lo, hi)) = r.split_once('-') {
        Ok(FloatRange::closed(number(lo)?, number(hi)?))
    } else {
        Ok(FloatRange::exactly(number(r)?))
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SkillRuleTable {
    rules: Vec<RainToSkillRule>,
}

impl SkillRuleTable {
    pub fn new(rules: Vec<RainToSkillRule>) -> Self {
        SkillRuleTable { rules }
    }

    pub fn rules(&self) -> &[RainToSkillRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Highest skill among all rules matching `weather_description` exactly
    /// and whose range contains `rain_24h`; `SkillLevel::None` if none do.
    pub fn best_skill(&self, rain_24h: f64, weather_description: &str) -> SkillLevel {
        self.rules
            .iter()
            .filter(|r| r.weather_description == weather_description && r.rain_range.check(rain_24h))
            .map(|r| r.skill)
            .max()
            .unwrap_or(SkillLevel::None)
    }

    /// Parses a rule table from its CSV text.
    pub fn parse_csv(text: &str) -> Result<Self, FloodError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut rdr = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| FloodError::MissingColumn(name.to_string()))
        };
        let wd = column(COL_WEATHER)?;
        let rs = column(COL_SKILL)?;
        let ar = column(COL_RAIN)?;

        let mut rules = Vec::new();
        for row in rdr.records() {
            let record = row?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let field = |idx: usize, name: &'static str| {
                record
                    .get(idx)
                    .ok_or(FloodError::MissingField { field: name, line })
            };

            let rain_range = parse_rain_range(field(ar, COL_RAIN)?)?;
            let skill = SkillLevel::from_label(field(rs, COL_SKILL)?)?;
            let weather_description = field(wd, COL_WEATHER)?.to_string();

            rules.push(RainToSkillRule { rain_range, weather_description, skill });
        }

        Ok(SkillRuleTable { rules })
    }

    /// Reads and parses a rule table file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FloodError> {
        let content = fs::read_to_string(path)?;
        let table = Self::parse_csv(&content)?;
        log::debug!("Loaded {} rain-to-skill rules", table.len());
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
