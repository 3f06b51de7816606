use crate::units::temperature::{c2f, round};
use crate::units::time::local_time;
use crate::weather::{Condition, CurrentConditions, TemperatureUnit};

pub const MISSING: &str = "--";

/// A temperature rendered in both units, so a unit toggle never needs the
/// raw reading again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub celsius: String,
    pub fahrenheit: String,
}

impl Reading {
    fn from_celsius(value: Option<f64>) -> Self {
        match value {
            Some(c) => Self {
                celsius: round(c),
                fahrenheit: round(c2f(c)),
            },
            None => Self {
                celsius: MISSING.to_string(),
                fahrenheit: MISSING.to_string(),
            },
        }
    }

    pub fn in_unit(&self, unit: TemperatureUnit) -> String {
        let value = match unit {
            TemperatureUnit::Celsius => &self.celsius,
            TemperatureUnit::Fahrenheit => &self.fahrenheit,
        };
        format!("{value} {}", unit.symbol())
    }
}

/// Current-conditions panel, display-ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionsView {
    pub place: String,
    pub condition: Condition,
    pub headline: String,
    pub description: String,
    pub temperature: Reading,
    pub feels_like: Reading,
    pub sunrise: String,
    pub sunset: String,
}

impl From<&CurrentConditions> for ConditionsView {
    fn from(current: &CurrentConditions) -> Self {
        let place = current.name.clone().unwrap_or_else(|| MISSING.to_string());
        let condition = Condition::from_category(current.category.as_deref().unwrap_or_default());
        let clock = |at: Option<i64>| match at {
            Some(at) => local_time(at, current.timezone.unwrap_or(0)),
            None => MISSING.to_string(),
        };
        Self {
            headline: condition.headline(&place),
            condition,
            description: current
                .description
                .clone()
                .unwrap_or_else(|| MISSING.to_string()),
            temperature: Reading::from_celsius(current.temp),
            feels_like: Reading::from_celsius(current.feels_like),
            sunrise: clock(current.sunrise),
            sunset: clock(current.sunset),
            place,
        }
    }
}
