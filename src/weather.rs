/// Broad weather category, from the provider's category label ("Clear",
/// "Rain", ...). Drives the headline sentence and the accent colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Clear,
    Clouds,
    Wet,
    Snow,
    Other,
}

impl Condition {
    pub fn from_category(category: &str) -> Self {
        match category {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" | "Thunderstorm" | "Drizzle" => Self::Wet,
            "Snow" => Self::Snow,
            _ => Self::Other,
        }
    }

    pub fn headline(&self, place: &str) -> String {
        match self {
            Self::Clear => format!("Get your sunnies on. {place} is looking rather great today."),
            Self::Clouds => format!("Light a fire and get cosy. {place} is looking grey today."),
            Self::Wet => format!("Don't forget your umbrella. It's wet in {place} today."),
            Self::Snow => format!("Light a fire and get cosy. {place} looks snowy today."),
            Self::Other => format!("Be careful today in {place}!"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current weather snapshot. The provider may leave any field out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentConditions {
    pub name: Option<String>,
    /// Seconds east of UTC.
    pub timezone: Option<i32>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// One 3-hour forecast point.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: i64,
    pub date_key: String,
    pub temp_max: f64,
    pub temp_min: f64,
}

/// High and low for one calendar day, display-ready in both units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    pub date_key: String,
    pub day_label: String,
    pub high_c: String,
    pub low_c: String,
    pub high_f: String,
    pub low_f: String,
}

impl DailySummary {
    pub fn high(&self, unit: TemperatureUnit) -> &str {
        match unit {
            TemperatureUnit::Celsius => &self.high_c,
            TemperatureUnit::Fahrenheit => &self.high_f,
        }
    }

    pub fn low(&self, unit: TemperatureUnit) -> &str {
        match unit {
            TemperatureUnit::Celsius => &self.low_c,
            TemperatureUnit::Fahrenheit => &self.low_f,
        }
    }
}
