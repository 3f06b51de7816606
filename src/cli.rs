use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

const ABOUT: &str = "Weather dashboard for the terminal";

const LONG_ABOUT: &str = "
Terminal dashboard showing current conditions and a five-day forecast from OpenWeatherMap.

Give a city (optionally with its country, e.g. \"Stockholm, Sweden\") or a coordinate pair. With
neither, the dashboard opens on the configured default city. Inside the dashboard press `/` to
search, `g` to use your location, `c`/`f` to pick a unit, `u` to toggle it and `q` to quit.

An OpenWeatherMap API key is required, either in the config file, in OPENWEATHER_API_KEY or via
--api-key.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(help = "City to show first (e.g. Stockholm or \"Stockholm, Sweden\")")]
    pub city: Option<String>,

    #[arg(long, allow_negative_numbers = true, help = "Latitude; used together with --lon")]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, help = "Longitude; used together with --lat")]
    pub lon: Option<f64>,

    #[arg(long, help = "OpenWeatherMap API key, overrides config and environment")]
    pub api_key: Option<String>,

    #[arg(long, help = "Config file (default: <config dir>/wxdash/config.toml)")]
    pub config: Option<PathBuf>,
}
