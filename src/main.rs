use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

mod app;
mod cli;
mod config;
mod dashboard;
mod error;
mod forecast;
mod location;
mod logging;
mod openweather;
mod units;
mod view;
mod weather;

use crate::app::run_app;
use crate::cli::Args;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::location::SystemLocator;
use crate::openweather::{OpenWeather, Query};
use crate::weather::Coordinates;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let log_file = logging::init(
        config.logging.level_filter()?,
        config.logging.file.as_deref(),
    )?;
    log::info!("wxdash {} starting, logging to {}", env!("CARGO_PKG_VERSION"), log_file.display());

    let api_key = config.api_key(args.api_key.as_deref())?;
    let provider = OpenWeather::new(&config.base_url, &api_key)?;

    let geolocation = &config.geolocation;
    let fixed = match (geolocation.latitude, geolocation.longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };
    let locator = SystemLocator::new(&geolocation.url, geolocation.enabled, fixed)?;

    let mut dashboard = Dashboard::new(provider, locator);
    let initial = Query::from_parts(args.city.as_deref(), args.lat, args.lon)
        .unwrap_or_else(|| Query::City(config.default_city.clone()));

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let res = run_app(&mut terminal, &mut dashboard, &initial);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("dashboard stopped: {err}");
        println!("{:?}", err)
    }

    log::info!("wxdash exiting");
    Ok(())
}
