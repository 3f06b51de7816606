//! Wires user triggers to retrieval, aggregation and the screen.

use crate::forecast::aggregate_daily_now;
use crate::location::{self, Locator};
use crate::openweather::{Query, WeatherSource};
use crate::view::ConditionsView;
use crate::weather::{DailySummary, TemperatureUnit};

pub const NOT_FOUND_MESSAGE: &str = "Can't find what you're looking for. Try another city, or add the country as well: 'Stockholm, Sweden'!";

/// Whatever displays the dashboard. `None` and empty slices mean "nothing to
/// show" and must render as a neutral, blank panel.
pub trait Presenter {
    fn render_conditions(&mut self, conditions: Option<ConditionsView>);
    fn render_forecast(&mut self, days: &[DailySummary]);
    fn render_error(&mut self, message: Option<&str>);
    fn set_unit(&mut self, unit: TemperatureUnit);
}

pub struct Dashboard<S, L> {
    source: S,
    locator: L,
    unit: TemperatureUnit,
}

impl<S: WeatherSource, L: Locator> Dashboard<S, L> {
    pub fn new(source: S, locator: L) -> Self {
        Self {
            source,
            locator,
            unit: TemperatureUnit::default(),
        }
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Fetches current conditions, then the forecast, and renders both.
    /// A failed call blanks its own panel only; any earlier message is
    /// replaced.
    pub fn show(&self, presenter: &mut impl Presenter, query: &Query) {
        log::info!("showing weather for {query}");
        let current = self.source.current(query);
        let forecast = self.source.forecast(query);
        let not_found = current.is_not_found() || forecast.is_not_found();

        let conditions = current.found();
        let days = forecast
            .found()
            .map(|samples| aggregate_daily_now(&samples));

        presenter.render_conditions(conditions.as_ref().map(ConditionsView::from));
        presenter.render_forecast(days.as_deref().unwrap_or_default());
        presenter.set_unit(self.unit);

        presenter.render_error(not_found.then_some(NOT_FOUND_MESSAGE));
    }

    pub fn search(&self, presenter: &mut impl Presenter, text: &str) {
        match Query::from_parts(Some(text), None, None) {
            Some(query) => self.show(presenter, &query),
            None => log::debug!("ignoring empty search"),
        }
    }

    pub fn locate(&self, presenter: &mut impl Presenter) {
        match location::locate(&self.locator) {
            Ok(here) => self.show(presenter, &Query::Coordinates(here)),
            Err(failure) => presenter.render_error(Some(failure.message())),
        }
    }

    pub fn select_unit(&mut self, presenter: &mut impl Presenter, unit: TemperatureUnit) {
        self.unit = unit;
        presenter.set_unit(unit);
    }

    pub fn toggle_unit(&mut self, presenter: &mut impl Presenter) {
        self.select_unit(presenter, self.unit.toggled());
    }
}
