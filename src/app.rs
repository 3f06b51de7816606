use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};

use crate::dashboard::{Dashboard, Presenter};
use crate::location::Locator;
use crate::openweather::{Query, WeatherSource};
use crate::view::{ConditionsView, MISSING};
use crate::weather::{Condition, DailySummary, TemperatureUnit};

/// Everything currently on screen. Filled in through `Presenter`.
#[derive(Debug, Default)]
pub struct Screen {
    conditions: Option<ConditionsView>,
    days: Vec<DailySummary>,
    error: Option<String>,
    unit: TemperatureUnit,
    /// Search prompt contents while the prompt is open
    input: Option<String>,
    busy: bool,
}

#[derive(Debug, PartialEq)]
enum Action {
    Quit,
    Search(String),
    Locate,
    Select(TemperatureUnit),
    Toggle,
    Redraw,
}

impl Presenter for Screen {
    fn render_conditions(&mut self, conditions: Option<ConditionsView>) {
        self.conditions = conditions;
    }

    fn render_forecast(&mut self, days: &[DailySummary]) {
        self.days = days.to_vec();
    }

    fn render_error(&mut self, message: Option<&str>) {
        self.error = message.map(str::to_string);
    }

    fn set_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
    }
}

impl Screen {
    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        if let Some(input) = self.input.as_mut() {
            match key.code {
                KeyCode::Enter => {
                    let text = std::mem::take(input);
                    self.input = None;
                    return Action::Search(text);
                }
                KeyCode::Esc => self.input = None,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            return Action::Redraw;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.input = Some(String::new());
                Action::Redraw
            }
            KeyCode::Char('g') => Action::Locate,
            KeyCode::Char('c') => Action::Select(TemperatureUnit::Celsius),
            KeyCode::Char('f') => Action::Select(TemperatureUnit::Fahrenheit),
            KeyCode::Char('u') => Action::Toggle,
            _ => Action::Redraw,
        }
    }
}

pub fn run_app<B: Backend, S: WeatherSource, L: Locator>(
    terminal: &mut Terminal<B>,
    dashboard: &mut Dashboard<S, L>,
    initial: &Query,
) -> io::Result<()> {
    let mut screen = Screen::default();
    screen.set_unit(dashboard.unit());

    fetching(terminal, &mut screen)?;
    dashboard.show(&mut screen, initial);
    screen.busy = false;

    loop {
        terminal.draw(|f| ui(f, &screen))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match screen.handle_key(key) {
            Action::Quit => return Ok(()),
            Action::Search(text) => {
                fetching(terminal, &mut screen)?;
                dashboard.search(&mut screen, &text);
            }
            Action::Locate => {
                fetching(terminal, &mut screen)?;
                dashboard.locate(&mut screen);
            }
            Action::Select(unit) => dashboard.select_unit(&mut screen, unit),
            Action::Toggle => dashboard.toggle_unit(&mut screen),
            Action::Redraw => {}
        }
        screen.busy = false;
    }
}

/// Draws once with the busy marker before a blocking fetch.
fn fetching<B: Backend>(terminal: &mut Terminal<B>, screen: &mut Screen) -> io::Result<()> {
    screen.busy = true;
    terminal.draw(|f| ui(f, screen))?;
    Ok(())
}

fn accent(condition: Condition) -> Color {
    match condition {
        Condition::Clear => Color::Yellow,
        Condition::Clouds => Color::Gray,
        Condition::Wet => Color::Blue,
        Condition::Snow => Color::White,
        Condition::Other => Color::Magenta,
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded)
}

fn display_headline(view: Option<&ConditionsView>) -> Paragraph<'static> {
    let lines = match view {
        Some(view) => vec![
            Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    view.place.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    view.headline.clone(),
                    Style::default().fg(accent(view.condition)),
                ),
            ]),
        ],
        None => vec![Line::from(format!(" {MISSING}"))],
    };
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .border_type(BorderType::Rounded),
        )
}

fn display_current_conditions(
    view: Option<&ConditionsView>,
    unit: TemperatureUnit,
) -> Table<'static> {
    let value = |text: String| Cell::from(text).style(Style::default().fg(Color::Green));

    let mut rows = vec![Row::new(vec![Cell::from("")])];
    match view {
        Some(view) => {
            rows.push(Row::new(vec![
                Cell::from(" Conditions"),
                value(view.description.clone()),
            ]));
            rows.push(Row::new(vec![
                Cell::from(" Temperature"),
                value(view.temperature.in_unit(unit)),
            ]));
            rows.push(Row::new(vec![
                Cell::from(" Feels like"),
                value(view.feels_like.in_unit(unit)),
            ]));
            rows.push(Row::new(vec![
                Cell::from(" Sunrise"),
                value(view.sunrise.clone()),
            ]));
            rows.push(Row::new(vec![
                Cell::from(" Sunset"),
                value(view.sunset.clone()),
            ]));
        }
        None => rows.push(Row::new(vec![Cell::from(format!(" {MISSING}"))])),
    }

    Table::new(rows, [Constraint::Length(13), Constraint::Min(10)])
        .block(panel("Current Conditions"))
}

fn display_forecast(days: &[DailySummary], unit: TemperatureUnit) -> Table<'static> {
    let symbol = unit.symbol();
    let mut rows = vec![Row::new(vec![Cell::from("")])];
    if days.is_empty() {
        rows.push(Row::new(vec![Cell::from(format!(" {MISSING}"))]));
    }
    for day in days {
        rows.push(Row::new(vec![
            Cell::from(format!(" {}", day.day_label)).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::from(format!("↓ {} {symbol}", day.low(unit)))
                .style(Style::default().fg(Color::Cyan)),
            Cell::from(format!("↑ {} {symbol}", day.high(unit)))
                .style(Style::default().fg(Color::Red)),
        ]));
    }

    Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .block(panel("Forecast"))
}

fn unit_control(unit: TemperatureUnit, shown: TemperatureUnit, key: char) -> Span<'static> {
    let label = format!("{key} {}", shown.symbol());
    if unit == shown {
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD))
    } else {
        Span::styled(label, Style::default().fg(Color::DarkGray))
    }
}

fn display_footer(screen: &Screen) -> Paragraph<'static> {
    let line = match &screen.input {
        Some(input) => Line::from(vec![
            Span::styled(" Search: ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{input}_")),
        ]),
        None => Line::from(vec![
            Span::raw(" / search  g locate  "),
            unit_control(screen.unit, TemperatureUnit::Celsius, 'c'),
            Span::raw("  "),
            unit_control(screen.unit, TemperatureUnit::Fahrenheit, 'f'),
            Span::raw("  u toggle  q quit"),
            Span::styled(
                if screen.busy { "  fetching..." } else { "" },
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    };
    Paragraph::new(line)
}

fn ui(f: &mut Frame, screen: &Screen) {
    let vert_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(display_headline(screen.conditions.as_ref()), vert_layout[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(vert_layout[1]);

    f.render_widget(
        display_current_conditions(screen.conditions.as_ref(), screen.unit),
        chunks[0],
    );
    f.render_widget(display_forecast(&screen.days, screen.unit), chunks[1]);

    render_error(f, screen.error.as_deref(), vert_layout[2]);
    f.render_widget(display_footer(screen), vert_layout[3]);
}

fn render_error(f: &mut Frame, error: Option<&str>, area: Rect) {
    if let Some(message) = error {
        let line = Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Red),
        ));
        f.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn press(screen: &mut Screen, code: KeyCode) -> Action {
        screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(screen: &mut Screen, text: &str) {
        for c in text.chars() {
            assert_eq!(press(screen, KeyCode::Char(c)), Action::Redraw);
        }
    }

    fn rendered(screen: &Screen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal.draw(|f| ui(f, screen)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn day(label: &str) -> DailySummary {
        DailySummary {
            date_key: "2024-06-01".to_string(),
            day_label: label.to_string(),
            high_c: "25.0".to_string(),
            low_c: "8.0".to_string(),
            high_f: "77.0".to_string(),
            low_f: "46.4".to_string(),
        }
    }

    #[test]
    fn test_key_bindings() {
        let mut screen = Screen::default();
        assert_eq!(press(&mut screen, KeyCode::Char('g')), Action::Locate);
        assert_eq!(
            press(&mut screen, KeyCode::Char('f')),
            Action::Select(TemperatureUnit::Fahrenheit)
        );
        assert_eq!(
            press(&mut screen, KeyCode::Char('c')),
            Action::Select(TemperatureUnit::Celsius)
        );
        assert_eq!(press(&mut screen, KeyCode::Char('u')), Action::Toggle);
        assert_eq!(press(&mut screen, KeyCode::Char('q')), Action::Quit);
        assert_eq!(
            screen.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_search_prompt() {
        let mut screen = Screen::default();
        assert_eq!(press(&mut screen, KeyCode::Char('/')), Action::Redraw);
        // bindings are plain text while the prompt is open
        type_text(&mut screen, "Oslo, Nox");
        press(&mut screen, KeyCode::Backspace);
        type_text(&mut screen, "rway");
        assert_eq!(
            press(&mut screen, KeyCode::Enter),
            Action::Search("Oslo, Norway".to_string())
        );
        assert!(screen.input.is_none());
    }

    #[test]
    fn test_search_prompt_cancel() {
        let mut screen = Screen::default();
        press(&mut screen, KeyCode::Char('s'));
        type_text(&mut screen, "Rome");
        assert_eq!(press(&mut screen, KeyCode::Esc), Action::Redraw);
        assert!(screen.input.is_none());
        assert_eq!(press(&mut screen, KeyCode::Esc), Action::Quit);
    }

    #[test]
    fn test_forecast_follows_unit() {
        let mut screen = Screen::default();
        screen.render_forecast(&[day("Today")]);

        let celsius = rendered(&screen);
        assert!(celsius.contains("Today"));
        assert!(celsius.contains("25.0 °C"));
        assert!(!celsius.contains("77.0"));

        screen.set_unit(TemperatureUnit::Fahrenheit);
        let fahrenheit = rendered(&screen);
        assert!(fahrenheit.contains("77.0 °F"));
        assert!(fahrenheit.contains("46.4 °F"));
        assert!(!fahrenheit.contains("25.0"));
    }

    #[test]
    fn test_blank_state_renders() {
        let mut screen = Screen::default();
        screen.render_error(Some("Can't find what you're looking for."));
        let text = rendered(&screen);
        assert!(text.contains("Current Conditions"));
        assert!(text.contains("Can't find"));
        assert!(text.contains(MISSING));
    }

    #[test]
    fn test_long_error_wraps_onto_second_row() {
        let mut screen = Screen::default();
        screen.render_error(Some(crate::dashboard::NOT_FOUND_MESSAGE));
        let text = rendered(&screen);
        assert!(text.contains("Can't find what you're looking for."));
        assert!(text.contains("Sweden'!"));
    }
}
