use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, ListState, Paragraph,
        Row, Table, Tabs, Wrap,
    },
};
use uuid::Uuid;

use ironledger::analytics::{PersonalRecord, strength_trend};
use ironledger::config::Theme;
use ironledger::dashboard::{Dashboard, SessionRecap};
use ironledger::timestamp::{format_minute, now_minute};
use ironledger::workouts::{UpdateWeightEntry, WeightEntry, WorkoutSession};

use crate::forms::{
    MATCH_HINT, SESSION_HINT, WEIGHT_HINT, parse_match_line, parse_session_line,
    parse_weight_line, session_line, weight_line,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Home,
    Weight,
    LogWorkout,
    Summaries,
    Logs,
    Matches,
    Admin,
}

impl Tab {
    const ALL: [Tab; 7] = [
        Tab::Home,
        Tab::Weight,
        Tab::LogWorkout,
        Tab::Summaries,
        Tab::Logs,
        Tab::Matches,
        Tab::Admin,
    ];

    fn title(self) -> &'static str {
        match self {
            Tab::Home => "1 Home",
            Tab::Weight => "2 Weight",
            Tab::LogWorkout => "3 Log Workout",
            Tab::Summaries => "4 Summaries",
            Tab::Logs => "5 Logs",
            Tab::Matches => "6 Matches",
            Tab::Admin => "7 Admin",
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    fn hint(self) -> &'static str {
        match self {
            Tab::Home => "tab/1-7: switch | q: quit",
            Tab::Weight => "a: add weight | tab/1-7: switch | q: quit",
            Tab::LogWorkout => "a: log session | tab/1-7: switch | q: quit",
            Tab::Summaries => "j/k: routine | tab/1-7: switch | q: quit",
            Tab::Logs => "j/k: navigate | e: edit | d: delete | /: filter | w: workouts/weights | q: quit",
            Tab::Matches => "a: record match | d: delete newest | tab/1-7: switch | q: quit",
            Tab::Admin => "t: theme | p: demo workouts | m: demo matches | r: reset | q: quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    LoggingWeight,
    LoggingSession,
    EditingSession(Uuid),
    EditingWeight(Uuid),
    Filtering,
    RecordingMatch,
    ConfirmReset,
}

struct Palette {
    base: Style,
    accent: Color,
    muted: Color,
    highlight: Style,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            base: Style::default(),
            accent: Color::Cyan,
            muted: Color::Gray,
            highlight: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        },
        Theme::Dark => Palette {
            base: Style::default()
                .fg(Color::Rgb(250, 250, 250))
                .bg(Color::Rgb(14, 17, 23)),
            accent: Color::Rgb(0, 242, 255),
            muted: Color::Rgb(139, 148, 158),
            highlight: Style::default()
                .fg(Color::Rgb(14, 17, 23))
                .bg(Color::Rgb(0, 242, 255))
                .add_modifier(Modifier::BOLD),
        },
    }
}

fn today() -> NaiveDate {
    now_minute().date()
}

struct App<'a> {
    dashboard: &'a mut Dashboard,
    tab: Tab,
    status_message: String,
    input_mode: InputMode,
    input_buffer: String,
    log_filter: String,
    selected_log: usize,
    show_weight_log: bool,
    selected_routine: usize,
}

impl<'a> App<'a> {
    fn new(dashboard: &'a mut Dashboard) -> Self {
        Self {
            dashboard,
            tab: Tab::Home,
            status_message: Tab::Home.hint().to_string(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            log_filter: String::new(),
            selected_log: 0,
            show_weight_log: false,
            selected_routine: 0,
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.status_message = tab.hint().to_string();
    }

    fn visible_sessions(&self) -> Vec<&WorkoutSession> {
        self.dashboard.workouts.search(&self.log_filter)
    }

    fn log_len(&self) -> usize {
        if self.show_weight_log {
            self.dashboard.workouts.weights().len()
        } else {
            self.visible_sessions().len()
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.log_len();
        if self.selected_log >= len && len > 0 {
            self.selected_log = len - 1;
        }
    }

    fn scroll_down(&mut self) {
        let len = self.log_len();
        if len > 0 && self.selected_log < len - 1 {
            self.selected_log += 1;
        }
    }

    fn scroll_up(&mut self) {
        if self.selected_log > 0 {
            self.selected_log -= 1;
        }
    }

    fn selected_session(&self) -> Option<&WorkoutSession> {
        self.visible_sessions().get(self.selected_log).copied()
    }

    /// Weight entries newest first, as the weight log shows them.
    fn selected_weight(&self) -> Option<&WeightEntry> {
        let history = self.dashboard.workouts.weight_history();
        history.into_iter().rev().nth(self.selected_log)
    }

    fn enter_input(&mut self, mode: InputMode, prompt: &str, prefill: String) {
        self.input_mode = mode;
        self.input_buffer = prefill;
        self.status_message = prompt.to_string();
    }

    fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.status_message = self.tab.hint().to_string();
    }

    fn submit(&mut self) -> Result<String> {
        let line = std::mem::take(&mut self.input_buffer);
        let mode = std::mem::replace(&mut self.input_mode, InputMode::Normal);
        match mode {
            InputMode::LoggingWeight => {
                let form = parse_weight_line(&line)?;
                let user = self.dashboard.user_name.clone();
                let weight = self
                    .dashboard
                    .workouts
                    .log_weight(now_minute(), &user, form.weight, &form.location, form.notes)?
                    .weight;
                self.dashboard.persist()?;
                Ok(format!("Saved weight: {} lbs", weight))
            }
            InputMode::LoggingSession => {
                let (routine, sets) = parse_session_line(&line)?;
                self.dashboard
                    .workouts
                    .log_session(now_minute(), &routine, sets)?;
                self.dashboard.persist()?;
                Ok(format!("Session stored: {}", routine))
            }
            InputMode::EditingWeight(id) => {
                let form = parse_weight_line(&line)?;
                let update = UpdateWeightEntry {
                    weight: Some(form.weight),
                    location: Some(form.location),
                    notes: Some(form.notes),
                    ..Default::default()
                };
                let weight = self.dashboard.workouts.edit_weight(id, update)?.weight;
                self.dashboard.persist()?;
                Ok(format!("Weight entry updated: {} lbs", weight))
            }
            InputMode::EditingSession(id) => {
                let (routine, sets) = parse_session_line(&line)?;
                self.dashboard.workouts.edit_session(id, &routine, sets)?;
                self.dashboard.persist()?;
                Ok(format!("Session updated: {}", routine))
            }
            InputMode::Filtering => {
                self.log_filter = line.trim().to_string();
                self.selected_log = 0;
                Ok(format!("Filter: '{}'", self.log_filter))
            }
            InputMode::RecordingMatch => {
                let new_match = parse_match_line(&line, today())?;
                let recorded = self.dashboard.matches.record_match(&new_match)?;
                Ok(format!("Recorded match #{} of {}", recorded.id, recorded.game))
            }
            InputMode::Normal | InputMode::ConfirmReset => Ok(self.tab.hint().to_string()),
        }
    }

    fn delete_selected_log(&mut self) -> Result<String> {
        if self.show_weight_log {
            let Some(id) = self.selected_weight().map(|w| w.id) else {
                return Ok("No weight entry selected".to_string());
            };
            let removed = self.dashboard.workouts.delete_weight(id)?;
            self.dashboard.persist()?;
            self.clamp_selection();
            Ok(format!("Deleted weight entry from {}", removed.timestamp()))
        } else {
            let Some(id) = self.selected_session().map(|s| s.id) else {
                return Ok("No session selected".to_string());
            };
            let removed = self.dashboard.workouts.delete_session(id)?;
            self.dashboard.persist()?;
            self.clamp_selection();
            Ok(format!("Deleted {} session", removed.routine))
        }
    }

    fn reset_all(&mut self) -> Result<()> {
        self.dashboard.reset_workouts()?;
        self.dashboard.reset_matches()?;
        self.selected_log = 0;
        self.selected_routine = 0;
        self.status_message = "Database reset".to_string();
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
            KeyCode::Tab | KeyCode::Right => self.switch_tab(self.tab.next()),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(self.tab.previous()),
            KeyCode::Char(c @ '1'..='7') => {
                let idx = c as usize - '1' as usize;
                self.switch_tab(Tab::ALL[idx]);
            }
            _ => match (self.tab, code) {
                (Tab::Weight, KeyCode::Char('a')) => {
                    self.enter_input(InputMode::LoggingWeight, WEIGHT_HINT, String::new())
                }
                (Tab::LogWorkout, KeyCode::Char('a')) => {
                    let routine = self
                        .dashboard
                        .workouts
                        .routines()
                        .into_iter()
                        .next()
                        .unwrap_or_default();
                    self.enter_input(InputMode::LoggingSession, SESSION_HINT, format!("{}: ", routine))
                }
                (Tab::Summaries, KeyCode::Char('j') | KeyCode::Down) => {
                    let count = self.dashboard.workouts.routines().len();
                    if count > 0 {
                        self.selected_routine = (self.selected_routine + 1) % count;
                    }
                }
                (Tab::Summaries, KeyCode::Char('k') | KeyCode::Up) => {
                    let count = self.dashboard.workouts.routines().len();
                    if count > 0 {
                        self.selected_routine = (self.selected_routine + count - 1) % count;
                    }
                }
                (Tab::Logs, KeyCode::Char('j') | KeyCode::Down) => self.scroll_down(),
                (Tab::Logs, KeyCode::Char('k') | KeyCode::Up) => self.scroll_up(),
                (Tab::Logs, KeyCode::Char('w')) => {
                    self.show_weight_log = !self.show_weight_log;
                    self.selected_log = 0;
                }
                (Tab::Logs, KeyCode::Char('/')) => {
                    let current = self.log_filter.clone();
                    self.enter_input(InputMode::Filtering, "Filter logs by routine:", current)
                }
                (Tab::Logs, KeyCode::Char('e')) if self.show_weight_log => {
                    if let Some(entry) = self.selected_weight() {
                        let id = entry.id;
                        let prefill = weight_line(entry);
                        self.enter_input(
                            InputMode::EditingWeight(id),
                            &format!("Editing weight entry {}:", id),
                            prefill,
                        );
                    }
                }
                (Tab::Logs, KeyCode::Char('e')) => {
                    if let Some(session) = self.selected_session() {
                        let id = session.id;
                        let prefill = session_line(session);
                        self.enter_input(
                            InputMode::EditingSession(id),
                            &format!("Editing session {}:", id),
                            prefill,
                        );
                    }
                }
                (Tab::Logs, KeyCode::Char('d')) => {
                    self.status_message = self.delete_selected_log()?;
                }
                (Tab::Matches, KeyCode::Char('a')) => {
                    self.enter_input(InputMode::RecordingMatch, MATCH_HINT, String::new())
                }
                (Tab::Matches, KeyCode::Char('d')) => {
                    match self.dashboard.matches.recent_matches(Some(1))?.first() {
                        Some(newest) => {
                            self.dashboard.matches.delete_match(newest.id)?;
                            self.status_message = format!("Deleted match #{}", newest.id);
                        }
                        None => self.status_message = "No matches recorded".to_string(),
                    }
                }
                (Tab::Admin, KeyCode::Char('t')) => {
                    let theme = self.dashboard.toggle_theme();
                    self.status_message = format!("Theme: {:?}", theme);
                }
                (Tab::Admin, KeyCode::Char('p')) => {
                    let generated = self
                        .dashboard
                        .populate_workouts(&mut rand::rng(), now_minute())?;
                    self.selected_log = 0;
                    self.status_message = format!("Generated {} workout records", generated);
                }
                (Tab::Admin, KeyCode::Char('m')) => {
                    let generated = self.dashboard.populate_matches(&mut rand::rng(), today())?;
                    self.status_message = format!("Generated {} matches", generated);
                }
                (Tab::Admin, KeyCode::Char('r')) => {
                    self.input_mode = InputMode::ConfirmReset;
                    self.status_message =
                        "Reset workouts AND matches? y: confirm | any other key: cancel".to_string();
                }
                _ => {}
            },
        }
        Ok(false)
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        let outcome = match self.input_mode {
            InputMode::Normal => self.handle_normal_key(code),
            InputMode::ConfirmReset => {
                self.input_mode = InputMode::Normal;
                if code == KeyCode::Char('y') {
                    self.reset_all().map(|_| false)
                } else {
                    self.status_message = self.tab.hint().to_string();
                    Ok(false)
                }
            }
            _ => match code {
                KeyCode::Enter => self.submit().map(|message| {
                    self.status_message = message;
                    false
                }),
                KeyCode::Esc => {
                    self.cancel_input();
                    Ok(false)
                }
                KeyCode::Char(c) => {
                    self.input_buffer.push(c);
                    Ok(false)
                }
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                    Ok(false)
                }
                _ => Ok(false),
            },
        };

        match outcome {
            Ok(quit) => quit,
            Err(e) => {
                self.status_message = format!("Error: {}", e);
                false
            }
        }
    }
}

pub fn run_dashboard(mut terminal: DefaultTerminal, dashboard: &mut Dashboard) -> Result<()> {
    let mut app = App::new(dashboard);

    loop {
        terminal.draw(|frame| render(frame, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key.code) {
                return Ok(());
            }
        }
    }
}

fn block<'b>(title: impl Into<Line<'b>>, p: &Palette) -> Block<'b> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(p.base)
}

fn heading(text: &str, p: &Palette) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
    ))
}

fn render(frame: &mut Frame, app: &App) {
    let p = palette(app.dashboard.theme);
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(3),
    ])
    .split(frame.area());

    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
        .select(app.tab.index())
        .block(block(format!("Iron Ledger - {}", app.dashboard.user_name), &p))
        .highlight_style(Style::default().fg(p.accent).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    match app.tab {
        Tab::Home => render_home(frame, chunks[1], app, &p),
        Tab::Weight => render_weight(frame, chunks[1], app, &p),
        Tab::LogWorkout => render_log_workout(frame, chunks[1], app, &p),
        Tab::Summaries => render_summaries(frame, chunks[1], app, &p),
        Tab::Logs => render_logs(frame, chunks[1], app, &p),
        Tab::Matches => render_matches(frame, chunks[1], app, &p),
        Tab::Admin => render_admin(frame, chunks[1], app, &p),
    }

    // Footer: the input line while a form is open, the status otherwise
    let footer = match app.input_mode {
        InputMode::Normal | InputMode::ConfirmReset => Paragraph::new(app.status_message.as_str())
            .block(block("Status", &p)),
        _ => Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(block(app.status_message.as_str(), &p)),
    };
    frame.render_widget(footer, chunks[2]);
}

fn recap_lines(recap: &SessionRecap, with_volume: bool) -> Vec<Line<'static>> {
    let pb = if recap.personal_best { "  PB!" } else { "" };
    let mut lines = vec![Line::from(Span::styled(
        format!("{}{}", recap.session.routine, pb),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.extend(
        recap
            .session
            .sets()
            .iter()
            .map(|set| Line::from(format!("- {}", set))),
    );
    if with_volume {
        lines.push(Line::from(format!("Total Volume: {} lbs", recap.volume as i64)));
    }
    lines
}

fn records_table(records: &[PersonalRecord], p: &Palette) -> Table<'static> {
    let header = Row::new(vec![
        "Routine",
        "Max Weight",
        "Reps @ Max",
        "Date of Max",
        "Last Max",
        "Last Reps",
        "Date Last Logged",
    ])
    .style(Style::default().fg(p.accent).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = records
        .iter()
        .map(|r| {
            Row::new(vec![
                r.routine.clone(),
                format!("{} lbs", r.max_weight),
                r.reps_at_max.to_string(),
                format_minute(&r.max_at),
                format!("{} lbs", r.last_max_weight),
                r.last_reps.to_string(),
                format_minute(&r.last_logged_at),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(11),
            Constraint::Percentage(10),
            Constraint::Percentage(18),
            Constraint::Percentage(11),
            Constraint::Percentage(10),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Personal Records & Latest Hits")
            .style(p.base),
    )
}

fn render_home(frame: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let summary = app.dashboard.home(today());
    let rows = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);
    let cols = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[0]);

    let mut left = vec![heading("Current Weight", p)];
    left.push(match &summary.latest_weight {
        Some(entry) => Line::from(format!("Latest: {} lbs", entry.weight)),
        None => Line::from("No weight logged."),
    });
    left.push(Line::from(""));
    left.push(heading("7 Days Ago", p));
    match &summary.week_ago {
        Some(recap) => left.extend(recap_lines(recap, false)),
        None => left.push(Line::from("No session found 7 days ago.")),
    }
    frame.render_widget(
        Paragraph::new(left)
            .wrap(Wrap { trim: true })
            .block(block(format!("Dashboard: {}", app.dashboard.user_name), p)),
        cols[0],
    );

    let right = match &summary.last_session {
        Some(recap) => recap_lines(recap, true),
        None => vec![Line::from(Span::styled(
            "No workouts logged.",
            Style::default().fg(Color::Yellow),
        ))],
    };
    frame.render_widget(
        Paragraph::new(right)
            .wrap(Wrap { trim: true })
            .block(block("Last Session Recap", p)),
        cols[1],
    );

    frame.render_widget(records_table(&summary.records, p), rows[1]);
}

/// Days since `origin`, for chart x values.
fn days_since(origin: NaiveDateTime, at: NaiveDateTime) -> f64 {
    (at - origin).num_minutes() as f64 / 1440.0
}

fn padded_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return [0.0, 1.0];
    }
    let pad = ((hi - lo) * 0.1).max(1.0);
    [lo - pad, hi + pad]
}

fn axis_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        format!("{:.0}", bounds[0]),
        format!("{:.0}", mid),
        format!("{:.0}", bounds[1]),
    ]
}

fn render_weight(frame: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let history = app.dashboard.workouts.weight_history();
    let chunks = Layout::vertical([Constraint::Percentage(60), Constraint::Min(3)]).split(area);

    let Some(first) = history.first() else {
        frame.render_widget(
            Paragraph::new("No weight logged yet.\nPress 'a' to add your first entry!")
                .style(Style::default().fg(p.muted))
                .block(block("Body Weight", p)),
            area,
        );
        return;
    };
    let origin = first.recorded_at;
    let last = history[history.len() - 1].recorded_at;

    let points: Vec<(f64, f64)> = history
        .iter()
        .map(|w| (days_since(origin, w.recorded_at), w.weight))
        .collect();
    let y_bounds = padded_bounds(points.iter().map(|(_, y)| *y));
    let x_max = days_since(origin, last).max(1.0);

    let datasets = vec![
        Dataset::default()
            .name("Weight")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(p.accent))
            .data(&points),
    ];
    let chart = Chart::new(datasets)
        .block(block("Body Weight", p))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(p.muted))
                .bounds([0.0, x_max])
                .labels(vec![
                    origin.date().to_string(),
                    last.date().to_string(),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("lbs")
                .style(Style::default().fg(p.muted))
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );
    frame.render_widget(chart, chunks[0]);

    let items: Vec<ListItem> = history
        .iter()
        .rev()
        .map(|w| {
            ListItem::new(format!(
                "{}  {:.1} lbs  {}{}",
                w.timestamp(),
                w.weight,
                w.location,
                w.notes.as_deref().map(|n| format!("  ({})", n)).unwrap_or_default()
            ))
        })
        .collect();
    frame.render_widget(
        List::new(items).block(block(format!("Entries ({} total)", history.len()), p)),
        chunks[1],
    );
}

fn render_log_workout(frame: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let mut lines = Vec::new();
    if let InputMode::EditingSession(id) = app.input_mode {
        lines.push(Line::from(Span::styled(
            format!("Editing Session ID: {}", id),
            Style::default().fg(Color::Yellow),
        )));
        lines.push(Line::from(""));
    }
    lines.push(heading("Training Entry", p));
    lines.push(Line::from(
        "Press 'a' and type the routine followed by its sets, e.g. 'Bench Press: 135x5, 145x3'.",
    ));
    lines.push(Line::from(""));
    lines.push(heading("Routines", p));
    lines.extend(
        app.dashboard
            .workouts
            .routines()
            .into_iter()
            .map(|r| Line::from(format!("- {}", r))),
    );
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block("Log Workout", p)),
        area,
    );
}

fn render_summaries(frame: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let chunks = Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)]).split(area);
    let summary = app.dashboard.home(today());
    frame.render_widget(records_table(&summary.records, p), chunks[0]);

    let routines = app.dashboard.workouts.routines();
    let Some(routine) = routines.get(app.selected_routine % routines.len().max(1)) else {
        return;
    };
    let trend = strength_trend(app.dashboard.workouts.sessions(), routine);
    let title = format!("Visual Strength Trends - {} (j/k)", routine);
    let (Some(first), Some(last)) = (trend.first(), trend.last()) else {
        frame.render_widget(
            Paragraph::new(format!("No sessions logged for {}.", routine))
                .style(Style::default().fg(p.muted))
                .block(block(title, p)),
            chunks[1],
        );
        return;
    };

    let origin = first.at;
    let maxes: Vec<(f64, f64)> = trend
        .iter()
        .map(|t| (days_since(origin, t.at), t.max_weight))
        .collect();
    let averages: Vec<(f64, f64)> = trend
        .iter()
        .filter_map(|t| t.moving_average.map(|avg| (days_since(origin, t.at), avg)))
        .collect();
    let y_bounds = padded_bounds(maxes.iter().map(|(_, y)| *y));

    let mut datasets = vec![
        Dataset::default()
            .name("Max Weight")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Rgb(255, 75, 75)))
            .data(&maxes),
    ];
    if !averages.is_empty() {
        datasets.push(
            Dataset::default()
                .name("30D Moving Avg")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(p.accent))
                .data(&averages),
        );
    }

    let chart = Chart::new(datasets)
        .block(block(title, p))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(p.muted))
                .bounds([0.0, days_since(origin, last.at).max(1.0)])
                .labels(vec![origin.date().to_string(), last.at.date().to_string()]),
        )
        .y_axis(
            Axis::default()
                .title("lbs")
                .style(Style::default().fg(p.muted))
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );
    frame.render_widget(chart, chunks[1]);
}

fn render_logs(frame: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let (items, title): (Vec<ListItem>, String) = if app.show_weight_log {
        let history = app.dashboard.workouts.weight_history();
        let items = history
            .iter()
            .rev()
            .enumerate()
            .map(|(idx, w)| {
                let content = format!(
                    "{}  {} lbs  {}  {}",
                    w.timestamp(),
                    w.weight,
                    w.location,
                    w.notes.as_deref().unwrap_or("")
                );
                let style = if idx == app.selected_log {
                    p.highlight
                } else {
                    Style::default()
                };
                ListItem::new(content).style(style)
            })
            .collect();
        (items, format!("Weight History ({} total)", history.len()))
    } else {
        let sessions = app.visible_sessions();
        let items = sessions
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                let sets = s
                    .sets()
                    .iter()
                    .map(|set| set.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                let content = format!("{} - {}: {}", s.timestamp(), s.routine, sets);
                let style = if idx == app.selected_log {
                    p.highlight
                } else {
                    Style::default()
                };
                ListItem::new(content).style(style)
            })
            .collect();
        let filter = if app.log_filter.is_empty() {
            String::new()
        } else {
            format!(", filter '{}'", app.log_filter)
        };
        (items, format!("Workout History ({} shown{})", sessions.len(), filter))
    };

    if items.is_empty() {
        frame.render_widget(
            Paragraph::new("Nothing logged yet.")
                .style(Style::default().fg(p.muted))
                .block(block(title, p)),
            area,
        );
        return;
    }

    let mut list_state = ListState::default();
    list_state.select(Some(app.selected_log));
    frame.render_stateful_widget(List::new(items).block(block(title, p)), area, &mut list_state);
}

fn render_matches(frame: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let overview = match app.dashboard.match_overview() {
        Ok(overview) => overview,
        Err(e) => {
            frame.render_widget(
                Paragraph::new(format!("Could not load matches: {}", e))
                    .style(Style::default().fg(Color::Red))
                    .block(block("Matches", p)),
                area,
            );
            return;
        }
    };
    let rows = Layout::vertical([Constraint::Percentage(45), Constraint::Percentage(55)]).split(area);
    let top = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[0]);
    let bottom = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[1]);
    let header_style = Style::default().fg(p.accent).add_modifier(Modifier::BOLD);

    let streak_rows: Vec<Row> = overview
        .streaks
        .iter()
        .map(|s| Row::new(vec![s.player.clone(), s.game.clone(), s.count.to_string()]))
        .collect();
    frame.render_widget(
        Table::new(
            streak_rows,
            [
                Constraint::Percentage(45),
                Constraint::Percentage(40),
                Constraint::Percentage(15),
            ],
        )
        .header(Row::new(vec!["Player", "Game", "Streak"]).style(header_style))
        .block(block("Hot Streaks", p)),
        top[0],
    );

    let quick_lines = match &overview.quick_stats {
        Some(stats) => {
            let mut lines = vec![heading(
                &format!("{}: {} matches this sitting", stats.game, stats.matches_played()),
                p,
            )];
            lines.extend(
                stats
                    .wins
                    .iter()
                    .map(|(player, wins)| Line::from(format!("{:<16} {} wins", player, wins))),
            );
            lines
        }
        None => vec![Line::from("No matches recorded.")],
    };
    frame.render_widget(
        Paragraph::new(quick_lines).block(block("Session Quick Stats", p)),
        top[1],
    );

    let standing_rows: Vec<Row> = overview
        .standings
        .iter()
        .flat_map(|standing| {
            standing.records.iter().map(move |r| {
                Row::new(vec![
                    standing.game.clone(),
                    r.player.clone(),
                    r.wins.to_string(),
                    r.losses.to_string(),
                    r.win_percentage(),
                ])
            })
        })
        .collect();
    frame.render_widget(
        Table::new(
            standing_rows,
            [
                Constraint::Percentage(28),
                Constraint::Percentage(30),
                Constraint::Percentage(14),
                Constraint::Percentage(14),
                Constraint::Percentage(14),
            ],
        )
        .header(Row::new(vec!["Game", "Player", "W", "L", "Win %"]).style(header_style))
        .block(block("Standings", p)),
        bottom[0],
    );

    let recent: Vec<ListItem> = app
        .dashboard
        .matches
        .recent_matches(Some(20))
        .unwrap_or_default()
        .into_iter()
        .map(|m| {
            ListItem::new(format!(
                "#{} {} {} {}: {} > {}",
                m.id,
                m.date_label(),
                m.time,
                m.game,
                m.winners,
                m.losers
            ))
        })
        .collect();
    frame.render_widget(List::new(recent).block(block("Recent Matches", p)), bottom[1]);
}

fn render_admin(frame: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let theme = match app.dashboard.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    let lines = vec![
        heading("System Controls", p),
        Line::from(format!("User: {}", app.dashboard.user_name)),
        Line::from(format!("Theme: {} (t to toggle)", theme)),
        Line::from(format!(
            "Sessions: {}  Weight entries: {}",
            app.dashboard.workouts.sessions().len(),
            app.dashboard.workouts.weights().len()
        )),
        Line::from(""),
        Line::from("p: populate workout history (replaces current workouts)"),
        Line::from("m: populate players, games and matches"),
        Line::from(Span::styled(
            "r: reset everything",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block("Admin", p)), area);
}
