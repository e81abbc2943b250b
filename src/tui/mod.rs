//! Ratatui-based interactive session.
//!
//! The TUI is the form-and-table front end: enter one observation at a time,
//! watch the table grow, request a fit, and export the table or the chart.
//! All numeric work goes through `app::Session`.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table},
    Terminal,
};

use crate::app::{Session, SessionState};
use crate::cli::TuiArgs;
use crate::domain::{FitResult, ObservationInput};
use crate::error::{AppError, FitError};

mod plotters_chart;

use plotters_chart::HubblePlottersChart;

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let session = match &args.file {
        Some(path) => crate::app::load_session(path)?,
        None => Session::new(),
    };

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(session, args.export_dir);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Form field labels, in display order.
const FIELD_LABELS: [&str; 5] = [
    "Galaxy Name",
    "Object Name",
    "Apparent Magnitude (m)",
    "K-line (Measured, Å)",
    "H-line (Measured, Å)",
];

/// Indexes of the numeric fields.
const FIRST_NUMERIC_FIELD: usize = 2;

struct App {
    session: Session,
    fields: [String; 5],
    selected_field: usize,
    editing: bool,
    /// Text of the field before editing started, restored on Esc.
    edit_backup: String,
    /// Outcome of the last fit request; cleared by every submission.
    fit: Option<Result<FitResult, FitError>>,
    status: String,
    export_dir: PathBuf,
}

impl App {
    fn new(session: Session, export_dir: PathBuf) -> Self {
        let status = if session.store().is_empty() {
            "Enter an observation and press s to submit.".to_string()
        } else {
            format!("Loaded {} observations.", session.store().len())
        };
        Self {
            session,
            fields: default_fields(),
            selected_field: 0,
            editing: false,
            edit_backup: String::new(),
            fit: None,
            status,
            export_dir,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_field_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Tab => {
                self.selected_field = (self.selected_field + 1) % FIELD_LABELS.len();
            }
            KeyCode::Enter => {
                self.editing = true;
                self.edit_backup = self.fields[self.selected_field].clone();
                self.status = format!(
                    "Editing {}. Enter to apply, Esc to cancel.",
                    FIELD_LABELS[self.selected_field]
                );
            }
            KeyCode::Char('s') => self.submit(),
            KeyCode::Char('f') => self.compute_fit(),
            KeyCode::Char('e') => self.export_csv(),
            KeyCode::Char('p') => self.export_png(),
            _ => {}
        }

        false
    }

    fn handle_field_edit(&mut self, code: KeyCode) {
        let numeric = self.selected_field >= FIRST_NUMERIC_FIELD;
        let field = &mut self.fields[self.selected_field];
        match code {
            KeyCode::Esc => {
                *field = std::mem::take(&mut self.edit_backup);
                self.editing = false;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                self.status = format!("{} = {}", FIELD_LABELS[self.selected_field], field);
            }
            KeyCode::Backspace => {
                field.pop();
            }
            KeyCode::Char(c) => {
                if !numeric || c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
                    field.push(c);
                }
            }
            _ => {}
        }
    }

    fn submit(&mut self) {
        let input = match parse_form(&self.fields) {
            Ok(input) => input,
            Err(message) => {
                self.status = message;
                return;
            }
        };

        match self.session.submit(&input) {
            Ok(obs) => {
                self.status = format!("✅ {}", crate::report::format_submission(obs));
                // The previous fit no longer describes the table.
                self.fit = None;
            }
            Err(e) => self.status = format!("Rejected: {e}"),
        }
    }

    fn compute_fit(&mut self) {
        let fit = self.session.compute_fit();
        self.status = match &fit {
            Ok(f) => {
                let age = match &f.age_years {
                    Ok(years) => format!("Age of Universe= {}", crate::report::format_age(*years)),
                    Err(e) => format!("Warning: {e}"),
                };
                format!("Hubble Constant= {:.2} km/s/Mpc | {age}", f.hubble_constant())
            }
            Err(e) => crate::report::format_fit_error(e),
        };
        self.fit = Some(fit);
    }

    fn export_csv(&mut self) {
        if self.session.store().is_empty() {
            self.status = "Nothing to export yet.".to_string();
            return;
        }
        let path = self.export_path("hubble_results", "csv");
        self.status = match crate::io::write_results_csv(&path, self.session.observations()) {
            Ok(()) => format!("💾 Wrote {}", path.display()),
            Err(e) => format!("Export failed: {e}"),
        };
    }

    fn export_png(&mut self) {
        if self.session.store().is_empty() {
            self.status = "Nothing to plot yet.".to_string();
            return;
        }
        // Drawn from the table as it is now, independent of the on-screen fit.
        let fit = crate::fit::fit_hubble(self.session.observations()).ok();
        let series = crate::plot::plot_series(self.session.observations(), fit.as_ref());
        let path = self.export_path("hubble_plot", "png");
        self.status = match crate::io::write_plot_png(&path, &series, 1200, 900) {
            Ok(()) => format!("⬇ Wrote {}", path.display()),
            Err(e) => format!("Export failed: {e}"),
        };
    }

    fn export_path(&self, stem: &str, ext: &str) -> PathBuf {
        let ts = Local::now().format("%Y%m%d_%H%M%S");
        self.export_dir.join(format!("{stem}_{ts}.{ext}"))
    }

    fn current_fit(&self) -> Option<&FitResult> {
        self.fit.as_ref().and_then(|f| f.as_ref().ok())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("hubble", Style::default().fg(Color::Cyan)),
            Span::raw(": Hubble Constant Calculator"),
        ]));

        let state = match self.session.state() {
            SessionState::Empty => "empty",
            SessionState::HasData => "has data",
            SessionState::FitComputed => "fit computed",
        };
        let fit_text = match &self.fit {
            Some(Ok(f)) => {
                let r2 = f
                    .quality
                    .r_squared
                    .map(|v| format!("{v:.4}"))
                    .unwrap_or_else(|| "n/a".to_string());
                format!(
                    "H0={:.2} km/s/Mpc | intercept={:.2} km/s | R²={r2}",
                    f.line.slope, f.line.intercept
                )
            }
            Some(Err(e)) => e.to_string(),
            None => "no fit (press f)".to_string(),
        };
        lines.push(Line::from(Span::styled(
            format!("observations: {} | state: {state} | {fit_text}", self.session.store().len()),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::LEFT | Borders::RIGHT | Borders::TOP));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(FIELD_LABELS.len() as u16 + 2), Constraint::Min(0)])
            .split(columns[0]);

        self.draw_form(frame, left[0]);
        self.draw_table(frame, left[1]);
        self.draw_chart(frame, columns[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = FIELD_LABELS
            .iter()
            .zip(&self.fields)
            .enumerate()
            .map(|(i, (label, value))| {
                let cursor = if self.editing && i == self.selected_field { "▏" } else { "" };
                ListItem::new(format!("{label}: {value}{cursor}"))
            })
            .collect();

        let title = if self.editing { "Observation (editing)" } else { "Observation" };
        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let observations = self.session.observations();
        let residuals = self.current_fit().map(|f| f.residuals.as_slice());

        // Keep the newest rows visible.
        let visible = area.height.saturating_sub(3) as usize;
        let start = observations.len().saturating_sub(visible.max(1));

        let rows: Vec<Row> = observations
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, o)| {
                let resid = residuals
                    .and_then(|r| r.get(i))
                    .map(|r| format!("{r:.1}"))
                    .unwrap_or_default();
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(o.galaxy.clone()),
                    Cell::from(o.object.clone()),
                    Cell::from(format!("{:.2}", o.m)),
                    Cell::from(format!("{:.2}", o.delta_k)),
                    Cell::from(format!("{:.2}", o.delta_h)),
                    Cell::from(format!("{:.1}", o.velocity)),
                    Cell::from(format!("{:.2}", o.distance)),
                    Cell::from(resid),
                ])
            })
            .collect();

        let header = Row::new(vec!["#", "Galaxy", "Object", "m", "ΔK(Å)", "ΔH(Å)", "v(km/s)", "d(Mpc)", "resid"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let widths = [
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Min(6),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(7),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().title("Observation Summary").borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Hubble Relation").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.session.store().is_empty() {
            let msg = Paragraph::new("No observations yet.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let series = crate::plot::plot_series(self.session.observations(), self.current_fit());

        let (chart_rect, insets) = chart_layout(inner);
        let widget = HubblePlottersChart {
            points: &series.points,
            line: series.line,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_label: "distance (Mpc)",
            y_label: "velocity (km/s)",
            fmt_x: fmt_axis,
            fmt_y: fmt_axis,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, series.x_bounds, series.y_bounds);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = if self.editing {
            "type value  Backspace delete  Enter apply  Esc cancel"
        } else {
            "↑/↓ select  Enter edit  s submit  f fit  e export CSV  p export PNG  q quit"
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn default_fields() -> [String; 5] {
    [
        String::new(),
        String::new(),
        "15.0".to_string(),
        "3950.0".to_string(),
        "3985.0".to_string(),
    ]
}

/// Turn the form text into a submission; range checks happen in the session.
fn parse_form(fields: &[String; 5]) -> Result<ObservationInput, String> {
    let number = |i: usize| -> Result<f64, String> {
        let text = fields[i].trim();
        text.parse::<f64>()
            .map_err(|_| format!("{}: '{text}' is not a number.", FIELD_LABELS[i]))
    };

    Ok(ObservationInput {
        galaxy: fields[0].trim().to_string(),
        object: fields[1].trim().to_string(),
        m: number(2)?,
        k_measured: number(3)?,
        h_measured: number(4)?,
    })
}

fn fmt_axis(v: f64) -> String {
    format!("{v:.0}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.0}");
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.0}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("distance (Mpc)")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("km/s")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
