mod alerts;
mod analysis;
mod app;
mod chart;
mod config;
mod db;
mod error;
mod event;
mod jobs;
mod logging;
mod session;
mod table;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::{error, info};

use analysis::AnalysisClient;
use app::{App, Focus, GridView, Tab};
use config::AppConfig;
use event::{map_global_key, poll_event, Action};
use ui::{
    render_alerts, render_analysis_tab, render_chart_tab, render_connection_dialog, render_grid,
    render_query_panel, FormInput, QueryButton, Theme,
};

/// Terminal dashboard: run SQL, chart the result, ask a local model about it.
#[derive(Debug, Parser)]
#[command(name = "sqlboard", version, about)]
struct Args {
    /// Configuration file (defaults to <config dir>/sqlboard/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `sqlboard=trace`; RUST_LOG takes precedence
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;

    let level = args.log_level.as_deref().unwrap_or(&config.log.level);
    let _log_guard = logging::init_logging(level);
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let client = AnalysisClient::from_config(&config.llm).context("building HTTP client")?;
    let mut app = App::new(config, client);
    let theme = Theme::default();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &theme).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "terminal loop failed");
        eprintln!("Error: {err}");
    }
    info!("exiting");

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<'_>,
    theme: &Theme,
) -> Result<()> {
    let tick = app.config.ui.tick();
    loop {
        terminal.draw(|frame| draw(frame, app, theme))?;

        if let Some(event) = poll_event(tick)? {
            if app.connection_form.is_some() {
                handle_connection_event(app, event);
            } else {
                handle_dashboard_event(app, event);
            }
        }

        app.on_tick(Instant::now());

        if app.should_quit {
            app.jobs.cancel();
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, app: &mut App<'_>, theme: &Theme) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(10), Constraint::Length(1)]).areas(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(5)])
        .split(columns[0]);

    let connection = app.session.connection_string.as_deref().map(db::redact);
    let button_region = render_query_panel(
        frame,
        left[0],
        &app.query_input,
        app.focus == Focus::Query,
        app.hovered_button,
        connection.as_deref(),
        theme,
    );
    app.button_region = Some(button_region);

    let caption = app.grid_caption();
    let grid_table = match app.grid_view {
        GridView::Result => app.session.working.as_ref(),
        GridView::ChartRows => app.session.working.as_ref().map(|_| &app.composition.table),
    };
    render_grid(
        frame,
        left[1],
        grid_table,
        &caption,
        &mut app.grid,
        app.cell_editor.as_ref(),
        app.focus == Focus::Grid,
        theme,
    );

    let side_focused = app.focus == Focus::Side;
    match app.tab {
        Tab::Chart => render_chart_tab(
            frame,
            columns[1],
            app.columns(),
            &app.composition,
            &app.controls,
            side_focused,
            theme,
        ),
        Tab::Analysis => {
            let running = app.running_status().filter(|_| {
                app.jobs.current() == Some(jobs::JobKind::Analysis)
            });
            render_analysis_tab(
                frame,
                columns[1],
                app.session.analysis.as_deref(),
                running.as_deref(),
                app.analysis_scroll,
                side_focused,
                theme,
            );
        }
    }

    render_status_line(frame, status_area, app, theme);

    if let Some(form) = &app.connection_form {
        render_connection_dialog(frame, form, theme);
    }
    render_alerts(frame, &app.alerts, theme);
}

fn render_status_line(frame: &mut Frame, area: ratatui::layout::Rect, app: &App<'_>, theme: &Theme) {
    let mut spans = Vec::new();
    if let Some(status) = app.running_status() {
        spans.push(Span::styled(format!("{status}  "), theme.accent_style()));
    }
    let tab = match app.tab {
        Tab::Chart => "Chart",
        Tab::Analysis => "Analysis",
    };
    spans.push(Span::styled(
        format!(
            "F2 MySQL setup | F5 run | ^R re-run | F3 tab [{tab}] | F4 analysis | F6 chart rows | Tab focus | Esc cancel/quit"
        ),
        theme.muted_style(),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn handle_connection_event(app: &mut App<'_>, event: Event) {
    let Event::Key(key) = event else {
        return;
    };
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }
    let Some(form) = app.connection_form.as_mut() else {
        return;
    };
    match form.input(key) {
        FormInput::Confirm => app.confirm_connection(),
        FormInput::Cancel => app.cancel_connection_dialog(),
        FormInput::Edited | FormInput::Ignored => {}
    }
}

fn handle_dashboard_event(app: &mut App<'_>, event: Event) {
    match event {
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let button = app
                    .button_region
                    .map_or(QueryButton::None, |r| r.hit_test(mouse.column, mouse.row));
                match button {
                    QueryButton::Run => app.submit_query(false),
                    QueryButton::Clear => app.clear_query(),
                    QueryButton::None => {}
                }
            }
            MouseEventKind::Moved => {
                app.hovered_button = app
                    .button_region
                    .map_or(QueryButton::None, |r| r.hit_test(mouse.column, mouse.row));
            }
            MouseEventKind::ScrollUp if app.focus == Focus::Grid => app.move_grid(-1, 0),
            MouseEventKind::ScrollDown if app.focus == Focus::Grid => app.move_grid(1, 0),
            _ => {}
        },
        Event::Key(key) => handle_key(app, key),
        _ => {}
    }
}

fn handle_key(app: &mut App<'_>, key: KeyEvent) {
    if app.cell_editor.is_some() {
        match key.code {
            KeyCode::Enter => app.commit_cell_edit(),
            KeyCode::Esc => app.cell_editor = None,
            _ => {
                if let Some(editor) = app.cell_editor.as_mut() {
                    editor.input(key);
                }
            }
        }
        return;
    }

    if let Some(action) = map_global_key(key) {
        match action {
            Action::Quit => app.should_quit = true,
            Action::Escape => {
                if app.cancel_job() {
                    return;
                }
                if app.alerts.is_empty() {
                    app.should_quit = true;
                } else {
                    app.alerts.dismiss_all();
                }
            }
            Action::OpenConnection => app.open_connection_dialog(),
            Action::RunQuery => app.submit_query(false),
            Action::ForceRunQuery => app.submit_query(true),
            Action::SwitchTab => app.switch_tab(),
            Action::RunAnalysis => app.run_analysis(),
            Action::ToggleGridView => app.toggle_grid_view(),
            Action::CycleFocus => app.focus = app.focus.next(),
            Action::CycleFocusBack => app.focus = app.focus.prev(),
        }
        return;
    }

    match app.focus {
        Focus::Query => {
            app.query_input.input(key);
        }
        Focus::Grid => match key.code {
            KeyCode::Up => app.move_grid(-1, 0),
            KeyCode::Down => app.move_grid(1, 0),
            KeyCode::Left => app.move_grid(0, -1),
            KeyCode::Right => app.move_grid(0, 1),
            KeyCode::PageUp => app.move_grid(-10, 0),
            KeyCode::PageDown => app.move_grid(10, 0),
            KeyCode::Enter => app.begin_cell_edit(),
            KeyCode::Char('z') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.reset_working_copy()
            }
            _ => {}
        },
        Focus::Side => match app.tab {
            Tab::Chart => match key.code {
                KeyCode::Left => app.controls.focus_by(-1),
                KeyCode::Right => app.controls.focus_by(1),
                KeyCode::Up => app.change_chart_control(-1),
                KeyCode::Down => app.change_chart_control(1),
                KeyCode::Char(' ') => app.toggle_chart_control(),
                KeyCode::Char('[') => app.move_hover(-1),
                KeyCode::Char(']') => app.move_hover(1),
                _ => {}
            },
            Tab::Analysis => match key.code {
                KeyCode::Up => app.analysis_scroll = app.analysis_scroll.saturating_sub(1),
                KeyCode::Down => app.analysis_scroll = app.analysis_scroll.saturating_add(1),
                _ => {}
            },
        },
    }
}
