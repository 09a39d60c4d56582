use std::time::Instant;

use tracing::{info, warn};
use tui_textarea::TextArea;

use crate::alerts::{AlertLevel, Alerts};
use crate::analysis::{build_prompt, AnalysisClient};
use crate::chart::{compose, Composition};
use crate::config::AppConfig;
use crate::db::{apply_query_result, plan_query, redact, ConnectionParams, QueryPlan};
use crate::jobs::{JobOutcome, JobRunner};
use crate::session::Session;
use crate::table::{Table, Value};
use crate::ui::{ButtonRegion, ChartControls, ConnectionForm, GridState, QueryButton};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Query,
    Grid,
    Side,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Query => Focus::Grid,
            Focus::Grid => Focus::Side,
            Focus::Side => Focus::Query,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Query => Focus::Side,
            Focus::Grid => Focus::Query,
            Focus::Side => Focus::Grid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Chart,
    Analysis,
}

/// What the grid pane shows: the editable result, or the rows the chart
/// was drawn from after date filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridView {
    Result,
    ChartRows,
}

fn editor<'a>(lines: Vec<String>) -> TextArea<'a> {
    let mut ta = TextArea::new(lines);
    ta.set_cursor_line_style(ratatui::style::Style::default());
    ta
}

pub struct App<'a> {
    pub config: AppConfig,
    pub session: Session,
    pub focus: Focus,
    pub tab: Tab,
    pub connection_form: Option<ConnectionForm<'a>>,
    connection_params: ConnectionParams,
    pub query_input: TextArea<'a>,
    pub hovered_button: QueryButton,
    pub button_region: Option<ButtonRegion>,
    pub grid: GridState,
    pub grid_view: GridView,
    pub cell_editor: Option<TextArea<'a>>,
    pub controls: ChartControls,
    pub composition: Composition,
    pub alerts: Alerts,
    pub jobs: JobRunner,
    analysis_client: AnalysisClient,
    pub analysis_scroll: u16,
    pub ticks: usize,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(config: AppConfig, analysis_client: AnalysisClient) -> Self {
        Self {
            connection_params: ConnectionParams::from_defaults(&config.connection),
            alerts: Alerts::new(config.ui.alert_duration()),
            config,
            session: Session::new(),
            focus: Focus::Query,
            tab: Tab::Chart,
            connection_form: None,
            query_input: editor(Vec::new()),
            hovered_button: QueryButton::None,
            button_region: None,
            grid: GridState::default(),
            grid_view: GridView::Result,
            cell_editor: None,
            controls: ChartControls::default(),
            composition: Composition::default(),
            jobs: JobRunner::new(),
            analysis_client,
            analysis_scroll: 0,
            ticks: 0,
            should_quit: false,
        }
    }

    pub fn open_connection_dialog(&mut self) {
        self.connection_form = Some(ConnectionForm::new(self.connection_params.clone()));
    }

    pub fn cancel_connection_dialog(&mut self) {
        self.connection_form = None;
    }

    pub fn confirm_connection(&mut self) {
        let Some(form) = self.connection_form.take() else {
            return;
        };
        let params = form.params();
        let connection_string = params.connection_string();
        info!(database = %redact(&connection_string), "connection string updated");
        self.session.set_connection_string(connection_string);
        self.connection_params = params;
        self.alerts.push(AlertLevel::Success, "Connection string saved successfully!");
    }

    pub fn query_text(&self) -> String {
        self.query_input.lines().join("\n")
    }

    pub fn clear_query(&mut self) {
        self.query_input = editor(Vec::new());
    }

    fn refuse_if_busy(&mut self) -> bool {
        let Some(kind) = self.jobs.current() else {
            return false;
        };
        self.alerts.push(
            AlertLevel::Info,
            format!("{} Press Esc to cancel it first.", kind.status()),
        );
        true
    }

    pub fn submit_query(&mut self, force: bool) {
        if self.refuse_if_busy() {
            return;
        }
        let text = self.query_text();
        match plan_query(&mut self.session, &text, force) {
            QueryPlan::Skip => {}
            QueryPlan::MissingConnection => {
                warn!("query submitted without a connection string");
                self.alerts.push(
                    AlertLevel::Warning,
                    crate::error::QueryError::MissingConnection.to_string(),
                );
            }
            QueryPlan::Cached => {
                self.alerts.push(AlertLevel::Info, "Result is up to date. Ctrl+R runs it again.");
            }
            QueryPlan::Run(key) => self.jobs.spawn_query(key, self.config.query.timeout()),
        }
    }

    pub fn run_analysis(&mut self) {
        if self.refuse_if_busy() {
            return;
        }
        self.tab = Tab::Analysis;
        match build_prompt(self.session.table.as_ref()) {
            Ok(prompt) => {
                info!(model = self.analysis_client.model(), "requesting analysis");
                self.jobs.spawn_analysis(self.analysis_client.clone(), prompt);
            }
            Err(e) => self.alerts.push(AlertLevel::Warning, e.to_string()),
        }
    }

    pub fn cancel_job(&mut self) -> bool {
        match self.jobs.cancel() {
            Some(kind) => {
                self.alerts.push(AlertLevel::Info, format!("Cancelled: {}", kind.status()));
                true
            }
            None => false,
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.ticks = self.ticks.wrapping_add(1);
        if self.jobs.is_busy() {
            while let Some(outcome) = self.jobs.try_recv() {
                self.apply_outcome(outcome);
            }
        }
        self.alerts.prune(now);
    }

    pub fn apply_outcome(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Query { key, result } => {
                match apply_query_result(&mut self.session, key, result) {
                    Ok(()) => {
                        self.grid.reset();
                        self.cell_editor = None;
                        if let Some(working) = &self.session.working {
                            info!(rows = working.row_count(), "result table replaced");
                            self.controls.sync_columns(&working.columns);
                        }
                        self.recompose();
                    }
                    Err(e) => {
                        self.alerts.push(AlertLevel::Error, e.headline());
                        self.alerts.push(AlertLevel::Warning, e.detail());
                    }
                }
            }
            JobOutcome::Analysis(Ok(text)) => {
                self.session.store_analysis(text);
                self.analysis_scroll = 0;
                self.alerts.push(AlertLevel::Success, "Analysis ready");
            }
            JobOutcome::Analysis(Err(e)) => {
                warn!(error = %e, "analysis failed");
                self.alerts.push(AlertLevel::Error, "Analysis failed");
                self.alerts.push(AlertLevel::Warning, e.to_string());
            }
        }
    }

    /// Re-runs the date filter and chart builder over the working copy.
    pub fn recompose(&mut self) {
        self.composition = match &self.session.working {
            Some(working) => compose(working, &self.controls.spec, self.controls.range),
            None => Composition::default(),
        };
        let marks = self.composition.figure.as_ref().map_or(0, |f| f.hover_len());
        if self.controls.hover >= marks {
            self.controls.hover = 0;
        }
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.session.working.as_ref().map(|t| t.columns.as_slice())
    }

    pub fn is_edited(&self) -> bool {
        self.session.working != self.session.table
    }

    pub fn grid_table(&self) -> Option<&Table> {
        let working = self.session.working.as_ref()?;
        Some(match self.grid_view {
            GridView::Result => working,
            GridView::ChartRows => &self.composition.table,
        })
    }

    pub fn grid_caption(&self) -> String {
        match self.grid_view {
            GridView::Result if self.is_edited() => "Table Preview [edited]".to_string(),
            GridView::Result => "Table Preview".to_string(),
            GridView::ChartRows if self.composition.range.is_some() => {
                "Chart Rows [date filtered]".to_string()
            }
            GridView::ChartRows => "Chart Rows".to_string(),
        }
    }

    pub fn toggle_grid_view(&mut self) {
        self.grid_view = match self.grid_view {
            GridView::Result => GridView::ChartRows,
            GridView::ChartRows => GridView::Result,
        };
        self.grid.reset();
        self.cell_editor = None;
    }

    pub fn move_grid(&mut self, d_row: isize, d_col: isize) {
        if let Some((rows, cols)) = self.grid_table().map(|t| (t.row_count(), t.column_count())) {
            self.grid.move_by(d_row, d_col, rows, cols);
        }
    }

    pub fn begin_cell_edit(&mut self) {
        if self.grid_view == GridView::ChartRows {
            self.alerts
                .push(AlertLevel::Info, "Chart rows are read-only. F6 shows the result table.");
            return;
        }
        let Some(cell) = self
            .session
            .working
            .as_ref()
            .and_then(|t| t.cell(self.grid.row, self.grid.col))
        else {
            return;
        };
        let text = if cell.is_null() { String::new() } else { cell.to_string() };
        self.cell_editor = Some(editor(vec![text]));
    }

    pub fn commit_cell_edit(&mut self) {
        let Some(edit) = self.cell_editor.take() else {
            return;
        };
        let value = Value::parse_input(&edit.lines().join(""));
        if let Some(working) = self.session.working.as_mut() {
            if working.set_cell(self.grid.row, self.grid.col, value) {
                self.recompose();
            }
        }
    }

    pub fn reset_working_copy(&mut self) {
        if self.session.table.is_none() {
            return;
        }
        self.session.reset_working_copy();
        self.cell_editor = None;
        self.recompose();
        self.alerts.push(AlertLevel::Info, "Edits discarded");
    }

    /// Up/Down on the chart controls (`delta` -1 / +1).
    pub fn change_chart_control(&mut self, delta: isize) {
        let columns = self.columns().map(<[String]>::to_vec).unwrap_or_default();
        if self.controls.change(delta, &columns, &self.composition) {
            self.recompose();
        }
    }

    pub fn toggle_chart_control(&mut self) {
        let columns = self.columns().map(<[String]>::to_vec).unwrap_or_default();
        if self.controls.toggle(&columns) {
            self.recompose();
        }
    }

    pub fn move_hover(&mut self, delta: isize) {
        let marks = self.composition.figure.as_ref().map_or(0, |f| f.hover_len());
        self.controls.move_hover(delta, marks);
    }

    pub fn switch_tab(&mut self) {
        self.tab = match self.tab {
            Tab::Chart => Tab::Analysis,
            Tab::Analysis => Tab::Chart,
        };
    }

    pub fn running_status(&self) -> Option<String> {
        let kind = self.jobs.current()?;
        let spinner = crate::ui::icons::SPINNER[self.ticks / 4 % crate::ui::icons::SPINNER.len()];
        Some(format!("{spinner} {}  (Esc to cancel)", kind.status()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sqlx::Connection;

    use super::*;
    use crate::analysis::tests::fake_ollama;
    use crate::chart::{ChartKind, DateRange, FigureBody};
    use crate::jobs::JobKind;
    use crate::ui::ConnectionField;

    fn app() -> App<'static> {
        let config = AppConfig::default();
        let client = AnalysisClient::from_config(&config.llm).unwrap();
        App::new(config, client)
    }

    fn type_query(app: &mut App, text: &str) {
        app.query_input = editor(text.lines().map(str::to_string).collect());
    }

    fn messages(app: &App) -> Vec<(AlertLevel, String)> {
        app.alerts.iter().map(|a| (a.level, a.message.clone())).collect()
    }

    async fn settle(app: &mut App<'_>) {
        for _ in 0..300 {
            if !app.jobs.is_busy() {
                return;
            }
            app.on_tick(Instant::now());
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job did not finish");
    }

    async fn seeded_sqlite() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("shop.db").display());
        let mut conn = sqlx::SqliteConnection::connect(&format!("{url}?mode=rwc"))
            .await
            .unwrap();
        sqlx::query("CREATE TABLE orders (city TEXT, revenue INTEGER)")
            .execute(&mut conn)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO orders VALUES ('Paris', 100), ('Lyon', 80), ('Paris', 20), ('Nantes', 40)",
        )
        .execute(&mut conn)
        .await
        .unwrap();
        conn.close().await.unwrap();
        (dir, url)
    }

    #[test]
    fn confirming_the_dialog_stores_the_connection_string() {
        let mut app = app();
        app.open_connection_dialog();
        if let Some(form) = app.connection_form.as_mut() {
            form.set_value(ConnectionField::Password, "pw");
        }
        app.confirm_connection();

        assert_eq!(
            app.session.connection_string.as_deref(),
            Some("mysql://newuser:pw@localhost:3306/classicmodels")
        );
        assert_eq!(
            messages(&app),
            vec![(AlertLevel::Success, "Connection string saved successfully!".into())]
        );
    }

    #[test]
    fn cancelling_the_dialog_changes_nothing() {
        let mut app = app();
        app.open_connection_dialog();
        if let Some(form) = app.connection_form.as_mut() {
            form.set_value(ConnectionField::Host, "elsewhere");
        }
        app.cancel_connection_dialog();
        assert!(app.session.connection_string.is_none());

        app.open_connection_dialog();
        let form = app.connection_form.as_ref().unwrap();
        assert_eq!(form.value(ConnectionField::Host), "localhost");
    }

    #[tokio::test]
    async fn query_without_connection_only_warns() {
        let mut app = app();
        type_query(&mut app, "SELECT 1");
        app.submit_query(false);

        assert!(!app.jobs.is_busy());
        assert!(app.session.table.is_none());
        assert_eq!(messages(&app)[0].0, AlertLevel::Warning);
        assert!(messages(&app)[0].1.contains("connection string is missing"));
    }

    #[tokio::test]
    async fn city_revenue_query_charts_one_bar_per_city() {
        let (_dir, url) = seeded_sqlite().await;
        let mut app = app();
        app.session.set_connection_string(url);
        type_query(&mut app, "SELECT city, revenue FROM orders");

        app.submit_query(false);
        assert_eq!(app.jobs.current(), Some(JobKind::Query));
        settle(&mut app).await;
        assert_eq!(app.session.table.as_ref().unwrap().row_count(), 4);

        app.controls.spec.x = Some("city".into());
        app.controls.spec.y = vec!["revenue".into()];
        app.controls.spec.kind = Some(ChartKind::Bar);
        app.recompose();

        let figure = app.composition.figure.clone().unwrap();
        let FigureBody::Bars(plot) = figure.body else {
            panic!("expected a bar chart");
        };
        let groups: Vec<(String, Option<f64>)> =
            plot.groups.iter().map(|g| (g.label.clone(), g.values[0])).collect();
        assert_eq!(
            groups,
            vec![
                ("Paris".to_string(), Some(120.0)),
                ("Lyon".to_string(), Some(80.0)),
                ("Nantes".to_string(), Some(40.0)),
            ]
        );

        app.submit_query(false);
        assert!(!app.jobs.is_busy());
        assert!(messages(&app).iter().any(|(_, m)| m.starts_with("Result is up to date")));
    }

    #[tokio::test]
    async fn refused_connection_alerts_and_keeps_the_table() {
        let mut app = app();
        app.session.set_connection_string("mysql://newuser:pw@127.0.0.1:1/classicmodels".into());
        type_query(&mut app, "SELECT 1");
        app.submit_query(false);
        settle(&mut app).await;

        assert!(app.session.table.is_none());
        let alerts = messages(&app);
        assert_eq!(alerts[0], (AlertLevel::Error, "Database Connection Failed".into()));
        assert_eq!(alerts[1].0, AlertLevel::Warning);
        assert!(alerts[1].1.starts_with("Error: "));

        app.on_tick(Instant::now() + Duration::from_secs(3));
        assert!(app.alerts.is_empty());
    }

    #[tokio::test]
    async fn cell_edits_touch_the_working_copy_until_reset() {
        let (_dir, url) = seeded_sqlite().await;
        let mut app = app();
        app.session.set_connection_string(url);
        type_query(&mut app, "SELECT city, revenue FROM orders");
        app.submit_query(false);
        settle(&mut app).await;

        app.move_grid(1, 1);
        app.begin_cell_edit();
        assert_eq!(app.cell_editor.as_ref().unwrap().lines(), ["80"]);
        app.cell_editor = Some(editor(vec!["95.5".into()]));
        app.commit_cell_edit();

        let working = app.session.working.as_ref().unwrap();
        assert_eq!(working.rows[1][1], Value::Float(95.5));
        assert_eq!(app.session.table.as_ref().unwrap().rows[1][1], Value::Int(80));
        assert!(app.is_edited());

        app.reset_working_copy();
        assert!(!app.is_edited());
    }

    #[tokio::test]
    async fn analysis_without_a_table_is_refused() {
        let mut app = app();
        app.run_analysis();
        assert!(!app.jobs.is_busy());
        assert_eq!(app.tab, Tab::Analysis);
        assert_eq!(
            messages(&app),
            vec![(AlertLevel::Warning, "no table to analyze, run a query first".into())]
        );
    }

    #[test]
    fn finished_analysis_replaces_the_previous_one() {
        let mut app = app();
        app.apply_outcome(JobOutcome::Analysis(Ok("first".into())));
        app.apply_outcome(JobOutcome::Analysis(Ok("second".into())));
        assert_eq!(app.session.analysis.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn second_analysis_sends_the_new_table_and_keeps_only_its_reply() {
        let (url, mut requests) = fake_ollama(vec![
            (200, r#"{"response":"Paris leads."}"#),
            (200, r#"{"response":"Lyon leads."}"#),
        ])
        .await;
        let mut config = AppConfig::default();
        config.llm.base_url = url;
        config.llm.retries = 0;
        let client = AnalysisClient::from_config(&config.llm).unwrap();
        let mut app = App::new(config, client);

        let table = |city: &str, sales: i64| {
            Table::new(
                vec!["city".into(), "sales".into()],
                vec![vec![Value::Text(city.into()), Value::Int(sales)]],
            )
        };

        app.session.table = Some(table("Paris", 120));
        app.run_analysis();
        settle(&mut app).await;
        assert_eq!(app.session.analysis.as_deref(), Some("Paris leads."));
        let first = requests.recv().await.unwrap();
        assert!(first["prompt"].as_str().unwrap().contains("\"city\": \"Paris\""));

        app.session.table = Some(table("Lyon", 80));
        app.run_analysis();
        settle(&mut app).await;
        assert_eq!(app.session.analysis.as_deref(), Some("Lyon leads."));
        let second = requests.recv().await.unwrap();
        let prompt = second["prompt"].as_str().unwrap();
        assert!(prompt.contains("\"city\": \"Lyon\""));
        assert!(prompt.contains("\"sales\": 80"));
        assert!(!prompt.contains("Paris"));
    }

    #[tokio::test]
    async fn chart_rows_view_shows_the_date_filtered_table_read_only() {
        let mut app = app();
        let day = |d| Value::Date(chrono::NaiveDate::from_ymd_opt(2024, 3, d).unwrap());
        let table = Table::new(
            vec!["day".into(), "sales".into()],
            vec![
                vec![day(1), Value::Int(3)],
                vec![day(2), Value::Int(5)],
                vec![day(3), Value::Int(7)],
            ],
        );
        app.session.table = Some(table.clone());
        app.session.working = Some(table);

        app.controls.spec.x = Some("day".into());
        app.controls.spec.y = vec!["sales".into()];
        app.controls.spec.kind = Some(ChartKind::Line);
        app.controls.spec.x_is_date = true;
        app.controls.range = Some(DateRange {
            start: chrono::NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
        });
        app.recompose();

        assert_eq!(app.grid_table().unwrap().row_count(), 3);
        app.toggle_grid_view();
        assert_eq!(app.grid_view, GridView::ChartRows);
        assert_eq!(app.grid_table().unwrap().row_count(), 2);
        assert_eq!(app.grid_caption(), "Chart Rows [date filtered]");

        app.move_grid(5, 0);
        assert_eq!(app.grid.row, 1);
        app.begin_cell_edit();
        assert!(app.cell_editor.is_none());
        assert_eq!(messages(&app)[0].0, AlertLevel::Info);

        app.toggle_grid_view();
        assert_eq!(app.grid_caption(), "Table Preview");
        assert_eq!(app.grid.row, 0);
    }
}
