use std::ops::Range;

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, LegendPosition,
        Paragraph, Wrap,
    },
    Frame,
};

use crate::chart::{
    format_number, BarPlot, ChartKind, ChartSpec, Composition, DateRange, Figure, FigureBody,
    PiePlot, XyMode, XyPlot,
};
use super::theme::{icons, Theme};

const SCHEMA: &str = include_str!("../../assets/schema.txt");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartControl {
    Color,
    X,
    Y,
    Kind,
    DateFlag,
    RangeStart,
    RangeEnd,
}

impl ChartControl {
    const ORDER: [ChartControl; 7] = [
        ChartControl::Color,
        ChartControl::X,
        ChartControl::Y,
        ChartControl::Kind,
        ChartControl::DateFlag,
        ChartControl::RangeStart,
        ChartControl::RangeEnd,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::X => "X-axis",
            Self::Y => "Y-axis",
            Self::Kind => "Chart",
            Self::DateFlag => "X is date",
            Self::RangeStart => "From",
            Self::RangeEnd => "To",
        }
    }
}

/// Selection state of the chart controls. `spec` is what the composer sees.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartControls {
    pub focus: ChartControl,
    pub spec: ChartSpec,
    pub y_cursor: usize,
    pub range: Option<DateRange>,
    pub hover: usize,
}

impl Default for ChartControls {
    fn default() -> Self {
        Self {
            focus: ChartControl::Color,
            spec: ChartSpec::default(),
            y_cursor: 0,
            range: None,
            hover: 0,
        }
    }
}

/// Steps through `None, columns[0], columns[1], ...` and wraps around.
fn cycle_column(current: Option<&str>, columns: &[String], delta: isize) -> Option<String> {
    let slots = columns.len() as isize + 1;
    let pos = current
        .and_then(|name| columns.iter().position(|c| c == name))
        .map_or(0, |i| i as isize + 1);
    let next = (pos + delta).rem_euclid(slots);
    (next > 0).then(|| columns[next as usize - 1].clone())
}

fn cycle_kind(current: Option<ChartKind>, delta: isize) -> Option<ChartKind> {
    let slots = ChartKind::ALL.len() as isize + 1;
    let pos = current
        .and_then(|k| ChartKind::ALL.iter().position(|c| *c == k))
        .map_or(0, |i| i as isize + 1);
    let next = (pos + delta).rem_euclid(slots);
    (next > 0).then(|| ChartKind::ALL[next as usize - 1])
}

fn step_date(dates: &[NaiveDate], current: NaiveDate, delta: isize) -> NaiveDate {
    let last = dates.len() as isize - 1;
    let idx = dates.binary_search(&current).unwrap_or_else(|i| i) as isize;
    dates[(idx + delta).clamp(0, last) as usize]
}

impl ChartControls {
    /// Drops bindings to columns the current table no longer has.
    pub fn sync_columns(&mut self, columns: &[String]) {
        let known = |name: &String| columns.contains(name);
        if !self.spec.color.as_ref().is_none_or(known) {
            self.spec.color = None;
        }
        if !self.spec.x.as_ref().is_none_or(known) {
            self.spec.x = None;
            self.range = None;
        }
        self.spec.y.retain(known);
        self.y_cursor = self.y_cursor.min(columns.len().saturating_sub(1));
    }

    fn visible_controls(&self) -> Vec<ChartControl> {
        ChartControl::ORDER
            .into_iter()
            .filter(|c| {
                self.spec.x_is_date
                    || !matches!(c, ChartControl::RangeStart | ChartControl::RangeEnd)
            })
            .collect()
    }

    pub fn focus_by(&mut self, delta: isize) {
        let controls = self.visible_controls();
        let pos = controls.iter().position(|c| *c == self.focus).unwrap_or(0) as isize;
        let next = (pos + delta).rem_euclid(controls.len() as isize);
        self.focus = controls[next as usize];
    }

    /// Up/Down on the focused control. Returns whether the chart needs
    /// to be recomposed.
    pub fn change(&mut self, delta: isize, columns: &[String], composition: &Composition) -> bool {
        match self.focus {
            ChartControl::Color => {
                self.spec.color = cycle_column(self.spec.color.as_deref(), columns, delta);
            }
            ChartControl::X => {
                self.spec.x = cycle_column(self.spec.x.as_deref(), columns, delta);
                self.range = None;
            }
            ChartControl::Y => {
                if columns.is_empty() {
                    return false;
                }
                let last = columns.len() as isize - 1;
                self.y_cursor = (self.y_cursor as isize + delta).clamp(0, last) as usize;
                return false;
            }
            ChartControl::Kind => {
                self.spec.kind = cycle_kind(self.spec.kind, delta);
            }
            ChartControl::DateFlag => {
                self.spec.x_is_date = !self.spec.x_is_date;
            }
            ChartControl::RangeStart | ChartControl::RangeEnd => {
                let dates = &composition.dates;
                let Some(current) = composition.range.or(self.range) else {
                    return false;
                };
                if dates.is_empty() {
                    return false;
                }
                let range = if self.focus == ChartControl::RangeStart {
                    let start = step_date(dates, current.start, delta).min(current.end);
                    DateRange { start, end: current.end }
                } else {
                    let end = step_date(dates, current.end, delta).max(current.start);
                    DateRange { start: current.start, end }
                };
                self.range = Some(range);
            }
        }
        self.hover = 0;
        true
    }

    /// Space: toggles the y column under the cursor or the date flag.
    pub fn toggle(&mut self, columns: &[String]) -> bool {
        match self.focus {
            ChartControl::Y => {
                let Some(name) = columns.get(self.y_cursor) else {
                    return false;
                };
                if let Some(pos) = self.spec.y.iter().position(|y| y == name) {
                    self.spec.y.remove(pos);
                } else {
                    self.spec.y.push(name.clone());
                }
            }
            ChartControl::DateFlag => {
                self.spec.x_is_date = !self.spec.x_is_date;
                if !self.spec.x_is_date {
                    self.range = None;
                }
            }
            _ => return false,
        }
        self.hover = 0;
        true
    }

    pub fn move_hover(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.hover = 0;
            return;
        }
        self.hover = (self.hover as isize + delta).rem_euclid(len as isize) as usize;
    }
}

pub fn render_chart_tab(
    frame: &mut Frame,
    area: Rect,
    columns: Option<&[String]>,
    composition: &Composition,
    controls: &ChartControls,
    focused: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .title(format!(" {} Table-Chart ", icons::CHART))
        .borders(Borders::ALL)
        .border_style(theme.block_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(columns) = columns else {
        let mut lines = vec![
            Line::styled("Run the query to see the table!", theme.dim_style()),
            Line::default(),
            Line::styled("DB schema", theme.header_style()),
        ];
        lines.extend(SCHEMA.lines().map(|l| Line::styled(l, theme.muted_style())));
        frame.render_widget(Paragraph::new(lines), inner);
        return;
    };

    let controls_height = if controls.spec.x_is_date { 3 } else { 2 };
    let warnings_height = composition.warnings.len().min(4) as u16;
    let [controls_area, chart_area, hover_area, warnings_area] = Layout::vertical([
        Constraint::Length(controls_height),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(warnings_height),
    ])
    .areas(inner);

    render_controls(frame, controls_area, columns, composition, controls, focused, theme);

    match &composition.figure {
        Some(figure) => {
            render_figure(frame, chart_area, figure, controls.hover, theme);
            if let Some((name, text)) = figure.hover_text(controls.hover) {
                let line = Line::from(vec![
                    Span::styled(format!("{name} │ "), theme.accent_style()),
                    Span::styled(text.replace("<br>", "  "), theme.text_style()),
                ]);
                frame.render_widget(Paragraph::new(line), hover_area);
            }
        }
        None => {
            let hint = Paragraph::new("Choose an X-axis, at least one Y-axis and a chart type.")
                .style(theme.muted_style());
            frame.render_widget(hint, chart_area);
        }
    }

    let warnings: Vec<Line> = composition
        .warnings
        .iter()
        .map(|w| Line::styled(format!("{} {w}", icons::WARN), theme.warning_style()))
        .collect();
    frame.render_widget(Paragraph::new(warnings).wrap(Wrap { trim: true }), warnings_area);
}

fn control_span<'a>(
    text: String,
    control: ChartControl,
    controls: &ChartControls,
    focused: bool,
    theme: &Theme,
) -> Span<'a> {
    let style = if focused && controls.focus == control {
        theme.selected_style()
    } else {
        theme.text_style()
    };
    Span::styled(text, style)
}

fn render_controls(
    frame: &mut Frame,
    area: Rect,
    columns: &[String],
    composition: &Composition,
    controls: &ChartControls,
    focused: bool,
    theme: &Theme,
) {
    let choose = "Choose an option";
    let spec = &controls.spec;
    let mut first = Vec::new();
    for (control, value) in [
        (ChartControl::Color, spec.color.as_deref().unwrap_or(choose)),
        (ChartControl::X, spec.x.as_deref().unwrap_or(choose)),
        (ChartControl::Kind, spec.kind.map(ChartKind::label).unwrap_or(choose)),
    ] {
        first.push(Span::styled(format!("{}: ", control.label()), theme.dim_style()));
        first.push(control_span(value.to_string(), control, controls, focused, theme));
        first.push(Span::raw("  "));
    }
    let flag = if spec.x_is_date { "[x]" } else { "[ ]" };
    first.push(control_span(
        format!("{flag} {}", ChartControl::DateFlag.label()),
        ChartControl::DateFlag,
        controls,
        focused,
        theme,
    ));

    let mut second = vec![Span::styled("Y-axis: ", theme.dim_style())];
    for (i, column) in columns.iter().enumerate() {
        let mark = if spec.y.contains(column) { "[x]" } else { "[ ]" };
        let style = if focused && controls.focus == ChartControl::Y && controls.y_cursor == i {
            theme.selected_style()
        } else if spec.y.contains(column) {
            theme.accent_style()
        } else {
            theme.text_style()
        };
        second.push(Span::styled(format!("{mark} {column}"), style));
        second.push(Span::raw(" "));
    }

    let mut lines = vec![Line::from(first), Line::from(second)];

    if spec.x_is_date {
        let (start, end) = match composition.range {
            Some(r) => (r.start.to_string(), r.end.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        lines.push(Line::from(vec![
            Span::styled("Select Date Range: ", theme.dim_style()),
            control_span(start, ChartControl::RangeStart, controls, focused, theme),
            Span::styled(" .. ", theme.dim_style()),
            control_span(end, ChartControl::RangeEnd, controls, focused, theme),
            Span::styled(format!("  ({} dates)", composition.dates.len()), theme.muted_style()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_figure(frame: &mut Frame, area: Rect, figure: &Figure, hover: usize, theme: &Theme) {
    let block = Block::default()
        .title(Line::styled(format!(" {} ", figure.title), theme.header_style()))
        .borders(Borders::TOP)
        .border_style(theme.border_style());
    match &figure.body {
        FigureBody::Xy(plot) => render_xy(frame, area, block, plot, hover, theme),
        FigureBody::Bars(plot) => {
            let group_gap = if figure.kind == ChartKind::GroupedBar { 3 } else { 1 };
            render_bars(frame, area, block, plot, group_gap, hover, theme)
        }
        FigureBody::Pie(plot) => render_pie(frame, area, block, plot, hover, theme),
    }
}

fn bounds(values: impl Iterator<Item = f64>, include_zero: bool) -> [f64; 2] {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if lo == hi {
        lo -= 1.0;
        hi += 1.0;
    }
    [lo, hi]
}

fn render_xy(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    plot: &XyPlot,
    hover: usize,
    theme: &Theme,
) {
    let data: Vec<Vec<(f64, f64)>> = plot
        .series
        .iter()
        .map(|s| s.points.iter().map(|p| (p.x, p.y)).collect())
        .collect();
    let points = || plot.series.iter().flat_map(|s| s.points.iter());
    let hovered: Vec<(f64, f64)> = points().nth(hover).map(|p| (p.x, p.y)).into_iter().collect();

    let x_bounds = bounds(points().map(|p| p.x), false);
    let y_bounds = bounds(points().map(|p| p.y), true);

    let label_at = |x: f64| {
        points()
            .find(|p| p.x == x)
            .map(|p| p.label.clone())
            .unwrap_or_else(|| format_number(x))
    };
    let x_labels = vec![label_at(x_bounds[0]), label_at(x_bounds[1])];
    let y_labels = vec![
        format_number(y_bounds[0]),
        format_number((y_bounds[0] + y_bounds[1]) / 2.0),
        format_number(y_bounds[1]),
    ];

    let (graph_type, marker) = match plot.mode {
        XyMode::Lines => (GraphType::Line, Marker::Braille),
        XyMode::Markers => (GraphType::Scatter, Marker::Dot),
        XyMode::StackedArea => (GraphType::Bar, Marker::Braille),
    };

    let mut datasets: Vec<Dataset> = plot
        .series
        .iter()
        .zip(&data)
        .enumerate()
        .map(|(i, (series, points))| {
            Dataset::default()
                .name(series.name.clone())
                .marker(marker)
                .graph_type(graph_type)
                .style(Style::default().fg(theme.series_color(i)))
                .data(points)
        })
        .collect();
    // Higher stacked layers first so lower ones stay visible on top.
    if plot.mode == XyMode::StackedArea {
        datasets.reverse();
    }
    datasets.push(
        Dataset::default()
            .marker(Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
            .data(&hovered),
    );

    let chart = Chart::new(datasets)
        .block(block)
        .legend_position(Some(LegendPosition::TopRight))
        .x_axis(
            Axis::default()
                .style(theme.dim_style())
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.dim_style())
                .bounds(y_bounds)
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

/// Range of groups that fits `width` columns at one column per bar,
/// slid so the group holding mark `hover` stays in view.
fn visible_groups(plot: &BarPlot, width: usize, group_gap: usize, hover: usize) -> Range<usize> {
    let cost = |g: usize| plot.groups[g].values.iter().flatten().count().max(1) + group_gap;
    let total = plot.groups.len();
    if total == 0 {
        return 0..0;
    }

    let mut seen = 0;
    let anchor = plot
        .groups
        .iter()
        .position(|g| {
            seen += g.values.iter().flatten().count();
            seen > hover
        })
        .unwrap_or(0);

    let (mut start, mut end) = (anchor, anchor + 1);
    let mut used = cost(anchor);
    while end < total && used.saturating_add(cost(end)) <= width {
        used += cost(end);
        end += 1;
    }
    while start > 0 && used.saturating_add(cost(start - 1)) <= width {
        start -= 1;
        used += cost(start);
    }
    start..end
}

fn render_bars(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    plot: &BarPlot,
    group_gap: u16,
    hover: usize,
    theme: &Theme,
) {
    let max = plot
        .groups
        .iter()
        .flat_map(|g| g.values.iter().flatten())
        .fold(0.0_f64, |m, v| m.max(*v));
    let scale = if max > 0.0 { 10_000.0 / max } else { 1.0 };

    let inner_width = area.width.saturating_sub(2) as usize;
    let window = visible_groups(plot, inner_width, group_gap as usize, hover);
    let shown = &plot.groups[window.clone()];
    let bar_count: usize = shown.iter().map(|g| g.values.iter().flatten().count()).sum();
    let room = inner_width.saturating_sub((group_gap as usize).saturating_mul(shown.len()));
    let bar_width = (room / bar_count.max(1)).clamp(1, 9) as u16;

    let [legend_area, bars_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(area);
    let mut legend: Vec<Span> = plot
        .series
        .iter()
        .enumerate()
        .map(|(i, name)| Span::styled(format!("■ {name}  "), Style::default().fg(theme.series_color(i))))
        .collect();
    if window.len() < plot.groups.len() {
        legend.push(Span::styled(
            format!("{}-{} of {} groups", window.start + 1, window.end, plot.groups.len()),
            theme.muted_style(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(legend)), legend_area);

    let mut mark: usize = plot.groups[..window.start]
        .iter()
        .map(|g| g.values.iter().flatten().count())
        .sum();
    let mut chart = BarChart::default()
        .block(block)
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(group_gap)
        .label_style(theme.dim_style());
    for group in shown {
        let bars: Vec<Bar> = group
            .values
            .iter()
            .enumerate()
            .filter_map(|(s, v)| v.map(|v| (s, v)))
            .map(|(s, v)| {
                let style = if mark == hover {
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.series_color(s))
                };
                mark += 1;
                Bar::default()
                    .value((v.max(0.0) * scale).round() as u64)
                    .text_value(format_number(v))
                    .style(style)
                    .value_style(Style::default().fg(theme.bg).bg(theme.series_color(s)))
            })
            .collect();
        chart = chart.data(BarGroup::default().label(Line::from(group.label.clone())).bars(&bars));
    }
    frame.render_widget(chart, bars_area);
}

fn render_pie(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    plot: &PiePlot,
    hover: usize,
    theme: &Theme,
) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let label_width = plot
        .slices
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0)
        .min(inner_width / 3);
    let bar_room = inner_width.saturating_sub(label_width + 20);

    // Slices sharing a color-column value share a palette entry.
    let mut groups: Vec<&str> = Vec::new();
    let colors: Vec<Color> = plot
        .slices
        .iter()
        .enumerate()
        .map(|(i, slice)| match slice.color.as_deref() {
            Some(c) => {
                let idx = match groups.iter().position(|g| *g == c) {
                    Some(idx) => idx,
                    None => {
                        groups.push(c);
                        groups.len() - 1
                    }
                };
                theme.series_color(idx)
            }
            None => theme.series_color(i),
        })
        .collect();

    let lines: Vec<Line> = plot
        .slices
        .iter()
        .enumerate()
        .map(|(i, slice)| {
            let filled = ((slice.percent / 100.0) * bar_room as f64).round() as usize;
            let label_style = if i == hover {
                theme.selected_style()
            } else {
                theme.text_style()
            };
            Line::from(vec![
                Span::styled(format!("{:<label_width$} ", slice.label), label_style),
                Span::styled("█".repeat(filled.max(1)), Style::default().fg(colors[i])),
                Span::styled(
                    format!(" {:.1}% ({})", slice.percent, format_number(slice.value)),
                    theme.dim_style(),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::chart::BarGroupData;

    fn columns() -> Vec<String> {
        vec!["city".into(), "revenue".into(), "orders".into()]
    }

    #[test]
    fn column_choice_cycles_through_none() {
        let cols = columns();
        assert_eq!(cycle_column(None, &cols, 1), Some("city".into()));
        assert_eq!(cycle_column(Some("orders"), &cols, 1), None);
        assert_eq!(cycle_column(None, &cols, -1), Some("orders".into()));
        assert_eq!(cycle_kind(None, -1), Some(ChartKind::Area));
    }

    #[test]
    fn building_a_bar_chart_from_the_controls() {
        let cols = columns();
        let comp = Composition::default();
        let mut controls = ChartControls::default();

        controls.focus_by(1);
        assert_eq!(controls.focus, ChartControl::X);
        assert!(controls.change(1, &cols, &comp));

        controls.focus_by(1);
        controls.change(1, &cols, &comp);
        assert!(controls.toggle(&cols));

        controls.focus_by(1);
        controls.change(2, &cols, &comp);

        assert_eq!(
            controls.spec,
            ChartSpec {
                x: Some("city".into()),
                y: vec!["revenue".into()],
                kind: Some(ChartKind::Bar),
                ..Default::default()
            }
        );
    }

    #[test]
    fn range_controls_only_show_with_the_date_flag() {
        let mut controls = ChartControls { focus: ChartControl::DateFlag, ..Default::default() };
        controls.focus_by(1);
        assert_eq!(controls.focus, ChartControl::Color);

        controls.spec.x_is_date = true;
        controls.focus = ChartControl::DateFlag;
        controls.focus_by(1);
        assert_eq!(controls.focus, ChartControl::RangeStart);
    }

    #[test]
    fn range_start_never_passes_the_end() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let comp = Composition {
            dates: vec![d(1), d(5), d(9)],
            range: Some(DateRange { start: d(1), end: d(5) }),
            ..Default::default()
        };
        let mut controls = ChartControls { focus: ChartControl::RangeStart, ..Default::default() };
        controls.change(5, &[], &comp);
        assert_eq!(controls.range, Some(DateRange { start: d(5), end: d(5) }));
    }

    fn many_groups(n: usize, per_group: usize) -> BarPlot {
        BarPlot {
            series: (0..per_group).map(|i| format!("s{i}")).collect(),
            groups: (0..n)
                .map(|g| BarGroupData {
                    label: format!("g{g}"),
                    values: (0..per_group).map(|s| Some((g + s) as f64)).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn bar_window_follows_the_hovered_mark() {
        let plot = many_groups(100, 2);
        assert_eq!(visible_groups(&plot, 50, 3, 0), 0..10);
        assert_eq!(visible_groups(&plot, 50, 3, 199), 90..100);
        let mid = visible_groups(&plot, 50, 3, 101);
        assert!(mid.contains(&50));
        assert_eq!(mid.len(), 10);
        assert_eq!(visible_groups(&many_groups(0, 2), 50, 3, 0), 0..0);
    }

    #[test]
    fn huge_grouped_bar_figure_renders() {
        let figure = Figure {
            kind: ChartKind::GroupedBar,
            title: "Grouped Bar Chart".into(),
            hover: ChartKind::GroupedBar.hover(),
            body: FigureBody::Bars(many_groups(70_000, 2)),
        };
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_figure(frame, frame.area(), &figure, 139_999, &Theme::default()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("of 70000 groups"));
    }

    #[test]
    fn stale_bindings_are_dropped_for_a_new_table() {
        let mut controls = ChartControls::default();
        controls.spec.x = Some("city".into());
        controls.spec.y = vec!["revenue".into(), "orders".into()];
        controls.y_cursor = 2;
        controls.sync_columns(&["city".into(), "orders".into()]);
        assert_eq!(controls.spec.x.as_deref(), Some("city"));
        assert_eq!(controls.spec.y, vec!["orders".to_string()]);
        assert_eq!(controls.y_cursor, 1);
    }
}
