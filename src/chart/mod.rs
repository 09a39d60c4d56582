mod build;
mod dates;

pub use build::build_figure;
pub use dates::*;

use chrono::NaiveDate;

use crate::error::DateError;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Dot,
    GroupedBar,
    Area,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Pie,
        ChartKind::Dot,
        ChartKind::GroupedBar,
        ChartKind::Area,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
            ChartKind::Pie => "Pie",
            ChartKind::Dot => "Dot",
            ChartKind::GroupedBar => "Grouped Bar",
            ChartKind::Area => "Area",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Dot => "Scatter Plot",
            ChartKind::GroupedBar => "Grouped Bar Chart",
            ChartKind::Area => "Area Chart",
        }
    }

    pub fn hover(self) -> HoverTemplate {
        match self {
            ChartKind::Pie => HoverTemplate::Slice,
            _ => HoverTemplate::Xy,
        }
    }
}

/// Column bindings and chart family picked in the chart controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSpec {
    pub color: Option<String>,
    pub x: Option<String>,
    pub y: Vec<String>,
    pub kind: Option<ChartKind>,
    pub x_is_date: bool,
}

impl ChartSpec {
    pub fn has_axes(&self) -> bool {
        self.x.is_some() && !self.y.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTemplate {
    Xy,
    Slice,
}

impl HoverTemplate {
    pub fn template(self) -> &'static str {
        match self {
            HoverTemplate::Xy => "X: %{x}<br>Y: %{y}",
            HoverTemplate::Slice => "%{label}: %{percent} (%{value})",
        }
    }

    pub fn render(self, fields: &[(&str, String)]) -> String {
        let mut out = self.template().to_string();
        for (name, value) in fields {
            out = out.replace(&format!("%{{{name}}}"), value);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub label: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XyMode {
    Lines,
    Markers,
    StackedArea,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XyPlot {
    pub mode: XyMode,
    /// Category names when the x column is neither numeric nor temporal;
    /// point `x` is then the index into this list.
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarGroupData {
    pub label: String,
    /// One slot per series, `None` where the series has no row for this x.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarPlot {
    pub series: Vec<String>,
    pub groups: Vec<BarGroupData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub percent: f64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PiePlot {
    pub slices: Vec<Slice>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FigureBody {
    Xy(XyPlot),
    Bars(BarPlot),
    Pie(PiePlot),
}

/// A renderable chart: family, title, data and hover template.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub kind: ChartKind,
    pub title: String,
    pub hover: HoverTemplate,
    pub body: FigureBody,
}

impl Figure {
    /// Number of hoverable marks, in display order.
    pub fn hover_len(&self) -> usize {
        match &self.body {
            FigureBody::Xy(plot) => plot.series.iter().map(|s| s.points.len()).sum(),
            FigureBody::Bars(plot) => plot
                .groups
                .iter()
                .map(|g| g.values.iter().flatten().count())
                .sum(),
            FigureBody::Pie(plot) => plot.slices.len(),
        }
    }

    /// Bars start at zero, so negative values have no visible height.
    pub fn has_negative_bars(&self) -> bool {
        match &self.body {
            FigureBody::Bars(plot) => plot
                .groups
                .iter()
                .any(|g| g.values.iter().flatten().any(|v| *v < 0.0)),
            _ => false,
        }
    }

    /// Trace name and filled-in hover template for the `index`-th mark.
    pub fn hover_text(&self, index: usize) -> Option<(String, String)> {
        match &self.body {
            FigureBody::Xy(plot) => plot
                .series
                .iter()
                .flat_map(|s| s.points.iter().map(move |p| (s, p)))
                .nth(index)
                .map(|(s, p)| {
                    let text = self
                        .hover
                        .render(&[("x", p.label.clone()), ("y", format_number(p.y))]);
                    (s.name.clone(), text)
                }),
            FigureBody::Bars(plot) => plot
                .groups
                .iter()
                .flat_map(|g| {
                    g.values
                        .iter()
                        .enumerate()
                        .filter_map(move |(s, v)| v.map(|v| (g, s, v)))
                })
                .nth(index)
                .map(|(g, s, v)| {
                    let text = self
                        .hover
                        .render(&[("x", g.label.clone()), ("y", format_number(v))]);
                    (plot.series[s].clone(), text)
                }),
            FigureBody::Pie(plot) => plot.slices.get(index).map(|slice| {
                let text = self.hover.render(&[
                    ("label", slice.label.clone()),
                    ("percent", format!("{:.1}%", slice.percent)),
                    ("value", format_number(slice.value)),
                ]);
                (slice.label.clone(), text)
            }),
        }
    }
}

pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let text = format!("{v:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Result of running the working table through the date filter and the
/// chart builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    /// Table the chart was built from, after date filtering.
    pub table: Table,
    pub figure: Option<Figure>,
    pub warnings: Vec<String>,
    /// Slider options when the x column is treated as dates.
    pub dates: Vec<NaiveDate>,
    pub range: Option<DateRange>,
}

pub fn compose(working: &Table, spec: &ChartSpec, range: Option<DateRange>) -> Composition {
    let mut composition = Composition {
        table: working.clone(),
        ..Default::default()
    };

    if spec.x_is_date {
        let axis = match spec.x.as_deref() {
            Some(x) => coerce_date_column(working, x),
            None => Err(DateError::NoColumn),
        };
        match axis {
            Ok(axis) => {
                composition.range = axis.clamp(range);
                composition.table = match composition.range {
                    Some(r) => axis.filter(r),
                    None => axis.table.clone(),
                };
                composition.dates = axis.dates;
            }
            Err(e) => composition.warnings.push(e.to_string()),
        }
    }

    match build_figure(spec, &composition.table) {
        Ok(figure) => {
            if figure.as_ref().is_some_and(Figure::has_negative_bars) {
                composition
                    .warnings
                    .push("Negative values are drawn as empty bars; hover shows the real value.".into());
            }
            composition.figure = figure;
        }
        Err(e) => composition.warnings.push(e.to_string()),
    }
    composition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn daily() -> Table {
        Table::new(
            vec!["day".into(), "sales".into()],
            vec![
                vec![Value::Text("2024-03-01".into()), Value::Int(3)],
                vec![Value::Text("2024-03-02".into()), Value::Int(5)],
                vec![Value::Null, Value::Int(7)],
                vec![Value::Text("2024-03-04".into()), Value::Int(11)],
            ],
        )
    }

    fn spec(kind: ChartKind) -> ChartSpec {
        ChartSpec {
            x: Some("day".into()),
            y: vec!["sales".into()],
            kind: Some(kind),
            x_is_date: true,
            ..Default::default()
        }
    }

    #[test]
    fn date_range_narrows_the_charted_rows() {
        let range = DateRange { start: d(2024, 3, 2), end: d(2024, 3, 4) };
        let out = compose(&daily(), &spec(ChartKind::Line), Some(range));

        assert!(out.warnings.is_empty());
        assert_eq!(out.table.row_count(), 2);
        assert_eq!(out.dates, vec![d(2024, 3, 1), d(2024, 3, 2), d(2024, 3, 4)]);
        assert_eq!(out.range, Some(range));
        assert_eq!(out.figure.unwrap().hover_len(), 2);
    }

    #[test]
    fn missing_range_defaults_to_everything_but_null_dates() {
        let out = compose(&daily(), &spec(ChartKind::Dot), None);
        assert_eq!(out.table.row_count(), 3);
        assert_eq!(out.range, Some(DateRange { start: d(2024, 3, 1), end: d(2024, 3, 4) }));
    }

    #[test]
    fn coercion_failure_warns_and_keeps_the_table_unfiltered() {
        let mut table = daily();
        table.rows[1][0] = Value::Text("tuesday".into());
        let out = compose(&table, &spec(ChartKind::Line), None);

        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].starts_with("Error processing dates"));
        assert_eq!(out.table, table);
        assert!(out.dates.is_empty());
    }

    #[test]
    fn pie_with_two_y_columns_warns_instead_of_charting() {
        let table = Table::new(
            vec!["city".into(), "a".into(), "b".into()],
            vec![vec![Value::Text("Paris".into()), Value::Int(1), Value::Int(2)]],
        );
        let spec = ChartSpec {
            x: Some("city".into()),
            y: vec!["a".into(), "b".into()],
            kind: Some(ChartKind::Pie),
            ..Default::default()
        };
        let out = compose(&table, &spec, None);
        assert!(out.figure.is_none());
        assert_eq!(out.warnings, vec!["Pie chart only supports one Y variable.".to_string()]);
    }

    #[test]
    fn negative_bars_come_with_a_warning() {
        let table = Table::new(
            vec!["city".into(), "revenue".into()],
            vec![
                vec![Value::Text("Paris".into()), Value::Int(120)],
                vec![Value::Text("Lyon".into()), Value::Int(-30)],
            ],
        );
        let mut spec = ChartSpec {
            x: Some("city".into()),
            y: vec!["revenue".into()],
            kind: Some(ChartKind::Bar),
            ..Default::default()
        };
        let out = compose(&table, &spec, None);
        assert!(out.figure.is_some());
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].starts_with("Negative values"));

        spec.kind = Some(ChartKind::Line);
        assert!(compose(&table, &spec, None).warnings.is_empty());
    }

    #[test]
    fn hover_templates_fill_in_values() {
        assert_eq!(
            HoverTemplate::Xy.render(&[("x", "Paris".into()), ("y", "12".into())]),
            "X: Paris<br>Y: 12"
        );
        assert_eq!(
            HoverTemplate::Slice.render(&[
                ("label", "Lyon".into()),
                ("percent", "25.0%".into()),
                ("value", "4".into()),
            ]),
            "Lyon: 25.0% (4)"
        );
    }

    #[test]
    fn numbers_are_printed_compactly() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(42.25), "42.25");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
    }
}
