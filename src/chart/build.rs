use std::collections::HashMap;

use chrono::{Datelike, Timelike};

use super::{
    BarGroupData, BarPlot, ChartKind, ChartSpec, Figure, FigureBody, PiePlot, Point, Series, Slice,
    XyMode, XyPlot,
};
use crate::error::ChartError;
use crate::table::{Table, Value};

/// Builds the chart for `spec` over `table`. `Ok(None)` means the controls
/// are not complete yet, which is not an error.
pub fn build_figure(spec: &ChartSpec, table: &Table) -> Result<Option<Figure>, ChartError> {
    if !spec.has_axes() {
        return Ok(None);
    }
    let (Some(kind), Some(x)) = (spec.kind, spec.x.as_deref()) else {
        return Ok(None);
    };
    if kind == ChartKind::Pie && spec.y.len() > 1 {
        return Err(ChartError::PieNeedsSingleY);
    }

    let bindings = Bindings::resolve(table, x, &spec.y, spec.color.as_deref())?;
    let body = match kind {
        ChartKind::Line => {
            let sorted = table.sorted_by(bindings.x);
            FigureBody::Xy(xy_plot(&sorted, &bindings, XyMode::Lines))
        }
        ChartKind::Dot => FigureBody::Xy(xy_plot(table, &bindings, XyMode::Markers)),
        ChartKind::Area => {
            let mut plot = xy_plot(table, &bindings, XyMode::StackedArea);
            stack(&mut plot.series);
            FigureBody::Xy(plot)
        }
        ChartKind::Bar => {
            require_numeric(table, &bindings)?;
            FigureBody::Bars(bar_plot(table, &bindings))
        }
        ChartKind::GroupedBar => FigureBody::Bars(bar_plot(table, &bindings)),
        ChartKind::Pie => FigureBody::Pie(pie_plot(table, &bindings)),
    };

    Ok(Some(Figure {
        kind,
        title: kind.title().to_string(),
        hover: kind.hover(),
        body,
    }))
}

struct Bindings<'a> {
    x: usize,
    y: Vec<(usize, &'a str)>,
    color: Option<usize>,
}

impl<'a> Bindings<'a> {
    fn resolve(
        table: &Table,
        x: &str,
        y: &'a [String],
        color: Option<&str>,
    ) -> Result<Self, ChartError> {
        let find = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| ChartError::UnknownColumn(name.to_string()))
        };
        Ok(Self {
            x: find(x)?,
            y: y
                .iter()
                .map(|name| find(name.as_str()).map(|idx| (idx, name.as_str())))
                .collect::<Result<_, _>>()?,
            color: color.map(find).transpose()?,
        })
    }

    /// One trace per y column, split further by the color column's values.
    fn trace_key(&self, row: &[Value], y_pos: usize) -> (usize, Option<String>) {
        (y_pos, self.color.map(|c| row[c].to_string()))
    }

    fn trace_name(&self, key: &(usize, Option<String>)) -> String {
        let y_name = self.y[key.0].1;
        match &key.1 {
            None => y_name.to_string(),
            Some(color) if self.y.len() > 1 => format!("{y_name}, {color}"),
            Some(color) => color.clone(),
        }
    }
}

/// Interns trace keys in first-seen order.
struct Traces {
    index: HashMap<(usize, Option<String>), usize>,
    names: Vec<String>,
}

impl Traces {
    fn new() -> Self {
        Self { index: HashMap::new(), names: Vec::new() }
    }

    fn slot(&mut self, bindings: &Bindings, key: (usize, Option<String>)) -> usize {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.names.len();
        self.names.push(bindings.trace_name(&key));
        self.index.insert(key, idx);
        idx
    }
}

enum XScale {
    Numeric,
    Temporal,
    Categorical(Vec<String>),
}

impl XScale {
    fn detect(table: &Table, col: usize) -> Self {
        let values = || table.rows.iter().map(move |r| &r[col]).filter(|v| !v.is_null());
        if values().all(|v| matches!(v, Value::Int(_) | Value::Float(_) | Value::Bool(_))) {
            return XScale::Numeric;
        }
        if values().all(|v| matches!(v, Value::Date(_) | Value::DateTime(_))) {
            return XScale::Temporal;
        }
        let mut categories: Vec<String> = Vec::new();
        for v in values() {
            let label = v.to_string();
            if !categories.contains(&label) {
                categories.push(label);
            }
        }
        XScale::Categorical(categories)
    }

    fn position(&self, value: &Value) -> Option<f64> {
        match self {
            XScale::Numeric => value.as_f64(),
            XScale::Temporal => match value {
                Value::Date(d) => Some(d.num_days_from_ce() as f64),
                Value::DateTime(dt) => Some(
                    dt.date().num_days_from_ce() as f64
                        + dt.time().num_seconds_from_midnight() as f64 / 86_400.0,
                ),
                _ => None,
            },
            XScale::Categorical(categories) => {
                let label = value.to_string();
                categories.iter().position(|c| *c == label).map(|i| i as f64)
            }
        }
    }
}

fn xy_plot(table: &Table, bindings: &Bindings, mode: XyMode) -> XyPlot {
    let scale = XScale::detect(table, bindings.x);
    let mut traces = Traces::new();
    let mut series: Vec<Series> = Vec::new();

    for row in &table.rows {
        let x_value = &row[bindings.x];
        if x_value.is_null() {
            continue;
        }
        let Some(x) = scale.position(x_value) else {
            continue;
        };
        for (y_pos, (y_col, _)) in bindings.y.iter().enumerate() {
            let Some(y) = row[*y_col].as_f64() else {
                continue;
            };
            let slot = traces.slot(bindings, bindings.trace_key(row, y_pos));
            if slot == series.len() {
                series.push(Series { name: traces.names[slot].clone(), points: Vec::new() });
            }
            series[slot].points.push(Point { x, label: x_value.to_string(), y });
        }
    }

    XyPlot {
        mode,
        categories: match scale {
            XScale::Categorical(categories) => categories,
            _ => Vec::new(),
        },
        series,
    }
}

/// Lifts each series onto the top of the series below it at the same x.
/// Points within one series never add up, even when x repeats.
fn stack(series: &mut [Series]) {
    let mut base: HashMap<u64, f64> = HashMap::new();
    for s in series.iter_mut() {
        let mut tops: HashMap<u64, f64> = HashMap::new();
        for p in s.points.iter_mut() {
            p.y += base.get(&p.x.to_bits()).copied().unwrap_or(0.0);
            tops.insert(p.x.to_bits(), p.y);
        }
        base.extend(tops);
    }
}

fn require_numeric(table: &Table, bindings: &Bindings) -> Result<(), ChartError> {
    for (col, name) in &bindings.y {
        for row in &table.rows {
            let cell = &row[*col];
            if !cell.is_null() && cell.as_f64().is_none() {
                return Err(ChartError::NonNumeric {
                    column: name.to_string(),
                    value: cell.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// One group per distinct x, one bar per trace. Repeated x values within a
/// trace add up.
fn bar_plot(table: &Table, bindings: &Bindings) -> BarPlot {
    let mut traces = Traces::new();
    let mut labels: Vec<String> = Vec::new();
    let mut cells: Vec<(usize, usize, f64)> = Vec::new();

    for row in &table.rows {
        let x_value = &row[bindings.x];
        if x_value.is_null() {
            continue;
        }
        let label = x_value.to_string();
        for (y_pos, (y_col, _)) in bindings.y.iter().enumerate() {
            let Some(y) = row[*y_col].as_f64() else {
                continue;
            };
            let group = match labels.iter().position(|l| *l == label) {
                Some(g) => g,
                None => {
                    labels.push(label.clone());
                    labels.len() - 1
                }
            };
            let slot = traces.slot(bindings, bindings.trace_key(row, y_pos));
            cells.push((group, slot, y));
        }
    }

    let mut groups: Vec<BarGroupData> = labels
        .into_iter()
        .map(|label| BarGroupData { label, values: vec![None; traces.names.len()] })
        .collect();
    for (group, slot, y) in cells {
        let value = &mut groups[group].values[slot];
        *value = Some(value.unwrap_or(0.0) + y);
    }

    BarPlot { series: traces.names, groups }
}

/// Slices keyed by x label with summed values. Negative values have no
/// sensible wedge and are left out.
fn pie_plot(table: &Table, bindings: &Bindings) -> PiePlot {
    let (y_col, _) = bindings.y[0];
    let mut slices: Vec<Slice> = Vec::new();

    for row in &table.rows {
        let x_value = &row[bindings.x];
        if x_value.is_null() {
            continue;
        }
        let Some(value) = row[y_col].as_f64().filter(|v| *v >= 0.0) else {
            continue;
        };
        let label = x_value.to_string();
        match slices.iter_mut().find(|s| s.label == label) {
            Some(slice) => slice.value += value,
            None => slices.push(Slice {
                label,
                value,
                percent: 0.0,
                color: bindings.color.map(|c| row[c].to_string()),
            }),
        }
    }

    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total > 0.0 {
        for slice in &mut slices {
            slice.percent = slice.value / total * 100.0;
        }
    }
    PiePlot { slices }
}
