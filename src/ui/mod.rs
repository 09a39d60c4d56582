mod alerts;
mod analysis;
mod chart;
mod connection;
mod query;
mod results;
mod theme;

pub use alerts::render_alerts;
pub use analysis::render_analysis_tab;
pub use chart::{render_chart_tab, ChartControls};
pub use connection::{render_connection_dialog, ConnectionField, ConnectionForm, FormInput};
pub use query::{render_query_panel, ButtonRegion, QueryButton};
pub use results::{render_grid, GridState};
pub use theme::{icons, Theme};
