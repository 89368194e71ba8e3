mod config;
mod dashboard;
mod derived_fields;
mod error;
mod filtering;
mod loader;
mod types;
mod utils;
mod views;

pub use config::*;
pub use dashboard::*;
pub use error::AirQualityError;

pub use derived_fields::add_derived_fields;
pub use filtering::{apply_selection, observed_selection, AirQualityFrameFilterExt};

pub use loader::data_loader::{parse_csv, CsvOptions, DataLoader};
pub use loader::data_source::DataSource;
pub use loader::error::LoadError;
pub use loader::normalize::normalize;
pub use loader::table_cache::TableCache;

pub use types::columns;
pub use types::month_period::{MonthPeriod, MONTH_PERIOD_FORMAT};
pub use types::normalized_table::{LoadWarning, NormalizedTable};
pub use types::season::Season;
pub use types::selection::{parse_range_bound, RangeEnd, Selection};
pub use types::theme::{Palette, PlotContext, PlotStyle, PlotTheme};

pub use views::averages::{monthly_average, monthly_trend, seasonal_average, station_average};
pub use views::correlation::{correlation_matrix, CorrelationMatrix};
pub use views::error::ViewError;
pub use views::extremes::{extremes_by_station, StationExtremes, StationValue};
pub use views::time_series::time_series;
