//! The request/response entry point: one [`Dashboard::render`] call per user
//! interaction, answered from a memoized copy of the dataset.

use crate::config::DashboardConfig;
use crate::error::AirQualityError;
use crate::filtering::apply_selection;
use crate::loader::data_loader::DataLoader;
use crate::loader::error::LoadError;
use crate::loader::table_cache::TableCache;
use crate::types::columns::{
    COL_RAIN, COL_TEMP, GAS_POLLUTANTS, PARTICULATES, POLLUTANTS, WEATHER_POLLUTION_COLUMNS,
};
use crate::types::normalized_table::{LoadWarning, NormalizedTable};
use crate::types::selection::Selection;
use crate::types::theme::PlotTheme;
use crate::views::averages::{monthly_average, monthly_trend, seasonal_average, station_average};
use crate::views::correlation::{correlation_matrix, CorrelationMatrix};
use crate::views::error::ViewError;
use crate::views::extremes::{extremes_by_station, StationExtremes};
use crate::views::time_series::time_series;
use bon::bon;
use log::{info, warn};
use polars::prelude::DataFrame;
use std::sync::Arc;

/// One rendered unit of the dashboard.
///
/// A failed view carries its [`ViewError`] in `result` instead of aborting the
/// whole response.
#[derive(Debug)]
pub struct View<T> {
    pub title: &'static str,
    pub theme: PlotTheme,
    pub result: Result<T, ViewError>,
}

impl<T> View<T> {
    fn new(title: &'static str, theme: PlotTheme, result: Result<T, ViewError>) -> Self {
        if let Err(e) = &result {
            warn!("View '{}' failed: {}", title, e);
        }
        Self {
            title,
            theme,
            result,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything one render produces.
#[derive(Debug)]
pub struct DashboardResponse {
    pub theme: PlotTheme,
    /// The selection the filtered view was computed with.
    pub selection: Option<Selection>,
    pub warnings: Vec<LoadWarning>,
    pub filtered: View<DataFrame>,
    pub pm_time_series: View<DataFrame>,
    pub pm_monthly_average: View<DataFrame>,
    pub pm_seasonal_average: View<DataFrame>,
    pub weather_pollution_correlation: View<CorrelationMatrix>,
    pub pollutant_correlation: View<CorrelationMatrix>,
    pub station_pollutant_average: View<DataFrame>,
    pub monthly_pollutant_trend: View<DataFrame>,
    pub temperature_extremes: View<StationExtremes>,
    pub highest_rainfall: View<StationExtremes>,
}

/// Serves dashboard renders for the source named in its [`DashboardConfig`].
///
/// The dataset is loaded on the first render and reused until
/// [`Dashboard::invalidate`] or [`Dashboard::reload`] is called.
///
/// # Examples
///
/// ```rust,no_run
/// # use air_quality::{AirQualityError, Dashboard, DashboardConfig, PlotStyle, PlotTheme};
/// # async fn run() -> Result<(), AirQualityError> {
/// let config = DashboardConfig::builder().source("data/combined_data.csv").build();
/// let dashboard = Dashboard::new(config);
///
/// let theme = PlotTheme {
///     style: PlotStyle::WhiteGrid,
///     ..PlotTheme::default()
/// };
/// let response = dashboard.render().theme(theme).call().await?;
/// if let Ok(rain) = &response.highest_rainfall.result {
///     println!("{:?}", rain.highest);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Dashboard {
    config: DashboardConfig,
    cache: TableCache,
}

#[bon]
impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = TableCache::new(DataLoader::new(config.csv_options()));
        Self { config, cache }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The normalized table for the configured source, loaded once and then served from memory.
    pub async fn load(&self) -> Result<Arc<NormalizedTable>, LoadError> {
        self.cache.get(&self.config.data_source()).await
    }

    /// Forgets the cached table so the next load reads the source again.
    pub async fn invalidate(&self) -> bool {
        self.cache.invalidate(&self.config.data_source()).await
    }

    /// Drops the cached table and loads the source again.
    pub async fn reload(&self) -> Result<Arc<NormalizedTable>, LoadError> {
        self.invalidate().await;
        self.load().await
    }

    /// Renders every view.
    ///
    /// Without a `selection` the filtered view covers the full observed domain.
    /// Without a `theme` the configured theme is used.
    ///
    /// # Errors
    ///
    /// Only ingestion failures are returned as `Err`. Problems confined to one
    /// view are reported in that view's `result`.
    #[builder]
    pub async fn render(
        &self,
        selection: Option<Selection>,
        theme: Option<PlotTheme>,
    ) -> Result<DashboardResponse, AirQualityError> {
        let table = self.load().await?;
        let theme = theme.unwrap_or(self.config.theme);
        let df = table.frame();
        info!("Rendering dashboard over {} rows", table.height());

        let selection = match selection {
            Some(selection) => Ok(selection),
            None => table.full_selection(),
        };
        let (selection, filtered) = match selection {
            Ok(selection) => {
                let filtered = apply_selection(df, &selection);
                (Some(selection), filtered)
            }
            Err(e) => (None, Err(e)),
        };

        Ok(DashboardResponse {
            theme,
            selection,
            warnings: table.warnings().to_vec(),
            filtered: View::new("Filtered Data", theme, filtered),
            pm_time_series: View::new(
                "PM2.5 and PM10 Variation over Time",
                theme,
                time_series(df, &PARTICULATES),
            ),
            pm_monthly_average: View::new(
                "Average Monthly PM2.5 and PM10 Levels by Station",
                theme,
                monthly_average(df, &PARTICULATES),
            ),
            pm_seasonal_average: View::new(
                "Average Seasonal PM2.5 and PM10 Levels by Station",
                theme,
                seasonal_average(df, &PARTICULATES),
            ),
            weather_pollution_correlation: View::new(
                "Correlation between Weather Conditions and Pollution Levels",
                theme,
                correlation_matrix(df, &WEATHER_POLLUTION_COLUMNS),
            ),
            pollutant_correlation: View::new(
                "Correlation between Air Pollutants",
                theme,
                correlation_matrix(df, &GAS_POLLUTANTS),
            ),
            station_pollutant_average: View::new(
                "Average Pollutant Levels by Station",
                theme,
                station_average(df, &POLLUTANTS),
            ),
            monthly_pollutant_trend: View::new(
                "Monthly Average Pollutant Trend",
                theme,
                monthly_trend(df, &POLLUTANTS),
            ),
            temperature_extremes: View::new(
                "Highest and Lowest Temperature by Station",
                theme,
                extremes_by_station(df, COL_TEMP),
            ),
            highest_rainfall: View::new(
                "Highest Rainfall by Station",
                theme,
                extremes_by_station(df, COL_RAIN),
            ),
        })
    }
}
