//! Renders the air-quality dashboard once and prints every view.

use air_quality::{
    parse_range_bound, AirQualityError, Dashboard, DashboardConfig, Palette, PlotContext,
    PlotStyle, RangeEnd, Season, Selection, View, ViewError,
};
use clap::Parser;
use std::fmt::Display;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "air-quality-dashboard",
    version,
    about = "Summaries and filtered views of hourly air-quality measurements"
)]
struct Cli {
    /// JSON config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path or http(s) URL of the CSV dataset (optionally .gz).
    #[arg(long)]
    source: Option<String>,

    #[arg(long)]
    style: Option<PlotStyle>,

    #[arg(long)]
    context: Option<PlotContext>,

    #[arg(long)]
    palette: Option<Palette>,

    /// Keep only these stations (repeatable).
    #[arg(long = "station")]
    stations: Vec<String>,

    /// Keep only these years (repeatable).
    #[arg(long = "year")]
    years: Vec<i32>,

    /// Keep only these seasons (repeatable).
    #[arg(long = "season")]
    seasons: Vec<Season>,

    /// Start of the datetime range: `YYYY-MM`, `YYYY-MM-DD` or `YYYY-MM-DD HH:MM[:SS]`.
    #[arg(long)]
    start: Option<String>,

    /// End of the datetime range, inclusive. Same formats as `--start`.
    #[arg(long)]
    end: Option<String>,
}

impl Cli {
    fn dashboard_config(&self) -> Result<DashboardConfig, AirQualityError> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(source) = &self.source {
            config.source = source.clone();
        }
        if let Some(style) = self.style {
            config.theme.style = style;
        }
        if let Some(context) = self.context {
            config.theme.context = context;
        }
        if let Some(palette) = self.palette {
            config.theme.palette = palette;
        }
        Ok(config)
    }

    fn narrows_selection(&self) -> bool {
        !self.stations.is_empty()
            || !self.years.is_empty()
            || !self.seasons.is_empty()
            || self.start.is_some()
            || self.end.is_some()
    }

    /// Narrows the full observed domain by whichever filter flags were given.
    fn selection(&self, full: Selection) -> Result<Selection, AirQualityError> {
        let mut selection = full;
        if !self.stations.is_empty() {
            selection = selection.with_stations(self.stations.iter().cloned());
        }
        if !self.years.is_empty() {
            selection = selection.with_years(self.years.iter().copied());
        }
        if !self.seasons.is_empty() {
            selection = selection.with_seasons(self.seasons.iter().copied());
        }
        let start = match &self.start {
            Some(value) => parse_range_bound(value, RangeEnd::Start)?,
            None => selection.start,
        };
        let end = match &self.end {
            Some(value) => parse_range_bound(value, RangeEnd::End)?,
            None => selection.end,
        };
        Ok(selection.with_range(start, end))
    }
}

fn print_view<T>(
    view: &View<T>,
    show: impl FnOnce(&T) -> Result<(), AirQualityError>,
) -> Result<(), AirQualityError> {
    println!("== {} ==", view.title);
    match &view.result {
        Ok(value) => show(value)?,
        Err(e) => println!("unavailable: {}", e),
    }
    println!();
    Ok(())
}

fn print_table<D: Display>(table: &D) -> Result<(), AirQualityError> {
    println!("{}", table);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AirQualityError> {
    env_logger::init();
    let cli = Cli::parse();

    let dashboard = Dashboard::new(cli.dashboard_config()?);
    let selection = if cli.narrows_selection() {
        let full = dashboard.load().await?.full_selection()?;
        Some(cli.selection(full)?)
    } else {
        None
    };

    let response = dashboard
        .render()
        .maybe_selection(selection)
        .call()
        .await?;

    println!(
        "Theme: style={} context={} palette={}",
        response.theme.style, response.theme.context, response.theme.palette
    );
    for warning in &response.warnings {
        println!("Warning: {}", warning);
    }
    println!();

    print_view(&response.filtered, print_table)?;
    print_view(&response.pm_time_series, |df| print_table(&df.tail(Some(10))))?;
    print_view(&response.pm_monthly_average, print_table)?;
    print_view(&response.pm_seasonal_average, print_table)?;
    print_view(&response.weather_pollution_correlation, |matrix| {
        print_table(&matrix.to_frame().map_err(ViewError::from)?)
    })?;
    print_view(&response.pollutant_correlation, |matrix| {
        print_table(&matrix.to_frame().map_err(ViewError::from)?)
    })?;
    print_view(&response.station_pollutant_average, print_table)?;
    print_view(&response.monthly_pollutant_trend, print_table)?;
    for extremes in [&response.temperature_extremes, &response.highest_rainfall] {
        print_view(extremes, |extremes| {
            print_table(&extremes.table)?;
            if let Some(lowest) = &extremes.lowest {
                println!("Lowest {}: {} at {}", extremes.column, lowest.value, lowest.station);
            }
            if let Some(highest) = &extremes.highest {
                println!("Highest {}: {} at {}", extremes.column, highest.value, highest.station);
            }
            Ok(())
        })?;
    }
    Ok(())
}
