//! Column names of the air-quality dataset and of the derived tables.

// Identity and time
pub const COL_STATION: &str = "station";
pub const COL_DATETIME: &str = "datetime";
pub const COL_DATE: &str = "date"; // Alternative name for a pre-combined timestamp
pub const COL_YEAR: &str = "year";
pub const COL_MONTH: &str = "month";
pub const COL_DAY: &str = "day";
pub const COL_HOUR: &str = "hour";

// Derived
pub const COL_SEASON: &str = "season";
pub const COL_MONTH_PERIOD: &str = "month_period";
pub const COL_MIN: &str = "min";
pub const COL_MAX: &str = "max";

// Pollutants
pub const COL_PM25: &str = "PM2.5";
pub const COL_PM10: &str = "PM10";
pub const COL_SO2: &str = "SO2";
pub const COL_NO2: &str = "NO2";
pub const COL_CO: &str = "CO";
pub const COL_O3: &str = "O3";

// Weather
pub const COL_TEMP: &str = "TEMP"; // Temperature, degrees Celsius
pub const COL_PRES: &str = "PRES"; // Pressure, hPa
pub const COL_DEWP: &str = "DEWP"; // Dew point
pub const COL_RAIN: &str = "RAIN"; // Precipitation, mm
pub const COL_WSPM: &str = "WSPM"; // Wind speed, m/s

pub const CALENDAR_COLUMNS: [&str; 4] = [COL_YEAR, COL_MONTH, COL_DAY, COL_HOUR];
pub const TIMESTAMP_COLUMNS: [&str; 2] = [COL_DATETIME, COL_DATE];

pub const POLLUTANTS: [&str; 6] = [COL_PM25, COL_PM10, COL_SO2, COL_NO2, COL_CO, COL_O3];

/// Every numeric measurement column that is coerced to `Float64` on load.
pub const MEASUREMENTS: [&str; 11] = [
    COL_PM25, COL_PM10, COL_SO2, COL_NO2, COL_CO, COL_O3, COL_TEMP, COL_PRES, COL_DEWP, COL_RAIN,
    COL_WSPM,
];

/// Columns correlated against each other in the weather/pollution view.
pub const WEATHER_POLLUTION_COLUMNS: [&str; 5] = [COL_TEMP, COL_PRES, COL_WSPM, COL_PM25, COL_PM10];

/// Columns correlated against each other in the pollutant view.
pub const GAS_POLLUTANTS: [&str; 4] = [COL_SO2, COL_NO2, COL_CO, COL_O3];

pub const PARTICULATES: [&str; 2] = [COL_PM25, COL_PM10];
