pub mod averages;
pub mod correlation;
pub mod error;
pub mod extremes;
pub mod time_series;
