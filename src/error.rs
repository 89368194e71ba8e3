use crate::config::ConfigError;
use crate::loader::error::LoadError;
use crate::views::error::ViewError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AirQualityError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
