pub mod data_loader;
pub mod data_source;
pub mod error;
pub mod normalize;
pub mod table_cache;
