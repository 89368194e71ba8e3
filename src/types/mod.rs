pub mod columns;
pub mod month_period;
pub mod normalized_table;
pub mod season;
pub mod selection;
pub mod theme;
