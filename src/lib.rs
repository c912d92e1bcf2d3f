pub mod api;
pub mod comparison;
pub mod format;
pub mod kpi;
pub mod models;
pub mod ui;
