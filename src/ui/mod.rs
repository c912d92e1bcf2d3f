pub mod app;
pub mod components;
pub mod results;
pub mod setup;
