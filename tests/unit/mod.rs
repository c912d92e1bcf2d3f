pub mod formatting;
pub mod kpi_alignment;
pub mod trends;
