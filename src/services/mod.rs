pub mod catalog;
pub mod questionnaire;
pub mod recommendations;

pub use catalog::{open_catalog, CatalogError, CatalogSource, CsvCatalog, PreloadedCatalog};
pub use questionnaire::Theme;
pub use recommendations::RecommendationEngine;
