pub mod catalog;
pub mod providers;

pub use catalog::CatalogService;
