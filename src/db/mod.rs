pub mod favorites;

pub use favorites::FavoritesRepository;
pub use favorites::JsonFavoritesStore;
