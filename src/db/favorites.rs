use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::Movie;

/// Storage port for the favorites collection
///
/// Implementations serialize their own mutations. Callers decide whether a
/// save is allowed; `save` still refuses a second entry for the same id.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FavoritesRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Movie>>;

    async fn find_by_id(&self, imdb_id: &str) -> AppResult<Option<Movie>>;

    async fn exists(&self, imdb_id: &str) -> AppResult<bool>;

    async fn save(&self, movie: Movie) -> AppResult<Movie>;

    async fn remove(&self, imdb_id: &str) -> AppResult<Option<Movie>>;

    async fn count(&self) -> AppResult<usize>;
}

/// Favorites kept as a JSON array in a single file
///
/// Every call reads the file again, so the collection on disk is the only
/// source of truth. Mutations hold `write_lock` across reload, change and
/// persist.
pub struct JsonFavoritesStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// Outcome of reading the collection file
enum Loaded {
    Movies(Vec<Movie>),
    Malformed,
}

impl JsonFavoritesStore {
    /// Opens the store at `path`, creating an empty collection if absent
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let store = Self {
            path,
            write_lock: Mutex::new(()),
        };

        if fs::try_exists(&store.path).await? {
            // Heal up front rather than on the first request
            let _guard = store.write_lock.lock().await;
            store.reload_locked().await?;
        } else {
            store.persist(&[]).await?;
            tracing::info!(path = %store.path.display(), "Created empty favorites collection");
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> AppResult<Loaded> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Loaded::Movies(Vec::new()))
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Vec<Movie>>(&bytes) {
            Ok(movies) => Ok(Loaded::Movies(movies)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Favorites file is malformed; resetting to an empty collection"
                );
                Ok(Loaded::Malformed)
            }
        }
    }

    /// Reads the collection for a read-only operation
    ///
    /// A malformed file is healed under the write lock; if that write fails
    /// the read still answers with an empty collection.
    async fn load(&self) -> AppResult<Vec<Movie>> {
        match self.read_file().await? {
            Loaded::Movies(movies) => Ok(movies),
            Loaded::Malformed => {
                // A writer may have healed and saved while we waited
                let _guard = self.write_lock.lock().await;
                match self.reload_locked().await {
                    Ok(movies) => Ok(movies),
                    Err(e) => {
                        tracing::error!(
                            path = %self.path.display(),
                            error = %e,
                            "Failed to reset malformed favorites file"
                        );
                        Ok(Vec::new())
                    }
                }
            }
        }
    }

    /// Reads the collection while holding the write lock
    ///
    /// A malformed file is rewritten as empty and a failure to do so is
    /// returned to the caller.
    async fn reload_locked(&self) -> AppResult<Vec<Movie>> {
        match self.read_file().await? {
            Loaded::Movies(movies) => Ok(movies),
            Loaded::Malformed => {
                self.persist(&[]).await?;
                Ok(Vec::new())
            }
        }
    }

    /// Writes the whole collection through a temporary sibling file
    async fn persist(&self, movies: &[Movie]) -> AppResult<()> {
        let json = serde_json::to_vec_pretty(movies)
            .map_err(|e| AppError::Storage(format!("Failed to encode favorites: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        let result = async {
            fs::write(&tmp_path, &json).await?;
            fs::rename(&tmp_path, &self.path).await
        }
        .await;

        if let Err(e) = result {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Failed to persist favorites"
            );
            let _ = fs::remove_file(&tmp_path).await;
            return Err(AppError::Storage(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            )));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl FavoritesRepository for JsonFavoritesStore {
    async fn find_all(&self) -> AppResult<Vec<Movie>> {
        self.load().await
    }

    async fn find_by_id(&self, imdb_id: &str) -> AppResult<Option<Movie>> {
        let movies = self.load().await?;
        Ok(movies.into_iter().find(|m| m.has_id(imdb_id)))
    }

    async fn exists(&self, imdb_id: &str) -> AppResult<bool> {
        let movies = self.load().await?;
        Ok(movies.iter().any(|m| m.has_id(imdb_id)))
    }

    async fn save(&self, movie: Movie) -> AppResult<Movie> {
        let _guard = self.write_lock.lock().await;
        let mut movies = self.reload_locked().await?;

        if movies.iter().any(|m| m.has_id(&movie.imdb_id)) {
            return Err(AppError::Duplicate(movie.imdb_id));
        }

        movies.push(movie.clone());
        self.persist(&movies).await?;

        tracing::info!(
            imdb_id = %movie.imdb_id,
            total = movies.len(),
            "Favorite saved"
        );

        Ok(movie)
    }

    async fn remove(&self, imdb_id: &str) -> AppResult<Option<Movie>> {
        let _guard = self.write_lock.lock().await;
        let mut movies = self.reload_locked().await?;

        let Some(index) = movies.iter().position(|m| m.has_id(imdb_id)) else {
            return Ok(None);
        };

        let removed = movies.remove(index);
        self.persist(&movies).await?;

        tracing::info!(
            imdb_id = %removed.imdb_id,
            total = movies.len(),
            "Favorite removed"
        );

        Ok(Some(removed))
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.load().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn movie(id: &str) -> Movie {
        Movie {
            title: format!("Movie {}", id),
            imdb_id: id.to_string(),
            year: "2001".to_string(),
            poster: String::new(),
        }
    }

    async fn create_test_store() -> (TempDir, JsonFavoritesStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonFavoritesStore::open(dir.path().join("data").join("favorites.json"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_open_creates_empty_collection() {
        let (_dir, store) = create_test_store().await;

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let parsed: Vec<Movie> = serde_json::from_str(&raw).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_then_lookup_is_case_insensitive() {
        let (_dir, store) = create_test_store().await;

        store.save(movie("tt0001")).await.unwrap();

        assert!(store.exists("TT0001").await.unwrap());
        assert_eq!(
            store.find_by_id("Tt0001").await.unwrap(),
            Some(movie("tt0001"))
        );
        assert!(!store.exists("tt0002").await.unwrap());
        assert_eq!(store.find_by_id("tt0002").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate() {
        let (_dir, store) = create_test_store().await;

        store.save(movie("tt0001")).await.unwrap();
        let result = store.save(movie("TT0001")).await;

        assert!(matches!(result, Err(AppError::Duplicate(_))));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let (_dir, store) = create_test_store().await;

        store.save(movie("tt0001")).await.unwrap();
        store.save(movie("tt0002")).await.unwrap();

        let removed = store.remove("TT0001").await.unwrap();
        assert_eq!(removed, Some(movie("tt0001")));
        assert_eq!(store.remove("tt0001").await.unwrap(), None);

        let remaining = store.find_all().await.unwrap();
        assert_eq!(remaining, vec![movie("tt0002")]);
    }

    #[tokio::test]
    async fn test_collection_survives_reopen() {
        let (dir, store) = create_test_store().await;
        store.save(movie("tt0001")).await.unwrap();
        let path = store.path().to_path_buf();
        drop(store);

        let reopened = JsonFavoritesStore::open(&path).await.unwrap();
        assert_eq!(reopened.find_all().await.unwrap(), vec![movie("tt0001")]);
        drop(dir);
    }

    #[tokio::test]
    async fn test_sees_out_of_band_changes_before_mutating() {
        let (_dir, store) = create_test_store().await;
        store.save(movie("tt0001")).await.unwrap();

        let external = serde_json::to_vec(&vec![movie("tt0001"), movie("tt0009")]).unwrap();
        std::fs::write(store.path(), external).unwrap();

        store.save(movie("tt0002")).await.unwrap();

        let ids: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.imdb_id)
            .collect();
        assert_eq!(ids, vec!["tt0001", "tt0009", "tt0002"]);
    }

    #[tokio::test]
    async fn test_malformed_file_heals_to_empty() {
        let (_dir, store) = create_test_store().await;
        std::fs::write(store.path(), b"{ not a list").unwrap();

        assert!(store.find_all().await.unwrap().is_empty());

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let parsed: Vec<Movie> = serde_json::from_str(&raw).unwrap();
        assert!(parsed.is_empty());
    }

    #[tokio::test]
    async fn test_read_after_heal_returns_concurrent_save() {
        let (_dir, store) = create_test_store().await;
        let store = Arc::new(store);
        std::fs::write(store.path(), b"garbage").unwrap();

        let guard = store.write_lock.lock().await;
        let reader = {
            let store = store.clone();
            tokio::spawn(async move { store.find_all().await })
        };
        // Reader sees the malformed file and queues on the lock
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        std::fs::write(
            store.path(),
            serde_json::to_vec(&vec![movie("tt0001")]).unwrap(),
        )
        .unwrap();
        drop(guard);

        assert_eq!(reader.await.unwrap().unwrap(), vec![movie("tt0001")]);
    }

    #[tokio::test]
    async fn test_malformed_file_heals_on_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, b"[{\"title\": 5}]").unwrap();

        let store = JsonFavoritesStore::open(&path).await.unwrap();
        store.save(movie("tt0001")).await.unwrap();

        assert_eq!(store.find_all().await.unwrap(), vec![movie("tt0001")]);
    }

    #[tokio::test]
    async fn test_concurrent_saves_are_not_lost() {
        let (_dir, store) = create_test_store().await;
        let store = Arc::new(store);

        let mut tasks = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.save(movie(&format!("tt{:04}", i))).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_saves_keep_one() {
        let (_dir, store) = create_test_store().await;
        let store = Arc::new(store);

        let mut tasks = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move { store.save(movie("tt0001")).await }));
        }

        let mut saved = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => saved += 1,
                Err(AppError::Duplicate(_)) => {}
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(saved, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_is_storage_error() {
        let (_dir, store) = create_test_store().await;

        // A directory where the temporary file should go blocks the write
        std::fs::create_dir(store.path().with_extension("json.tmp")).unwrap();

        let result = store.save(movie("tt0001")).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
