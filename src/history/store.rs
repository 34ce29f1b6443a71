//! Filesystem-based review store.
//!
//! Stores each review as `<id>.json` in `~/.config/critiq/reviews/`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::CodeReview;

use super::{ReviewQuery, ReviewStore, StoreError};

/// Filesystem-based review store.
pub struct FileStore {
    dir: Option<PathBuf>,
}

impl FileStore {
    /// Create a store in the default history directory.
    pub fn new() -> Self {
        let dir = dirs::config_dir()
            .map(|d| d.join(crate::constants::CONFIG_DIR).join(crate::constants::HISTORY_DIR));
        Self { dir }
    }

    /// Create a store rooted at a specific directory.
    pub fn new_with_dir(dir: PathBuf) -> Self {
        Self { dir: Some(dir) }
    }

    /// Return the history directory path.
    pub fn path(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn dir(&self) -> Result<&Path, StoreError> {
        self.dir.as_deref().ok_or(StoreError::NoDirectory)
    }

    /// Get the file path for a review id.
    ///
    /// Only UUIDs map to a path, so ids can never escape the directory.
    fn record_path(&self, id: &str) -> Result<Option<PathBuf>, StoreError> {
        let dir = self.dir()?;
        Ok(uuid::Uuid::parse_str(id)
            .ok()
            .map(|uuid| dir.join(format!("{}.json", uuid.hyphenated()))))
    }

    /// Read every record in the directory. Unreadable files are skipped.
    async fn read_all(&self) -> Result<Vec<CodeReview>, StoreError> {
        let dir = self.dir()?;
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(dir, e)),
        };

        let mut reviews = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(dir, e))? {
            let path = entry.path();
            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            match read_record(&path).await {
                Ok(review) => reviews.push(review),
                Err(e) => warn!(path = %path.display(), "skipping unreadable review record: {e}"),
            }
        }
        Ok(reviews)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReviewStore for FileStore {
    async fn insert(&self, review: &CodeReview) -> Result<String, StoreError> {
        let dir = self.dir()?;
        let path = self.record_path(&review.id)?.ok_or_else(|| {
            StoreError::Io {
                path: dir.join(&review.id),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "review id is not a UUID",
                ),
            }
        })?;

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| io_error(dir, e))?;
        let content = serde_json::to_string_pretty(review)?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| io_error(&path, e))?;

        debug!(id = %review.id, path = %path.display(), "stored review");
        Ok(review.id.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<CodeReview>, StoreError> {
        let Some(path) = self.record_path(id)? else {
            return Ok(None);
        };
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn list(&self, query: &ReviewQuery) -> Result<Vec<CodeReview>, StoreError> {
        let mut reviews = self.read_all().await?;
        if let Some(ref user) = query.user_id {
            reviews.retain(|r| r.user_id.as_ref() == Some(user));
        }
        reviews.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(reviews
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .collect())
    }
}

async fn read_record(path: &Path) -> Result<CodeReview, StoreError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| io_error(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewAnalysis;
    use pretty_assertions::assert_eq;

    fn make_store(dir: &Path) -> FileStore {
        FileStore::new_with_dir(dir.to_path_buf())
    }

    fn review(filename: &str, created_at: u64, user: Option<&str>) -> CodeReview {
        let mut review = CodeReview::new(
            filename,
            "python",
            "x = 1",
            ReviewAnalysis::fallback("test"),
            user.map(str::to_string),
        );
        review.created_at = created_at;
        review
    }

    #[tokio::test]
    async fn insert_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        let r = review("a.py", 100, None);

        let id = store.insert(&r).await.unwrap();
        assert_eq!(id, r.id);
        assert!(dir.path().join(format!("{id}.json")).exists());
        assert_eq!(store.get(&id).await.unwrap(), Some(r));
    }

    #[tokio::test]
    async fn get_unknown_or_invalid_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        assert_eq!(
            store.get("6f1c7a52-5b5e-4b7f-9a59-0d3f2b8c9e11").await.unwrap(),
            None
        );
        assert_eq!(store.get("../../etc/passwd").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(&dir.path().join("never-created"));
        assert!(store.list(&ReviewQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first_with_paging() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        for (name, t) in [("old.py", 10), ("new.py", 30), ("mid.py", 20)] {
            store.insert(&review(name, t, None)).await.unwrap();
        }

        let all = store.list(&ReviewQuery::default()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["new.py", "mid.py", "old.py"]);

        let page = store
            .list(&ReviewQuery {
                limit: 1,
                skip: 1,
                user_id: None,
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].filename, "mid.py");
    }

    #[tokio::test]
    async fn list_filters_by_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        store.insert(&review("a.py", 1, Some("alice"))).await.unwrap();
        store.insert(&review("b.py", 2, Some("bob"))).await.unwrap();
        store.insert(&review("c.py", 3, None)).await.unwrap();

        let only_alice = store
            .list(&ReviewQuery::all(Some("alice".to_string())))
            .await
            .unwrap();
        assert_eq!(only_alice.len(), 1);
        assert_eq!(only_alice[0].filename, "a.py");

        let everyone = store.list(&ReviewQuery::all(None)).await.unwrap();
        assert_eq!(everyone.len(), 3);
    }

    #[tokio::test]
    async fn corrupt_records_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        store.insert(&review("good.py", 1, None)).await.unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let all = store.list(&ReviewQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn hand_edited_out_of_range_score_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        store.insert(&review("good.py", 1, None)).await.unwrap();
        let edited = review("edited.py", 2, None);
        let id = store.insert(&edited).await.unwrap();

        let path = dir.path().join(format!("{id}.json"));
        let mut record: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        record["analysis"]["readability_score"] = serde_json::json!(0);
        std::fs::write(&path, record.to_string()).unwrap();

        let all = store.list(&ReviewQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].filename, "good.py");
        assert!(matches!(store.get(&id).await, Err(StoreError::Encode(_))));
    }

    #[tokio::test]
    async fn store_without_directory_errors() {
        let store = FileStore { dir: None };
        let err = store.list(&ReviewQuery::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NoDirectory));
    }
}
