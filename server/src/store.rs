use std::io;
use std::path::PathBuf;

use scribble_system::{serde_json, Stroke, UserId};
use tokio::fs;

/// Content-based stroke filter: there are no stroke ids, so deletion targets
/// either everything a user owns or the first exact structural match.
#[derive(Debug, Clone)]
pub enum StrokeFilter {
    Owner(UserId),
    Exact(Stroke),
}

/// Durable stroke collection: the working set lives in memory, every
/// mutation rewrites the backing JSON file. Insertion order is preserved and
/// is the order snapshots are served in.
pub struct PathStore {
    file: PathBuf,
    strokes: Vec<Stroke>,
}

impl PathStore {
    /// Reads the backing file; a missing file is an empty store. Called once
    /// at startup, before the server accepts any request.
    pub async fn load(file: impl Into<PathBuf>) -> io::Result<Self> {
        let file = file.into();
        let strokes = match fs::read(&file).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err),
        };
        log::info!("path store ready: {} strokes from {:?}", strokes.len(), file);
        Ok(Self { file, strokes })
    }

    /// Appends one stroke. No dedup: attribute-equal strokes coexist.
    pub async fn insert(&mut self, stroke: Stroke) -> io::Result<()> {
        self.strokes.push(stroke);
        self.persist().await
    }

    pub fn find_all(&self) -> Vec<Stroke> {
        self.strokes.clone()
    }

    /// Removes every match (by owner) or the first exact match. Deleting
    /// something that is already gone is a no-op, never an error.
    pub async fn delete_where(&mut self, filter: &StrokeFilter) -> io::Result<()> {
        match filter {
            StrokeFilter::Owner(user) => self.strokes.retain(|s| &s.user != user),
            StrokeFilter::Exact(stroke) => {
                if let Some(index) = self.strokes.iter().position(|s| s == stroke) {
                    self.strokes.remove(index);
                }
            }
        }
        self.persist().await
    }

    async fn persist(&self) -> io::Result<()> {
        let bytes = serde_json::to_vec(&self.strokes)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(&self.file, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribble_system::euclid::default::Point2D;
    use scribble_system::uuid::Uuid;

    fn temp_file() -> PathBuf {
        std::env::temp_dir().join(format!("{}.json", Uuid::new_v4()))
    }

    fn stroke(user: &str, x: f32) -> Stroke {
        Stroke::new(
            vec![Point2D::new(x, 0.0), Point2D::new(x, 10.0)],
            "#ff0000",
            2.0,
            user,
        )
    }

    #[tokio::test]
    async fn it_serves_inserted_strokes_in_snapshots() {
        let mut store = PathStore::load(temp_file()).await.unwrap();

        store.insert(stroke("alice", 0.0)).await.unwrap();
        let snapshot = store.find_all();
        assert_eq!(snapshot, vec![stroke("alice", 0.0)]);
    }

    #[tokio::test]
    async fn it_survives_a_reload() {
        let file = temp_file();
        let mut store = PathStore::load(file.clone()).await.unwrap();
        store.insert(stroke("alice", 0.0)).await.unwrap();
        store.insert(stroke("bob", 5.0)).await.unwrap();

        let reloaded = PathStore::load(file).await.unwrap();
        assert_eq!(reloaded.find_all(), store.find_all());
    }

    #[tokio::test]
    async fn it_clears_only_the_given_owner() {
        let mut store = PathStore::load(temp_file()).await.unwrap();
        store.insert(stroke("alice", 0.0)).await.unwrap();
        store.insert(stroke("alice", 1.0)).await.unwrap();
        store.insert(stroke("alice", 2.0)).await.unwrap();
        store.insert(stroke("bob", 3.0)).await.unwrap();

        store
            .delete_where(&StrokeFilter::Owner("alice".to_string()))
            .await
            .unwrap();

        assert_eq!(store.find_all(), vec![stroke("bob", 3.0)]);
    }

    #[tokio::test]
    async fn it_deletes_one_structural_match_idempotently() {
        let mut store = PathStore::load(temp_file()).await.unwrap();
        store.insert(stroke("alice", 0.0)).await.unwrap();
        store.insert(stroke("alice", 0.0)).await.unwrap();

        let filter = StrokeFilter::Exact(stroke("alice", 0.0));
        store.delete_where(&filter).await.unwrap();
        assert_eq!(store.find_all().len(), 1);

        store.delete_where(&filter).await.unwrap();
        assert_eq!(store.find_all().len(), 0);

        // Already gone: same state as deleting it once.
        store.delete_where(&filter).await.unwrap();
        assert_eq!(store.find_all().len(), 0);
    }
}
