use image::RgbaImage;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::{CanvasError, CanvasResult};
use crate::util::time;

pub type RecordId = Uuid;

/// A drawing as handed back by a [`DrawingStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct SavedDrawing {
    pub id: RecordId,
    pub name: String,
    pub image: RgbaImage,
    /// Milliseconds since the UNIX epoch
    pub timestamp: u64,
}

/// Persistence for exported drawings.
///
/// Implementations are shared with a worker thread by the host, hence `Send + Sync`.
pub trait DrawingStore: Send + Sync {
    fn save(&self, name: &str, image: &RgbaImage) -> CanvasResult<RecordId>;

    /// All saved drawings, newest first
    fn list(&self) -> CanvasResult<Vec<SavedDrawing>>;

    fn delete(&self, id: RecordId) -> CanvasResult<()>;
}

/// Name used when the user saves without typing one
pub fn default_drawing_name() -> String {
    format!("drawing_{}", time::timestamp_millis())
}

/// Trim `name`, falling back to [`default_drawing_name`] when nothing is left
pub fn resolve_drawing_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        default_drawing_name()
    } else {
        name.to_owned()
    }
}

/// Keeps saved drawings in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SavedDrawing>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl DrawingStore for MemoryStore {
    fn save(&self, name: &str, image: &RgbaImage) -> CanvasResult<RecordId> {
        let record = SavedDrawing {
            id: Uuid::new_v4(),
            name: resolve_drawing_name(name),
            image: image.clone(),
            timestamp: time::timestamp_millis(),
        };
        let id = record.id;
        log::info!("💾 Saved drawing '{}' ({}x{})", record.name, image.width(), image.height());
        self.records.lock().push(record);
        Ok(id)
    }

    fn list(&self) -> CanvasResult<Vec<SavedDrawing>> {
        // Records are appended in save order, so reversing puts equal timestamps newest first too
        let mut drawings: Vec<SavedDrawing> = self.records.lock().iter().rev().cloned().collect();
        drawings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(drawings)
    }

    fn delete(&self, id: RecordId) -> CanvasResult<()> {
        let mut records = self.records.lock();
        let index = records
            .iter()
            .position(|record| record.id == id)
            .ok_or(CanvasError::RecordNotFound(id))?;
        let record = records.remove(index);
        log::info!("🗑️ Deleted drawing '{}'", record.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_list_is_newest_first() {
        let store = MemoryStore::new();
        let first = store.save("first", &RgbaImage::new(1, 1)).unwrap();
        let second = store.save("second", &RgbaImage::new(2, 2)).unwrap();
        let third = store.save("third", &RgbaImage::new(3, 3)).unwrap();

        let ids: Vec<RecordId> = store.list().unwrap().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![third, second, first]);
    }

    #[test]
    fn test_blank_name_gets_default() {
        let store = MemoryStore::new();
        store.save("   ", &RgbaImage::new(1, 1)).unwrap();
        store.save("  sunset ", &RgbaImage::new(1, 1)).unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names[0], "sunset");
        assert!(names[1].starts_with("drawing_"));
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let id = store.save("doomed", &RgbaImage::new(1, 1)).unwrap();
        assert_eq!(store.len(), 1);

        store.delete(id).unwrap();
        assert!(store.is_empty());
        assert!(matches!(store.delete(id), Err(CanvasError::RecordNotFound(missing)) if missing == id));
    }

    #[test]
    fn test_save_from_worker_thread() {
        let store = Arc::new(MemoryStore::new());
        let worker = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.save("async", &RgbaImage::new(4, 4)))
        };
        let id = worker.join().unwrap().unwrap();

        let saved = store.list().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, id);
        assert_eq!(saved[0].image.dimensions(), (4, 4));
    }
}
