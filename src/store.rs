//! In-memory repository for monuments, recognition results and user images.
//!
//! Each collection is keyed by a store-assigned identifier drawn from its own
//! counter. Counters start at 1 and only move forward, so an identifier is
//! never handed out twice, and iterating a collection in key order is the
//! same as iterating it in insertion order.
//!
//! All state sits behind one lock, held for a single lookup or insert per
//! operation. A poisoned lock is recovered, not reported.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::model::{
    Monument, MonumentId, NewMonument, NewRecognitionResult, NewUserImage, RecognitionId,
    RecognitionResult, UserImage, UserImageId,
};
use crate::seed::seed_monuments;

#[derive(Debug)]
struct Collection<T> {
    entries: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T: Clone> Collection<T> {
    fn new() -> Self {
        Self { entries: BTreeMap::new(), next_id: 1 }
    }

    fn insert_with(&mut self, build: impl FnOnce(u64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let entity = build(id);
        self.entries.insert(id, entity.clone());
        entity
    }

    fn get(&self, id: u64) -> Option<T> {
        self.entries.get(&id).cloned()
    }

    fn all(&self) -> Vec<T> {
        self.entries.values().cloned().collect()
    }
}

#[derive(Debug)]
struct Collections {
    monuments: Collection<Monument>,
    recognition_results: Collection<RecognitionResult>,
    user_images: Collection<UserImage>,
}

pub struct MonumentStore {
    inner: Mutex<Collections>,
}

impl fmt::Debug for MonumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("MonumentStore")
        .field("monuments", &inner.monuments.entries.len())
        .field("recognition_results", &inner.recognition_results.entries.len())
        .field("user_images", &inner.user_images.entries.len())
        .finish()
    }
}

impl Default for MonumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MonumentStore {
    /// Creates a store seeded with the built-in monument catalogue.
    pub fn new() -> Self {
        Self::with_monuments(seed_monuments())
    }

    /// Creates a store with no monuments at all.
    pub fn empty() -> Self {
        Self::with_monuments(Vec::new())
    }

    /// Creates a store seeded from `monuments`, assigning ids 1..=N in order.
    pub fn with_monuments(monuments: Vec<NewMonument>) -> Self {
        let store = Self {
            inner: Mutex::new(Collections {
                monuments: Collection::new(),
                recognition_results: Collection::new(),
                user_images: Collection::new(),
            }),
        };
        for monument in monuments {
            store.create_monument(monument);
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- MONUMENTS ---

    pub fn get_monuments(&self) -> Vec<Monument> {
        self.lock().monuments.all()
    }

    pub fn get_monument_by_id(&self, id: MonumentId) -> Option<Monument> {
        self.lock().monuments.get(id)
    }

    /// Exact, case-sensitive category match. No value is treated specially.
    pub fn get_monuments_by_category(&self, category: &str) -> Vec<Monument> {
        self.lock()
        .monuments
        .entries
        .values()
        .filter(|monument| monument.category == category)
        .cloned()
        .collect()
    }

    /// Case-insensitive lookup by display name.
    pub fn find_monument_by_name(&self, name: &str) -> Option<Monument> {
        let wanted = name.trim().to_lowercase();
        self.lock()
        .monuments
        .entries
        .values()
        .find(|monument| monument.name.to_lowercase() == wanted)
        .cloned()
    }

    pub fn create_monument(&self, monument: NewMonument) -> Monument {
        self.lock().monuments.insert_with(|id| monument.with_id(id))
    }

    // --- RECOGNITION RESULTS ---

    pub fn save_recognition_result(&self, result: NewRecognitionResult) -> RecognitionResult {
        self.lock().recognition_results.insert_with(|id| result.with_id(id))
    }

    pub fn get_recognition_results(&self) -> Vec<RecognitionResult> {
        self.lock().recognition_results.all()
    }

    pub fn get_recognition_result_by_id(&self, id: RecognitionId) -> Option<RecognitionResult> {
        self.lock().recognition_results.get(id)
    }

    // --- USER IMAGES ---

    pub fn save_user_image(&self, image: NewUserImage) -> UserImage {
        self.lock().user_images.insert_with(|id| image.with_id(id))
    }

    pub fn get_user_images(&self) -> Vec<UserImage> {
        self.lock().user_images.all()
    }

    /// Replaces the `processed` flag. Returns `None` and changes nothing when
    /// `id` is unknown.
    pub fn update_user_image(&self, id: UserImageId, processed: bool) -> Option<UserImage> {
        let mut inner = self.lock();
        let image = inner.user_images.entries.get_mut(&id)?;
        image.processed = processed;
        Some(image.clone())
    }
}
