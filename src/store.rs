//! Collection store, its handle, and builder.

use crate::error::{Error, Result};
use crate::persist::{atomic_write, load};
use crate::policy::{ListSource, SaveFailure};
use crate::record::Record;
use crate::serializer::{JsonSerializer, Serializer};
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// In-memory mirror of one JSON array file.
///
/// Owns the cached records and the next-id counter. Every mutation goes
/// through one lock: validate, change the cache, rewrite the whole file. That
/// keeps operations on one store sequentially consistent.
///
/// Nothing coordinates two stores opened on the same path. Each one has its
/// own cache and its own counter, computed when it was opened, and each save
/// replaces the file wholesale, so the last writer wins. Share one
/// [`StoreHandle`] (it's `Clone`) instead of opening the file twice.
pub struct CollectionStore<T> {
    path: PathBuf,
    serializer: JsonSerializer,
    on_save_failure: SaveFailure,
    list_source: ListSource,
    state: Mutex<State<T>>,
}

/// Cached records plus the id counter. Only reachable under the store lock.
///
/// `next_id` is `None` once a record holds `u64::MAX`: there is no id left
/// above it, so the records stay readable but nothing new can be added.
#[derive(Debug)]
pub(crate) struct State<T> {
    pub(crate) records: Vec<T>,
    next_id: Option<u64>,
}

impl<T: Record> State<T> {
    fn new(records: Vec<T>) -> Self {
        let next_id = match records.iter().map(Record::id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };
        Self { records, next_id }
    }

    /// Hand out an id of at least `floor` that is above everything issued so
    /// far, and move the counter past it. Leaves the counter alone and fails
    /// with [`Error::IdsExhausted`] when that id would be `u64::MAX` or more.
    pub(crate) fn allocate_id(&mut self, floor: u64) -> Result<u64> {
        let exhausted = || Error::IdsExhausted {
            collection: T::COLLECTION,
        };
        let id = self.next_id.ok_or_else(exhausted)?.max(floor);
        let next = id.checked_add(1).ok_or_else(exhausted)?;
        self.next_id = Some(next);
        Ok(id)
    }

    pub(crate) fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }
}

impl<T: Record> CollectionStore<T> {
    /// Open (or start) a collection at `path` with the default settings:
    /// pretty JSON, save errors returned to the caller, `list` from cache.
    pub fn open(path: impl AsRef<Path>) -> StoreHandle<T> {
        Self::builder(path).build()
    }

    /// Start configuring a new store. Call [`.build()`](CollectionStoreBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> CollectionStoreBuilder<T> {
        CollectionStoreBuilder::new(path)
    }

    // ---- raw persistence ----

    /// Read the backing file as it is right now.
    ///
    /// Never fails: a missing file, an unreadable one, or one that isn't a
    /// JSON array of records all come back as an empty collection. Anything
    /// other than a missing file gets logged.
    pub fn load(&self) -> Vec<T> {
        match load(&self.path, &self.serializer) {
            Ok(records) => records,
            Err(e) => {
                log::warn!(
                    "treating {} collection at {} as empty: {e}",
                    T::COLLECTION,
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    /// Overwrite the backing file with `records`. Does not touch the cache.
    pub fn save(&self, records: &[T]) -> Result<()> {
        let bytes = self.serializer.serialize(records)?;
        atomic_write(&self.path, &bytes)
    }

    /// Throw away the cache and re-read the file, recomputing the id counter.
    pub fn reload(&self) {
        let fresh = State::new(self.load());
        *self.state.lock() = fresh;
    }

    // ---- reads ----

    /// Records in order, at most `limit` of them. A missing or non-positive
    /// limit returns everything. Reads the cache or the file depending on the
    /// store's [`ListSource`].
    #[must_use]
    pub fn list(&self, limit: Option<i64>) -> Vec<T> {
        let mut records = match self.list_source {
            ListSource::Cache => self.snapshot(),
            ListSource::Disk => self.load(),
        };
        if let Some(n) = limit.and_then(|n| usize::try_from(n).ok()).filter(|&n| n > 0) {
            records.truncate(n);
        }
        records
    }

    /// Owned copy of the record with `id`, or `None`.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<T> {
        self.state.lock().records.iter().find(|r| r.id() == id).cloned()
    }

    /// Owned copy of every cached record.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.state.lock().records.clone()
    }

    /// Number of cached records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    /// `true` when the cache holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The id the next plain allocation would hand out, or `None` when the id
    /// space is used up.
    #[must_use]
    pub fn next_id(&self) -> Option<u64> {
        self.state.lock().next_id
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ---- internal ----

    /// Run one mutation under the lock, then rewrite the file.
    ///
    /// `f` must leave the state untouched when it returns an error; nothing is
    /// written in that case. A failed write does not undo the mutation.
    pub(crate) fn mutate<R>(&self, f: impl FnOnce(&mut State<T>) -> Result<R>) -> Result<R> {
        let mut state = self.state.lock();
        let out = f(&mut *state)?;
        if let Err(e) = self.save(&state.records) {
            match self.on_save_failure {
                SaveFailure::Propagate => {
                    log::error!(
                        "failed to save {} collection to {}: {e}",
                        T::COLLECTION,
                        self.path.display()
                    );
                    return Err(e);
                }
                SaveFailure::Log => {
                    log::warn!(
                        "failed to save {} collection to {}, keeping change in memory only: {e}",
                        T::COLLECTION,
                        self.path.display()
                    );
                }
            }
        }
        Ok(out)
    }
}

impl<T> std::fmt::Debug for CollectionStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore")
            .field("path", &self.path)
            .field("on_save_failure", &self.on_save_failure)
            .field("list_source", &self.list_source)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`CollectionStore`].
///
/// ```rust,no_run
/// use json_catalog::{CollectionStore, ListSource, Product, SaveFailure};
///
/// let products = CollectionStore::<Product>::builder("products.json")
///     .pretty(false)
///     .on_save_failure(SaveFailure::Log)
///     .list_source(ListSource::Disk)
///     .build();
/// ```
pub struct CollectionStoreBuilder<T> {
    path: PathBuf,
    pretty: bool,
    on_save_failure: SaveFailure,
    list_source: ListSource,
    _marker: PhantomData<T>,
}

impl<T: Record> CollectionStoreBuilder<T> {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: true,
            on_save_failure: SaveFailure::default(),
            list_source: ListSource::default(),
            _marker: PhantomData,
        }
    }

    /// Write indented JSON (default: `true`).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// What a failed save does (default: [`SaveFailure::Propagate`]).
    pub fn on_save_failure(mut self, policy: SaveFailure) -> Self {
        self.on_save_failure = policy;
        self
    }

    /// Where `list` reads from (default: [`ListSource::Cache`]).
    pub fn list_source(mut self, source: ListSource) -> Self {
        self.list_source = source;
        self
    }

    /// Load the file (or start empty) and return a handle.
    pub fn build(self) -> StoreHandle<T> {
        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::compact()
        };

        let store = CollectionStore {
            path: self.path,
            serializer,
            on_save_failure: self.on_save_failure,
            list_source: self.list_source,
            state: Mutex::new(State::new(Vec::new())),
        };
        store.reload();

        log::debug!(
            "opened {} collection at {}: {} records, next id {:?}",
            T::COLLECTION,
            store.path.display(),
            store.len(),
            store.next_id()
        );

        StoreHandle {
            inner: Arc::new(store),
        }
    }
}

impl<T> std::fmt::Debug for CollectionStoreBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStoreBuilder")
            .field("path", &self.path)
            .field("pretty", &self.pretty)
            .field("on_save_failure", &self.on_save_failure)
            .field("list_source", &self.list_source)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Shared ownership of one store.
///
/// Derefs to [`CollectionStore`]. Cloning gives another handle to the *same*
/// cache and counter; opening the path again gives an independent store.
pub struct StoreHandle<T> {
    pub(crate) inner: Arc<CollectionStore<T>>,
}

impl<T> StoreHandle<T> {
    /// `true` if both handles point at the same store.
    #[must_use]
    pub fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for StoreHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::ops::Deref for StoreHandle<T> {
    type Target = CollectionStore<T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> std::fmt::Debug for StoreHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&*self.inner, f)
    }
}
