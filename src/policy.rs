//! Knobs that decide how a store reacts to write failures and where `list`
//! reads from.

/// What to do when writing the collection back to disk fails.
///
/// Neither variant rolls back the in-memory change: after a failed save the
/// cache holds the mutation and the file does not, until the next successful
/// save rewrites it.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveFailure {
    /// Log the error and return it to the caller.
    #[default]
    Propagate,
    /// Log the error and report success anyway.
    Log,
}

/// Where `list` gets its records from.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListSource {
    /// Answer from the in-memory cache.
    #[default]
    Cache,
    /// Re-read the backing file on every call. The cache is left alone, so
    /// edits made by another handle (or by hand) show up here but not in
    /// `get` or the id counter.
    Disk,
}
