use std::collections::HashSet;

use super::{PrefValue, Preference};

/// A batch of mutations applied to a store through a single commit.
///
/// Operations are recorded in call order, but commit semantics are fixed:
/// a `clear`, then every removal, then every put, regardless of the order
/// the caller chained them in. Remove-before-put mirrors the editor
/// semantics of the platform stores this crate adapts and is part of the
/// [`PreferenceStore`](super::PreferenceStore) contract, not an
/// implementation detail of any one store.
///
/// Nothing in a batch is observable until it is committed.
#[derive(Debug, Clone, Default)]
pub struct EditBatch {
    clear: bool,
    removals: Vec<String>,
    puts: Vec<(String, PrefValue)>,
}

impl EditBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a put of any natively typed value.
    pub fn put<T: Preference>(&mut self, key: impl Into<String>, value: T) -> &mut Self {
        self.puts.push((key.into(), value.into_value()));
        self
    }

    /// Records a string put.
    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.put(key, value.into())
    }

    /// Records a string-set put.
    pub fn put_string_set(&mut self, key: impl Into<String>, value: HashSet<String>) -> &mut Self {
        self.put(key, value)
    }

    /// Records an int put.
    pub fn put_int(&mut self, key: impl Into<String>, value: i32) -> &mut Self {
        self.put(key, value)
    }

    /// Records a long put.
    pub fn put_long(&mut self, key: impl Into<String>, value: i64) -> &mut Self {
        self.put(key, value)
    }

    /// Records a float put.
    pub fn put_float(&mut self, key: impl Into<String>, value: f32) -> &mut Self {
        self.put(key, value)
    }

    /// Records a bool put.
    pub fn put_bool(&mut self, key: impl Into<String>, value: bool) -> &mut Self {
        self.put(key, value)
    }

    /// Records an enum put, stored as the variant's string name.
    ///
    /// The counterpart readers are
    /// [`Preferences::get_enum`](crate::Preferences::get_enum) and
    /// [`Preferences::watch_enum`](crate::Preferences::watch_enum).
    pub fn put_enum<E: AsRef<str>>(&mut self, key: impl Into<String>, value: E) -> &mut Self {
        self.put_string(key, value.as_ref())
    }

    /// Records a removal.
    pub fn remove(&mut self, key: impl Into<String>) -> &mut Self {
        self.removals.push(key.into());
        self
    }

    /// Records a clear of every entry in the store.
    pub fn clear(&mut self) -> &mut Self {
        self.clear = true;
        self
    }

    /// Whether the batch clears the store before applying puts.
    pub fn clears_all(&self) -> bool {
        self.clear
    }

    /// Keys removed by the batch, in call order.
    pub fn removals(&self) -> &[String] {
        &self.removals
    }

    /// Entries written by the batch, in call order. A later put of the same
    /// key wins.
    pub fn puts(&self) -> &[(String, PrefValue)] {
        &self.puts
    }

    /// Whether the batch records no operations at all.
    pub fn is_empty(&self) -> bool {
        !self.clear && self.removals.is_empty() && self.puts.is_empty()
    }
}
