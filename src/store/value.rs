use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{PrefError, PreferenceStore};

/// Snapshot of every entry in a store, as returned by
/// [`PreferenceStore::get_all`].
pub type PrefMap = HashMap<String, PrefValue>;

/// A dynamically typed preference value.
///
/// Stores hold exactly these six shapes; there is no separate type tag
/// beyond the variant itself. Which typed accessor a caller uses determines
/// the type it expects, and a disagreement surfaces as
/// [`PrefError::TypeMismatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrefValue {
    /// A UTF-8 string.
    String(String),
    /// An unordered set of strings.
    StringSet(HashSet<String>),
    /// A 32-bit signed integer.
    Int(i32),
    /// A 64-bit signed integer.
    Long(i64),
    /// A 32-bit float.
    Float(f32),
    /// A boolean.
    Bool(bool),
}

impl PrefValue {
    /// The type tag of this value.
    pub fn kind(&self) -> PrefKind {
        match self {
            PrefValue::String(_) => PrefKind::String,
            PrefValue::StringSet(_) => PrefKind::StringSet,
            PrefValue::Int(_) => PrefKind::Int,
            PrefValue::Long(_) => PrefKind::Long,
            PrefValue::Float(_) => PrefKind::Float,
            PrefValue::Bool(_) => PrefKind::Bool,
        }
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        PrefValue::String(value.to_owned())
    }
}

impl From<String> for PrefValue {
    fn from(value: String) -> Self {
        PrefValue::String(value)
    }
}

impl From<HashSet<String>> for PrefValue {
    fn from(value: HashSet<String>) -> Self {
        PrefValue::StringSet(value)
    }
}

impl From<i32> for PrefValue {
    fn from(value: i32) -> Self {
        PrefValue::Int(value)
    }
}

impl From<i64> for PrefValue {
    fn from(value: i64) -> Self {
        PrefValue::Long(value)
    }
}

impl From<f32> for PrefValue {
    fn from(value: f32) -> Self {
        PrefValue::Float(value)
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        PrefValue::Bool(value)
    }
}

/// Type tags for [`PrefValue`] variants, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefKind {
    /// A UTF-8 string.
    String,
    /// An unordered set of strings.
    StringSet,
    /// A 32-bit signed integer.
    Int,
    /// A 64-bit signed integer.
    Long,
    /// A 32-bit float.
    Float,
    /// A boolean.
    Bool,
}

impl fmt::Display for PrefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrefKind::String => "string",
            PrefKind::StringSet => "string set",
            PrefKind::Int => "int",
            PrefKind::Long => "long",
            PrefKind::Float => "float",
            PrefKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

mod private {
    use std::collections::HashSet;

    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for HashSet<String> {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f32 {}
    impl Sealed for bool {}
}

/// A natively typed preference value.
///
/// Sealed: implemented exactly for the six types a store can hold. Each
/// implementation binds the matching typed getter on [`PreferenceStore`],
/// which lets accessor and stream machinery be written once over
/// `T: Preference` instead of once per type.
pub trait Preference: Clone + Send + Sync + private::Sealed + 'static {
    /// Reads the value stored under `key`, falling back to `default` when
    /// the key is absent.
    ///
    /// # Errors
    /// [`PrefError::TypeMismatch`] when the stored value is not of this type.
    fn read(store: &dyn PreferenceStore, key: &str, default: &Self) -> Result<Self, PrefError>;

    /// Converts this value into its dynamically typed form.
    fn into_value(self) -> PrefValue;
}

impl Preference for String {
    fn read(store: &dyn PreferenceStore, key: &str, default: &Self) -> Result<Self, PrefError> {
        store.get_string(key, default)
    }

    fn into_value(self) -> PrefValue {
        PrefValue::String(self)
    }
}

impl Preference for HashSet<String> {
    fn read(store: &dyn PreferenceStore, key: &str, default: &Self) -> Result<Self, PrefError> {
        store.get_string_set(key, default)
    }

    fn into_value(self) -> PrefValue {
        PrefValue::StringSet(self)
    }
}

impl Preference for i32 {
    fn read(store: &dyn PreferenceStore, key: &str, default: &Self) -> Result<Self, PrefError> {
        store.get_int(key, *default)
    }

    fn into_value(self) -> PrefValue {
        PrefValue::Int(self)
    }
}

impl Preference for i64 {
    fn read(store: &dyn PreferenceStore, key: &str, default: &Self) -> Result<Self, PrefError> {
        store.get_long(key, *default)
    }

    fn into_value(self) -> PrefValue {
        PrefValue::Long(self)
    }
}

impl Preference for f32 {
    fn read(store: &dyn PreferenceStore, key: &str, default: &Self) -> Result<Self, PrefError> {
        store.get_float(key, *default)
    }

    fn into_value(self) -> PrefValue {
        PrefValue::Float(self)
    }
}

impl Preference for bool {
    fn read(store: &dyn PreferenceStore, key: &str, default: &Self) -> Result<Self, PrefError> {
        store.get_bool(key, *default)
    }

    fn into_value(self) -> PrefValue {
        PrefValue::Bool(self)
    }
}
