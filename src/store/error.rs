use super::PrefKind;

/// Errors raised by preference reads and conversions.
///
/// Commit failure is not represented here: a rejected commit is reported as
/// a `false` return from [`PreferenceStore::commit`](super::PreferenceStore::commit),
/// never as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrefError {
    /// The stored value's type disagrees with the requested accessor's type.
    #[error("type mismatch for key '{key}': requested {requested}, stored value is {stored}")]
    TypeMismatch {
        /// Key whose value was read.
        key: String,
        /// Type the caller asked for.
        requested: PrefKind,
        /// Type actually stored under the key.
        stored: PrefKind,
    },

    /// A stored string does not name a variant of the requested enum type.
    #[error("'{name}' stored under key '{key}' is not a variant of {target}")]
    UnknownVariant {
        /// Key whose value was read.
        key: String,
        /// The stored string that failed to parse.
        name: String,
        /// The enum type the caller asked for.
        target: &'static str,
    },
}
