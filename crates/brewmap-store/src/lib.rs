#![forbid(unsafe_code)]

use brewmap_model::{CafeId, CafeRecord, CafeUpdate, NewCafe};
use std::fmt::{Display, Formatter};

mod schema;
mod sqlite;

pub use schema::SQLITE_SCHEMA_VERSION;
pub use sqlite::SqliteCafeStore;

pub const CRATE_NAME: &str = "brewmap-store";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotFound,
    Conflict,
    Schema,
    Unavailable,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Schema => "schema_error",
            Self::Unavailable => "store_unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(id: CafeId) -> Self {
        Self::new(StoreErrorCode::NotFound, format!("no cafe with id {id}"))
    }

    #[must_use]
    pub fn duplicate_name(name: &str) -> Self {
        Self::new(
            StoreErrorCode::Conflict,
            format!("a cafe named {name:?} already exists"),
        )
    }

    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Unavailable, message)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == StoreErrorCode::NotFound
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.code == StoreErrorCode::Conflict
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

/// Durable collection of cafe records keyed by [`CafeId`].
///
/// Every write is committed before the call returns. Implementations are
/// blocking; async callers are expected to hop onto a blocking thread.
pub trait CafeStore: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str;

    /// All records in identifier order.
    fn list(&self) -> Result<Vec<CafeRecord>, StoreError>;

    fn get_by_id(&self, id: CafeId) -> Result<CafeRecord, StoreError>;

    /// Persists `cafe` under a freshly assigned identifier.
    fn insert(&self, cafe: NewCafe) -> Result<CafeRecord, StoreError>;

    /// Writes the fields present in `update` and returns the resulting row.
    fn update(&self, id: CafeId, update: &CafeUpdate) -> Result<CafeRecord, StoreError>;

    fn delete(&self, id: CafeId) -> Result<(), StoreError>;

    /// Cheap liveness check.
    fn ping(&self) -> Result<(), StoreError>;
}
