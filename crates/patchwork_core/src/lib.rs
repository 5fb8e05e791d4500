//! Applies partial sets of tagged field changes onto records.

pub mod apply;
pub mod coerce;
pub mod error;
pub mod options;
pub mod schema;

pub use apply::{ChangeApplicator, apply_changes};
pub use coerce::{CoercionFailure, FieldCx, FieldValue};
pub use error::ApplyError;
pub use options::{ApplyOptions, EmptyStringPolicy};
pub use schema::{FieldDecl, FieldKind, Patchable, RecordSchema, ResolvedField, ValueField};

pub use patchwork_schema::{ChangeSet, ChangeSetError, FieldTag, OpaqueValue, Value, changes};
