pub mod changes;
pub mod ids;
pub mod json;
pub mod values;

pub use changes::{ChangeSet, ChangeSetError};
pub use ids::FieldTag;
pub use values::{OpaqueValue, Value};

/// Builds a [`ChangeSet`] from `tag => value` pairs.
///
/// ```
/// let changes = patchwork_schema::changes! {
///     "age" => 28,
///     "name" => "Clay",
/// };
/// assert_eq!(changes.len(), 2);
/// ```
#[macro_export]
macro_rules! changes {
    () => {
        $crate::ChangeSet::new()
    };
    ($($tag:expr => $value:expr),+ $(,)?) => {{
        let mut set = $crate::ChangeSet::new();
        $(set.insert($tag, $value);)+
        set
    }};
}
