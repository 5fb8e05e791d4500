//! Partial updates for plain Rust structs.
//!
//! ```
//! use patchwork::{Patchable, changes};
//!
//! #[derive(Patchable)]
//! struct Person {
//!     name: String,
//!     age: i32,
//!     nicknames: Vec<String>,
//! }
//!
//! let mut clay = Person {
//!     name: "Clay".to_string(),
//!     age: 27,
//!     nicknames: vec!["Clayboy".to_string()],
//! };
//! clay.apply_changes(&changes! { "age" => 28 }).unwrap();
//! assert_eq!(clay.age, 28);
//! assert_eq!(clay.nicknames, vec!["Clayboy".to_string()]);
//! ```

pub use patchwork_core::*;
pub use patchwork_macros::Patchable;
