use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// External serialization name of a record field, used as a change key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTag(pub String);

impl FieldTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldTag {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FieldTag {
    fn from(value: String) -> Self {
        Self(value)
    }
}
