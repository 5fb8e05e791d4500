use serde::{Deserialize, Serialize};

/// Per-call settings of a [`ChangeApplicator`](crate::ChangeApplicator).
///
/// Deserializes with defaults for missing keys, so it can sit inside a
/// host application's config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyOptions {
    /// An empty string sent to an `Option<_>` field clears it.
    pub empty_string_as_none: bool,
    /// Fail on changes whose tag matches no field instead of skipping them.
    pub reject_unknown_fields: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            empty_string_as_none: true,
            reject_unknown_fields: false,
        }
    }
}

impl ApplyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty_string_as_none(mut self, enabled: bool) -> Self {
        self.empty_string_as_none = enabled;
        self
    }

    pub fn reject_unknown_fields(mut self, enabled: bool) -> Self {
        self.reject_unknown_fields = enabled;
        self
    }
}

/// How a single optional field treats an incoming empty string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyStringPolicy {
    /// Follow [`ApplyOptions::empty_string_as_none`].
    #[default]
    Inherit,
    AsNone,
    Keep,
}

impl EmptyStringPolicy {
    pub fn resolve(self, options: &ApplyOptions) -> bool {
        match self {
            EmptyStringPolicy::Inherit => options.empty_string_as_none,
            EmptyStringPolicy::AsNone => true,
            EmptyStringPolicy::Keep => false,
        }
    }
}
