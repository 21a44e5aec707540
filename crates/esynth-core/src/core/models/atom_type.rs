use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// A connection-point category, such as a functional-group class.
///
/// Two atom types are equal iff their labels are identical. The label is
/// reference-counted, so cloning an `AtomType` is cheap and every clone compares
/// equal to the original.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub struct AtomType(Arc<str>);

impl AtomType {
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AtomType {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for AtomType {
    fn from(label: String) -> Self {
        Self(Arc::from(label))
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
