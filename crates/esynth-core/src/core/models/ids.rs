use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    pub struct TemplateId;
}

/// Identifies one committed bond between two connection points of a complex.
///
/// Ids are dense and local to the complex that owns them; both endpoints of a
/// bond carry the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u32);

impl ConnectionId {
    pub(crate) fn offset(self, by: u32) -> Self {
        Self(self.0 + by)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
