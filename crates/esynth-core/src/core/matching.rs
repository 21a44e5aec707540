//! The compatibility rule table for connection points.
//!
//! Compatibility is a directed relation: `can_connect(a, b)` asks whether `a` may
//! bond to `b`, and the answer differs from `can_connect(b, a)` as soon as a
//! universal or linker point is involved. All rules live in [`can_connect`] and are
//! evaluated strictly in order; a later rule is only reached when every earlier one
//! declined to decide.

use super::models::connection::ConnectableAtom;
use super::models::ids::ConnectionId;
use thiserror::Error;

/// Returns whether `this` may form a bond to `that`.
///
/// 1. `that` is non-reactive: reject.
/// 2. Either side has no remaining capacity: reject.
/// 3. `this` does not accept the type of `that`: reject.
/// 4. `that` is a universal connector: accept.
/// 5. `that` belongs to a linker: accept. Linker points never answer the reverse
///    check, so the forward check of rule 3 is decisive.
/// 6. Otherwise `that` must accept the type of `this` as well.
///
/// Reading only; committing the bond is [`commit_connection`].
pub fn can_connect(this: &ConnectableAtom, that: &ConnectableAtom) -> bool {
    if that.is_simple() {
        return false;
    }

    if !this.has_capacity() || !that.has_capacity() {
        return false;
    }

    if !this.allows(that.atom_type()) {
        return false;
    }

    if that.can_connect_to_any() {
        return true;
    }

    if that.is_linker_atom() {
        return true;
    }

    that.allows(this.atom_type())
}

/// Raised when a bond is committed on a point that cannot take it.
///
/// The engine only commits after [`can_connect`] succeeded, so any of these is an
/// internal-consistency fault rather than a negative match.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConnectionError {
    #[error("connection point '{atom_type}' at site {site} is non-reactive")]
    NonReactive { atom_type: String, site: usize },

    #[error(
        "connection point '{atom_type}' at site {site} is exhausted ({used} of {max_connect} connections used)"
    )]
    Exhausted {
        atom_type: String,
        site: usize,
        used: u32,
        max_connect: u32,
    },
}

fn ensure_capacity(atom: &ConnectableAtom) -> Result<(), ConnectionError> {
    if atom.is_simple() {
        return Err(ConnectionError::NonReactive {
            atom_type: atom.atom_type().to_string(),
            site: atom.site(),
        });
    }
    if atom.external_connections() >= atom.max_connect() {
        return Err(ConnectionError::Exhausted {
            atom_type: atom.atom_type().to_string(),
            site: atom.site(),
            used: atom.external_connections(),
            max_connect: atom.max_connect(),
        });
    }
    Ok(())
}

/// Consumes one unit of capacity on both endpoints and tags them with `id`.
///
/// Both endpoints are checked before either is modified, so a failed commit leaves
/// the two points untouched.
pub fn commit_connection(
    a: &mut ConnectableAtom,
    b: &mut ConnectableAtom,
    id: ConnectionId,
) -> Result<(), ConnectionError> {
    ensure_capacity(a)?;
    ensure_capacity(b)?;
    a.record_connection(id);
    b.record_connection(id);
    Ok(())
}
