//! Capability kinds and the keys derived from them
//!
//! Every capability carried by a [`Context`](crate::Context) is stored under a
//! [`CapabilityKey`]. Keys are derived from a marker type implementing
//! [`CapabilityKind`], never from the stored value's type, so two kinds that
//! happen to carry the same value type stay distinct.

use std::any::TypeId;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Marker trait for a kind of capability
///
/// Implement on a zero-sized marker type. The marker identifies the slot,
/// `Value` fixes what can be stored in it.
///
/// # Example
/// ```rust
/// use artifacts_context::CapabilityKind;
///
/// struct RequestLabel;
///
/// impl CapabilityKind for RequestLabel {
///     type Value = String;
///     const NAME: &'static str = "request-label";
/// }
/// ```
pub trait CapabilityKind: 'static {
    /// Handle type stored under this kind
    type Value: Send + Sync + 'static;

    /// Human-readable kind name, used in `Debug` output and errors
    const NAME: &'static str;
}

/// Opaque token distinguishing one capability kind from another
///
/// Equality and hashing use only the marker's [`TypeId`]; the name is
/// carried for diagnostics.
#[derive(Clone, Copy)]
pub struct CapabilityKey {
    id: TypeId,
    name: &'static str,
}

impl CapabilityKey {
    /// Key for capability kind `K`
    #[inline]
    #[must_use]
    pub fn of<K: CapabilityKind>() -> Self {
        Self {
            id: TypeId::of::<K>(),
            name: K::NAME,
        }
    }

    /// Kind name
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for CapabilityKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CapabilityKey {}

impl Hash for CapabilityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for CapabilityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CapabilityKey").field(&self.name).finish()
    }
}

impl Display for CapabilityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
