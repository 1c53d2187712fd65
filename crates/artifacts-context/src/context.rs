//! Immutable context chain
//!
//! [`Context`] is a persistent singly-linked list of attachments. Attaching
//! pushes a new node in front of the current head and returns a new context;
//! every existing context keeps pointing at its own head, so ancestors and
//! siblings never observe the change.

use crate::key::{CapabilityKey, CapabilityKind};
use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Type-erased capability value as stored in the chain
pub type ErasedValue = Arc<dyn Any + Send + Sync>;

struct Node {
    key: CapabilityKey,
    value: ErasedValue,
    parent: Option<Arc<Node>>,
}

impl Drop for Node {
    // Unlink iteratively so dropping a deep chain cannot overflow the stack.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut owned) => next = owned.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Request-scoped, immutable capability context
///
/// Cheap to clone (one `Arc` bump) and `Send + Sync`, so it can be handed to
/// spawned tasks and worker threads as-is.
///
/// # Invariants
/// - [`attach`](Self::attach) never mutates `self`
/// - Lookups walk from the newest attachment toward the root and stop at the
///   first node whose key matches
/// - The same context always answers the same lookup the same way
///
/// # Example
/// ```rust
/// use artifacts_context::{CapabilityKind, Context};
///
/// struct RequestLabel;
///
/// impl CapabilityKind for RequestLabel {
///     type Value = String;
///     const NAME: &'static str = "request-label";
/// }
///
/// let root = Context::new();
/// let labelled = root.attach::<RequestLabel>("req-42".to_string());
///
/// assert_eq!(labelled.retrieve::<RequestLabel>().map(String::as_str), Some("req-42"));
/// assert!(root.retrieve::<RequestLabel>().is_none());
/// ```
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// Empty root context
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a child context carrying `value` under kind `K`
    ///
    /// Shadows any earlier `K` attachment for the child and its descendants
    /// only.
    #[must_use]
    pub fn attach<K: CapabilityKind>(&self, value: K::Value) -> Self {
        self.attach_erased(CapabilityKey::of::<K>(), Arc::new(value))
    }

    /// Derive a child context carrying an already type-erased value
    ///
    /// The value is not checked against the kind behind `key`. A mismatched
    /// value is stored as-is and later reads as absent through
    /// [`retrieve`](Self::retrieve).
    // TODO: remove this entry point, and the silent mismatch it allows, once
    // every caller attaches through the typed `attach`.
    #[must_use]
    pub fn attach_erased(&self, key: CapabilityKey, value: ErasedValue) -> Self {
        Self {
            head: Some(Arc::new(Node {
                key,
                value,
                parent: self.head.clone(),
            })),
        }
    }

    /// Most recent value attached under kind `K`
    ///
    /// Returns `None` when no `K` is attached anywhere on the chain, or when
    /// the nearest `K` attachment holds a value that is not a `K::Value`.
    #[must_use]
    pub fn retrieve<K: CapabilityKind>(&self) -> Option<&K::Value> {
        self.lookup(CapabilityKey::of::<K>())?
            .downcast_ref::<K::Value>()
    }

    /// Nearest raw attachment under `key`, without a type check
    #[must_use]
    pub fn lookup(&self, key: CapabilityKey) -> Option<&ErasedValue> {
        self.nodes().find(|node| node.key == key).map(|node| &node.value)
    }

    /// Whether some attachment exists under kind `K`
    ///
    /// True even if that attachment would fail the type check in
    /// [`retrieve`](Self::retrieve).
    #[inline]
    #[must_use]
    pub fn contains<K: CapabilityKind>(&self) -> bool {
        self.lookup(CapabilityKey::of::<K>()).is_some()
    }

    /// Number of attachments between this context and the root
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nodes().count()
    }

    /// Check if this is an empty root context
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Keys of every attachment, newest first (shadowed ones included)
    pub fn keys(&self) -> impl Iterator<Item = CapabilityKey> + '_ {
        self.nodes().map(|node| node.key)
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        let mut cursor = self.head.as_deref();
        std::iter::from_fn(move || {
            let node = cursor?;
            cursor = node.parent.as_deref();
            Some(node)
        })
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;
    struct Label;

    impl CapabilityKind for Alpha {
        type Value = u32;
        const NAME: &'static str = "alpha";
    }

    impl CapabilityKind for Beta {
        type Value = u32;
        const NAME: &'static str = "beta";
    }

    impl CapabilityKind for Label {
        type Value = String;
        const NAME: &'static str = "label";
    }

    #[test]
    fn empty_context_has_nothing() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.retrieve::<Alpha>(), None);
        assert!(!ctx.contains::<Alpha>());
    }

    #[test]
    fn attach_then_retrieve() {
        let ctx = Context::new().attach::<Alpha>(7);
        assert_eq!(ctx.retrieve::<Alpha>(), Some(&7));
        assert_eq!(ctx.depth(), 1);
    }

    #[test]
    fn attach_leaves_input_untouched() {
        let base = Context::new().attach::<Alpha>(1);
        let _child = base.attach::<Alpha>(2);
        let _other = base.attach::<Beta>(3);

        assert_eq!(base.retrieve::<Alpha>(), Some(&1));
        assert_eq!(base.retrieve::<Beta>(), None);
        assert_eq!(base.depth(), 1);
    }

    #[test]
    fn kinds_with_same_value_type_stay_apart() {
        let ctx = Context::new().attach::<Alpha>(1).attach::<Beta>(2);
        assert_eq!(ctx.retrieve::<Alpha>(), Some(&1));
        assert_eq!(ctx.retrieve::<Beta>(), Some(&2));
    }

    #[test]
    fn reattach_shadows_on_child_only() {
        let c2 = Context::new().attach::<Alpha>(1);
        let c3 = c2.attach::<Alpha>(2);

        assert_eq!(c3.retrieve::<Alpha>(), Some(&2));
        assert_eq!(c2.retrieve::<Alpha>(), Some(&1));
        assert_eq!(c3.keys().count(), 2);
    }

    #[test]
    fn mistyped_erased_value_reads_as_absent() {
        let ctx = Context::new().attach_erased(CapabilityKey::of::<Label>(), Arc::new(42_u64));

        assert!(ctx.contains::<Label>());
        assert_eq!(ctx.retrieve::<Label>(), None);
    }

    #[test]
    fn mistyped_value_hides_older_good_one() {
        let ctx = Context::new()
            .attach::<Label>("good".to_string())
            .attach_erased(CapabilityKey::of::<Label>(), Arc::new(0_u8));

        assert_eq!(ctx.retrieve::<Label>(), None);
    }

    #[test]
    fn erased_value_with_right_type_is_visible() {
        let ctx = Context::new().attach_erased(CapabilityKey::of::<Alpha>(), Arc::new(9_u32));
        assert_eq!(ctx.retrieve::<Alpha>(), Some(&9));
    }

    #[test]
    fn debug_lists_keys_newest_first() {
        let ctx = Context::new().attach::<Alpha>(1).attach::<Label>("x".into());
        assert_eq!(
            format!("{ctx:?}"),
            r#"Context { keys: [CapabilityKey("label"), CapabilityKey("alpha")] }"#
        );
    }

    #[test]
    fn deep_chain_drops_without_overflow() {
        let mut ctx = Context::new();
        for i in 0..200_000 {
            ctx = ctx.attach::<Alpha>(i);
        }
        assert_eq!(ctx.retrieve::<Alpha>(), Some(&199_999));
        drop(ctx);
    }

    #[test]
    fn dropping_child_keeps_shared_parent_alive() {
        let parent = Context::new().attach::<Alpha>(1).attach::<Beta>(2);
        let child = parent.attach::<Label>("leaf".into());
        drop(child);

        assert_eq!(parent.retrieve::<Alpha>(), Some(&1));
        assert_eq!(parent.retrieve::<Beta>(), Some(&2));
    }
}
