//! Radix tree vertices.

use crate::method::Method;

/// Stable arena index of a node. Nodes are never removed, so an id stays valid
/// for the life of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(pub(crate) usize);

/// Sibling dispatch key, derived from the first byte of a node's prefix.
///
/// The two reserved marker bytes get dedicated variants, so a node is
/// classified as static, param, or catch-all from its label alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Label {
    Static(u8),
    Param,
    CatchAll,
}

impl Label {
    /// Classifies a byte of rewritten-pattern text, where `:` and `*` are
    /// markers. Bytes of a concrete request path are always literal and must
    /// be wrapped in [`Label::Static`] directly instead.
    pub(crate) fn of(byte: u8) -> Label {
        match byte {
            b':' => Label::Param,
            b'*' => Label::CatchAll,
            _ => Label::Static(byte),
        }
    }
}

/// The (param names, handler) pair registered on a node for one verb.
#[derive(Debug, Clone)]
pub(crate) struct RouteEntry<T> {
    /// Names for the positional parameter slots along the root-to-node path,
    /// in left-to-right pattern order.
    pub(crate) param_names: Vec<String>,
    pub(crate) handler: T,
}

/// Per-verb route entries, indexed by [`Method`].
type RouteTable<T> = [Option<RouteEntry<T>>; Method::COUNT];

/// One edge-labeled vertex of the radix tree.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    /// The literal segment this vertex owns. Empty only at the unpopulated
    /// root (and at a root reduced to a pure branch point by a split).
    pub(crate) prefix: String,
    /// Cached classification of `prefix`; `None` while the prefix is empty.
    pub(crate) label: Option<Label>,
    /// Static children have pairwise-distinct labels, and there is at most
    /// one param and one catch-all child. Upheld by the insert primitive,
    /// never checked at runtime.
    pub(crate) children: Vec<NodeId>,
    /// Boxed so purely structural nodes pay a single pointer.
    pub(crate) routes: Option<Box<RouteTable<T>>>,
}

impl<T> Node<T> {
    pub(crate) fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let label = prefix.bytes().next().map(Label::of);
        Node {
            prefix,
            label,
            children: Vec::new(),
            routes: None,
        }
    }

    /// Re-derives the cached label after the prefix changed.
    pub(crate) fn relabel(&mut self) {
        self.label = self.prefix.bytes().next().map(Label::of);
    }

    pub(crate) fn route(&self, method: Method) -> Option<&RouteEntry<T>> {
        self.routes.as_ref()?[method.index()].as_ref()
    }

    /// Registers `entry` under `method`, returning the entry it displaced.
    pub(crate) fn set_route(
        &mut self,
        method: Method,
        entry: RouteEntry<T>,
    ) -> Option<RouteEntry<T>> {
        let table = self
            .routes
            .get_or_insert_with(|| Box::new(std::array::from_fn(|_| None)));
        table[method.index()].replace(entry)
    }

    pub(crate) fn has_routes(&self) -> bool {
        self.routes.is_some()
    }
}
