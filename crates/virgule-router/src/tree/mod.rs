//! The compact prefix tree underneath the router.
//!
//! Two cooperating algorithms live here. [`Tree::insert`] grafts
//! rewritten-pattern text into the tree, splitting an existing vertex whenever
//! the incoming path only partially overlaps its prefix. [`Tree::search`]
//! walks the finished tree against a concrete request path, binding parameter
//! values positionally and backtracking between the sibling alternatives of a
//! vertex (static first, then param, then catch-all), so route priority falls
//! out of the try-order rather than any stored ranking.
//!
//! Nodes live in an arena and refer to each other by stable [`NodeId`]
//! indices; splitting allocates fresh slots and rewires ids instead of moving
//! nodes around.

mod node;

use std::mem;

pub(crate) use node::{Label, Node, NodeId, RouteEntry};

use crate::method::Method;
use crate::params::Param;
use crate::CATCH_ALL_KEY;

/// Length of the longest common prefix of `a` and `b`, backed off to a char
/// boundary so prefix splits stay valid UTF-8.
fn lcp(a: &str, b: &str) -> usize {
    let common = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .take_while(|(x, y)| x == y)
        .count();
    let mut l = common;
    while !a.is_char_boundary(l) {
        l -= 1;
    }
    l
}

pub(crate) struct Tree<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Tree<T> {
    const ROOT: NodeId = NodeId(0);

    pub(crate) fn new() -> Self {
        Tree {
            nodes: vec![Node::new("")],
        }
    }

    fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn find_child(&self, id: NodeId, label: Label) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).label == Some(label))
    }

    /// True until the first insert touches the root.
    fn is_vacant_root(&self) -> bool {
        let root = self.node(Self::ROOT);
        root.prefix.is_empty() && root.children.is_empty() && !root.has_routes()
    }

    /// Construction primitive: grafts `path` (rewritten-pattern text, where
    /// `:` and `*` are one-byte markers) into the tree. When `route` is
    /// supplied the terminal node receives it; a structural call leaves the
    /// terminal node routeless. Returns the handler displaced by re-attaching
    /// over an existing registration.
    pub(crate) fn insert(
        &mut self,
        method: Method,
        path: &str,
        route: Option<RouteEntry<T>>,
    ) -> Option<T> {
        let mut id = Self::ROOT;
        let mut search = path;

        loop {
            let l = lcp(search, &self.node(id).prefix);
            let prefix_len = self.node(id).prefix.len();

            if l == 0 && id == Self::ROOT && self.is_vacant_root() {
                // Vacant root adopts the whole path.
                let root = self.node_mut(id);
                root.prefix = search.to_string();
                root.relabel();
                if let Some(entry) = route {
                    return root.set_route(method, entry).map(|e| e.handler);
                }
                return None;
            }

            if l < prefix_len {
                return self.split(id, l, method, search, route);
            }

            if l < search.len() {
                // Prefix fully consumed; descend or extend.
                search = &search[l..];
                let label = Label::of(search.as_bytes()[0]);
                if let Some(child) = self.find_child(id, label) {
                    id = child;
                    continue;
                }
                let mut leaf = Node::new(search);
                if let Some(entry) = route {
                    leaf.set_route(method, entry);
                }
                let leaf = self.alloc(leaf);
                self.node_mut(id).children.push(leaf);
                return None;
            }

            // Exact: this vertex already owns the path.
            if let Some(entry) = route {
                return self.node_mut(id).set_route(method, entry).map(|e| e.handler);
            }
            return None;
        }
    }

    /// Splits the vertex `id` at byte `at` of its prefix: the old suffix moves
    /// into a fresh child that inherits the children and route table, and the
    /// vertex keeps only the shared prefix. The incoming remainder then lands
    /// on the truncated vertex itself or on a second fresh child.
    fn split(
        &mut self,
        id: NodeId,
        at: usize,
        method: Method,
        search: &str,
        route: Option<RouteEntry<T>>,
    ) -> Option<T> {
        let node = self.node_mut(id);
        let suffix = node.prefix.split_off(at);
        node.relabel();
        let children = mem::take(&mut node.children);
        let routes = node.routes.take();

        let mut carried = Node::new(suffix);
        carried.children = children;
        carried.routes = routes;
        let carried = self.alloc(carried);
        self.node_mut(id).children.push(carried);

        if at == search.len() {
            // The incoming path ends exactly at the split point.
            if let Some(entry) = route {
                return self.node_mut(id).set_route(method, entry).map(|e| e.handler);
            }
            return None;
        }

        let mut leaf = Node::new(&search[at..]);
        if let Some(entry) = route {
            leaf.set_route(method, entry);
        }
        let leaf = self.alloc(leaf);
        self.node_mut(id).children.push(leaf);
        None
    }

    /// Matching walk. Positional values accumulate in `params`; names are
    /// back-filled from the winning entry once a routed terminal is reached.
    /// Returns `None` both for "no such path" and "path known, verb not
    /// registered"; the caller one frame up tries its next alternative.
    pub(crate) fn search<'t, 'p>(
        &'t self,
        method: Method,
        search: &'p str,
        params: &mut Vec<Param<'t, 'p>>,
    ) -> Option<&'t RouteEntry<T>> {
        self.search_at(Self::ROOT, method, search, params)
    }

    fn search_at<'t, 'p>(
        &'t self,
        id: NodeId,
        method: Method,
        search: &'p str,
        params: &mut Vec<Param<'t, 'p>>,
    ) -> Option<&'t RouteEntry<T>> {
        let node = self.node(id);

        // Terminal: path exhausted, or it ends exactly on this vertex.
        if search.is_empty() || search == node.prefix {
            let entry = node.route(method)?;
            for (slot, name) in params.iter_mut().zip(&entry.param_names) {
                slot.name = name.as_str();
            }
            return Some(entry);
        }

        let remainder = match node.label {
            // A marker prefix was already consumed by the parent's binding
            // step; the search string enters this vertex untouched.
            Some(Label::Param) | Some(Label::CatchAll) => search,
            _ => {
                let l = lcp(search, &node.prefix);
                if l != node.prefix.len() {
                    // Diverged inside this vertex's own text: dead end. The
                    // alternatives below only apply after an exact prefix
                    // match, never a partial one.
                    return None;
                }
                &search[l..]
            }
        };

        // Static child first. Request bytes are always literal, so a `:` or
        // `*` in the path selects no marker child here.
        if let Some(child) = remainder
            .bytes()
            .next()
            .and_then(|b| self.find_child(id, Label::Static(b)))
        {
            if let Some(entry) = self.search_at(child, method, remainder, params) {
                return Some(entry);
            }
        }

        // Param child: bind one segment, recurse, unbind on failure.
        if let Some(child) = self.find_child(id, Label::Param) {
            let cut = remainder.find('/').unwrap_or(remainder.len());
            params.push(Param {
                name: "",
                value: &remainder[..cut],
            });
            if let Some(entry) = self.search_at(child, method, &remainder[cut..], params) {
                return Some(entry);
            }
            params.pop();
        }

        // Catch-all child: binds the entire remainder, unsegmented, and ends
        // the walk; there is nothing to backtrack into past this point.
        if let Some(child) = self.find_child(id, Label::CatchAll) {
            params.push(Param {
                name: CATCH_ALL_KEY,
                value: remainder,
            });
            if let Some(entry) = self.search_at(child, method, "", params) {
                return Some(entry);
            }
            params.pop();
        }

        None
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(handler: &'static str) -> Option<RouteEntry<&'static str>> {
        Some(RouteEntry {
            param_names: vec![],
            handler,
        })
    }

    #[test]
    fn test_lcp() {
        assert_eq!(lcp("/users", "/users"), 6);
        assert_eq!(lcp("/users/new", "/users"), 6);
        assert_eq!(lcp("/geocoder", "/users"), 1);
        assert_eq!(lcp("abc", "xyz"), 0);
        assert_eq!(lcp("", "/x"), 0);
    }

    #[test]
    fn test_lcp_backs_off_to_char_boundary() {
        // 'é' and 'è' share their UTF-8 lead byte; the divergence lands
        // mid-character and must not produce an unsliceable length.
        let l = lcp("/café", "/cafè");
        assert_eq!(l, 4);
        assert!("/café".is_char_boundary(l));
    }

    #[test]
    fn test_vacant_root_adopts_first_path() {
        let mut tree = Tree::new();
        tree.insert(Method::Get, "/users", entry("users"));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(Tree::<&str>::ROOT).prefix, "/users");
    }

    #[test]
    fn test_extend_appends_leaf() {
        let mut tree = Tree::new();
        tree.insert(Method::Get, "/users", entry("users"));
        tree.insert(Method::Get, "/users/new", entry("new"));
        assert_eq!(tree.len(), 2);
        let root = tree.node(Tree::<&str>::ROOT);
        assert_eq!(root.children.len(), 1);
        assert_eq!(tree.node(root.children[0]).prefix, "/new");
    }

    #[test]
    fn test_split_carries_suffix_and_routes() {
        let mut tree = Tree::new();
        tree.insert(Method::Get, "/geocoder/edit/email", entry("email"));
        tree.insert(Method::Get, "/geocoder/edit", entry("edit"));

        // Root truncated to the shared prefix, old suffix carried into a
        // child that kept the route.
        assert_eq!(tree.len(), 2);
        let root = tree.node(Tree::<&str>::ROOT);
        assert_eq!(root.prefix, "/geocoder/edit");
        assert_eq!(root.route(Method::Get).unwrap().handler, "edit");
        let carried = tree.node(root.children[0]);
        assert_eq!(carried.prefix, "/email");
        assert_eq!(carried.route(Method::Get).unwrap().handler, "email");
    }

    #[test]
    fn test_split_forks_second_child() {
        let mut tree = Tree::new();
        tree.insert(Method::Get, "/users/new", entry("new"));
        tree.insert(Method::Get, "/users/edit", entry("edit"));

        assert_eq!(tree.len(), 3);
        let root = tree.node(Tree::<&str>::ROOT);
        assert_eq!(root.prefix, "/users/");
        assert!(!root.has_routes());
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn test_exact_reattach_returns_displaced_handler() {
        let mut tree = Tree::new();
        assert_eq!(tree.insert(Method::Get, "/users", entry("old")), None);
        assert_eq!(
            tree.insert(Method::Get, "/users", entry("new")),
            Some("old")
        );
    }

    #[test]
    fn test_structural_insert_is_routeless() {
        let mut tree = Tree::new();
        tree.insert(Method::Get, "/users/", None);
        tree.insert(Method::Get, "/users/:", entry("user"));
        let root = tree.node(Tree::<&str>::ROOT);
        assert!(!root.has_routes());
        assert_eq!(tree.node(root.children[0]).label, Some(Label::Param));
    }
}
