//! # Virgule Router
//!
//! A radix-tree request router for Rust web frameworks: give it a verb and a
//! path, it gives back the registered handler and the parameters bound from
//! the path.
//!
//! ## Features
//!
//! - **Static routes** - `/about`, `/geocoder/edit`
//! - **Named parameters** - `/users/:id` captures one `/`-delimited segment
//! - **Catch-all routes** - `/static/*` captures the entire remaining path
//! - **Priority system** - static > parameter > catch-all, at every branch
//! - **Shared tree** - verbs sharing a path prefix share tree nodes
//! - **Allocation-light lookup** - bound values borrow from the request path
//!
//! ## Quick Start
//!
//! ```rust
//! use virgule_router::{Router, Method};
//!
//! let mut router = Router::new();
//! router.add(Method::Get, "/users/:id", "user").unwrap();
//! router.get("/static/*", "assets").unwrap();
//!
//! let m = router.find(Method::Get, "/users/233").unwrap();
//! assert_eq!(*m.handler, "user");
//! assert_eq!(m.params.get("id"), Some("233"));
//!
//! let m = router.find(Method::Get, "/static/js/app.js").unwrap();
//! assert_eq!(m.params.get(virgule_router::CATCH_ALL_KEY), Some("js/app.js"));
//! ```
//!
//! ## Pattern Syntax
//!
//! | Pattern | Matches | Parameters |
//! |---------|---------|------------|
//! | `/users` | `/users` only | none |
//! | `/users/:id` | `/users/233` | `id = "233"` |
//! | `/users/:id/edit` | `/users/233/edit` | `id = "233"` |
//! | `/static/*` | `/static/js/app.js` | `_* = "js/app.js"` |
//!
//! A `:name` runs to the next `/` or the end of the pattern and captures
//! exactly one path segment. A `*` must be the final token and captures the
//! whole remaining path, slashes included, under the fixed key
//! [`CATCH_ALL_KEY`]. Malformed patterns are rejected with a [`PatternError`]
//! before the route table is touched.
//!
//! ## Matching Priority
//!
//! When several patterns overlap, the router tries alternatives in a fixed
//! order at every branch point: a static edge first, then a parameter edge,
//! then a catch-all. A dead end deeper in the tree backtracks to the sibling
//! alternatives of the branch it came from, never back into choices an
//! ancestor already committed to.
//!
//! ```rust
//! use virgule_router::{Router, Method};
//!
//! let mut router = Router::new();
//! router.get("/geocoder/edit", "static").unwrap();
//! router.get("/geocoder/:action", "param").unwrap();
//!
//! assert_eq!(*router.find(Method::Get, "/geocoder/edit").unwrap().handler, "static");
//! assert_eq!(*router.find(Method::Get, "/geocoder/nnn").unwrap().handler, "param");
//! ```
//!
//! ## Paths Are Taken Literally
//!
//! The router performs no decoding or normalization: no percent-decoding, no
//! trailing-slash forgiveness, no duplicate-slash collapsing. `/users/233/`
//! does not match `/users/:id`. Hand it paths that are already decoded and
//! `/`-delimited.
//!
//! ## Concurrency
//!
//! Registration takes `&mut self`, lookup takes `&self`, so the borrow
//! checker enforces the build-then-serve discipline: once the router is
//! shared (e.g. behind an `Arc`), any number of threads may call
//! [`Router::find`] concurrently; `Router<T>` is `Send + Sync` whenever `T`
//! is. Registering after publication needs exterior synchronization or a
//! rebuild-and-swap, just like any other shared map.

mod error;
mod method;
mod params;
mod tree;

pub use error::{InvalidMethod, PatternError};
pub use method::Method;
pub use params::{Param, Params};

use tracing::debug;

use tree::{RouteEntry, Tree};

/// The name a catch-all binds its captured remainder under.
pub const CATCH_ALL_KEY: &str = "_*";

/// A successful lookup: the registered handler and the parameters bound along
/// the way, in pattern declaration order.
#[derive(Debug, Clone)]
pub struct RouteMatch<'router, 'path, T> {
    pub handler: &'router T,
    pub params: Params<'router, 'path>,
}

/// The dispatch table: a single radix tree shared by all verbs, with a
/// per-node verb table at every routed vertex.
///
/// `T` is the handler type and is completely opaque to the router: a
/// function pointer, a boxed closure, an enum of endpoints, an index into a
/// table elsewhere.
pub struct Router<T> {
    tree: Tree<T>,
    routes: usize,
}

impl<T> Router<T> {
    /// Creates an empty router.
    pub fn new() -> Self {
        Router {
            tree: Tree::new(),
            routes: 0,
        }
    }

    /// Registers `handler` for `method` under `pattern`.
    ///
    /// Returns `Ok(Some(previous))` when the registration replaced an earlier
    /// handler for the same `(method, pattern)` pair (the last registration
    /// wins) and `Ok(None)` for a fresh route. Malformed patterns are
    /// rejected without mutating the router.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use virgule_router::{Router, Method};
    ///
    /// let mut router = Router::new();
    /// assert_eq!(router.add(Method::Get, "/users/:id", "v1").unwrap(), None);
    /// assert_eq!(router.add(Method::Get, "/users/:id", "v2").unwrap(), Some("v1"));
    /// assert_eq!(*router.find(Method::Get, "/users/7").unwrap().handler, "v2");
    /// ```
    pub fn add(
        &mut self,
        method: Method,
        pattern: &str,
        handler: T,
    ) -> Result<Option<T>, PatternError> {
        validate(pattern)?;

        // Decompose the pattern left to right. Each `:name` is collapsed to
        // the bare one-byte marker in the text handed to the tree, so the
        // edge layout is independent of parameter names; the names travel in
        // `param_names` on the terminal route entry instead.
        let bytes = pattern.as_bytes();
        let mut param_names: Vec<String> = Vec::new();
        let mut head = String::with_capacity(pattern.len());
        let mut lit_start = 0;
        let mut i = 0;

        let replaced = loop {
            if i == bytes.len() {
                head.push_str(&pattern[lit_start..]);
                break self.tree.insert(
                    method,
                    &head,
                    Some(RouteEntry {
                        param_names,
                        handler,
                    }),
                );
            }
            match bytes[i] {
                b':' => {
                    head.push_str(&pattern[lit_start..i]);
                    self.tree.insert(method, &head, None);

                    let name_start = i + 1;
                    let mut j = name_start;
                    while j < bytes.len() && bytes[j] != b'/' {
                        j += 1;
                    }
                    param_names.push(pattern[name_start..j].to_string());
                    head.push(':');

                    if j == bytes.len() {
                        break self.tree.insert(
                            method,
                            &head,
                            Some(RouteEntry {
                                param_names,
                                handler,
                            }),
                        );
                    }
                    self.tree.insert(method, &head, None);
                    i = j;
                    lit_start = j;
                }
                b'*' => {
                    head.push_str(&pattern[lit_start..i]);
                    self.tree.insert(method, &head, None);
                    head.push('*');
                    break self.tree.insert(
                        method,
                        &head,
                        Some(RouteEntry {
                            param_names,
                            handler,
                        }),
                    );
                }
                _ => i += 1,
            }
        };

        if replaced.is_none() {
            self.routes += 1;
            debug!(method = %method, pattern, "route registered");
        } else {
            debug!(method = %method, pattern, "route replaced");
        }
        Ok(replaced)
    }

    /// Looks up the handler for `(method, path)`.
    ///
    /// `None` is the normal miss outcome: unknown path, or a known path with
    /// no handler for this verb. No handler is invoked; dispatching is the
    /// caller's business.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use virgule_router::{Router, Method};
    ///
    /// let mut router = Router::new();
    /// router.get("/users/:id/photos/:pid", "photo").unwrap();
    ///
    /// let m = router.find(Method::Get, "/users/233/photos/377").unwrap();
    /// let bound: Vec<_> = m.params.iter().map(|p| (p.name, p.value)).collect();
    /// assert_eq!(bound, [("id", "233"), ("pid", "377")]);
    ///
    /// assert!(router.find(Method::Post, "/users/233/photos/377").is_none());
    /// assert!(router.find(Method::Get, "/users/233/photos").is_none());
    /// ```
    pub fn find<'path>(
        &self,
        method: Method,
        path: &'path str,
    ) -> Option<RouteMatch<'_, 'path, T>> {
        let mut params = Vec::new();
        let entry = self.tree.search(method, path, &mut params)?;
        Some(RouteMatch {
            handler: &entry.handler,
            params: Params(params),
        })
    }

    /// Number of registered routes (replacements not counted twice).
    pub fn route_count(&self) -> usize {
        self.routes
    }

    /// Registers `pattern` for `CONNECT`.
    pub fn connect(&mut self, pattern: &str, handler: T) -> Result<Option<T>, PatternError> {
        self.add(Method::Connect, pattern, handler)
    }

    /// Registers `pattern` for `DELETE`.
    pub fn delete(&mut self, pattern: &str, handler: T) -> Result<Option<T>, PatternError> {
        self.add(Method::Delete, pattern, handler)
    }

    /// Registers `pattern` for `GET`.
    pub fn get(&mut self, pattern: &str, handler: T) -> Result<Option<T>, PatternError> {
        self.add(Method::Get, pattern, handler)
    }

    /// Registers `pattern` for `HEAD`.
    pub fn head(&mut self, pattern: &str, handler: T) -> Result<Option<T>, PatternError> {
        self.add(Method::Head, pattern, handler)
    }

    /// Registers `pattern` for `OPTIONS`.
    pub fn options(&mut self, pattern: &str, handler: T) -> Result<Option<T>, PatternError> {
        self.add(Method::Options, pattern, handler)
    }

    /// Registers `pattern` for `PATCH`.
    pub fn patch(&mut self, pattern: &str, handler: T) -> Result<Option<T>, PatternError> {
        self.add(Method::Patch, pattern, handler)
    }

    /// Registers `pattern` for `POST`.
    pub fn post(&mut self, pattern: &str, handler: T) -> Result<Option<T>, PatternError> {
        self.add(Method::Post, pattern, handler)
    }

    /// Registers `pattern` for `PUT`.
    pub fn put(&mut self, pattern: &str, handler: T) -> Result<Option<T>, PatternError> {
        self.add(Method::Put, pattern, handler)
    }

    /// Registers `pattern` for `TRACE`.
    pub fn trace(&mut self, pattern: &str, handler: T) -> Result<Option<T>, PatternError> {
        self.add(Method::Trace, pattern, handler)
    }
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejects malformed patterns before any tree mutation.
fn validate(pattern: &str) -> Result<(), PatternError> {
    let bytes = pattern.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b':' => {
                let name_start = i + 1;
                let mut j = name_start;
                while j < bytes.len() && bytes[j] != b'/' {
                    if bytes[j] == b'*' {
                        return Err(PatternError::CatchAllNotLast {
                            pattern: pattern.to_string(),
                        });
                    }
                    j += 1;
                }
                if j == name_start {
                    return Err(PatternError::EmptyParamName {
                        pattern: pattern.to_string(),
                    });
                }
                i = j;
            }
            b'*' => {
                if i + 1 != bytes.len() {
                    return Err(PatternError::CatchAllNotLast {
                        pattern: pattern.to_string(),
                    });
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_plain_patterns() {
        assert!(validate("/").is_ok());
        assert!(validate("/users/:id/edit").is_ok());
        assert!(validate("/static/*").is_ok());
        assert!(validate("/geocoder/any*").is_ok());
        assert!(validate("*").is_ok());
        assert!(validate("").is_ok());
    }

    #[test]
    fn test_validate_rejects_mid_pattern_catch_all() {
        assert!(matches!(
            validate("/files/*/meta"),
            Err(PatternError::CatchAllNotLast { .. })
        ));
        assert!(matches!(
            validate("/a/:name*/b"),
            Err(PatternError::CatchAllNotLast { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_param_name() {
        assert!(matches!(
            validate("/users/:"),
            Err(PatternError::EmptyParamName { .. })
        ));
        assert!(matches!(
            validate("/users/:/edit"),
            Err(PatternError::EmptyParamName { .. })
        ));
    }

    #[test]
    fn test_rejected_pattern_leaves_router_untouched() {
        let mut router = Router::new();
        router.get("/ok", "ok").unwrap();
        assert!(router.get("/files/*/meta", "bad").is_err());
        assert_eq!(router.route_count(), 1);
        assert!(router.find(Method::Get, "/files/x/meta").is_none());
    }

    #[test]
    fn test_route_count_ignores_replacements() {
        let mut router = Router::new();
        router.get("/a", 1).unwrap();
        router.get("/b", 2).unwrap();
        assert_eq!(router.get("/a", 3).unwrap(), Some(1));
        assert_eq!(router.route_count(), 2);
    }
}
