//! Extracted path parameters.
//!
//! A successful lookup yields the parameter values bound while walking the
//! tree. Values borrow from the searched path and names borrow from the
//! router's route table, so building a [`Params`] never copies string data.

use std::ops::Index;
use std::slice;

/// One bound parameter: a declared name and the path segment it captured.
///
/// A catch-all binds under the fixed name [`CATCH_ALL_KEY`](crate::CATCH_ALL_KEY).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param<'router, 'path> {
    pub name: &'router str,
    pub value: &'path str,
}

/// The ordered parameters of a route match, in pattern declaration order.
///
/// # Examples
///
/// ```
/// use virgule_router::{Router, Method};
///
/// let mut router = Router::new();
/// router.add(Method::Get, "/users/:id/photos/:pid", "photo").unwrap();
///
/// let m = router.find(Method::Get, "/users/233/photos/377").unwrap();
/// assert_eq!(m.params.get("id"), Some("233"));
/// assert_eq!(m.params["pid"], *"377");
/// assert_eq!(m.params.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params<'router, 'path>(pub(crate) Vec<Param<'router, 'path>>);

impl<'router, 'path> Params<'router, 'path> {
    /// The value bound under `name`, if any. First declaration wins when a
    /// pattern repeats a name.
    pub fn get(&self, name: &str) -> Option<&'path str> {
        self.0.iter().find(|p| p.name == name).map(|p| p.value)
    }

    /// Iterates the parameters in declaration order.
    pub fn iter(&self) -> slice::Iter<'_, Param<'router, 'path>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'router, 'path> Index<&str> for Params<'router, 'path> {
    type Output = str;

    /// Panics when `name` is not bound; use [`Params::get`] for a fallible
    /// lookup.
    fn index(&self, name: &str) -> &Self::Output {
        self.get(name)
            .unwrap_or_else(|| panic!("no parameter named `{name}`"))
    }
}

impl<'a, 'router, 'path> IntoIterator for &'a Params<'router, 'path> {
    type Item = &'a Param<'router, 'path>;
    type IntoIter = slice::Iter<'a, Param<'router, 'path>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_index() {
        let params = Params(vec![
            Param { name: "id", value: "233" },
            Param { name: "action", value: "edit" },
        ]);
        assert_eq!(params.get("id"), Some("233"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(&params["action"], "edit");
    }

    #[test]
    fn test_order_preserved() {
        let params = Params(vec![
            Param { name: "a", value: "1" },
            Param { name: "b", value: "2" },
        ]);
        let names: Vec<_> = params.iter().map(|p| p.name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    #[should_panic(expected = "no parameter named")]
    fn test_index_panics_on_missing() {
        let params = Params(vec![]);
        let _ = &params["nope"];
    }
}
