//! Error types for route registration and method parsing.

use thiserror::Error;

/// A route pattern that cannot be registered.
///
/// Validation runs before any tree mutation, so a rejected pattern leaves the
/// router exactly as it was.
///
/// # Examples
///
/// ```
/// use virgule_router::{PatternError, Router, Method};
///
/// let mut router = Router::new();
/// let err = router.add(Method::Get, "/files/*/meta", "h").unwrap_err();
/// assert!(matches!(err, PatternError::CatchAllNotLast { .. }));
/// assert!(router.find(Method::Get, "/files/x/meta").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A `*` somewhere other than the final byte of the pattern. The catch-all
    /// swallows the whole remaining path, so nothing may follow it.
    #[error("catch-all `*` must be the final token of the pattern `{pattern}`")]
    CatchAllNotLast { pattern: String },

    /// A `:` immediately followed by `/` or end-of-string.
    #[error("parameter marker `:` must be followed by a name in pattern `{pattern}`")]
    EmptyParamName { pattern: String },
}

/// A verb token [`Method::from_str`](crate::Method) does not recognize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized HTTP method `{0}`")]
pub struct InvalidMethod(pub String);
