//! HTTP method enumeration.
//!
//! The router keys every per-node route table by [`Method`] rather than by an
//! arbitrary string, so a table is a fixed-size array instead of a growable
//! map. The set matches the verbs the dispatch layer accepts.

use std::fmt;
use std::str::FromStr;

use crate::error::InvalidMethod;

/// The HTTP verbs a route can be registered under.
///
/// # Examples
///
/// ```
/// use virgule_router::Method;
///
/// let m: Method = "GET".parse().unwrap();
/// assert_eq!(m, Method::Get);
/// assert_eq!(m.as_str(), "GET");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    /// Number of supported verbs; the width of a per-node route table.
    pub const COUNT: usize = 9;

    /// Every supported verb, in canonical order.
    pub const ALL: [Method; Method::COUNT] = [
        Method::Connect,
        Method::Delete,
        Method::Get,
        Method::Head,
        Method::Options,
        Method::Patch,
        Method::Post,
        Method::Put,
        Method::Trace,
    ];

    /// The canonical uppercase token for this verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Connect => "CONNECT",
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Trace => "TRACE",
        }
    }

    /// Index into a per-node route table.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = InvalidMethod;

    /// Parses the exact uppercase token; HTTP method names are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONNECT" => Ok(Method::Connect),
            "DELETE" => Ok(Method::Delete),
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            "PATCH" => Ok(Method::Patch),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "TRACE" => Ok(Method::Trace),
            _ => Err(InvalidMethod(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for m in Method::ALL {
            assert_eq!(m.as_str().parse::<Method>().unwrap(), m);
        }
    }

    #[test]
    fn test_parse_rejects_lowercase() {
        assert!("get".parse::<Method>().is_err());
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "BREW".parse::<Method>().unwrap_err();
        assert_eq!(err.to_string(), "unrecognized HTTP method `BREW`");
    }

    #[test]
    fn test_indices_are_dense() {
        for (i, m) in Method::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }
}
