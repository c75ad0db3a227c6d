//! Request descriptors.

use super::error::ApiError;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// Path and query of one read-only GET against the upstream API.
///
/// The descriptor is independent of when the request is dispatched; it is
/// not validated until the transport turns it into a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    path: String,
    query: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Append a query parameter. Order is preserved.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present
    pub fn param_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

/// Parses `path?key=value&key=value`.
///
/// The query is form-urlencoded: `%XX` escapes and `+` are decoded here and
/// re-encoded once when the transport builds the URL.
impl FromStr for RequestDescriptor {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, query) = match s.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (s, None),
        };

        if !path.starts_with('/') {
            return Err(ApiError::InvalidUrl(format!("path must start with '/': {}", s)));
        }

        let query = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_string(),
            query,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let request = RequestDescriptor::new("/top/anime")
            .param("page", 2)
            .param("filter", "airing");

        assert_eq!(request.path(), "/top/anime");
        assert_eq!(
            request.query(),
            &[
                ("page".to_string(), "2".to_string()),
                ("filter".to_string(), "airing".to_string())
            ]
        );
    }

    #[test]
    fn test_param_opt() {
        let request = RequestDescriptor::new("/top/anime")
            .param_opt("filter", None::<&str>)
            .param_opt("page", Some(1));
        assert_eq!(request.to_string(), "/top/anime?page=1");
    }

    #[test]
    fn test_parse() {
        let request: RequestDescriptor = "/manga?q=berserk&page=2&sfw".parse().unwrap();
        assert_eq!(request.path(), "/manga");
        assert_eq!(request.query().len(), 3);
        assert_eq!(request.query()[2], ("sfw".to_string(), String::new()));
        assert_eq!(request.to_string(), "/manga?q=berserk&page=2&sfw=");

        let bare: RequestDescriptor = "/random/people".parse().unwrap();
        assert!(bare.query().is_empty());
    }

    #[test]
    fn test_parse_decodes_escapes() {
        let request: RequestDescriptor = "/anime?q=one%20piece&page=1".parse().unwrap();
        assert_eq!(request.query()[0], ("q".to_string(), "one piece".to_string()));

        let plus: RequestDescriptor = "/characters?q=monkey+d.+luffy".parse().unwrap();
        assert_eq!(plus.query()[0].1, "monkey d. luffy");

        let literal: RequestDescriptor = "/anime?q=a%2Bb%26c".parse().unwrap();
        assert_eq!(literal.query()[0].1, "a+b&c");
    }

    #[test]
    fn test_parse_rejects_relative_path() {
        assert!(matches!(
            "top/anime".parse::<RequestDescriptor>(),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_display_without_query() {
        assert_eq!(RequestDescriptor::new("/random/anime").to_string(), "/random/anime");
    }
}
