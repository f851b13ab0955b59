//! Multi-valued query-string parameters.
//!
//! `serde_urlencoded` (what `axum::extract::Query` uses) collapses repeated
//! keys, so `?tag=a&tag=b` is decoded here instead.

/// Ordered multimap of decoded query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decode an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored. Decoding never fails; invalid percent
    /// escapes are passed through the way browsers do.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// Build from already-decoded pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in request order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether no parameters were supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repeated_keys_in_order() {
        let params = QueryParams::parse("?tag=a&brand=x&tag=b&tag=a");
        assert_eq!(params.get_all("tag").collect::<Vec<_>>(), vec!["a", "b", "a"]);
        assert_eq!(params.get("brand"), Some("x"));
        assert_eq!(params.get("color"), None);
    }

    #[test]
    fn test_parse_percent_decoding() {
        let params = QueryParams::parse("q=liz%20lisa&price_range=USD%3A0%3A500&q2=a+b");
        assert_eq!(params.get("q"), Some("liz lisa"));
        assert_eq!(params.get("price_range"), Some("USD:0:500"));
        assert_eq!(params.get("q2"), Some("a b"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(QueryParams::parse("").is_empty());
        assert!(QueryParams::parse("?").is_empty());
    }
}
