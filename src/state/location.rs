//! Navigable page location and its search parameters.
//!
//! The parameter names are a contract with server-side rendering, which reads the
//! same keys: `search`, `category`, `page`.

use crate::model::{LocationError, QueryState};
use url::Url;

/// Query key for the trimmed search term.
pub const SEARCH_PARAM: &str = "search";
/// Query key for the selected category.
pub const CATEGORY_PARAM: &str = "category";
/// Pagination key, dropped on every recompute.
pub const PAGE_PARAM: &str = "page";

/// Absolute URL of the current page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location(Url);

impl Location {
    /// Parse an absolute URL.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        Url::parse(input)
            .map(Self)
            .map_err(|e| LocationError::Invalid {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    /// The underlying URL.
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// Serialized URL.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// First value of `key`, decoded.
    pub fn param(&self, key: &str) -> Option<String> {
        self.0
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// This location with `query` written into its search parameters.
    ///
    /// `search` and `category` are each set if present and deleted if absent.
    /// `page` is always deleted. Unrelated parameters keep their position.
    pub fn with_query(&self, query: &QueryState) -> Url {
        let mut pairs: Vec<(String, String)> = self.0.query_pairs().into_owned().collect();

        match query.term() {
            Some(term) => set_param(&mut pairs, SEARCH_PARAM, term),
            None => delete_param(&mut pairs, SEARCH_PARAM),
        }
        match query.category() {
            Some(category) => set_param(&mut pairs, CATEGORY_PARAM, category),
            None => delete_param(&mut pairs, CATEGORY_PARAM),
        }
        delete_param(&mut pairs, PAGE_PARAM);

        let mut url = self.0.clone();
        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs.iter());
        }
        url
    }
}

impl From<Url> for Location {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

/// Replace the first `key` in place and drop later duplicates, or append.
fn set_param(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    let mut seen = false;
    pairs.retain_mut(|(k, v)| {
        if k.as_str() != key {
            return true;
        }
        if seen {
            return false;
        }
        seen = true;
        *v = value.to_string();
        true
    });
    if !seen {
        pairs.push((key.to_string(), value.to_string()));
    }
}

fn delete_param(pairs: &mut Vec<(String, String)>, key: &str) {
    pairs.retain(|(k, _)| k.as_str() != key);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(s: &str) -> Location {
        Location::parse(s).expect("valid location")
    }

    #[test]
    fn parse_rejects_relative_location() {
        assert!(matches!(
            Location::parse("/events?search=x"),
            Err(LocationError::Invalid { .. })
        ));
    }

    #[test]
    fn term_and_category_are_form_encoded() {
        let url = location("https://festagram.test/events")
            .with_query(&QueryState::from_controls("jazz night", "music"));
        assert_eq!(url.query(), Some("search=jazz+night&category=music"));
    }

    #[test]
    fn page_is_always_dropped() {
        let url = location("https://festagram.test/events?page=4&search=old")
            .with_query(&QueryState::from_controls("new", ""));
        assert_eq!(url.query(), Some("search=new"));
    }

    #[test]
    fn absent_fields_are_deleted_and_question_mark_dropped() {
        let url = location("https://festagram.test/events?search=jazz&category=music&page=2")
            .with_query(&QueryState::default());
        assert_eq!(url.as_str(), "https://festagram.test/events");
    }

    #[test]
    fn existing_param_is_replaced_in_place() {
        let url = location("https://festagram.test/events?category=sports&sort=date")
            .with_query(&QueryState::from_controls("", "music"));
        assert_eq!(url.query(), Some("category=music&sort=date"));
    }

    #[test]
    fn duplicate_params_collapse_to_first_position() {
        let url = location("https://festagram.test/events?search=a&sort=date&search=b")
            .with_query(&QueryState::from_controls("c", ""));
        assert_eq!(url.query(), Some("search=c&sort=date"));
    }

    #[test]
    fn fragment_is_preserved() {
        let url = location("https://festagram.test/events?page=2#results")
            .with_query(&QueryState::from_controls("quiz", ""));
        assert_eq!(url.as_str(), "https://festagram.test/events?search=quiz#results");
    }

    #[test]
    fn param_decodes_plus_as_space() {
        let loc = location("https://festagram.test/events?search=jazz+night");
        assert_eq!(loc.param(SEARCH_PARAM), Some("jazz night".to_string()));
        assert_eq!(loc.param(PAGE_PARAM), None);
    }
}
