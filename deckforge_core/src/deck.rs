use std::fmt;

use url::Url;

use crate::error::{ApiError, Result};

/// Opaque identifier of a server-side deck. Parsed once at startup and
/// threaded explicitly into every handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeckId(String);

impl DeckId {
    /// Parse a deck id from a bare id or a deck page URL.
    ///
    /// For URLs the id is the last non-empty path segment, so
    /// `http://host/decks/42` and `http://host/decks/42/` both give `42`.
    /// Anything without a scheme is taken as a bare id.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ApiError::InvalidDeck(input.to_string()));
        }

        if trimmed.contains("://") {
            let url = Url::parse(trimmed)?;
            return url
                .path_segments()
                .and_then(|mut segments| segments.rev().find(|s| !s.is_empty()))
                .map(|s| DeckId(s.to_string()))
                .ok_or_else(|| ApiError::InvalidDeck(input.to_string()));
        }

        Ok(DeckId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parsed deck argument: the deck id plus, when the argument was a full
/// URL, the server it lives on.
#[derive(Debug, Clone)]
pub struct DeckLocation {
    pub id: DeckId,
    server: Option<Url>,
}

impl DeckLocation {
    /// Parse a bare deck id or a full deck page URL.
    pub fn parse(input: &str) -> Result<Self> {
        let id = DeckId::parse(input)?;

        let trimmed = input.trim();
        let server = if trimmed.contains("://") {
            let mut url = Url::parse(trimmed)?;
            url.set_path("/");
            url.set_query(None);
            url.set_fragment(None);
            Some(url)
        } else {
            None
        };

        Ok(Self { id, server })
    }

    /// Server base URL: the deck URL's origin when one was given, otherwise
    /// the fallback.
    pub fn server_or(&self, fallback: &str) -> Result<Url> {
        match &self.server {
            Some(url) => Ok(url.clone()),
            None => Ok(Url::parse(fallback)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id_passes_through() {
        let id = DeckId::parse("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_url_takes_last_path_segment() {
        let id = DeckId::parse("http://localhost:5000/decks/42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_url_with_trailing_slash() {
        let id = DeckId::parse("http://localhost:5000/decks/42/").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(DeckId::parse("  ").is_err());
    }

    #[test]
    fn test_url_without_path_is_rejected() {
        assert!(DeckId::parse("http://localhost:5000/").is_err());
    }

    #[test]
    fn test_location_keeps_server_origin_from_url() {
        let location = DeckLocation::parse("http://example.net:8080/decks/9?tab=x").unwrap();
        assert_eq!(location.id.as_str(), "9");
        let server = location.server_or("http://localhost:5000").unwrap();
        assert_eq!(server.as_str(), "http://example.net:8080/");
    }

    #[test]
    fn test_bare_id_location_falls_back_to_given_server() {
        let location = DeckLocation::parse("9").unwrap();
        let server = location.server_or("http://localhost:5000").unwrap();
        assert_eq!(server.as_str(), "http://localhost:5000/");
    }
}
