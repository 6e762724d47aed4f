use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use url::Url;

use crate::card::{DeckCard, SearchCard};
use crate::deck::DeckId;
use crate::error::{ApiError, Result};
use crate::search::{SearchFilters, SearchPage};

/// Timeout applied to every request; the UI blocks while a call runs.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking client for the deck-builder server's REST API.
///
/// Calls run to completion inside the invoking event handler, which
/// serializes mutations on a deck: a second action cannot be issued while an
/// earlier request is in flight, and no stale reply can arrive after newer
/// state has been established.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

/// Reply shape shared by all mutating endpoints.
#[derive(Debug, Deserialize)]
struct MutationReply {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Search reply; a 2xx response may still carry an application error.
#[derive(Debug, Deserialize)]
struct SearchReply {
    #[serde(default)]
    cards: Vec<SearchCard>,
    #[serde(default)]
    pages_remaining: u32,
    #[serde(default)]
    error: Option<String>,
}

impl ApiClient {
    /// Build a client for the given server base URL.
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base)?;
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    /// Fetch the deck's full card list.
    ///
    /// Any failure here is recoverable and local: the caller logs it and
    /// keeps rendering the stale grid.
    pub fn deck_cards(&self, deck: &DeckId) -> Result<Vec<DeckCard>> {
        let url = self.endpoint(&format!("/api/decks/{}/cards", deck))?;
        let response = self.http.get(url).send()?.error_for_status()?;
        Ok(response.json()?)
    }

    /// Add one copy of a card to the deck.
    pub fn add_card(&self, deck: &DeckId, card_id: u32) -> Result<String> {
        self.mutate(&format!("/decks/{}/cards/add/{}", deck, card_id))
    }

    /// Remove one copy of a card from the deck.
    pub fn remove_card(&self, deck: &DeckId, card_id: u32) -> Result<String> {
        self.mutate(&format!("/decks/{}/cards/remove/{}", deck, card_id))
    }

    /// Remove every card from the deck.
    pub fn clear_deck(&self, deck: &DeckId) -> Result<String> {
        self.mutate(&format!("/api/decks/{}/clear", deck))
    }

    /// Rename the deck.
    pub fn rename_deck(&self, deck: &DeckId, name: &str) -> Result<String> {
        let url = self.endpoint(&format!("/api/decks/{}/rename", deck))?;
        let response = self.http.post(url).form(&[("name", name)]).send()?;
        mutation_reply(response)
    }

    /// Run a card search with the given filters and pagination offset.
    pub fn search(&self, filters: &SearchFilters, offset: u32) -> Result<SearchPage> {
        let url = self.endpoint("/api/cards/search")?;
        let response = self
            .http
            .post(url)
            .form(&filters.to_form(offset))
            .send()?;

        let status = response.status();
        let reply: SearchReply = response.json()?;
        if let Some(error) = reply.error {
            return Err(ApiError::Server(error));
        }
        if !status.is_success() {
            return Err(ApiError::Server(format!(
                "search failed with status {}",
                status
            )));
        }
        Ok(SearchPage {
            cards: reply.cards,
            pages_remaining: reply.pages_remaining,
        })
    }

    fn mutate(&self, path: &str) -> Result<String> {
        let url = self.endpoint(path)?;
        let response = self.http.post(url).send()?;
        mutation_reply(response)
    }
}

/// Mutating endpoints reply `{message}` on success and `{error}` on an
/// application failure, with or without a 2xx status.
fn mutation_reply(response: Response) -> Result<String> {
    let status = response.status();
    let reply: MutationReply = response.json()?;
    if let Some(error) = reply.error {
        return Err(ApiError::Server(error));
    }
    if !status.is_success() {
        return Err(ApiError::Server(format!(
            "server replied with status {}",
            status
        )));
    }
    Ok(reply.message.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(&server.url()).unwrap()
    }

    fn deck() -> DeckId {
        DeckId::parse("7").unwrap()
    }

    #[test]
    fn test_deck_cards_parses_server_list() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/decks/7/cards")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":1,"img_url":"/static/images/1.jpg","card_desc":"a dragon","quantity":3,"is_extra_deck":false},
                    {"id":2,"img_url":"/static/images/2.jpg","card_desc":"a fusion","quantity":1,"is_extra_deck":true}]"#,
            )
            .create();

        let cards = client(&server).deck_cards(&deck()).unwrap();

        mock.assert();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].quantity, 3);
        assert!(cards[1].is_extra_deck);
    }

    #[test]
    fn test_deck_cards_error_status_is_not_user_facing() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/api/decks/7/cards")
            .with_status(500)
            .with_body("boom")
            .create();

        let err = client(&server).deck_cards(&deck()).unwrap_err();
        assert!(!err.is_user_facing());
    }

    #[test]
    fn test_add_card_returns_success_message() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/decks/7/cards/add/42")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Card added to deck."}"#)
            .create();

        let message = client(&server).add_card(&deck(), 42).unwrap();

        mock.assert();
        assert_eq!(message, "Card added to deck.");
    }

    #[test]
    fn test_error_body_surfaces_server_message() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/decks/7/cards/remove/42")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Card is not in the deck."}"#)
            .create();

        let err = client(&server).remove_card(&deck(), 42).unwrap_err();

        assert!(err.is_user_facing());
        assert_eq!(err.to_string(), "Card is not in the deck.");
    }

    #[test]
    fn test_error_field_wins_even_on_2xx() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/api/decks/7/clear")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Deck is locked."}"#)
            .create();

        let err = client(&server).clear_deck(&deck()).unwrap_err();
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_search_passes_filters_through_and_parses_page() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/cards/search")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("offset".into(), "30".into()),
                mockito::Matcher::UrlEncoded("fname".into(), "dragon".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"cards":[{"id":5,"name":"Blue-Eyes","type":"Monster","desc":"legendary",
                    "card_images":[{"image_url":"/img/5.jpg","image_url_small":"/img/5s.jpg"}]}],
                    "pages_remaining":2}"#,
            )
            .create();

        let filters = SearchFilters {
            name: "dragon".to_string(),
            ..Default::default()
        };
        let page = client(&server).search(&filters, 30).unwrap();

        mock.assert();
        assert_eq!(page.pages_remaining, 2);
        assert_eq!(page.cards.len(), 1);
        assert_eq!(page.cards[0].thumb_url(), "/img/5s.jpg");
    }

    #[test]
    fn test_search_error_field_is_server_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/api/cards/search")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Search is unavailable."}"#)
            .create();

        let err = client(&server)
            .search(&SearchFilters::default(), 0)
            .unwrap_err();
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_rename_posts_form_name() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/decks/7/rename")
            .match_body(mockito::Matcher::UrlEncoded(
                "name".into(),
                "Dragon Rush".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Deck renamed."}"#)
            .create();

        let message = client(&server).rename_deck(&deck(), "Dragon Rush").unwrap();

        mock.assert();
        assert_eq!(message, "Deck renamed.");
    }
}
