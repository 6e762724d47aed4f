use serde::{Deserialize, Serialize};

/// One entry in a deck's server-held card list.
///
/// The server is the single source of truth for these; the client only
/// renders them, expanding `quantity` into consecutive grid slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCard {
    pub id: u32,
    pub img_url: String,
    pub card_desc: String,
    pub quantity: u32,
    pub is_extra_deck: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImage {
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_url_small: String,
}

/// A card tile returned by the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCard {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub card_type: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub card_images: Vec<CardImage>,
}

impl SearchCard {
    /// Thumbnail URL for the tile: first image, small variant.
    pub fn thumb_url(&self) -> &str {
        self.card_images
            .first()
            .map(|img| img.image_url_small.as_str())
            .unwrap_or("")
    }
}

/// Snapshot of the card shown in the singleton preview pane.
/// Last-hovered-wins; holds plain copies of the tile's stored metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPreview {
    pub card_id: u32,
    pub img_url: String,
    pub card_desc: String,
    /// Deck list entries carry no name; search tiles do.
    pub name: Option<String>,
}

impl From<&SearchCard> for CardPreview {
    fn from(card: &SearchCard) -> Self {
        Self {
            card_id: card.id,
            img_url: card.thumb_url().to_string(),
            card_desc: card.desc.clone(),
            name: Some(card.name.clone()),
        }
    }
}
