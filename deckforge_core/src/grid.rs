use std::fmt;

use log::warn;

use crate::card::{CardPreview, DeckCard};

/// Main deck grid capacity.
pub const MAIN_DECK_SLOTS: usize = 60;
/// Extra deck grid capacity.
pub const EXTRA_DECK_SLOTS: usize = 15;

/// Which of the two deck pools a grid mirrors, partitioned by the
/// server's `is_extra_deck` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeckSection {
    Main,
    Extra,
}

impl DeckSection {
    /// Number of slots in this section's grid.
    pub fn capacity(&self) -> usize {
        match self {
            DeckSection::Main => MAIN_DECK_SLOTS,
            DeckSection::Extra => EXTRA_DECK_SLOTS,
        }
    }

    /// Whether a deck list entry belongs to this section.
    pub fn holds(&self, card: &DeckCard) -> bool {
        match self {
            DeckSection::Main => !card.is_extra_deck,
            DeckSection::Extra => card.is_extra_deck,
        }
    }
}

impl fmt::Display for DeckSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckSection::Main => write!(f, "Main Deck"),
            DeckSection::Extra => write!(f, "Extra Deck"),
        }
    }
}

/// Contents of one occupied slot: everything later hover and remove
/// lookups need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotContent {
    pub card_id: u32,
    pub img_url: String,
    pub card_desc: String,
}

impl From<&SlotContent> for CardPreview {
    fn from(content: &SlotContent) -> Self {
        Self {
            card_id: content.card_id,
            img_url: content.img_url.clone(),
            card_desc: content.card_desc.clone(),
            name: None,
        }
    }
}

/// Fixed-capacity grid of card slots mirroring one section of the
/// server-held deck list.
///
/// Occupied slots always form a prefix: the grid is rebuilt from scratch on
/// every sync, with no incremental diffing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    section: DeckSection,
    slots: Vec<Option<SlotContent>>,
}

impl SlotGrid {
    pub fn new(section: DeckSection) -> Self {
        Self {
            section,
            slots: vec![None; section.capacity()],
        }
    }

    pub fn section(&self) -> DeckSection {
        self.section
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot contents by zero-based index, `None` for an empty slot.
    pub fn slot(&self, index: usize) -> Option<&SlotContent> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Reset every slot to the empty placeholder state.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Rebuild the grid from a freshly fetched deck card list.
    ///
    /// Entries matching this section fill `quantity` consecutive slots each,
    /// in list order. Units beyond capacity are dropped with a warning; card
    /// limits are nominally enforced server-side.
    pub fn sync(&mut self, cards: &[DeckCard]) {
        self.reset();

        let mut next = 0;
        let mut dropped: u32 = 0;
        for card in cards.iter().filter(|card| self.section.holds(card)) {
            for _ in 0..card.quantity {
                if next < self.slots.len() {
                    self.slots[next] = Some(SlotContent {
                        card_id: card.id,
                        img_url: card.img_url.clone(),
                        card_desc: card.card_desc.clone(),
                    });
                    next += 1;
                } else {
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            warn!(
                "{} holds more cards than its {} slots; dropped {} unit(s)",
                self.section,
                self.capacity(),
                dropped
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u32, quantity: u32, is_extra_deck: bool) -> DeckCard {
        DeckCard {
            id,
            img_url: format!("/static/images/{}.jpg", id),
            card_desc: format!("card {}", id),
            quantity,
            is_extra_deck,
        }
    }

    #[test]
    fn test_quantity_expands_into_consecutive_slots() {
        let mut main = SlotGrid::new(DeckSection::Main);
        let mut extra = SlotGrid::new(DeckSection::Extra);
        let cards = vec![card(1, 3, false), card(2, 1, true)];

        main.sync(&cards);
        extra.sync(&cards);

        for i in 0..3 {
            assert_eq!(main.slot(i).unwrap().card_id, 1);
        }
        assert!(main.slot(3).is_none());
        assert_eq!(extra.slot(0).unwrap().card_id, 2);
        for i in 1..EXTRA_DECK_SLOTS {
            assert!(extra.slot(i).is_none());
        }
    }

    #[test]
    fn test_occupied_equals_sum_of_quantities() {
        let mut grid = SlotGrid::new(DeckSection::Main);
        let cards = vec![card(1, 3, false), card(2, 2, false), card(3, 1, false)];

        grid.sync(&cards);

        assert_eq!(grid.occupied(), 6);
    }

    #[test]
    fn test_slots_fill_in_server_list_order() {
        let mut grid = SlotGrid::new(DeckSection::Main);
        let cards = vec![card(9, 2, false), card(4, 1, false)];

        grid.sync(&cards);

        assert_eq!(grid.slot(0).unwrap().card_id, 9);
        assert_eq!(grid.slot(1).unwrap().card_id, 9);
        assert_eq!(grid.slot(2).unwrap().card_id, 4);
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut grid = SlotGrid::new(DeckSection::Main);
        let cards = vec![card(1, 3, false), card(2, 2, false)];

        grid.sync(&cards);
        let first = grid.clone();
        grid.sync(&cards);

        assert_eq!(grid, first);
    }

    #[test]
    fn test_sync_clears_stale_slots() {
        let mut grid = SlotGrid::new(DeckSection::Main);
        grid.sync(&[card(1, 5, false)]);
        grid.sync(&[card(2, 1, false)]);

        assert_eq!(grid.occupied(), 1);
        assert_eq!(grid.slot(0).unwrap().card_id, 2);
        assert!(grid.slot(1).is_none());
    }

    #[test]
    fn test_overflow_clamps_at_capacity() {
        let mut grid = SlotGrid::new(DeckSection::Extra);
        grid.sync(&[card(1, 10, true), card(2, 10, true)]);

        assert_eq!(grid.occupied(), EXTRA_DECK_SLOTS);
        assert_eq!(grid.slot(EXTRA_DECK_SLOTS - 1).unwrap().card_id, 2);
    }

    #[test]
    fn test_sections_partition_by_extra_flag() {
        let mut main = SlotGrid::new(DeckSection::Main);
        let mut extra = SlotGrid::new(DeckSection::Extra);
        let cards = vec![card(1, 2, false), card(2, 3, true), card(3, 1, false)];

        main.sync(&cards);
        extra.sync(&cards);

        assert_eq!(main.occupied(), 3);
        assert_eq!(extra.occupied(), 3);
        assert_eq!(main.slot(2).unwrap().card_id, 3);
        assert_eq!(extra.slot(0).unwrap().card_id, 2);
    }

    #[test]
    fn test_preview_copies_slot_metadata() {
        let mut grid = SlotGrid::new(DeckSection::Main);
        grid.sync(&[card(7, 1, false)]);

        let preview = CardPreview::from(grid.slot(0).unwrap());
        assert_eq!(preview.card_id, 7);
        assert_eq!(preview.img_url, "/static/images/7.jpg");
        assert_eq!(preview.card_desc, "card 7");
        assert!(preview.name.is_none());
    }
}
