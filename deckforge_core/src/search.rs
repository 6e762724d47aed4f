use serde::Deserialize;

use crate::card::SearchCard;

/// Result page size used by the search endpoint's pagination.
pub const PAGE_SIZE: u32 = 30;

/// Number of filter fields, in form order.
pub const FIELD_COUNT: usize = 7;

/// Display labels for the filter fields, in form order.
pub const FIELD_LABELS: [&str; FIELD_COUNT] =
    ["Name", "Type", "Attribute", "Race", "Level", "ATK", "DEF"];

/// Free-form filter fields passed through verbatim to the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub name: String,
    pub card_type: String,
    pub attribute: String,
    pub race: String,
    pub level: String,
    pub attack: String,
    pub defense: String,
}

impl SearchFilters {
    /// Form fields for the search request; blank filters are omitted.
    pub fn to_form(&self, offset: u32) -> Vec<(&'static str, String)> {
        let mut form = vec![("offset", offset.to_string())];
        for (key, value) in [
            ("fname", &self.name),
            ("type", &self.card_type),
            ("attribute", &self.attribute),
            ("race", &self.race),
            ("level", &self.level),
            ("atk", &self.attack),
            ("def", &self.defense),
        ] {
            if !value.trim().is_empty() {
                form.push((key, value.trim().to_string()));
            }
        }
        form
    }

    /// Filter field by form-order index.
    ///
    /// Panics if `index >= FIELD_COUNT`.
    pub fn field(&self, index: usize) -> &str {
        match index {
            0 => &self.name,
            1 => &self.card_type,
            2 => &self.attribute,
            3 => &self.race,
            4 => &self.level,
            5 => &self.attack,
            6 => &self.defense,
            _ => panic!("filter field index {} out of range", index),
        }
    }

    /// Mutable filter field by form-order index.
    ///
    /// Panics if `index >= FIELD_COUNT`.
    pub fn field_mut(&mut self, index: usize) -> &mut String {
        match index {
            0 => &mut self.name,
            1 => &mut self.card_type,
            2 => &mut self.attribute,
            3 => &mut self.race,
            4 => &mut self.level,
            5 => &mut self.attack,
            6 => &mut self.defense,
            _ => panic!("filter field index {} out of range", index),
        }
    }

    /// Reset every field to blank.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One page of search results, replaced wholesale on every query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    pub cards: Vec<SearchCard>,
    pub pages_remaining: u32,
}

/// Pagination cursor plus the currently rendered result set.
///
/// The offset only advances once the matching page has actually arrived,
/// so the enabled/disabled state of the paging controls always reflects
/// what is on screen.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub filters: SearchFilters,
    offset: u32,
    pages_remaining: u32,
    pub results: Vec<SearchCard>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Page number for display, starting at 1.
    pub fn page_number(&self) -> u32 {
        self.offset / PAGE_SIZE + 1
    }

    /// Previous-page control state; disabled at offset 0.
    pub fn can_page_back(&self) -> bool {
        self.offset > 0
    }

    /// Next-page control state; disabled on the last page.
    pub fn can_page_forward(&self) -> bool {
        self.pages_remaining > 0
    }

    /// Offset to request for the next page.
    pub fn forward_offset(&self) -> u32 {
        self.offset + PAGE_SIZE
    }

    /// Offset to request for the previous page, clamped at 0 rather than
    /// ever going negative.
    pub fn back_offset(&self) -> u32 {
        self.offset.saturating_sub(PAGE_SIZE)
    }

    /// Install a freshly fetched page at the offset it was requested for.
    pub fn apply(&mut self, offset: u32, page: SearchPage) {
        self.offset = offset;
        self.pages_remaining = page.pages_remaining;
        self.results = page.cards;
    }

    /// Reset all filter fields and the offset. Does not clear the rendered
    /// results or re-run the search; a new submit does that.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(count: usize, pages_remaining: u32) -> SearchPage {
        SearchPage {
            cards: (0..count)
                .map(|i| SearchCard {
                    id: i as u32,
                    name: format!("card {}", i),
                    ..Default::default()
                })
                .collect(),
            pages_remaining,
        }
    }

    #[test]
    fn test_form_includes_offset_and_skips_blank_fields() {
        let filters = SearchFilters {
            name: "dragon".to_string(),
            level: " 7 ".to_string(),
            ..Default::default()
        };

        let form = filters.to_form(30);
        assert_eq!(
            form,
            vec![
                ("offset", "30".to_string()),
                ("fname", "dragon".to_string()),
                ("level", "7".to_string()),
            ]
        );
    }

    #[test]
    fn test_fresh_state_disables_both_paging_controls() {
        let state = SearchState::new();
        assert!(!state.can_page_back());
        assert!(!state.can_page_forward());
    }

    #[test]
    fn test_paging_forward_then_back_returns_to_zero() {
        let mut state = SearchState::new();
        state.apply(0, page(30, 2));
        assert!(state.can_page_forward());
        assert!(!state.can_page_back());

        state.apply(state.forward_offset(), page(30, 1));
        assert_eq!(state.offset(), 30);
        assert!(state.can_page_back());

        state.apply(state.back_offset(), page(30, 2));
        assert_eq!(state.offset(), 0);
        assert!(!state.can_page_back());
    }

    #[test]
    fn test_back_offset_saturates_at_zero() {
        let state = SearchState::new();
        assert_eq!(state.back_offset(), 0);
    }

    #[test]
    fn test_zero_pages_remaining_disables_forward() {
        let mut state = SearchState::new();
        state.apply(60, page(12, 0));
        assert!(!state.can_page_forward());
        assert!(state.can_page_back());
        assert_eq!(state.page_number(), 3);
    }

    #[test]
    fn test_results_replaced_wholesale() {
        let mut state = SearchState::new();
        state.apply(0, page(30, 1));
        state.apply(30, page(5, 0));
        assert_eq!(state.results.len(), 5);
    }

    #[test]
    fn test_clear_filters_resets_offset_but_keeps_results() {
        let mut state = SearchState::new();
        state.filters.name = "dragon".to_string();
        state.apply(30, page(30, 1));

        state.clear_filters();

        assert_eq!(state.filters, SearchFilters::default());
        assert_eq!(state.offset(), 0);
        assert_eq!(state.results.len(), 30);
    }
}
