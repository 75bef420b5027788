use crate::error::Failure;
use crate::models::RecipeSummary;
use serde::Serialize;

/// Where a session is in its fetch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchPhase {
    Idle,
    LoadingInitial,
    Ready,
    LoadingMore,
    ErrorInitial,
    ErrorMore,
}

/// Next slice of results to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCursor {
    /// Number of items received so far in the current result set
    pub offset: usize,
    pub page_size: usize,
}

/// Snapshot of a search session, as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchUiState {
    pub phase: SearchPhase,
    pub cursor: PageCursor,
    pub items: Vec<RecipeSummary>,
    pub can_load_more: bool,
    pub last_error: Option<Failure>,
    pub is_empty: bool,
}

impl SearchUiState {
    pub fn new(page_size: usize) -> Self {
        Self {
            phase: SearchPhase::Idle,
            cursor: PageCursor {
                offset: 0,
                page_size,
            },
            items: Vec::new(),
            can_load_more: false,
            last_error: None,
            is_empty: false,
        }
    }

    pub fn is_loading_initial(&self) -> bool {
        self.phase == SearchPhase::LoadingInitial
    }

    pub fn is_loading_more(&self) -> bool {
        self.phase == SearchPhase::LoadingMore
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading_initial() || self.is_loading_more()
    }

    /// Append a page, skipping recipes that are already listed
    pub(crate) fn append_unique(&mut self, page: Vec<RecipeSummary>) {
        for recipe in page {
            if !self.items.iter().any(|existing| existing.id == recipe.id) {
                self.items.push(recipe);
            }
        }
    }
}
