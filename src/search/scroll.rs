use crate::search::state::SearchUiState;

/// How close to the end of the list the last visible row must be before the
/// next page is requested
pub const LOAD_MORE_LOOKAHEAD: usize = 5;

/// Decide whether a list showing rows up to `last_visible` should ask for the
/// next page.
pub fn should_load_more(state: &SearchUiState, last_visible: Option<usize>) -> bool {
    let Some(last_visible) = last_visible else {
        return false;
    };
    let total = state.items.len();
    if total == 0 || !state.can_load_more || state.is_loading() {
        return false;
    }
    last_visible >= total.saturating_sub(LOAD_MORE_LOOKAHEAD)
}
