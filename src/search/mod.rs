pub mod filters;
pub mod form;
pub mod params;
pub mod scroll;
pub mod session;
pub mod state;

pub use filters::{ComplexCriteria, SearchFilters, SearchMode, SearchRequest};
pub use form::SearchForm;
pub use params::SearchParams;
pub use scroll::{should_load_more, LOAD_MORE_LOOKAHEAD};
pub use session::SearchSession;
pub use state::{PageCursor, SearchPhase, SearchUiState};
