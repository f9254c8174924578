//! Render state - data structure sent from App layer to UI for rendering

use crate::app::form::Form;
use crate::app::state::StatusLine;
use crate::fetch_state::FetchState;
use crate::messages::ui_events::{InputMode, Screen};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub screen: Screen,
    pub input_mode: InputMode,

    /// Snapshot of the current screen's form
    pub form: Option<Form>,
    pub status: Option<StatusLine>,
    pub is_busy: bool,
    pub user_email: Option<String>,

    // Home
    pub home_selected: usize,

    // Albums
    pub albums: FetchState,
    pub album_scroll: u16,

    // Location
    pub location_text: String,
    pub location_prompt: bool,

    // Popups
    pub show_help: bool,
}
