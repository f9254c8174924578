//! App state - pure data structure with no I/O logic

use crate::app::form::Form;
use crate::fetch_state::AlbumFetchState;
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::RenderState;
use crate::models::{Coordinates, Session};

/// Entries of the home menu, in display order
pub const HOME_MENU: [(&str, Screen); 3] = [
    ("Add song", Screen::AddSong),
    ("Albums", Screen::Albums),
    ("Location", Screen::Location),
];

/// A one-line message under the active screen's content
#[derive(Clone, Debug, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        StatusLine {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusLine {
            text: text.into(),
            is_error: true,
        }
    }
}

/// User's answer to the location permission prompt, kept for the session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LocationPermission {
    #[default]
    Undetermined,
    Granted,
    Denied,
}

/// What the location screen shows
#[derive(Clone, Debug, PartialEq, Default)]
pub enum LocationStatus {
    #[default]
    AwaitingPermission,
    Fetching,
    Known(Coordinates),
    Unavailable,
    Denied,
    Failed(String),
}

impl LocationStatus {
    pub fn text(&self) -> String {
        match self {
            LocationStatus::AwaitingPermission => {
                String::from("Allow access to your location? (y/n)")
            }
            LocationStatus::Fetching => String::from("Fetching location..."),
            LocationStatus::Known(coordinates) => coordinates.to_string(),
            LocationStatus::Unavailable => String::from("Location unavailable"),
            LocationStatus::Denied => String::from("Permission denied"),
            LocationStatus::Failed(message) => message.clone(),
        }
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub status: Option<StatusLine>,

    // Forms
    pub login_form: Form,
    pub register_form: Form,
    pub song_form: Form,

    // Auth
    pub session: Option<Session>,

    // Home
    pub home_selected: usize,

    // Albums
    pub albums: AlbumFetchState,
    pub album_scroll: u16,

    // Location
    pub location_permission: LocationPermission,
    pub location: LocationStatus,

    // Requests in flight, by kind
    pub next_request_id: u64,
    pub pending_auth: Option<u64>,
    pub pending_record: Option<u64>,
    pub pending_location: Option<u64>,

    // Popups
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            screen: Screen::Login,
            input_mode: InputMode::Normal,
            status: None,
            login_form: Form::credentials(),
            register_form: Form::credentials(),
            song_form: Form::song(),
            session: None,
            home_selected: 0,
            albums: AlbumFetchState::new(),
            album_scroll: 0,
            location_permission: LocationPermission::Undetermined,
            location: LocationStatus::default(),
            next_request_id: 1,
            pending_auth: None,
            pending_record: None,
            pending_location: None,
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Form on the current screen, if it has one
    pub fn active_form(&self) -> Option<&Form> {
        match self.screen {
            Screen::Login => Some(&self.login_form),
            Screen::Register => Some(&self.register_form),
            Screen::AddSong => Some(&self.song_form),
            _ => None,
        }
    }

    pub fn active_form_mut(&mut self) -> Option<&mut Form> {
        match self.screen {
            Screen::Login => Some(&mut self.login_form),
            Screen::Register => Some(&mut self.register_form),
            Screen::AddSong => Some(&mut self.song_form),
            _ => None,
        }
    }

    /// True while the current screen waits on the service layer
    pub fn is_busy(&self) -> bool {
        match self.screen {
            Screen::Login | Screen::Register => self.pending_auth.is_some(),
            Screen::AddSong => self.pending_record.is_some(),
            Screen::Albums => self.albums.is_pending(),
            Screen::Location => self.pending_location.is_some(),
            Screen::Home => false,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            screen: self.screen,
            input_mode: self.input_mode,
            form: self.active_form().cloned(),
            status: self.status.clone(),
            is_busy: self.is_busy(),
            user_email: self.session.as_ref().map(|s| s.email.clone()),
            home_selected: self.home_selected,
            albums: self.albums.state().clone(),
            album_scroll: self.album_scroll,
            location_text: self.location.text(),
            location_prompt: self.location == LocationStatus::AwaitingPermission,
            show_help: self.show_help,
        }
    }
}
