//! Command handlers - business logic for processing UI events

use crate::app::state::{AppState, LocationPermission, LocationStatus, StatusLine, HOME_MENU};
use crate::constants::SONGS_COLLECTION;
use crate::fetch_state::FetchState;
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::{ServiceCommand, ServiceResponse};

impl AppState {
    // ========================
    // Navigation
    // ========================

    /// Activate `screen`. Albums and location emit their one fetch here.
    pub fn navigate(&mut self, screen: Screen) -> Option<ServiceCommand> {
        let target = self.switch_screen(screen);
        match target {
            Screen::AddSong => {
                self.song_form.clear();
                None
            }
            Screen::Albums => {
                self.album_scroll = 0;
                let attempt = self.albums.begin();
                tracing::info!(attempt, "Album fetch started");
                Some(ServiceCommand::FetchAlbums { attempt })
            }
            Screen::Location => self.enter_location(),
            _ => None,
        }
    }

    /// Screen change without side effects; returns the screen actually shown
    fn switch_screen(&mut self, screen: Screen) -> Screen {
        let target = if screen.requires_session() && self.session.is_none() {
            tracing::warn!(?screen, "Not signed in, staying on login");
            Screen::Login
        } else {
            screen
        };
        tracing::debug!(from = ?self.screen, to = ?target, "Switching screen");

        self.screen = target;
        self.input_mode = InputMode::Normal;
        self.status = None;
        self.show_help = false;
        self.pending_auth = None;
        self.pending_record = None;
        self.pending_location = None;
        if let Some(form) = self.active_form_mut() {
            form.focus_end();
        }
        target
    }

    pub fn back(&mut self) -> Option<ServiceCommand> {
        match self.screen {
            Screen::Register => self.navigate(Screen::Login),
            Screen::AddSong | Screen::Albums | Screen::Location => self.navigate(Screen::Home),
            Screen::Login | Screen::Home => None,
        }
    }

    // ========================
    // Form editing
    // ========================

    pub fn next_field(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.next_field();
        }
    }

    pub fn prev_field(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.prev_field();
        }
    }

    pub fn start_editing(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.focus_end();
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(form) = self.active_form_mut() {
            form.enter_char(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.delete_char();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.move_cursor_left();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.move_cursor_right();
        }
    }

    /// Submit the current form. A second submit while one is in flight is ignored.
    pub fn submit(&mut self) -> Option<ServiceCommand> {
        self.input_mode = InputMode::Normal;
        match self.screen {
            Screen::Login | Screen::Register => self.submit_credentials(),
            Screen::AddSong => self.submit_song(),
            _ => None,
        }
    }

    fn submit_credentials(&mut self) -> Option<ServiceCommand> {
        if self.pending_auth.is_some() {
            return None;
        }
        let sign_in = self.screen == Screen::Login;
        let credentials = if sign_in {
            self.login_form.to_credentials()
        } else {
            self.register_form.to_credentials()
        };
        if let Err(message) = credentials.validate() {
            self.status = Some(StatusLine::error(message));
            return None;
        }

        let id = self.next_id();
        self.pending_auth = Some(id);
        if sign_in {
            self.status = Some(StatusLine::info("Signing in..."));
            Some(ServiceCommand::SignIn { id, credentials })
        } else {
            self.status = Some(StatusLine::info("Creating account..."));
            Some(ServiceCommand::SignUp { id, credentials })
        }
    }

    fn submit_song(&mut self) -> Option<ServiceCommand> {
        if self.pending_record.is_some() {
            return None;
        }
        let session = match &self.session {
            Some(session) if !session.is_expired() => session.clone(),
            Some(_) => {
                self.status = Some(StatusLine::error("Session expired, sign in again"));
                return None;
            }
            None => {
                self.status = Some(StatusLine::error("Not signed in"));
                return None;
            }
        };

        let id = self.next_id();
        self.pending_record = Some(id);
        self.status = Some(StatusLine::info("Saving..."));
        Some(ServiceCommand::AddRecord {
            id,
            session,
            collection: SONGS_COLLECTION.to_string(),
            record: self.song_form.to_song().to_record(),
        })
    }

    // ========================
    // Home
    // ========================

    pub fn menu_up(&mut self) {
        self.home_selected = (self.home_selected + HOME_MENU.len() - 1) % HOME_MENU.len();
    }

    pub fn menu_down(&mut self) {
        self.home_selected = (self.home_selected + 1) % HOME_MENU.len();
    }

    pub fn menu_select(&mut self) -> Option<ServiceCommand> {
        let (_, screen) = HOME_MENU[self.home_selected % HOME_MENU.len()];
        self.navigate(screen)
    }

    pub fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(user = %session.user_id, "Signed out");
        }
        self.login_form.clear();
        self.switch_screen(Screen::Login);
        self.status = Some(StatusLine::info("Signed out"));
    }

    // ========================
    // Albums
    // ========================

    /// Start a fresh attempt from the albums screen
    pub fn reload_albums(&mut self) -> Option<ServiceCommand> {
        if self.screen != Screen::Albums || self.albums.is_pending() {
            return None;
        }
        self.navigate(Screen::Albums)
    }

    pub fn scroll_up(&mut self) {
        self.album_scroll = self.album_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if let FetchState::Success { albums } = self.albums.state() {
            let max = albums.len().saturating_sub(1).min(u16::MAX as usize) as u16;
            self.album_scroll = self.album_scroll.saturating_add(1).min(max);
        }
    }

    // ========================
    // Location
    // ========================

    fn enter_location(&mut self) -> Option<ServiceCommand> {
        match self.location_permission {
            LocationPermission::Undetermined => {
                self.location = LocationStatus::AwaitingPermission;
                None
            }
            LocationPermission::Granted => self.request_location(),
            LocationPermission::Denied => {
                self.location = LocationStatus::Denied;
                None
            }
        }
    }

    fn request_location(&mut self) -> Option<ServiceCommand> {
        let id = self.next_id();
        self.pending_location = Some(id);
        self.location = LocationStatus::Fetching;
        Some(ServiceCommand::FetchLocation { id })
    }

    pub fn grant_location(&mut self) -> Option<ServiceCommand> {
        if self.location != LocationStatus::AwaitingPermission {
            return None;
        }
        self.location_permission = LocationPermission::Granted;
        self.request_location()
    }

    pub fn deny_location(&mut self) {
        if self.location == LocationStatus::AwaitingPermission {
            self.location_permission = LocationPermission::Denied;
            self.location = LocationStatus::Denied;
        }
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: ServiceResponse) {
        match response {
            ServiceResponse::SignedIn { id, session } => {
                if self.pending_auth == Some(id) && self.screen == Screen::Login {
                    tracing::info!(user = %session.user_id, "Signed in");
                    self.session = Some(session);
                    self.login_form.clear_secrets();
                    self.switch_screen(Screen::Home);
                }
            }
            ServiceResponse::SignedUp { id, email } => {
                if self.pending_auth == Some(id) && self.screen == Screen::Register {
                    self.register_form.clear();
                    self.login_form.clear();
                    self.switch_screen(Screen::Login);
                    for c in email.chars() {
                        self.login_form.enter_char(c);
                    }
                    self.status = Some(StatusLine::info(format!("Account created for {}", email)));
                }
            }
            ServiceResponse::AuthFailed { id, message } => {
                if self.pending_auth == Some(id) {
                    self.pending_auth = None;
                    self.status = Some(StatusLine::error(message));
                }
            }
            ServiceResponse::RecordAdded { id, document_id } => {
                if self.pending_record == Some(id) {
                    tracing::debug!(document_id = %document_id, "Song stored");
                    self.pending_record = None;
                    self.status = Some(StatusLine::info("Song added"));
                }
            }
            ServiceResponse::RecordFailed { id, message } => {
                if self.pending_record == Some(id) {
                    self.pending_record = None;
                    self.status = Some(StatusLine::error(message));
                }
            }
            ServiceResponse::Albums { attempt, state } => {
                if self.albums.complete(attempt, state) {
                    self.album_scroll = 0;
                }
            }
            ServiceResponse::Location { id, coordinates } => {
                if self.pending_location == Some(id) {
                    self.pending_location = None;
                    self.location = coordinates
                        .map(LocationStatus::Known)
                        .unwrap_or(LocationStatus::Unavailable);
                }
            }
            ServiceResponse::LocationFailed { id, message } => {
                if self.pending_location == Some(id) {
                    self.pending_location = None;
                    self.location = LocationStatus::Failed(message);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Album, Coordinates, Session};

    fn session() -> Session {
        Session {
            user_id: "uid-1".into(),
            email: "me@example.com".into(),
            id_token: "token".into(),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
        }
    }

    fn signed_in() -> AppState {
        let mut state = AppState::new();
        state.session = Some(session());
        state.navigate(Screen::Home);
        state
    }

    fn type_str(state: &mut AppState, text: &str) {
        for c in text.chars() {
            state.enter_char(c);
        }
    }

    #[test]
    fn test_feature_screens_need_a_session() {
        let mut state = AppState::new();
        assert!(state.navigate(Screen::Albums).is_none());
        assert_eq!(state.screen, Screen::Login);
    }

    #[test]
    fn test_empty_credentials_are_rejected_locally() {
        let mut state = AppState::new();
        assert!(state.submit().is_none());
        assert!(state.status.as_ref().unwrap().is_error);
        assert!(state.pending_auth.is_none());
    }

    #[test]
    fn test_sign_in_flow() {
        let mut state = AppState::new();
        state.start_editing();
        type_str(&mut state, "me@example.com");
        state.next_field();
        type_str(&mut state, "secret");

        let id = match state.submit() {
            Some(ServiceCommand::SignIn { id, credentials }) => {
                assert_eq!(credentials.email, "me@example.com");
                assert_eq!(credentials.password, "secret");
                id
            }
            other => panic!("unexpected command: {:?}", other),
        };
        // Double submit while in flight
        assert!(state.submit().is_none());

        state.handle_response(ServiceResponse::SignedIn { id, session: session() });
        assert_eq!(state.screen, Screen::Home);
        assert!(state.session.is_some());
        assert_eq!(state.login_form.value(1), "");
    }

    #[test]
    fn test_auth_failure_shows_provider_message() {
        let mut state = AppState::new();
        state.login_form.enter_char('a');
        state.login_form.next_field();
        state.login_form.enter_char('b');

        let id = match state.submit() {
            Some(ServiceCommand::SignIn { id, .. }) => id,
            other => panic!("unexpected command: {:?}", other),
        };
        state.handle_response(ServiceResponse::AuthFailed {
            id,
            message: "INVALID_LOGIN_CREDENTIALS".into(),
        });
        assert_eq!(state.screen, Screen::Login);
        assert_eq!(
            state.status,
            Some(StatusLine::error("INVALID_LOGIN_CREDENTIALS"))
        );
        assert!(state.pending_auth.is_none());
    }

    #[test]
    fn test_sign_up_returns_to_login_with_email() {
        let mut state = AppState::new();
        state.navigate(Screen::Register);
        type_str(&mut state, "new@example.com");
        state.next_field();
        type_str(&mut state, "pw123456");

        let id = match state.submit() {
            Some(ServiceCommand::SignUp { id, .. }) => id,
            other => panic!("unexpected command: {:?}", other),
        };
        state.handle_response(ServiceResponse::SignedUp {
            id,
            email: "new@example.com".into(),
        });
        assert_eq!(state.screen, Screen::Login);
        assert_eq!(state.login_form.value(0), "new@example.com");
        assert!(state.session.is_none());
    }

    #[test]
    fn test_albums_activation_starts_loading() {
        let mut state = signed_in();
        let attempt = match state.navigate(Screen::Albums) {
            Some(ServiceCommand::FetchAlbums { attempt }) => attempt,
            other => panic!("unexpected command: {:?}", other),
        };
        assert_eq!(state.to_render_state().albums, FetchState::Loading);
        assert!(state.to_render_state().is_busy);

        let albums = vec![Album { user_id: 1, id: 1, title: "quidem".into() }];
        state.handle_response(ServiceResponse::Albums {
            attempt,
            state: FetchState::Success { albums: albums.clone() },
        });
        assert_eq!(state.albums.state(), &FetchState::Success { albums });

        // A duplicate outcome for the same attempt does not overwrite
        state.handle_response(ServiceResponse::Albums {
            attempt,
            state: FetchState::Error { message: "Network error".into() },
        });
        assert!(matches!(state.albums.state(), FetchState::Success { .. }));
    }

    #[test]
    fn test_reactivation_drops_previous_attempt() {
        let mut state = signed_in();
        let first = match state.navigate(Screen::Albums) {
            Some(ServiceCommand::FetchAlbums { attempt }) => attempt,
            other => panic!("unexpected command: {:?}", other),
        };
        state.back();
        state.navigate(Screen::Albums);

        state.handle_response(ServiceResponse::Albums {
            attempt: first,
            state: FetchState::Error { message: "Error 500".into() },
        });
        assert_eq!(state.albums.state(), &FetchState::Loading);
    }

    #[test]
    fn test_reload_only_after_terminal_state() {
        let mut state = signed_in();
        let attempt = match state.navigate(Screen::Albums) {
            Some(ServiceCommand::FetchAlbums { attempt }) => attempt,
            other => panic!("unexpected command: {:?}", other),
        };
        assert!(state.reload_albums().is_none());

        state.handle_response(ServiceResponse::Albums {
            attempt,
            state: FetchState::Error { message: "Error 404".into() },
        });
        assert!(matches!(
            state.reload_albums(),
            Some(ServiceCommand::FetchAlbums { .. })
        ));
    }

    #[test]
    fn test_add_song_sends_record_to_songs() {
        let mut state = signed_in();
        state.navigate(Screen::AddSong);
        type_str(&mut state, "Radiohead");
        state.next_field();
        type_str(&mut state, "Airbag");

        let id = match state.submit() {
            Some(ServiceCommand::AddRecord { id, collection, record, .. }) => {
                assert_eq!(collection, "songs");
                assert_eq!(record["author"], "Radiohead");
                assert_eq!(record["title"], "Airbag");
                assert_eq!(record["year"], "");
                id
            }
            other => panic!("unexpected command: {:?}", other),
        };
        state.handle_response(ServiceResponse::RecordAdded { id, document_id: "doc1".into() });
        assert_eq!(state.status, Some(StatusLine::info("Song added")));
    }

    #[test]
    fn test_expired_session_blocks_write() {
        let mut state = signed_in();
        state.navigate(Screen::AddSong);
        if let Some(session) = state.session.as_mut() {
            session.expires_at = chrono::Utc::now() - chrono::Duration::seconds(1);
        }
        assert!(state.submit().is_none());
        assert!(state.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn test_location_permission_flow() {
        let mut state = signed_in();
        assert!(state.navigate(Screen::Location).is_none());
        assert!(state.to_render_state().location_prompt);

        let id = match state.grant_location() {
            Some(ServiceCommand::FetchLocation { id }) => id,
            other => panic!("unexpected command: {:?}", other),
        };
        assert_eq!(state.location.text(), "Fetching location...");

        state.handle_response(ServiceResponse::Location {
            id,
            coordinates: Some(Coordinates { latitude: 1.5, longitude: 2.5 }),
        });
        assert_eq!(state.location.text(), "Lat: 1.5, Long: 2.5");

        // Permission is remembered: the next visit fetches straight away
        state.back();
        assert!(matches!(
            state.navigate(Screen::Location),
            Some(ServiceCommand::FetchLocation { .. })
        ));
    }

    #[test]
    fn test_location_denied() {
        let mut state = signed_in();
        state.navigate(Screen::Location);
        state.deny_location();
        assert_eq!(state.location.text(), "Permission denied");

        state.back();
        assert!(state.navigate(Screen::Location).is_none());
        assert_eq!(state.location, LocationStatus::Denied);
    }

    #[test]
    fn test_sign_out_returns_to_login() {
        let mut state = signed_in();
        state.sign_out();
        assert_eq!(state.screen, Screen::Login);
        assert!(state.session.is_none());
    }

    #[test]
    fn test_scroll_stops_at_last_album() {
        let mut state = signed_in();
        let attempt = match state.navigate(Screen::Albums) {
            Some(ServiceCommand::FetchAlbums { attempt }) => attempt,
            other => panic!("unexpected command: {:?}", other),
        };
        let albums = (0..3).map(|id| Album { user_id: 1, id, title: format!("a{}", id) }).collect();
        state.handle_response(ServiceResponse::Albums {
            attempt,
            state: FetchState::Success { albums },
        });
        for _ in 0..5 {
            state.scroll_down();
        }
        assert_eq!(state.album_scroll, 2);

        state.album_scroll = u16::MAX;
        state.scroll_down();
        assert_eq!(state.album_scroll, 2);
    }

    #[test]
    fn test_home_menu_wraps() {
        let mut state = signed_in();
        state.menu_up();
        assert_eq!(HOME_MENU[state.home_selected].1, Screen::Location);
        state.menu_down();
        assert_eq!(HOME_MENU[state.home_selected].1, Screen::AddSong);
    }
}
