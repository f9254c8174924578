//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application screens
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Screen {
    #[default]
    Login,
    Register,
    Home,
    AddSong,
    Albums,
    Location,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Register => "Register",
            Screen::Home => "Home",
            Screen::AddSong => "Add song",
            Screen::Albums => "Albums",
            Screen::Location => "Location",
        }
    }

    /// Screens reachable only with a signed-in session
    pub fn requires_session(&self) -> bool {
        !matches!(self, Screen::Login | Screen::Register)
    }

    /// Screens built around a text form
    pub fn has_form(&self) -> bool {
        matches!(self, Screen::Login | Screen::Register | Screen::AddSong)
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Navigation
    Navigate(Screen),
    Back,

    // Form editing
    NextField,
    PrevField,
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    Submit,

    // Home menu
    MenuUp,
    MenuDown,
    MenuSelect,
    SignOut,

    // Albums
    ReloadAlbums,
    ScrollUp,
    ScrollDown,

    // Location permission prompt
    GrantLocation,
    DenyLocation,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    screen: Screen,
    input_mode: InputMode,
    show_help: bool,
    location_prompt: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if screen.has_form() {
        return handle_form_keys(key, screen, input_mode);
    }

    // Shared keys for the non-form screens
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        _ => {}
    }

    match screen {
        Screen::Home => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::MenuUp),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::MenuDown),
            KeyCode::Enter => Some(UiEvent::MenuSelect),
            KeyCode::Char('1') => Some(UiEvent::Navigate(Screen::AddSong)),
            KeyCode::Char('2') => Some(UiEvent::Navigate(Screen::Albums)),
            KeyCode::Char('3') => Some(UiEvent::Navigate(Screen::Location)),
            KeyCode::Char('l') => Some(UiEvent::SignOut),
            _ => None,
        },
        Screen::Albums => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => Some(UiEvent::Back),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::ScrollDown),
            KeyCode::Char('r') => Some(UiEvent::ReloadAlbums),
            _ => None,
        },
        Screen::Location => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => Some(UiEvent::Back),
            KeyCode::Char('y') if location_prompt => Some(UiEvent::GrantLocation),
            KeyCode::Char('n') if location_prompt => Some(UiEvent::DenyLocation),
            _ => None,
        },
        _ => None,
    }
}

/// Handle keys for the login, register and add-song forms
fn handle_form_keys(key: KeyEvent, screen: Screen, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
            KeyCode::Char('s') => Some(UiEvent::Submit),
            KeyCode::Char('g') if screen == Screen::Login => {
                Some(UiEvent::Navigate(Screen::Register))
            }
            KeyCode::Esc | KeyCode::Char('b') if screen != Screen::Login => Some(UiEvent::Back),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Enter => Some(UiEvent::Submit),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}
