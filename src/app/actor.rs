//! App actor - message loop processing UI events and service responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{RenderState, ServiceCommand, ServiceResponse, UiEvent};

/// App actor that processes UI events and service responses
pub struct AppActor {
    state: AppState,
    service_tx: mpsc::UnboundedSender<ServiceCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        service_tx: mpsc::UnboundedSender<ServiceCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(),
            service_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut service_rx: mpsc::UnboundedReceiver<ServiceResponse>,
    ) {
        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.service_tx.send(ServiceCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = service_rx.recv() => {
                    if response.is_error() {
                        tracing::warn!(id = response.id(), "Service reported a failure");
                    }
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: Option<ServiceCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.service_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Navigation
            UiEvent::Navigate(screen) => {
                let cmd = self.state.navigate(screen);
                self.send(cmd);
            }
            UiEvent::Back => {
                let cmd = self.state.back();
                self.send(cmd);
            }

            // Form editing
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::Submit => {
                let cmd = self.state.submit();
                self.send(cmd);
            }

            // Home
            UiEvent::MenuUp => self.state.menu_up(),
            UiEvent::MenuDown => self.state.menu_down(),
            UiEvent::MenuSelect => {
                let cmd = self.state.menu_select();
                self.send(cmd);
            }
            UiEvent::SignOut => self.state.sign_out(),

            // Albums
            UiEvent::ReloadAlbums => {
                let cmd = self.state.reload_albums();
                self.send(cmd);
            }
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Location
            UiEvent::GrantLocation => {
                let cmd = self.state.grant_location();
                self.send(cmd);
            }
            UiEvent::DenyLocation => self.state.deny_location(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
