//! Songbook - Actor-based terminal client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Service Layer (Tokio) - album fetches and provider calls

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use songbook::app::state::HOME_MENU;
use songbook::app::AppActor;
use songbook::config::Config;
use songbook::constants::{APP_NAME, APP_VERSION};
use songbook::fetch_state::FetchState;
use songbook::messages::ui_events::{key_to_ui_event, InputMode, Screen};
use songbook::messages::{RenderState, ServiceCommand, ServiceResponse, UiEvent};
use songbook::network::client::{albums_url, create_client};
use songbook::network::ServiceActor;
use songbook::providers::Providers;
use songbook::ui;

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional config path as the only argument
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;

    // Initialize logging to file; the terminal belongs to the UI
    let log_path = config.log_path();
    let log_dir = log_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let log_name = log_path
        .file_name()
        .map(|n| n.to_owned())
        .context("log_file must name a file")?;
    let file_appender = tracing_appender::rolling::never(&log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    tracing::info!(version = APP_VERSION, config = %config_path.display(), "Starting");
    if !config_path.exists() {
        tracing::info!("No config file, using defaults");
    }

    let client = create_client(config.timeout_secs)?;
    let providers = Providers::from_config(&config, client.clone())?;
    let albums = albums_url(&config.api_base()?)?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (svc_cmd_tx, svc_cmd_rx) = mpsc::unbounded_channel::<ServiceCommand>();
    let (svc_resp_tx, svc_resp_rx) = mpsc::unbounded_channel::<ServiceResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn service actor
    let service_actor = ServiceActor::new(client, albums, providers, svc_resp_tx);
    tokio::spawn(service_actor.run(svc_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(svc_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, svc_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.screen,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.location_prompt,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Screen
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    draw_title_bar(f, state, chunks[0]);

    match state.screen {
        Screen::Login | Screen::Register | Screen::AddSong => draw_form_screen(f, state, chunks[1]),
        Screen::Home => draw_home(f, state, chunks[1]),
        Screen::Albums => draw_albums(f, state, chunks[1]),
        Screen::Location => draw_location(f, state, chunks[1]),
    }

    draw_status_line(f, state, chunks[2]);
    draw_key_hints(f, state, chunks[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", APP_NAME),
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ),
        Span::raw(" "),
        Span::styled(state.screen.title(), Style::default().bold()),
    ];
    if let Some(email) = &state.user_email {
        spans.push(Span::styled(
            format!("  [{}]", email),
            Style::default().fg(Color::Green),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_form_screen(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(form) = &state.form else {
        return;
    };
    let height = form.fields.len() as u16 * ui::FIELD_HEIGHT + 2;
    let outer = ui::centered_rect(60, 100, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(height), Constraint::Min(0)])
        .split(outer);

    let title = match state.screen {
        Screen::Login => " Login (s:sign in, g:register) ",
        Screen::Register => " Register (s:create account, b:back) ",
        _ => " Add song (s:save, b:back) ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if state.is_busy {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Magenta)
        })
        .title(title);
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);

    ui::render_form(f, form, state.input_mode, inner);
}

fn draw_home(f: &mut Frame, state: &RenderState, area: Rect) {
    let entries: Vec<&str> = HOME_MENU.iter().map(|(label, _)| *label).collect();
    let menu_area = ui::centered_rect(40, 40, area);
    let menu = ui::render_menu(&entries, state.home_selected, " Home ");
    f.render_widget(menu, menu_area);
}

fn draw_albums(f: &mut Frame, state: &RenderState, area: Rect) {
    match &state.albums {
        FetchState::Loading => {
            let loading = Paragraph::new("Loading albums...")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" Albums "));
            f.render_widget(loading, ui::centered_rect(50, 30, area));
        }
        FetchState::Success { albums } => {
            let title = format!(" Albums ({}) r:reload ", albums.len());
            if albums.is_empty() {
                let empty = Paragraph::new("No albums")
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL).title(title));
                f.render_widget(empty, area);
                return;
            }
            let list = List::new(ui::album_items(albums))
                .block(Block::default().borders(Borders::ALL).title(title))
                .highlight_style(Style::default().fg(Color::Yellow));
            let mut list_state = ListState::default();
            list_state.select(Some(state.album_scroll as usize));
            f.render_stateful_widget(list, area, &mut list_state);
        }
        FetchState::Error { message } => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(" Albums (r:retry) "));
            f.render_widget(error, ui::centered_rect(60, 30, area));
        }
    }
}

fn draw_location(f: &mut Frame, state: &RenderState, area: Rect) {
    let style = if state.location_prompt {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default()
    };
    let lines = vec![
        Line::from(Span::styled("Your Location:", Style::default().bold())),
        Line::from(""),
        Line::from(Span::styled(state.location_text.clone(), style)),
    ];
    let location = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Location "));
    f.render_widget(location, ui::centered_rect(60, 30, area));
}

fn draw_status_line(f: &mut Frame, state: &RenderState, area: Rect) {
    if let Some(status) = &state.status {
        let line = Paragraph::new(format!(" {}", status.text)).style(ui::status_style(status));
        f.render_widget(line, area);
    }
}

fn draw_key_hints(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if state.is_busy && state.screen != Screen::Albums {
        " Working... "
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Tab:next field | Enter:submit "
    } else {
        match state.screen {
            Screen::Login => " Tab:field | e:edit | s:sign in | g:register | ?:help | q:quit ",
            Screen::Register => " Tab:field | e:edit | s:create | b:back | ?:help | q:quit ",
            Screen::AddSong => " Tab:field | e:edit | s:save | b:back | ?:help | q:quit ",
            Screen::Home => " ↑/↓:select | Enter:open | 1-3:jump | l:sign out | q:quit ",
            Screen::Albums => " ↑/↓:scroll | r:reload | b:back | q:quit ",
            Screen::Location if state.location_prompt => " y:allow | n:deny | b:back ",
            Screen::Location => " b:back | q:quit ",
        }
    };

    let bar = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = ui::centered_rect(60, 70, area);

    let help_text = r#"
 SONGBOOK - Keyboard Shortcuts

 FORMS (login, register, add song)
   Tab / Shift+Tab    Next / previous field
   e / Enter          Edit selected field
   Enter (editing)    Submit
   s                  Submit
   g                  Go to register (login)

 HOME
   ↑ / ↓, Enter       Pick a screen
   1 / 2 / 3          Add song / Albums / Location
   l                  Sign out

 ALBUMS
   ↑ / ↓              Scroll
   r                  Reload

 LOCATION
   y / n              Allow / deny location access

 GENERAL
   b / Esc            Back
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
