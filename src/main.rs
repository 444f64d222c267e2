mod actions;
mod config;
mod format;
mod models;
mod ui;

use crate::actions::{Completion, DOWNLOAD_DELAY, REFRESH_ALL_DELAY, REFRESH_DELAY};
use crate::config::{Config, matches_key};
use crate::ui::{Tab, UiMode, UiState};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    if std::env::args().any(|arg| arg == "--debug") {
        // The TUI owns stdout, so debug logs go to a file.
        let log_file = std::fs::File::create("bmtui.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(log_file))
            .with_ansi(false)
            .init();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut ui_state = UiState::default();
    let (tx, mut rx) = mpsc::channel::<Completion>(16);

    loop {
        // Drain completions from simulated actions, then redraw
        while let Ok(done) = rx.try_recv() {
            handle_completion(&mut ui_state, done, actions::open_url);
        }
        ui_state.toasts.prune();

        terminal.draw(|f| ui::render(f, &mut ui_state))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match ui_state.mode {
            UiMode::Searching => match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    ui_state.mode = UiMode::Browsing;
                    ui_state.emails.clamp_selection();
                }
                _ => {
                    ui_state.emails.search.input(key);
                }
            },
            UiMode::Browsing => {
                if matches_key(key, &config.keybindings.quit) {
                    break;
                }

                if matches_key(key, &config.keybindings.next_tab) {
                    ui_state.active_tab = ui_state.active_tab.next();
                    continue;
                }
                if matches_key(key, &config.keybindings.prev_tab) {
                    ui_state.active_tab = ui_state.active_tab.prev();
                    continue;
                }
                if let KeyCode::Char(c @ '1'..='4') = key.code {
                    ui_state.active_tab = Tab::ALL[(c as usize) - ('1' as usize)];
                    continue;
                }

                match ui_state.active_tab {
                    Tab::Dashboard => {}
                    Tab::Emails => handle_emails_key(&mut ui_state, key, &config),
                    Tab::Attachments => handle_attachments_key(&mut ui_state, key, &config, &tx),
                    Tab::Oauth => handle_oauth_key(&mut ui_state, key, &config, &tx),
                }
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn handle_emails_key(ui_state: &mut UiState<'_>, key: crossterm::event::KeyEvent, config: &Config) {
    if matches_key(key, &config.keybindings.search) {
        ui_state.mode = UiMode::Searching;
    } else if matches_key(key, &config.keybindings.move_down) {
        let len = ui_state.emails.filtered().len();
        if ui_state.emails.selected < len.saturating_sub(1) {
            ui_state.emails.selected += 1;
        }
    } else if matches_key(key, &config.keybindings.move_up) {
        ui_state.emails.selected = ui_state.emails.selected.saturating_sub(1);
    }
}

fn handle_attachments_key(
    ui_state: &mut UiState<'_>,
    key: crossterm::event::KeyEvent,
    config: &Config,
    tx: &mpsc::Sender<Completion>,
) {
    if matches_key(key, &config.keybindings.move_down) {
        let len = ui_state.attachments.attachments.len();
        if ui_state.attachments.selected < len.saturating_sub(1) {
            ui_state.attachments.selected += 1;
        }
    } else if matches_key(key, &config.keybindings.move_up) {
        ui_state.attachments.selected = ui_state.attachments.selected.saturating_sub(1);
    } else if matches_key(key, &config.keybindings.download) {
        let target = ui_state
            .attachments
            .selected_attachment()
            .map(|a| (a.id, a.name.clone()));
        if let Some((id, name)) = target {
            if ui_state.attachments.begin_download(id) {
                tracing::info!(id, %name, "download started");
                ui_state
                    .toasts
                    .push("Download Started", format!("Downloading {}", name));
                actions::spawn_download(tx.clone(), id, DOWNLOAD_DELAY);
            }
        }
    } else if matches_key(key, &config.keybindings.open_drive) {
        let target = ui_state
            .attachments
            .selected_attachment()
            .map(|a| (a.name.clone(), a.drive_link.clone()));
        if let Some((name, link)) = target {
            match actions::open_url(&link) {
                Ok(()) => ui_state
                    .toasts
                    .push("Opening in Drive", format!("{} opened in your browser", name)),
                Err(err) => {
                    tracing::warn!(%err, "failed to open drive link");
                    ui_state
                        .toasts
                        .push_destructive("Open Failed", format!("Could not open {}", name));
                }
            }
        }
    }
}

fn handle_oauth_key(
    ui_state: &mut UiState<'_>,
    key: crossterm::event::KeyEvent,
    config: &Config,
    tx: &mpsc::Sender<Completion>,
) {
    if matches_key(key, &config.keybindings.move_down) {
        let len = ui_state.oauth.services.len();
        if ui_state.oauth.selected < len.saturating_sub(1) {
            ui_state.oauth.selected += 1;
        }
    } else if matches_key(key, &config.keybindings.move_up) {
        ui_state.oauth.selected = ui_state.oauth.selected.saturating_sub(1);
    } else if matches_key(key, &config.keybindings.refresh_all) {
        if ui_state.oauth.begin_refresh_all() {
            tracing::info!("refresh-all started");
            ui_state
                .toasts
                .push("Refreshing All Tokens", "Requesting new tokens for every service");
            actions::spawn_refresh_all(tx.clone(), REFRESH_ALL_DELAY);
        }
    } else if matches_key(key, &config.keybindings.refresh) {
        let target = ui_state
            .oauth
            .selected_service()
            .map(|s| (s.id.clone(), s.name.clone()));
        if let Some((id, name)) = target {
            if ui_state.oauth.begin_refresh(&id) {
                tracing::info!(service = %id, "token refresh started");
                ui_state
                    .toasts
                    .push("Refreshing Token", format!("Requesting a new token for {}", name));
                actions::spawn_refresh(tx.clone(), id, REFRESH_DELAY);
            }
        }
    } else if matches_key(key, &config.keybindings.update_scopes) {
        ui_state
            .toasts
            .push("Update Scopes", "Scope management is not yet implemented");
    }
}

/// `open_fn` hands the download URL to the platform opener; injected so the
/// success and failure toast paths stay reachable without a browser.
fn handle_completion(
    ui_state: &mut UiState<'_>,
    done: Completion,
    open_fn: fn(&str) -> anyhow::Result<()>,
) {
    match done {
        Completion::DownloadFinished { id } => {
            // The busy flag clears no matter how the handoff below goes.
            ui_state.attachments.finish_download(id);
            let Some(att) = ui_state.attachments.attachments.iter().find(|a| a.id == id) else {
                return;
            };
            match open_fn(&att.download_link) {
                Ok(()) => ui_state
                    .toasts
                    .push("Download Complete", format!("{} handed to your browser", att.name)),
                Err(err) => {
                    tracing::warn!(%err, id, "download failed");
                    ui_state
                        .toasts
                        .push_destructive("Download Failed", format!("Could not download {}", att.name));
                }
            }
        }
        Completion::RefreshFinished { service_id } => {
            ui_state.oauth.finish_refresh(&service_id);
            let name = ui_state
                .oauth
                .services
                .iter()
                .find(|s| s.id == service_id)
                .map(|s| s.name.clone())
                .unwrap_or(service_id);
            ui_state
                .toasts
                .push("Token Refreshed", format!("{} token renewed successfully", name));
        }
        Completion::RefreshAllFinished => {
            ui_state.oauth.finish_refresh_all();
            ui_state
                .toasts
                .push("All Tokens Refreshed", "Every OAuth service holds a fresh token");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    fn opener_ok(_url: &str) -> anyhow::Result<()> {
        Ok(())
    }

    fn opener_fails(url: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("no URL handler for {}", url))
    }

    #[test]
    fn test_move_keys_stay_in_bounds() {
        let config = Config::default();
        let mut state = UiState::default();
        state.active_tab = Tab::Emails;

        for _ in 0..10 {
            handle_emails_key(&mut state, press('j'), &config);
        }
        assert_eq!(state.emails.selected, state.emails.filtered().len() - 1);

        for _ in 0..10 {
            handle_emails_key(&mut state, press('k'), &config);
        }
        assert_eq!(state.emails.selected, 0);
    }

    #[test]
    fn test_update_scopes_emits_informational_toast_only() {
        let config = Config::default();
        let mut state = UiState::default();
        let (tx, mut rx) = mpsc::channel(4);

        handle_oauth_key(&mut state, press('s'), &config, &tx);
        assert_eq!(state.toasts.visible().len(), 1);
        assert!(!state.toasts.visible()[0].destructive);
        assert!(state.oauth.refreshing.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_download_key_emits_started_toast_and_sets_busy() {
        let config = Config::default();
        let mut state = UiState::default();
        let (tx, _rx) = mpsc::channel(4);

        handle_attachments_key(&mut state, press('d'), &config, &tx);
        assert!(state.attachments.is_downloading(1));
        let toasts = state.toasts.visible();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Download Started");
        assert!(toasts[0].description.contains("Construction_Proposal_2024.pdf"));

        // A second press while the download is in flight does not double-queue.
        handle_attachments_key(&mut state, press('d'), &config, &tx);
        assert_eq!(state.toasts.visible().len(), 1);
    }

    #[test]
    fn test_download_completion_emits_complete_toast_and_clears_busy() {
        let mut state = UiState::default();
        state.attachments.begin_download(1);

        handle_completion(&mut state, Completion::DownloadFinished { id: 1 }, opener_ok);
        assert!(!state.attachments.is_downloading(1));
        let toast = state.toasts.visible().last().unwrap();
        assert_eq!(toast.title, "Download Complete");
        assert!(!toast.destructive);
    }

    #[test]
    fn test_download_failure_toasts_destructive_and_still_clears_busy() {
        let mut state = UiState::default();
        state.attachments.begin_download(1);

        handle_completion(
            &mut state,
            Completion::DownloadFinished { id: 1 },
            opener_fails,
        );
        assert!(!state.attachments.is_downloading(1));
        let toast = state.toasts.visible().last().unwrap();
        assert_eq!(toast.title, "Download Failed");
        assert!(toast.destructive);
    }

    #[tokio::test]
    async fn test_refresh_key_sets_busy_and_completion_clears_it() {
        let config = Config::default();
        let mut state = UiState::default();
        let (tx, _rx) = mpsc::channel(4);

        handle_oauth_key(&mut state, press('r'), &config, &tx);
        assert!(state.oauth.is_refreshing("gmail"));
        // Pressing again while busy neither double-queues nor toasts twice.
        handle_oauth_key(&mut state, press('r'), &config, &tx);
        assert_eq!(state.toasts.visible().len(), 1);

        handle_completion(
            &mut state,
            Completion::RefreshFinished {
                service_id: "gmail".to_string(),
            },
            opener_ok,
        );
        assert!(!state.oauth.is_refreshing("gmail"));
        assert!(!state.oauth.is_refreshing("drive"));
    }

    #[tokio::test]
    async fn test_refresh_all_key_marks_every_service_busy() {
        let config = Config::default();
        let mut state = UiState::default();
        let (tx, _rx) = mpsc::channel(4);

        handle_oauth_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT),
            &config,
            &tx,
        );
        assert!(state.oauth.is_refreshing("gmail"));
        assert!(state.oauth.is_refreshing("drive"));

        handle_completion(&mut state, Completion::RefreshAllFinished, opener_ok);
        assert!(state.oauth.refreshing.is_empty());
        assert!(!state.oauth.refresh_all_in_flight);
    }
}
