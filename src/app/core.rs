//! Core PartyChatApp struct definition and initialization

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{info, warn};

use crate::backend::run_backend;
use crate::config::{ClientConfig, Theme};
use crate::protocol::{BackendAction, GuiEvent};
use crate::state::ClientState;
use crate::transport::{Connector, LocalHub};
use crate::typing::TypingDebouncer;
use crate::ui::{self, AvatarTextures};

pub struct PartyChatApp {
    // Presentation state (form, room, messages, errors)
    pub state: ClientState,

    // Channels for backend communication
    pub action_tx: Sender<BackendAction>,
    pub event_rx: Receiver<GuiEvent>,

    // Typing presence, transmitted through action_tx
    pub typing: TypingDebouncer<Sender<BackendAction>>,

    // Decoded avatar images
    pub avatars: AvatarTextures,

    pub config: ClientConfig,
    pub theme: Theme,
}

impl PartyChatApp {
    pub(super) fn get_theme(&self) -> ui::ChatTheme {
        ui::ChatTheme::for_theme(self.theme)
    }

    pub fn new(cc: &eframe::CreationContext<'_>, config: ClientConfig) -> Self {
        ui::apply_app_style(&cc.egui_ctx, config.theme);
        Self::with_connector(config, Arc::new(LocalHub::new()))
    }

    /// Spawn the backend on `connector` and start connecting.
    pub fn with_connector(config: ClientConfig, connector: Arc<dyn Connector>) -> Self {
        // Create channels for UI <-> Backend
        let (action_tx, action_rx) = unbounded::<BackendAction>();
        let (event_tx, event_rx) = unbounded::<GuiEvent>();

        thread::spawn(move || {
            run_backend(action_rx, event_tx, connector);
        });

        let typing =
            TypingDebouncer::with_quiet_period(action_tx.clone(), config.typing_quiet_period());

        let app = Self {
            state: ClientState::new(config.initial_nickname()),
            action_tx,
            event_rx,
            typing,
            avatars: AvatarTextures::new(),
            theme: config.theme,
            config,
        };
        app.send(BackendAction::Connect);
        app
    }

    pub(super) fn send(&self, action: BackendAction) {
        if let Err(e) = self.action_tx.send(action) {
            warn!(error = %e, "backend is gone");
        }
    }

    pub(super) fn create_room(&mut self) {
        if let Some(action) = self.state.create_room_request() {
            self.send(action);
        }
    }

    pub(super) fn join_room(&mut self) {
        if let Some(action) = self.state.join_room_request() {
            self.send(action);
        }
    }

    pub(super) fn send_message(&mut self) {
        if let Some(action) = self.state.send_message_request() {
            // Presence clears before the message lands
            self.typing.message_sent();
            self.send(action);
        }
    }

    /// Back to the landing screen with a fresh session.
    pub(super) fn leave_room(&mut self) {
        info!(room_id = ?self.state.room_id, "leaving room");
        self.typing.reset();
        self.state.leave_room();
        self.send(BackendAction::Leave);
    }

    /// Recover from a closed connection: rebuild UI state and reconnect.
    pub(super) fn reload(&mut self) {
        info!("reloading after connection loss");
        self.typing.reset();
        self.state = ClientState::new(self.config.initial_nickname());
        self.avatars.clear();
        self.send(BackendAction::Connect);
    }

    pub(super) fn choose_icon(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Choose Image")
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
            .pick_file();
        if let Some(path) = picked {
            self.send(BackendAction::CompressAvatar(path));
        }
    }

    pub(super) fn copy_room_id(&mut self, ctx: &eframe::egui::Context) {
        if let Some(room_id) = &self.state.room_id {
            ctx.copy_text(room_id.clone());
            self.state.push_status("Room ID copied");
        }
    }
}

impl Drop for PartyChatApp {
    fn drop(&mut self) {
        self.typing.cancel();
        let _ = self.action_tx.send(BackendAction::Shutdown);
    }
}
