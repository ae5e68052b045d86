use eframe::egui;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use crate::audio::{OutputDeviceInfo, OutputDeviceManager, RodioMixer};
use crate::core::{AppConfig, PlaybackState, ProgressSnapshot, SUPPORTED_EXTENSIONS};
use crate::gui::progress::ProgressWidget;
use crate::player::PlayerController;
use crate::remote::{RemoteCommand, RemoteServer};
use crate::status;

/// How often the countdown label is refreshed.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Upper bound on idle time between frames, so remote commands are picked up.
const IDLE_REPAINT: Duration = Duration::from_millis(250);

pub const LOAD_BUTTON_LABEL: &str = "Load Music File (*.mp3 *.wav *.ogg *.flac)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct MessageDialog {
    pub kind: DialogKind,
    pub title: String,
    pub body: String,
}

impl MessageDialog {
    pub fn info(title: &str, body: impl Into<String>) -> Self {
        Self { kind: DialogKind::Info, title: title.to_string(), body: body.into() }
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self { kind: DialogKind::Error, title: "Error".to_string(), body: body.into() }
    }
}

pub struct MusicPlayerApp {
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub player: PlayerController,
    pub remote_server: Option<RemoteServer>,
    pub remote_receiver: Option<broadcast::Receiver<RemoteCommand>>,
    pub output_devices: Vec<OutputDeviceInfo>,
    pub volume_percent: f32,
    pub progress: ProgressSnapshot,
    pub countdown_label: String,
    pub last_poll: Instant,
    pub dialog: Option<MessageDialog>,
    pub show_settings: bool,
    pub status_message: String,
    pub progress_widget: ProgressWidget,
}

impl MusicPlayerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let config_path = AppConfig::config_path();
        let config = AppConfig::load_from(&config_path)?;

        let devices = OutputDeviceManager::new()?;
        let mixer = RodioMixer::new(&devices, config.output_device_name.as_deref(), config.clamped_volume())
            .map_err(|e| {
                log::error!("Failed to open audio output: {}", e);
                anyhow::anyhow!("Failed to open audio output: {}", e)
            })?;

        let indicator = status::indicator_from_config(&config.status_leds);
        let player = PlayerController::new(Box::new(mixer), indicator);

        let mut app = Self::with_player(config, config_path, player, devices.devices().to_vec());

        if app.config.remote.enabled {
            match RemoteServer::start(&app.config.remote.bind_address) {
                Ok((server, receiver)) => {
                    app.remote_server = Some(server);
                    app.remote_receiver = Some(receiver);
                }
                Err(e) => {
                    log::error!("Remote control disabled: {}", e);
                    app.status_message = format!("Remote control unavailable: {}", e);
                }
            }
        }

        Ok(app)
    }

    pub fn with_player(
        config: AppConfig,
        config_path: PathBuf,
        player: PlayerController,
        output_devices: Vec<OutputDeviceInfo>,
    ) -> Self {
        let volume_percent = config.clamped_volume() * 100.0;
        let progress = ProgressSnapshot { elapsed: Duration::ZERO, duration: None };
        Self {
            config,
            config_path,
            player,
            remote_server: None,
            remote_receiver: None,
            output_devices,
            volume_percent,
            countdown_label: progress.countdown_label(),
            progress,
            last_poll: Instant::now(),
            dialog: None,
            show_settings: false,
            status_message: String::new(),
            progress_widget: ProgressWidget::new(),
        }
    }

    fn open_file_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Load Music File")
            .add_filter("Music files (*.mp3 *.wav *.ogg *.flac)", &SUPPORTED_EXTENSIONS[..]);
        if let Some(dir) = dialog_start_directory(&self.config) {
            dialog = dialog.set_directory(dir);
        }

        if let Some(path) = dialog.pick_file() {
            self.load_file(&path);
        }
    }

    pub fn load_file(&mut self, path: &Path) {
        match self.player.load(path) {
            Ok(track) => {
                self.status_message = format!("Loaded {}", track.file_name());
                self.dialog = Some(MessageDialog::info("File Loaded", "Music file loaded successfully!"));
                self.config.remember_directory(path);
                self.save_config();
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                self.dialog = Some(MessageDialog::error(format!("Could not load music file: {}", e)));
            }
        }
        self.refresh_progress(Instant::now());
    }

    pub fn play(&mut self) {
        if let Err(e) = self.player.play(Instant::now()) {
            log::error!("Failed to play: {}", e);
            self.dialog = Some(MessageDialog::error(format!("Could not play music file: {}", e)));
        }
        self.refresh_progress(Instant::now());
    }

    pub fn toggle_pause(&mut self) {
        self.player.toggle_pause(Instant::now());
        self.refresh_progress(Instant::now());
    }

    pub fn stop(&mut self) {
        self.player.stop();
        self.refresh_progress(Instant::now());
    }

    pub fn set_volume_percent(&mut self, percent: f32) {
        self.volume_percent = percent.clamp(0.0, 100.0);
        self.config.volume = self.volume_percent / 100.0;
        self.player.set_volume(self.config.volume);
    }

    pub fn apply_remote_command(&mut self, command: RemoteCommand) {
        log::debug!("Applying remote command {:?}", command);
        match command {
            RemoteCommand::Play => self.play(),
            RemoteCommand::Pause => self.toggle_pause(),
            RemoteCommand::Stop => self.stop(),
        }
    }

    pub fn process_remote_commands(&mut self) {
        let mut commands = Vec::new();
        let mut closed = false;
        if let Some(receiver) = &mut self.remote_receiver {
            loop {
                match receiver.try_recv() {
                    Ok(command) => commands.push(command),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Lagged(skipped)) => {
                        log::warn!("Dropped {} remote commands", skipped);
                    }
                    Err(TryRecvError::Closed) => {
                        log::warn!("Remote command channel closed");
                        closed = true;
                        break;
                    }
                }
            }
        }
        if closed {
            self.remote_receiver = None;
        }

        for command in commands {
            self.apply_remote_command(command);
        }
    }

    /// Refreshes the countdown once `POLL_INTERVAL` has passed.
    pub fn poll_playback(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_poll) < POLL_INTERVAL {
            return false;
        }
        self.refresh_progress(now);
        true
    }

    fn refresh_progress(&mut self, now: Instant) {
        self.progress = self.player.poll(now);
        self.countdown_label = self.progress.countdown_label();
        self.last_poll = now;
    }

    fn save_config(&mut self) -> bool {
        match self.config.save_to(&self.config_path) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save config: {}", e);
                self.status_message = format!("Failed to save settings: {}", e);
                false
            }
        }
    }

    fn show_transport(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            if ui.button(LOAD_BUTTON_LABEL).clicked() {
                self.open_file_dialog();
            }
            ui.add_space(10.0);

            if ui.add_sized([120.0, 28.0], egui::Button::new("Play")).clicked() {
                self.play();
            }
            ui.add_space(5.0);

            let state = self.player.state();
            let can_pause = matches!(state, PlaybackState::Playing | PlaybackState::Paused);
            if ui.add_enabled(can_pause, egui::Button::new(state.pause_button_label()).min_size(egui::vec2(120.0, 28.0))).clicked() {
                self.toggle_pause();
            }
            ui.add_space(5.0);

            if ui.add_sized([120.0, 28.0], egui::Button::new("Stop")).clicked() {
                self.stop();
            }
        });
    }

    fn show_metadata(&self, ui: &mut egui::Ui) {
        ui.heading("Now Loaded");
        let Some(track) = self.player.track() else {
            ui.label("No music file loaded");
            return;
        };

        egui::Grid::new("track_metadata")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label("Title:");
                ui.label(track.display_title());
                ui.end_row();

                ui.label("Artist:");
                ui.label(track.display_artist());
                ui.end_row();

                ui.label("Album:");
                ui.label(track.display_album());
                ui.end_row();

                ui.label("Year:");
                ui.label(track.display_year());
                ui.end_row();

                ui.label("Genre:");
                ui.label(track.display_genre());
                ui.end_row();
            });
    }

    fn show_progress(&mut self, ui: &mut egui::Ui) {
        self.progress_widget.show(ui, &self.progress);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(&self.countdown_label).monospace().size(16.0));
        });

        ui.horizontal(|ui| {
            ui.label("Volume:");
            let mut percent = self.volume_percent;
            let response = ui.add(egui::Slider::new(&mut percent, 0.0..=100.0).suffix("%"));
            if response.changed() {
                self.set_volume_percent(percent);
            }
            if response.drag_stopped() || (response.changed() && !response.dragged()) {
                self.save_config();
            }
        });
    }

    fn show_settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        let mut save_requested = false;

        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Changes take effect on next launch.");
                ui.separator();

                let selected = self.config.output_device_name.clone()
                    .unwrap_or_else(|| "System default".to_string());
                egui::ComboBox::from_label("Output device")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.config.output_device_name, None, "System default");
                        for device in &self.output_devices {
                            let label = if device.is_default {
                                format!("{} (default)", device.name)
                            } else {
                                device.name.clone()
                            };
                            ui.selectable_value(&mut self.config.output_device_name, Some(device.name.clone()), label);
                        }
                    });

                ui.separator();
                ui.checkbox(&mut self.config.remote.enabled, "Enable HTTP remote control");
                ui.horizontal(|ui| {
                    ui.label("Listen address:");
                    ui.text_edit_singleline(&mut self.config.remote.bind_address);
                });

                ui.separator();
                ui.checkbox(&mut self.config.status_leds.enabled, "Drive status LEDs");
                ui.horizontal(|ui| {
                    ui.label("Blink interval (ms):");
                    ui.add(egui::DragValue::new(&mut self.config.status_leds.blink_interval_ms).clamp_range(50..=5000));
                });

                ui.separator();
                if ui.button("Save").clicked() {
                    save_requested = true;
                }
            });

        if save_requested && self.save_config() {
            self.status_message = "Settings saved, restart to apply".to_string();
            open = false;
        }
        self.show_settings = open;
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &self.dialog else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(&dialog.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let text = egui::RichText::new(&dialog.body);
                match dialog.kind {
                    DialogKind::Info => ui.label(text),
                    DialogKind::Error => ui.label(text.color(egui::Color32::LIGHT_RED)),
                };
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.dialog = None;
        }
    }
}

impl eframe::App for MusicPlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_remote_commands();
        self.poll_playback(Instant::now());

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Load Music File...").clicked() {
                        ui.close_menu();
                        self.open_file_dialog();
                    }
                    ui.separator();
                    if ui.button("Settings").clicked() {
                        self.show_settings = true;
                        ui.close_menu();
                    }
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.player.state().label());
                if !self.status_message.is_empty() {
                    ui.separator();
                    ui.label(&self.status_message);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(server) = &self.remote_server {
                        ui.label(format!("Remote: http://{}", server.local_addr()));
                    }
                });
            });
        });

        let dialog_open = self.dialog.is_some();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!dialog_open, |ui| {
                self.show_transport(ui);
                ui.separator();
                self.show_metadata(ui);
                ui.separator();
                self.show_progress(ui);
            });
        });

        if self.show_settings {
            self.show_settings_window(ctx);
        }
        self.show_dialog(ctx);

        ctx.request_repaint_after(IDLE_REPAINT);
    }
}

/// Directory the file dialog should open in, if it still exists.
pub fn dialog_start_directory(config: &AppConfig) -> Option<PathBuf> {
    config.last_directory.clone().filter(|dir| dir.is_dir())
}
