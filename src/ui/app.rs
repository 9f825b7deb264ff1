// Main UI - Routine editor, live timer and saved routine library

use crate::app::{Controller, Tab};
use crate::audio::device::{OutputDeviceInfo, OutputDeviceManager};
use crate::audio::{AtomicStreamStatus, SharedVolume, StreamStatus, ToneOutput};
use crate::generator::{BodyTarget, GeneratorOptions};
use crate::library::summary;
use crate::messaging::notification::{Notification, NotificationCategory, NotificationLevel};
use crate::playback::format_clock;
use crate::routine::PhaseList;
use crate::sequence::Activity;
use eframe::egui;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Repaint interval while nothing is scheduled (indicators, notifications)
const IDLE_REPAINT: Duration = Duration::from_millis(250);
const NOTIFICATION_MAX_AGE_MS: u64 = 5000;

const CYAN: egui::Color32 = egui::Color32::from_rgb(0, 229, 255);
const MAGENTA: egui::Color32 = egui::Color32::from_rgb(255, 0, 170);
const FLASH: egui::Color32 = egui::Color32::from_rgb(255, 255, 255);

pub struct TimerApp {
    controller: Controller,
    // Audio output handles
    volume: SharedVolume,
    volume_ui: f32,
    audio_status: AtomicStreamStatus,
    last_audio_status: StreamStatus,
    device_manager: OutputDeviceManager,
    available_devices: Vec<OutputDeviceInfo>,
    selected_device: String,
    // Generator dialog
    generator: GeneratorOptions,
    show_generator: bool,
    rng: StdRng,
    // Library dialogs
    pending_delete: Option<(String, String)>,
    renaming: Option<(String, String)>,
}

impl TimerApp {
    /// `volume` and `status` are handles onto the output owned by `controller`
    pub fn new(controller: Controller, volume: SharedVolume, status: AtomicStreamStatus) -> Self {
        let device_manager = OutputDeviceManager::new();
        let available_devices = device_manager.list_output_devices();

        let selected_device = controller
            .settings()
            .output_device
            .clone()
            .unwrap_or_else(|| {
                available_devices
                    .iter()
                    .find(|d| d.is_default)
                    .map(|d| d.name.clone())
                    .unwrap_or_default()
            });

        Self {
            volume_ui: volume.get(),
            volume,
            last_audio_status: status.get(),
            audio_status: status,
            controller,
            device_manager,
            available_devices,
            selected_device,
            generator: GeneratorOptions::default(),
            show_generator: false,
            rng: StdRng::from_entropy(),
            pending_delete: None,
            renaming: None,
        }
    }

    fn accent(&self) -> egui::Color32 {
        if self.controller.is_high_contrast() {
            egui::Color32::BLACK
        } else {
            CYAN
        }
    }

    fn pick_json_file() -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
    }

    fn import_into_editor(&mut self) {
        if let Some(path) = Self::pick_json_file() {
            self.controller.import_file(&path, Instant::now());
        }
    }

    fn export(&mut self) {
        let file_name = self.controller.export_file_name();
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(&file_name)
            .save_file()
        {
            self.controller.export_to(&path, Instant::now());
        }
    }

    fn import_into_library(&mut self) {
        let Some(path) = Self::pick_json_file() else {
            return;
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                self.controller.import_into_library(&contents);
            }
            Err(e) => self.controller.notify(Notification::error(
                NotificationCategory::Transfer,
                format!("Cannot read {}: {}", path.display(), e),
            )),
        }
    }

    /// Notify once when the output goes from usable to failed
    fn check_audio_status(&mut self) {
        let current = self.audio_status.get();
        if current == self.last_audio_status {
            return;
        }

        let message = match current {
            StreamStatus::Unavailable => Some("Audio output unavailable, cues are silent"),
            StreamStatus::Error => Some("Audio stream error"),
            StreamStatus::Open | StreamStatus::Closed => None,
        };
        if let Some(message) = message {
            self.controller
                .notify(Notification::warning(NotificationCategory::Audio, message));
        }
        self.last_audio_status = current;
    }

    fn select_device(&mut self, name: String) {
        let device = if name.is_empty() { None } else { Some(name) };
        let output = ToneOutput::new(device.clone(), self.volume_ui);
        self.volume = output.volume_handle();
        self.audio_status = output.status_handle();
        self.last_audio_status = StreamStatus::Closed;
        self.controller.set_output(device, Box::new(output));
    }

    // ===== Header and navigation =====

    fn draw_header(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new("NEON HIIT").strong());
            ui.colored_label(self.accent(), "TIMER");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let contrast = ui.button("🌓").on_hover_text("High contrast");
                if contrast.clicked() {
                    self.controller.toggle_high_contrast();
                }

                let mute_icon = if self.controller.is_muted() { "🔇" } else { "🔊" };
                if ui.button(mute_icon).on_hover_text("Mute cue tones").clicked() {
                    self.controller.toggle_mute();
                }

                if let Some(text) = self.controller.indicator(now) {
                    ui.colored_label(self.accent(), egui::RichText::new(text).strong());
                }
            });
        });
    }

    fn draw_nav(&mut self, ui: &mut egui::Ui) {
        let tab = self.controller.tab();
        ui.horizontal(|ui| {
            if ui.selectable_label(tab == Tab::Settings, "CFG").clicked() {
                self.controller.set_tab(Tab::Settings);
            }
            if ui.button("IMP").on_hover_text("Import routine").clicked() {
                self.import_into_editor();
            }
            if ui.button("EXP").on_hover_text("Export routine").clicked() {
                self.export();
            }
            let start = egui::RichText::new("START").color(MAGENTA).strong();
            if ui.selectable_label(tab == Tab::Timer, start).clicked() {
                self.controller.open_timer();
            }
            if ui.selectable_label(tab == Tab::Library, "LIB").clicked() {
                self.controller.set_tab(Tab::Library);
            }
        });
    }

    /// Recent notifications and the audio output state
    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        ui.separator();
        ui.horizontal(|ui| {
            let (status_text, status_color) = match self.audio_status.get() {
                StreamStatus::Open => ("●", egui::Color32::GREEN),
                StreamStatus::Closed => ("○", egui::Color32::GRAY),
                StreamStatus::Unavailable => ("●", egui::Color32::YELLOW),
                StreamStatus::Error => ("●", egui::Color32::RED),
            };
            ui.colored_label(status_color, status_text)
                .on_hover_text("Audio output");

            let recent: Vec<_> = self
                .controller
                .notifications()
                .rev()
                .filter(|n| n.is_recent(NOTIFICATION_MAX_AGE_MS))
                .take(3)
                .collect();

            if recent.is_empty() {
                ui.label("Ready");
            }
            for notification in recent {
                let (icon, color) = match notification.level {
                    NotificationLevel::Info => ("ℹ", egui::Color32::from_rgb(100, 150, 255)),
                    NotificationLevel::Warning => ("⚠", egui::Color32::from_rgb(255, 165, 0)),
                    NotificationLevel::Error => ("✖", egui::Color32::RED),
                };
                ui.colored_label(color, icon);
                ui.colored_label(color, &notification.message);
                ui.add_space(10.0);
            }
        });
    }

    // ===== Settings tab =====

    fn draw_settings(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            if ui
                .button(egui::RichText::new("GENERATE PROTOCOL").color(MAGENTA))
                .clicked()
            {
                self.show_generator = true;
            }
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Routine name:");
                let mut name = self.controller.routine().name.clone();
                if ui.text_edit_singleline(&mut name).changed() {
                    self.controller.edit_routine(|r| r.name = name);
                }
            });
            ui.separator();

            self.draw_exercise_list(ui, PhaseList::Warmup, "WARMUP");
            ui.separator();
            self.draw_hiit_block(ui);
            ui.separator();
            self.draw_exercise_list(ui, PhaseList::Stretch, "STRETCH");
            ui.separator();
            self.draw_preferences(ui);
        });
    }

    fn draw_exercise_list(&mut self, ui: &mut egui::Ui, list: PhaseList, title: &str) {
        let exercises = self.controller.routine().exercises(list).to_vec();
        let total = exercises
            .iter()
            .fold(0u32, |total, e| total.saturating_add(e.duration));

        ui.horizontal(|ui| {
            ui.heading(title);
            ui.label(format_clock(total));
        });

        let mut renamed = None;
        let mut retimed = None;
        let mut removed = None;

        for exercise in &exercises {
            ui.horizontal(|ui| {
                let mut name = exercise.name.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut name)
                        .hint_text("Exercise")
                        .desired_width(220.0),
                );
                if response.changed() {
                    renamed = Some((exercise.id.clone(), name));
                }

                let mut duration = exercise.duration;
                let drag = egui::DragValue::new(&mut duration)
                    .range(1..=3600)
                    .suffix(" s");
                if ui.add(drag).changed() {
                    retimed = Some((exercise.id.clone(), duration));
                }

                if ui.button("✕").clicked() {
                    removed = Some(exercise.id.clone());
                }
            });
        }

        if let Some((id, name)) = renamed {
            self.controller
                .edit_routine(|r| r.rename_exercise(list, &id, &name));
        }
        if let Some((id, duration)) = retimed {
            self.controller
                .edit_routine(|r| r.set_exercise_duration(list, &id, duration));
        }
        if let Some(id) = removed {
            self.controller.edit_routine(|r| r.remove_exercise(list, &id));
        }

        if ui.button("+ Add exercise").clicked() {
            self.controller.add_exercise(list);
        }
    }

    fn draw_hiit_block(&mut self, ui: &mut egui::Ui) {
        let mut hiit = self.controller.routine().hiit.clone();

        ui.horizontal(|ui| {
            ui.heading("HIIT");
            ui.label(format_clock(hiit.total_duration()));
        });

        egui::Grid::new("hiit_config").num_columns(2).show(ui, |ui| {
            ui.label("Rounds");
            ui.add(egui::DragValue::new(&mut hiit.rounds).range(1..=50));
            ui.end_row();

            ui.label("Work");
            ui.add(
                egui::DragValue::new(&mut hiit.work_duration)
                    .range(1..=600)
                    .suffix(" s"),
            );
            ui.end_row();

            ui.label("Rest between exercises");
            ui.add(
                egui::DragValue::new(&mut hiit.rest_between_exercises)
                    .range(0..=600)
                    .suffix(" s"),
            );
            ui.end_row();

            ui.label("Rest between rounds");
            ui.add(
                egui::DragValue::new(&mut hiit.rest_between_rounds)
                    .range(0..=600)
                    .suffix(" s"),
            );
            ui.end_row();
        });

        let mut removed = None;
        for (index, name) in hiit.exercises_per_round.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                ui.label(format!("{:>2}.", index + 1));
                ui.add(egui::TextEdit::singleline(name).desired_width(220.0));
                if ui.button("✕").clicked() {
                    removed = Some(index);
                }
            });
        }
        if let Some(index) = removed {
            hiit.exercises_per_round.remove(index);
        }
        if ui.button("+ Add HIIT exercise").clicked() {
            hiit.exercises_per_round.push(String::new());
        }

        if hiit != self.controller.routine().hiit {
            self.controller.edit_routine(|r| r.hiit = hiit);
        }
    }

    fn draw_preferences(&mut self, ui: &mut egui::Ui) {
        ui.heading("Preferences");

        ui.horizontal(|ui| {
            ui.label("New exercise duration:");
            let mut secs = self.controller.settings().default_exercise_duration;
            let response = ui.add(egui::DragValue::new(&mut secs).range(1..=600).suffix(" s"));
            if response.changed() {
                self.controller.set_default_exercise_duration(secs);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Audio Output:");
            let previous = self.selected_device.clone();
            egui::ComboBox::from_id_salt("audio_device_selector")
                .selected_text(&self.selected_device)
                .show_ui(ui, |ui| {
                    if self.available_devices.is_empty() {
                        ui.label("No audio device available");
                    }
                    for device in &self.available_devices {
                        let label = if device.is_default {
                            format!("{} (default)", device.name)
                        } else {
                            device.name.clone()
                        };
                        ui.selectable_value(&mut self.selected_device, device.name.clone(), label);
                    }
                });
            if previous != self.selected_device {
                self.select_device(self.selected_device.clone());
            }

            if ui.button("🔄").on_hover_text("Refresh devices").clicked() {
                self.available_devices = self.device_manager.list_output_devices();
            }
        });

        ui.horizontal(|ui| {
            ui.label("Volume:");
            let response = ui.add(egui::Slider::new(&mut self.volume_ui, 0.0..=1.0));
            if response.changed() {
                self.volume.set(self.volume_ui);
            }
            if response.drag_stopped() || (response.changed() && !response.dragged()) {
                self.controller.set_volume(self.volume_ui);
            }
        });
    }

    fn draw_generator(&mut self, ctx: &egui::Context) {
        let mut open = self.show_generator;
        let mut forge = false;

        egui::Window::new("GENERATE PROTOCOL")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                let options = &mut self.generator;
                ui.horizontal(|ui| {
                    for target in BodyTarget::ALL {
                        ui.selectable_value(&mut options.target, target, target.label());
                    }
                });

                egui::Grid::new("generator_options").num_columns(2).show(ui, |ui| {
                    ui.label("Warm-up");
                    ui.add(egui::DragValue::new(&mut options.warmup_minutes).range(1..=30).suffix(" min"));
                    ui.end_row();
                    ui.label("HIIT");
                    ui.add(egui::DragValue::new(&mut options.hiit_minutes).range(1..=90).suffix(" min"));
                    ui.end_row();
                    ui.label("Stretch");
                    ui.add(egui::DragValue::new(&mut options.stretch_minutes).range(1..=30).suffix(" min"));
                    ui.end_row();
                    ui.label("Rounds");
                    ui.add(egui::DragValue::new(&mut options.rounds).range(1..=20));
                    ui.end_row();
                    ui.label("Work");
                    ui.add(egui::DragValue::new(&mut options.work_secs).range(5..=300).suffix(" s"));
                    ui.end_row();
                    ui.label("Rest between exercises");
                    ui.add(egui::DragValue::new(&mut options.rest_exercise_secs).range(0..=300).suffix(" s"));
                    ui.end_row();
                    ui.label("Rest between rounds");
                    ui.add(egui::DragValue::new(&mut options.rest_round_secs).range(0..=600).suffix(" s"));
                    ui.end_row();
                });

                ui.label(format!(
                    "{} exercises per round",
                    options.exercises_per_round()
                ));
                forge = ui.button("FORGE PROTOCOL").clicked();
            });

        if forge {
            self.controller
                .generate_routine(&self.generator, &mut self.rng);
            open = false;
        }
        self.show_generator = open;
    }

    // ===== Timer tab =====

    fn draw_timer(&mut self, ui: &mut egui::Ui, now: Instant) {
        let accent = self.accent();
        let frame = self.controller.frame();

        let activity_color = match frame.timer.sub_phase {
            Activity::Ready => egui::Color32::YELLOW,
            Activity::Work => MAGENTA,
            Activity::Rest => egui::Color32::GREEN,
        };

        let phase_label = frame.phase_label();
        let step_name = frame.step.name.replace('_', " ");
        let clock = format_clock(frame.timer.time_left);
        let step_progress = frame.step_progress();
        let total_progress = frame.total_progress();
        let remaining = format_clock(frame.remaining_total());
        let next = frame.next_label();
        let activity = frame.timer.sub_phase.label();
        let running = frame.timer.is_active;
        let position = self.controller.machine().position();
        let len = self.controller.machine().len();

        ui.vertical_centered(|ui| {
            ui.colored_label(accent, egui::RichText::new(phase_label).strong());
            ui.colored_label(activity_color, activity);
            ui.add_space(8.0);
            ui.label(egui::RichText::new(step_name).size(32.0).strong());
            ui.label(egui::RichText::new(clock).size(96.0).monospace());
            ui.add(egui::ProgressBar::new(step_progress).desired_width(400.0));
            ui.add_space(12.0);

            ui.label(format!("NEXT: {}", next));
            ui.label(format!("STEP {} / {}", position + 1, len));
            ui.add(
                egui::ProgressBar::new(total_progress / 100.0)
                    .desired_width(400.0)
                    .text(format!("{:.0}% · {} left", total_progress, remaining)),
            );
            ui.add_space(16.0);

            ui.horizontal(|ui| {
                if ui.button("⏮").on_hover_text("Previous step").clicked() {
                    self.controller.prev();
                }
                let toggle = if running { "⏸ PAUSE" } else { "▶ START" };
                if ui.button(egui::RichText::new(toggle).size(20.0)).clicked() {
                    self.controller.toggle(now);
                }
                if ui.button("⟲").on_hover_text("Reset").clicked() {
                    self.controller.reset();
                }
                if ui.button("⏭").on_hover_text("Next step").clicked() {
                    self.controller.next();
                }
            });
        });

        // Space bar toggles, arrows navigate
        let (space, left, right) = ui.ctx().input(|i| {
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
            )
        });
        if space {
            self.controller.toggle(now);
        }
        if left {
            self.controller.prev();
        }
        if right {
            self.controller.next();
        }
    }

    // ===== Library tab =====

    fn draw_library(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("IMPORT FILE").clicked() {
                self.import_into_library();
            }
            if ui.button("SAVE CURRENT").clicked() {
                self.controller.save_to_library();
            }
        });
        ui.separator();

        let routines = self.controller.library().list().to_vec();
        if routines.is_empty() {
            ui.label("LIBRARY EMPTY // NO SAVED PROTOCOLS");
            return;
        }

        let mut load = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for routine in &routines {
                ui.group(|ui| {
                    let editing = self
                        .renaming
                        .as_ref()
                        .is_some_and(|(id, _)| *id == routine.id);

                    if editing {
                        let mut commit = false;
                        if let Some((_, buffer)) = self.renaming.as_mut() {
                            ui.horizontal(|ui| {
                                let response = ui.text_edit_singleline(buffer);
                                commit = ui.button("OK").clicked()
                                    || (response.lost_focus()
                                        && ui.input(|i| i.key_pressed(egui::Key::Enter)));
                            });
                        }
                        if commit && let Some((id, name)) = self.renaming.take() {
                            self.controller.rename_in_library(&id, &name);
                        }
                    } else {
                        ui.heading(&routine.name);
                    }

                    ui.label(summary(routine));
                    ui.horizontal(|ui| {
                        if ui.button("LOAD").clicked() {
                            load = Some(routine.id.clone());
                        }
                        if ui.button("RENAME").clicked() {
                            self.renaming = Some((routine.id.clone(), routine.name.clone()));
                        }
                        if ui.button("✕").on_hover_text("Delete").clicked() {
                            self.pending_delete = Some((routine.id.clone(), routine.name.clone()));
                        }
                    });
                });
            }
        });

        if let Some(id) = load
            && self.controller.load_from_library(&id)
        {
            self.controller.set_tab(Tab::Settings);
        }
    }

    fn draw_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some((id, name)) = self.pending_delete.clone() else {
            return;
        };

        let mut decision = None;
        egui::Window::new("CONFIRM DELETE")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Delete '{}' from the library?", name));
                ui.horizontal(|ui| {
                    if ui.button("DELETE").clicked() {
                        decision = Some(true);
                    }
                    if ui.button("CANCEL").clicked() {
                        decision = Some(false);
                    }
                });
            });

        match decision {
            Some(true) => {
                self.controller.delete_from_library(&id);
                self.pending_delete = None;
            }
            Some(false) => self.pending_delete = None,
            None => {}
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        let wake = [self.controller.next_deadline(), self.controller.flash_until()]
            .into_iter()
            .flatten()
            .filter(|t| *t > now)
            .min();

        let delay = wake.map_or(IDLE_REPAINT, |t| (t - now).min(IDLE_REPAINT));
        ctx.request_repaint_after(delay);
    }
}

impl eframe::App for TimerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.update(now);
        self.check_audio_status();
        self.controller.prune_notifications(NOTIFICATION_MAX_AGE_MS);

        ctx.set_visuals(if self.controller.is_high_contrast() {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        });

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.draw_header(ui, now);
        });

        egui::TopBottomPanel::bottom("navigation").show(ctx, |ui| {
            self.draw_nav(ui);
            self.draw_status_bar(ui);
        });

        let mut panel = egui::Frame::central_panel(&ctx.style());
        if self.controller.is_flashing(now) {
            panel = panel.fill(FLASH);
        }

        egui::CentralPanel::default().frame(panel).show(ctx, |ui| {
            match self.controller.tab() {
                Tab::Settings => self.draw_settings(ui),
                Tab::Timer => self.draw_timer(ui, now),
                Tab::Library => self.draw_library(ui),
            }
        });

        if self.show_generator {
            self.draw_generator(ctx);
        }
        self.draw_delete_confirmation(ctx);

        self.schedule_repaint(ctx, now);
    }
}
