// Controller - Owns the session state and runs every user-facing transition
//
// The UI and the terminal runner only read from the controller and call its
// methods; all timing goes through the TickScheduler and an explicit `now`.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::Rng;

use crate::audio::{Tone, ToneSink};
use crate::config::Settings;
use crate::generator::{GeneratorOptions, generate};
use crate::library::{RoutineLibrary, transfer};
use crate::messaging::notification::{Notification, NotificationCategory};
use crate::playback::{Cue, DisplayFrame, PlaybackMachine, TickScheduler, TimerState};
use crate::routine::{PhaseList, Routine};
use crate::sequence::{SequenceCache, Step};

/// How long the screen flashes on a step transition
pub const FLASH_DURATION: Duration = Duration::from_millis(300);
const EXPORT_INDICATOR_DURATION: Duration = Duration::from_secs(2);
const IMPORT_INDICATOR_DURATION: Duration = Duration::from_secs(3);
const MAX_NOTIFICATIONS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Settings,
    Timer,
    Library,
}

/// Short status text shown in the header for a few seconds
#[derive(Debug, Clone, PartialEq, Eq)]
struct Indicator {
    text: &'static str,
    until: Instant,
}

pub struct Controller {
    routine: Routine,
    cache: SequenceCache,
    machine: PlaybackMachine,
    scheduler: TickScheduler,
    sink: Box<dyn ToneSink>,
    library: RoutineLibrary,
    settings: Settings,
    settings_path: Option<PathBuf>,
    /// Effective mute state; starts from `settings.muted` but a session
    /// override is never written back
    muted: bool,
    tab: Tab,
    flash_until: Option<Instant>,
    indicator: Option<Indicator>,
    notifications: VecDeque<Notification>,
}

impl Controller {
    pub fn new(
        routine: Routine,
        library: RoutineLibrary,
        settings: Settings,
        sink: Box<dyn ToneSink>,
    ) -> Self {
        let mut cache = SequenceCache::new();
        let machine = match PlaybackMachine::new(cache.get_or_compile(&routine).to_vec()) {
            Ok(machine) => machine,
            Err(e) => {
                log::error!("Compiled sequence rejected: {}", e);
                PlaybackMachine::from_routine(&routine)
            }
        };

        Self {
            machine,
            muted: settings.muted,
            routine,
            cache,
            scheduler: TickScheduler::new(),
            sink,
            library,
            settings,
            settings_path: None,
            tab: Tab::default(),
            flash_until: None,
            indicator: None,
            notifications: VecDeque::new(),
        }
    }

    /// Mute cue tones for this session only
    pub fn with_session_mute(mut self) -> Self {
        self.muted = true;
        self
    }

    /// Persist preference changes (mute, contrast) to `path`
    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    // ===== Routine =====

    pub fn routine(&self) -> &Routine {
        &self.routine
    }

    /// Replace the routine being edited
    ///
    /// A routine with different content rebuilds the sequence and resets
    /// playback to the start, paused.
    pub fn set_routine(&mut self, routine: Routine) {
        self.routine = routine;
        self.sync_sequence();
    }

    /// Apply an in-place edit, then resynchronise the sequence
    pub fn edit_routine<R>(&mut self, edit: impl FnOnce(&mut Routine) -> R) -> R {
        let result = edit(&mut self.routine);
        self.sync_sequence();
        result
    }

    /// Append an exercise with the configured default duration
    pub fn add_exercise(&mut self, list: PhaseList) -> String {
        let duration = self.settings.default_exercise_duration;
        self.edit_routine(|r| r.add_exercise(list, duration))
    }

    pub fn generate_routine<R: Rng + ?Sized>(&mut self, options: &GeneratorOptions, rng: &mut R) {
        let routine = generate(options, rng);
        self.set_routine(routine);
    }

    fn sync_sequence(&mut self) {
        let steps = match self.cache.compile_if_changed(&self.routine) {
            Some(steps) => steps.to_vec(),
            None => return,
        };

        match PlaybackMachine::new(steps) {
            Ok(machine) => {
                self.machine = machine;
                self.scheduler.cancel();
                self.flash_until = None;
                log::debug!("Sequence rebuilt ({} steps)", self.machine.len());
            }
            Err(e) => log::error!("Keeping previous sequence: {}", e),
        }
    }

    // ===== Playback =====

    pub fn steps(&self) -> &[Step] {
        self.machine.steps()
    }

    pub fn machine(&self) -> &PlaybackMachine {
        &self.machine
    }

    pub fn timer(&self) -> &TimerState {
        self.machine.state()
    }

    pub fn frame(&self) -> DisplayFrame<'_> {
        DisplayFrame::new(
            self.machine.current_step(),
            self.machine.state(),
            self.machine.total_duration(),
        )
    }

    pub fn is_running(&self) -> bool {
        self.machine.is_active()
    }

    /// Start or pause the countdown
    ///
    /// Starting is a user gesture, so the audio output is acquired here
    /// (unless muted) before the first tone is needed.
    pub fn toggle(&mut self, now: Instant) {
        if !self.machine.is_active() && !self.muted {
            self.sink.ensure_ready();
        }

        if self.machine.toggle() {
            self.scheduler.arm(now);
        } else {
            self.scheduler.cancel();
        }
    }

    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.machine.reset();
        self.flash_until = None;
    }

    pub fn next(&mut self) {
        self.machine.next();
    }

    pub fn prev(&mut self) {
        self.machine.prev();
    }

    pub fn seek_to(&mut self, index: usize) {
        self.machine.seek_to(index);
    }

    /// Run every tick that is due at `now` and play the resulting cues
    pub fn update(&mut self, now: Instant) -> Vec<Cue> {
        let mut cues = Vec::new();

        for _ in 0..self.scheduler.poll(now) {
            if let Some(cue) = self.machine.tick() {
                self.dispatch(cue, now);
                cues.push(cue);
            }
            if !self.machine.is_active() {
                self.scheduler.cancel();
                break;
            }
        }

        cues
    }

    fn dispatch(&mut self, cue: Cue, now: Instant) {
        match cue {
            Cue::Warning => {}
            Cue::Transition => self.flash_until = Some(now + FLASH_DURATION),
            Cue::Completed => self.notify(Notification::info(
                NotificationCategory::Playback,
                "PROTOCOL COMPLETE",
            )),
        }
        self.play(Tone::from(cue));
    }

    fn play(&mut self, tone: Tone) {
        if self.muted {
            return;
        }
        self.sink.play_tone(tone);
    }

    /// When the scheduler next needs attention
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn is_flashing(&self, now: Instant) -> bool {
        self.flash_until.is_some_and(|until| now < until)
    }

    pub fn flash_until(&self) -> Option<Instant> {
        self.flash_until
    }

    // ===== Navigation and preferences =====

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Show the timer; a timer sitting paused on the first step starts over
    pub fn open_timer(&mut self) {
        self.tab = Tab::Timer;
        if self.machine.position() == 0 && !self.machine.is_active() {
            self.reset();
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.settings.muted = self.muted;
        log::info!("Cue tones {}", if self.muted { "muted" } else { "on" });
        self.save_settings();
    }

    pub fn is_high_contrast(&self) -> bool {
        self.settings.high_contrast
    }

    pub fn toggle_high_contrast(&mut self) {
        self.settings.high_contrast = !self.settings.high_contrast;
        self.save_settings();
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.settings.volume = volume.clamp(0.0, 1.0);
        self.save_settings();
    }

    pub fn set_default_exercise_duration(&mut self, secs: u32) {
        self.settings.default_exercise_duration = secs.max(1);
        self.save_settings();
    }

    /// Switch to another output; the new sink is acquired on next use
    pub fn set_output(&mut self, device: Option<String>, sink: Box<dyn ToneSink>) {
        log::info!(
            "Output device: {}",
            device.as_deref().unwrap_or("system default")
        );
        self.settings.output_device = device;
        self.sink = sink;
        self.save_settings();
    }

    fn save_settings(&mut self) {
        let Some(path) = self.settings_path.clone() else {
            return;
        };
        if let Err(e) = self.settings.save(&path) {
            log::warn!("Failed to save settings: {}", e);
            self.notify(Notification::warning(
                NotificationCategory::Generic,
                format!("Settings not saved: {}", e),
            ));
        }
    }

    // ===== Import / export =====

    /// Load an exchanged routine into the editor
    ///
    /// Rejected documents leave the current routine untouched.
    pub fn import_json(&mut self, json: &str, now: Instant) -> bool {
        match transfer::parse_routine(json) {
            Ok(routine) => {
                self.accept_import(routine, now);
                true
            }
            Err(e) => {
                log::warn!("Import rejected: {}", e);
                self.notify(Notification::error(
                    NotificationCategory::Transfer,
                    e.to_string(),
                ));
                false
            }
        }
    }

    pub fn import_file(&mut self, path: &Path, now: Instant) -> bool {
        match transfer::read_routine(path) {
            Ok(routine) => {
                self.accept_import(routine, now);
                true
            }
            Err(e) => {
                log::warn!("Import of {} rejected: {}", path.display(), e);
                self.notify(Notification::error(
                    NotificationCategory::Transfer,
                    e.to_string(),
                ));
                false
            }
        }
    }

    fn accept_import(&mut self, routine: Routine, now: Instant) {
        log::info!("Imported '{}'", routine.name);
        self.set_routine(routine);
        self.play(Tone::IMPORT_CONFIRM);
        self.show_indicator("SYNCED", now + IMPORT_INDICATOR_DURATION);
        self.tab = Tab::Settings;
    }

    /// Suggested file name for exporting the current routine
    pub fn export_file_name(&self) -> String {
        transfer::export_file_name(&self.routine)
    }

    pub fn export_to(&mut self, path: &Path, now: Instant) -> bool {
        match transfer::write_routine(&self.routine, path) {
            Ok(()) => {
                log::info!("Exported routine to {}", path.display());
                self.show_indicator("EXPORTED", now + EXPORT_INDICATOR_DURATION);
                true
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.notify(Notification::error(
                    NotificationCategory::Transfer,
                    e.to_string(),
                ));
                false
            }
        }
    }

    fn show_indicator(&mut self, text: &'static str, until: Instant) {
        self.indicator = Some(Indicator { text, until });
    }

    pub fn indicator(&self, now: Instant) -> Option<&'static str> {
        self.indicator
            .as_ref()
            .filter(|i| now < i.until)
            .map(|i| i.text)
    }

    // ===== Library =====

    pub fn library(&self) -> &RoutineLibrary {
        &self.library
    }

    /// Save the current routine; a routine new to the library is stored
    /// under a fresh id and the editor follows that id
    pub fn save_to_library(&mut self) {
        match self.library.upsert(&self.routine) {
            Ok(stored) => {
                self.routine.id = stored.id;
                self.notify(Notification::info(
                    NotificationCategory::Library,
                    format!("Saved '{}'", stored.name),
                ));
            }
            Err(e) => self.library_error("Save failed", e),
        }
    }

    pub fn load_from_library(&mut self, id: &str) -> bool {
        match self.library.get(id).cloned() {
            Some(routine) => {
                self.set_routine(routine);
                true
            }
            None => false,
        }
    }

    pub fn delete_from_library(&mut self, id: &str) -> bool {
        match self.library.delete(id) {
            Ok(deleted) => deleted,
            Err(e) => {
                self.library_error("Delete failed", e);
                false
            }
        }
    }

    pub fn rename_in_library(&mut self, id: &str, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        match self.library.rename(id, name) {
            Ok(()) => true,
            Err(e) => {
                self.library_error("Rename failed", e);
                false
            }
        }
    }

    /// Add an exchanged routine to the library and load it
    pub fn import_into_library(&mut self, json: &str) -> bool {
        match self.library.import_json(json) {
            Ok(routine) => {
                self.notify(Notification::info(
                    NotificationCategory::Library,
                    format!("Imported '{}'", routine.name),
                ));
                self.set_routine(routine);
                true
            }
            Err(e) => {
                self.library_error("Import failed", e);
                false
            }
        }
    }

    fn library_error(&mut self, context: &str, error: impl std::fmt::Display) {
        log::error!("{}: {}", context, error);
        self.notify(Notification::error(
            NotificationCategory::Library,
            format!("{}: {}", context, error),
        ));
    }

    // ===== Notifications =====

    pub fn notify(&mut self, notification: Notification) {
        if self.notifications.len() == MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
    }

    pub fn notifications(&self) -> impl DoubleEndedIterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Drop notifications older than `max_age_ms`
    pub fn prune_notifications(&mut self, max_age_ms: u64) {
        self.notifications.retain(|n| n.is_recent(max_age_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::notification::NotificationLevel;
    use crate::sequence::{READY_DURATION_SECS, compile};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct RecordingSink {
        tones: Rc<RefCell<Vec<Tone>>>,
        ready_calls: Rc<RefCell<u32>>,
    }

    impl ToneSink for RecordingSink {
        fn ensure_ready(&mut self) {
            *self.ready_calls.borrow_mut() += 1;
        }

        fn play_tone(&mut self, tone: Tone) {
            self.tones.borrow_mut().push(tone);
        }
    }

    fn controller() -> (Controller, RecordingSink) {
        let sink = RecordingSink::default();
        let controller = Controller::new(
            Routine::default(),
            RoutineLibrary::in_memory(),
            Settings::default(),
            Box::new(sink.clone()),
        );
        (controller, sink)
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_toggle_arms_scheduler_and_acquires_audio() {
        let (mut ctl, sink) = controller();
        let start = Instant::now();

        ctl.toggle(start);
        assert!(ctl.is_running());
        assert_eq!(ctl.next_deadline(), Some(start + secs(1)));
        assert_eq!(*sink.ready_calls.borrow(), 1);

        ctl.toggle(start + secs(1));
        assert!(!ctl.is_running());
        assert_eq!(ctl.next_deadline(), None);
        assert_eq!(*sink.ready_calls.borrow(), 1);
    }

    #[test]
    fn test_ready_countdown_plays_warnings_then_transition() {
        let (mut ctl, sink) = controller();
        let start = Instant::now();
        ctl.toggle(start);

        let cues = ctl.update(start + secs(READY_DURATION_SECS as u64));
        assert_eq!(
            cues,
            vec![Cue::Warning, Cue::Warning, Cue::Warning, Cue::Transition]
        );
        assert_eq!(
            *sink.tones.borrow(),
            vec![Tone::WARNING, Tone::WARNING, Tone::WARNING, Tone::TRANSITION]
        );
        assert_eq!(ctl.machine().position(), 1);
        assert!(ctl.is_flashing(start + secs(5)));
        assert!(!ctl.is_flashing(start + secs(5) + FLASH_DURATION));
    }

    #[test]
    fn test_muted_plays_nothing_and_skips_audio_setup() {
        let (mut ctl, sink) = controller();
        ctl.toggle_mute();
        let start = Instant::now();
        ctl.toggle(start);
        ctl.update(start + secs(5));

        assert!(sink.tones.borrow().is_empty());
        assert_eq!(*sink.ready_calls.borrow(), 0);
        // Playback itself is unaffected
        assert_eq!(ctl.machine().position(), 1);
    }

    #[test]
    fn test_new_compiles_once() {
        let (ctl, _) = controller();
        assert_eq!(ctl.cache.misses(), 1);
        assert_eq!(ctl.steps(), compile(ctl.routine()).as_slice());
    }

    #[test]
    fn test_session_mute_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        let sink = RecordingSink::default();
        let mut ctl = Controller::new(
            Routine::default(),
            RoutineLibrary::in_memory(),
            Settings::default(),
            Box::new(sink.clone()),
        )
        .with_settings_path(path.clone())
        .with_session_mute();

        assert!(ctl.is_muted());
        let start = Instant::now();
        ctl.toggle(start);
        ctl.update(start + secs(5));
        assert!(sink.tones.borrow().is_empty());

        ctl.set_volume(0.5);
        let saved = Settings::load(&path).unwrap();
        assert!(!saved.muted);
        assert_eq!(saved.volume, 0.5);

        // An explicit toggle is a real preference change
        ctl.toggle_mute();
        ctl.toggle_mute();
        assert!(Settings::load(&path).unwrap().muted);
    }

    #[test]
    fn test_paused_timer_ignores_elapsed_time() {
        let (mut ctl, _) = controller();
        let start = Instant::now();
        ctl.toggle(start);
        ctl.update(start + secs(2));
        ctl.toggle(start + secs(2));

        assert!(ctl.update(start + secs(30)).is_empty());
        assert_eq!(ctl.timer().time_left, READY_DURATION_SECS - 2);
    }

    #[test]
    fn test_completion_stops_scheduler() {
        let (mut ctl, sink) = controller();
        let last = ctl.steps().len() - 1;
        ctl.seek_to(last);
        let remaining = ctl.timer().time_left as u64;
        let start = Instant::now();
        ctl.toggle(start);

        let cues = ctl.update(start + secs(remaining + 10));
        assert_eq!(cues.last(), Some(&Cue::Completed));
        assert_eq!(sink.tones.borrow().last(), Some(&Tone::COMPLETED));
        assert!(!ctl.is_running());
        assert_eq!(ctl.next_deadline(), None);
        assert!(ctl.notifications().any(|n| n.message == "PROTOCOL COMPLETE"));
    }

    #[test]
    fn test_edit_rebuilds_and_resets() {
        let (mut ctl, _) = controller();
        let start = Instant::now();
        ctl.toggle(start);
        ctl.update(start + secs(2));

        ctl.edit_routine(|r| r.hiit.rounds = 1);
        assert!(!ctl.is_running());
        assert_eq!(ctl.machine().position(), 0);
        assert_eq!(ctl.timer().total_time_elapsed, 0);
        assert_eq!(ctl.next_deadline(), None);
    }

    #[test]
    fn test_rename_keeps_playback() {
        let (mut ctl, _) = controller();
        ctl.next();
        ctl.edit_routine(|r| r.name = "Renamed".to_string());
        assert_eq!(ctl.machine().position(), 1);
    }

    #[test]
    fn test_import_valid_and_invalid() {
        let (mut ctl, sink) = controller();
        let now = Instant::now();
        ctl.set_tab(Tab::Library);

        let rejected = ctl.import_json(r#"{"warmup":[],"hiit":{},"stretch":[]}"#, now);
        assert!(!rejected);
        assert_eq!(ctl.routine(), &Routine::default());
        assert!(
            ctl.notifications()
                .any(|n| n.level == NotificationLevel::Error)
        );

        let json = r#"{
            "id": "x", "name": "Imported",
            "warmup": [{"id": "a", "name": "Jog", "duration": 10}],
            "hiit": {"rounds": 1, "exercisesPerRound": ["A"], "workDuration": 20,
                     "restBetweenExercises": 10, "restBetweenRounds": 30},
            "stretch": [{"id": "b", "name": "Reach", "duration": 10}]
        }"#;
        assert!(ctl.import_json(json, now));
        assert_eq!(ctl.routine().name, "Imported");
        assert_eq!(ctl.tab(), Tab::Settings);
        assert_eq!(ctl.indicator(now), Some("SYNCED"));
        assert_eq!(ctl.indicator(now + secs(4)), None);
        assert_eq!(sink.tones.borrow().last(), Some(&Tone::IMPORT_CONFIRM));
    }

    #[test]
    fn test_save_to_library_adopts_new_id() {
        let (mut ctl, _) = controller();
        ctl.save_to_library();

        let saved_id = ctl.library().list()[0].id.clone();
        assert_eq!(ctl.routine().id, saved_id);

        // Saving again updates in place
        ctl.edit_routine(|r| r.hiit.rounds = 5);
        ctl.save_to_library();
        assert_eq!(ctl.library().len(), 1);
        assert_eq!(ctl.library().list()[0].hiit.rounds, 5);

        assert!(ctl.rename_in_library(&saved_id, "Morning"));
        assert!(!ctl.rename_in_library(&saved_id, "   "));
        assert!(ctl.delete_from_library(&saved_id));
        assert!(ctl.library().is_empty());
    }

    #[test]
    fn test_open_timer_resets_idle_timer() {
        let (mut ctl, _) = controller();
        ctl.open_timer();
        assert_eq!(ctl.tab(), Tab::Timer);
        assert_eq!(ctl.timer().time_left, READY_DURATION_SECS);

        ctl.next();
        ctl.set_tab(Tab::Settings);
        ctl.open_timer();
        assert_eq!(ctl.machine().position(), 1);
    }

    #[test]
    fn test_add_exercise_uses_default_duration() {
        let (mut ctl, _) = controller();
        let id = ctl.add_exercise(PhaseList::Stretch);
        let added = ctl
            .routine()
            .stretch
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.duration);
        assert_eq!(added, Some(30));
    }
}
