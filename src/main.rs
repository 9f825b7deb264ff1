use clap::{Parser, Subcommand};
use hiit_timer::audio::{ToneOutput, ToneSink};
use hiit_timer::library::transfer::read_routine;
use hiit_timer::playback::format_clock;
use hiit_timer::ui::TimerApp;
use hiit_timer::{Controller, Cue, Routine, RoutineLibrary, Settings, Step, compile};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

/// Interval workout timer
#[derive(Parser, Debug)]
#[command(name = "hiit_timer")]
#[command(version)]
#[command(about = "Warm-up, HIIT and stretch interval timer", long_about = None)]
struct Cli {
    /// Start with cue tones muted
    #[arg(long, global = true)]
    muted: bool,

    /// Routine library file (defaults to the platform data directory)
    #[arg(long, value_name = "FILE", global = true)]
    library: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the graphical timer (default)
    Gui,
    /// Print the compiled step sequence of a routine
    Plan {
        /// Routine JSON file; the starter routine when omitted
        #[arg(value_name = "ROUTINE")]
        routine: Option<PathBuf>,

        /// Print the steps as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a routine in the terminal
    Run {
        /// Routine JSON file; the starter routine when omitted
        #[arg(value_name = "ROUTINE")]
        routine: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_module("hiit_timer", level)
        .format_timestamp(None)
        .init();
}

fn load_routine(path: Option<&Path>) -> Routine {
    let Some(path) = path else {
        return Routine::default();
    };
    match read_routine(path) {
        Ok(routine) => routine,
        Err(e) => {
            eprintln!("ERROR: {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn load_settings() -> (Settings, Option<PathBuf>) {
    let path = Settings::default_path();
    let settings = path
        .as_deref()
        .map(Settings::load_or_default)
        .unwrap_or_default();
    (settings, path)
}

fn open_library(path: Option<PathBuf>) -> RoutineLibrary {
    let Some(path) = path.or_else(RoutineLibrary::default_path) else {
        log::warn!("No data directory, library kept in memory");
        return RoutineLibrary::in_memory();
    };

    match RoutineLibrary::open(&path) {
        Ok(library) => library,
        Err(e) => {
            log::error!("Cannot open library {}: {}", path.display(), e);
            RoutineLibrary::in_memory()
        }
    }
}

fn print_plan(steps: &[Step]) {
    println!(
        "{:>4}  {:<8} {:<10} {:>4} {:>6}  {:<28} NEXT",
        "#", "PHASE", "ACTIVITY", "RND", "AT", "NAME"
    );
    for (index, step) in steps.iter().enumerate() {
        let round = step.round.map(|r| r.to_string()).unwrap_or_default();
        println!(
            "{:>4}  {:<8} {:<10} {:>4} {:>6}  {:<28} {}",
            index,
            step.phase.label(),
            step.activity.label(),
            round,
            format_clock(step.cumulative_time_before),
            format!("{} ({}s)", step.name, step.duration),
            step.next_name
        );
    }
    let total = steps.last().map_or(0, |s| s.cumulative_time_after());
    println!("\nTOTAL {}", format_clock(total));
}

fn run_plan(routine: &Routine, json: bool) {
    let steps = compile(routine);
    if json {
        match serde_json::to_string_pretty(&steps) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("ERROR: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("=== {} ===\n", routine.name);
        print_plan(&steps);
    }
}

/// Terminal playback: one line per tick, tones through the default output
fn run_terminal(routine: Routine, settings: Settings, muted: bool) {
    let output = ToneOutput::new(settings.output_device.clone(), settings.volume);
    let sink: Box<dyn ToneSink> = Box::new(output);
    let mut controller = Controller::new(routine, RoutineLibrary::in_memory(), settings, sink);
    if muted {
        controller = controller.with_session_mute();
    }

    println!("=== {} ===", controller.routine().name);
    controller.toggle(Instant::now());
    print_status(&controller);

    while controller.is_running() {
        if let Some(deadline) = controller.next_deadline() {
            std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
        }

        let cues = controller.update(Instant::now());
        if cues.contains(&Cue::Transition) {
            println!();
        }
        print_status(&controller);
        if cues.contains(&Cue::Completed) {
            println!("\nCOMPLETED");
        }
    }
}

fn print_status(controller: &Controller) {
    let frame = controller.frame();
    println!(
        "{:<16} {:<28} {:>5}   total {:>5} left   next: {}",
        frame.phase_label(),
        frame.step.name,
        format_clock(frame.timer.time_left),
        format_clock(frame.remaining_total()),
        frame.next_label()
    );
}

fn run_gui(
    settings: Settings,
    settings_path: Option<PathBuf>,
    library_path: Option<PathBuf>,
    muted: bool,
) {
    let library = open_library(library_path.or_else(|| settings.library_path.clone()));
    let output = ToneOutput::new(settings.output_device.clone(), settings.volume);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 820.0])
            .with_title("HIIT Timer"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "HIIT Timer",
        native_options,
        Box::new(move |_cc| {
            let volume = output.volume_handle();
            let status = output.status_handle();
            let mut controller =
                Controller::new(Routine::default(), library, settings, Box::new(output));
            if let Some(path) = settings_path {
                controller = controller.with_settings_path(path);
            }
            if muted {
                controller = controller.with_session_mute();
            }
            Ok(Box::new(TimerApp::new(controller, volume, status)))
        }),
    );

    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (settings, settings_path) = load_settings();

    match cli.command {
        None | Some(Command::Gui) => run_gui(settings, settings_path, cli.library, cli.muted),
        Some(Command::Plan { routine, json }) => {
            let routine = load_routine(routine.as_deref());
            run_plan(&routine, json);
        }
        Some(Command::Run { routine }) => {
            let routine = load_routine(routine.as_deref());
            run_terminal(routine, settings, cli.muted);
        }
    }
}
