//! ptrkeys application entry point.
//!
//! Wires together the settings file, the binding table, the display
//! backend, and the engine, then runs the control loop.
//!
//! ```text
//! main()
//!  └─ load_settings()       -- TOML config with defaults
//!  └─ validate(table)       -- every violation logged, then exit 1
//!  └─ Engine::new()         -- movement channels + grab state
//!  └─ control_loop::run()   -- drain events, integrate, inject
//! ```
//!
//! Exit codes: 0 after a bound quit command, 1 for configuration or
//! runtime failures, 130 on SIGINT.
//!
//! # Backend selection
//!
//! The `MockBackend` used here records injected events rather than
//! synthesising OS input. In a production build it is replaced by
//! `X11Backend` (XTest) on Linux targets.

use std::process::ExitCode;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ptrkeys::application::control_loop::{self, MonotonicClock, Outcome};
use ptrkeys::application::engine::{Engine, EventSource, InputSink, KeyboardGrab};
use ptrkeys::default_bindings::default_bindings;
use ptrkeys::infrastructure::backend::mock::MockBackend;
use ptrkeys::infrastructure::storage::config::load_settings;
use ptrkeys_core::validate;

/// SIGINT maps to 128 + SIGINT(2) by shell convention.
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            // The subscriber may not be installed yet when settings fail
            // to load, so report on stderr directly.
            eprintln!("ptrkeys: fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let settings = load_settings()?;

    // Initialise structured logging; RUST_LOG overrides the settings file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.engine.log_level.clone())),
        )
        .init();

    info!("ptrkeys starting");

    let table = default_bindings();
    if let Err(violations) = validate(&table) {
        for violation in &violations {
            error!("invalid binding: {violation}");
        }
        error!("{} binding violation(s), refusing to start", violations.len());
        return Ok(ExitCode::FAILURE);
    }

    let tuning = settings.tuning()?;

    // ── Display backend ───────────────────────────────────────────────────────
    // In production: replace MockBackend with X11Backend::new(&table)? on
    // Linux targets.
    let backend = Arc::new(MockBackend::new());

    let mut engine = Engine::new(
        table,
        tuning,
        Arc::clone(&backend) as Arc<dyn InputSink>,
        Arc::clone(&backend) as Arc<dyn KeyboardGrab>,
        Arc::clone(&backend) as Arc<dyn EventSource>,
    );

    // ── SIGINT handler ────────────────────────────────────────────────────────
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        interrupted_flag.store(true, Ordering::Relaxed);
    })?;

    // ── Control loop ──────────────────────────────────────────────────────────
    let mut clock = MonotonicClock::new();
    let outcome = control_loop::run(&mut engine, &mut clock, settings.engine.fps, &interrupted)?;

    match outcome {
        Outcome::Quit => {
            info!("ptrkeys stopped");
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Interrupted => {
            info!("interrupted");
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
    }
}
