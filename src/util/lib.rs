//! Miscellaneous utility functions

use crate::config::prelude::*;
use std::sync::{atomic::AtomicBool, Arc};

/// Start the [stderrlog] instance, and immediately use it to log the configured mode.
pub fn init_error_logger(cfg: &(impl UtilOpt + InputOutputOpt + DisplayOpt + std::fmt::Debug)) {
    stderrlog::new()
        .module("vqeconv")
        .verbosity(cfg.verbosity() as usize)
        .init()
        .expect("Failed to initialize logger");
    if cfg.summary() {
        log::trace!("Summary mode, reading stream file once");
    } else {
        log::trace!("Interactive mode, following stream file");
    }
    match cfg.stats_output_mode() {
        DataOutputMode::Stdout => log::trace!("Stats output set to stdout"),
        DataOutputMode::File(_) => log::trace!("Stats output set to file"),
        DataOutputMode::None => log::trace!("Stats output set to suppressed"),
    }
    log::trace!("Starting vqeconv with args: {cfg:#?}");
}

/// Initializes the Ctrl+C handler to facilitate graceful shutdown on Ctrl+C
///
/// Also handles SIGTERM and SIGHUP if the `termination` feature is enabled
pub fn init_ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    // Handles SIGINT, SIGTERM and SIGHUP (as the `termination` feature is  enabled)
    ctrlc::set_handler({
        let mut stop_sig_count = 0;
        move || {
            log::warn!(
                "Stop Ctrl+C, SIGTERM, or SIGHUP received, stopping gracefully, please wait..."
            );
            stop_flag.store(true, std::sync::atomic::Ordering::SeqCst);
            stop_sig_count += 1;
            if stop_sig_count > 1 {
                // Destructors don't run on exit, the terminal UI has to be left here
                let _ = crate::view::terminal::restore_active_terminal(&mut std::io::stdout());
                log::warn!("Second stop signal received, ungraceful shutdown.");
                std::process::exit(1);
            }
        }
    })
    .expect("Error setting Ctrl-C handler");
}

/// Exits the program with the appropriate exit code
pub fn exit(
    exit_code: u8,
    any_errors_flag: &AtomicBool,
    cfg: &impl UtilOpt,
) -> std::process::ExitCode {
    std::process::ExitCode::from(final_exit_code(exit_code, any_errors_flag, cfg))
}

/// A non-zero `exit_code` always wins, otherwise the configured exit code for errors in the stream is used if any were seen.
fn final_exit_code(exit_code: u8, any_errors_flag: &AtomicBool, cfg: &impl UtilOpt) -> u8 {
    if exit_code != 0 {
        return exit_code;
    }
    log::debug!("Exit successful");
    match cfg.any_errors_exit_code() {
        Some(code) if any_errors_flag.load(std::sync::atomic::Ordering::Relaxed) => code,
        _ => 0,
    }
}
