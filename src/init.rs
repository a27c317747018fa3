//! Contains the [run] function that is the entry point for vqeconv
use crate::util::lib::{self, init_ctrlc_handler, init_error_logger};
use crate::{config::init_config, controller::init_controller, init_processing, util::*};

/// Entry point for vqeconv
pub fn run() -> ExitCode {
    human_panic::setup_panic!();

    if let Err(e) = init_config() {
        eprintln!("{e}");
        return ExitCode::from(1);
    };

    init_error_logger(Cfg::global());

    if let Some(shell) = Cfg::global().generate_completions {
        Cfg::generate_completion_script(shell);
        log::warn!("Completions generated for {shell:?}. Exiting...");
        return ExitCode::from(0);
    }

    // The terminal UI reads keys from stdin, summary mode is for everything else
    if !Cfg::global().summary() && !io::stdin().is_terminal() {
        println!("please run interactively.");
        return ExitCode::from(1);
    }

    let stream_file = match locate::resolve_stream_file(Cfg::global()) {
        Ok(path) => path,
        Err(e) => {
            log::error!("Failed to locate the stream file: {e}");
            return ExitCode::from(1);
        }
    };

    // Launch controller thread
    // If max allowed errors is reached, the user quits, or a fatal error occurs, the controller signals the follower to stop
    let (controller, stat_send_chan, stop_flag, any_errors_flag) = init_controller(Cfg::global());

    // Handles SIGINT, SIGTERM and SIGHUP (as the `termination` feature is  enabled)
    init_ctrlc_handler(stop_flag.clone());

    let follower = init_processing(
        Cfg::global(),
        stream_file,
        stat_send_chan,
        stop_flag.clone(),
    );
    let mut exit_code: u8 = match follower {
        Ok(follower) => {
            if follower.join().is_err() {
                log::error!("Follower thread panicked");
                1
            } else {
                0
            }
        }
        Err(e) => {
            log::error!("Init processing failed: {e}");
            stop_flag.store(true, Ordering::SeqCst);
            1
        }
    };

    let fatal = controller.join().expect("Failed to join controller thread");
    if fatal {
        exit_code = 1;
    }

    lib::exit(exit_code, &any_errors_flag, Cfg::global())
}
