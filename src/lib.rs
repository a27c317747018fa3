#![warn(unused_extern_crates)]
#![warn(missing_docs)]
#![warn(missing_copy_implementations)]
// Readability lints
#![warn(
    clippy::option_filter_map,
    clippy::manual_filter_map,
    clippy::if_not_else,
    clippy::nonminimal_bool,
    clippy::single_match_else,
    clippy::range_plus_one,
    clippy::int_plus_one,
    clippy::needless_range_loop,
    clippy::needless_continue,
    clippy::shadow_same,
    clippy::shadow_unrelated
)]
// Performance lints
#![warn(variant_size_differences)]
#![warn(
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,
    clippy::mutex_integer,
    clippy::mem_forget,
    clippy::maybe_infinite_iter
)]
// Safety lints
#![warn(unused_import_braces)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(clippy::map_unwrap_or)]

//! VQE convergence monitor (vqeconv), for watching the energy estimates of a running `ck run` of the
//! `qiskit-vqe` or `rigetti-vqe2` programs converge, live in the terminal.
//!
//! # Usage
//!
//! ## Follow the stream file of the program for the configured quantum provider
//! The stream file is found in the CK program entry, under `tmp/vqe_stream.json`
//! ```shell
//! # Provider is taken from `VQE_QUANTUM_PROVIDER` (default: ibm)
//! $ vqeconv
//!
//! # Same as above but for the rigetti program, searching CK repositories in a custom location
//! $ vqeconv --provider rigetti --ck-repos /data/CK
//! ```
//!
//! ## Follow an explicit stream file, with colours and plain markers
//! ```shell
//! $ vqeconv path/to/vqe_stream.json --color --no-numerical-markers
//! ```
//!
//! ## Summarize a finished stream file without a terminal UI
//! ```shell
//! $ vqeconv path/to/vqe_stream.json --summary
//!
//! # Write the final stats as JSON to stdout
//! $ vqeconv path/to/vqe_stream.json --summary -S stdout -D json
//! ```
//!
//! ## Keys in the terminal UI
//! - `n`: toggle numerical markers
//! - `c`: toggle colour
//! - `q`: quit

use crate::util::*;

/// Write an error message to stderr.
/// All error messages should be written through this function to ensure consistency.
#[inline]
pub fn display_error(err_msg: &str) {
    log::error!("{}", owo_colors::OwoColorize::red(&err_msg));
}

pub mod config;
pub mod controller;
pub mod init;
pub mod source;
pub mod stats;
pub mod util;
pub mod view;

/// Follows (or in summary mode, reads once) the stream file, sending what is read to the controller.
///
/// Returns the handle of the spawned follower thread.
pub fn init_processing(
    config: &'static impl Config,
    stream_file: PathBuf,
    stat_send: flume::Sender<StatType>,
    stop_flag: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    let follow = !config.summary();
    log::debug!(
        "{mode} stream file {path}",
        mode = if follow { "Following" } else { "Reading" },
        path = stream_file.display()
    );
    source::follower::spawn_follower(stream_file, follow, stop_flag, stat_send)
}
