//! Contains the [Cfg] struct that parses and stores the command line arguments
//!
//! [Cfg] uses procedural macros from the `clap` library to implement most of the argument parsing and validation logic.
//! The [Cfg] struct implements several options, as well as convenience functions to get various parts of the configuration

use crate::util::*;
use clap::Parser;
use clap_complete::Shell;

pub mod display;
pub mod inputoutput;
pub mod lib;
pub mod prelude;
pub mod test_util;
pub mod util;

/// The [CONFIG] static variable is used to store the [Cfg] created from the parsed command line arguments
pub static CONFIG: OnceLock<Cfg> = OnceLock::new();

/// The [Cfg] struct uses procedural macros and implements the [Config] trait, to provide convenient access to the command line arguments.
#[derive(Parser, Debug)]
#[command(name = "vqeconv - live convergence monitor for VQE runs")]
#[command(bin_name = "vqeconv", version)]
#[command(about = "vqeconv follows the stream file of a running VQE experiment and plots its convergence.")]
#[command(
    long_about = "\nvqeconv follows the stream file written by `ck run` of the qiskit-vqe\n\
or rigetti-vqe2 programs. It plots the energy estimate of every optimiser\n\
iteration, and keeps statistics over the experiment runs seen so far.\n\
\n\
When the experiment is restarted the stream file is recreated, and all\n\
previous data is discarded."
)]
#[command(propagate_version = true)]
#[command(styles = lib::styles())]
pub struct Cfg {
    /// Stream file to follow (default: `tmp/vqe_stream.json` of the CK program entry for the quantum provider)
    #[arg(name = "STREAM FILE", value_hint = clap::ValueHint::FilePath)]
    file: Option<PathBuf>,

    /// Quantum provider used to find the CK program entry [ibm, rigetti] (default: `VQE_QUANTUM_PROVIDER` or ibm)
    #[arg(short = 'p', long, conflicts_with = "STREAM FILE")]
    provider: Option<Provider>,

    /// Directory holding the CK repositories (default: `CK_REPOS` or `$HOME/CK`)
    #[arg(
        long = "ck-repos",
        visible_alias = "repos",
        conflicts_with = "STREAM FILE",
        value_hint = clap::ValueHint::DirPath
    )]
    ck_repos: Option<PathBuf>,

    /// Read the stream file once and print a summary report instead of following it in the terminal UI
    #[arg(short = 's', long, default_value_t = false, visible_alias = "once")]
    summary: bool,

    /// Refresh period of the terminal UI in milliseconds
    #[arg(short = 'r', long = "refresh-ms", default_value_t = 100)]
    refresh_ms: u64,

    /// Initial range of the energy axis, it is widened to fit all data points
    #[arg(
        long = "y-range",
        num_args = 2,
        value_names = ["MIN", "MAX"],
        allow_negative_numbers = true,
        default_values_t = [-1.7, -1.6]
    )]
    y_range: Vec<f64>,

    /// Mark previous runs with '.' instead of their run number (toggle with `n` in the terminal UI)
    #[arg(long, default_value_t = false)]
    no_numerical_markers: bool,

    /// Start the terminal UI with colours enabled (toggle with `c` in the terminal UI)
    #[arg(long, visible_alias = "colour", default_value_t = false)]
    color: bool,

    /// Verbosity level 0-4 (Errors, Warnings, Info, Debug, Trace)
    #[arg(short = 'v', long = "verbosity", default_value_t = 1)]
    verbosity: u8,

    /// Max tolerate malformed lines before exiting, if set to 0 -> no limit to errors
    #[arg(
        short = 'e',
        long = "max-tolerate-errors",
        visible_aliases = ["max-errors", "tolerate-errors"],
        default_value_t = 0
    )]
    max_tolerate_errors: u32,

    /// Set the exit code for if any malformed lines are detected in the stream file (cannot be 0)
    #[arg(short = 'E', long = "any-errors-exit-code", visible_alias = "exit-code")]
    any_errors_exit_code: Option<u8>,

    /// Don't show error messages about malformed lines
    #[arg(short, long, default_value_t = false)]
    mute_errors: bool,

    /// Output final stats (default: none), requires setting a data format option (JSON, TOML)
    #[arg(
        name = "OUTPUT FINAL STATS",
        short = 'S',
        long = "output-stats",
        default_value_t = DataOutputMode::None,
        visible_alias = "output-final-stats",
        requires = "STATS FORMAT"
    )]
    stats_output: DataOutputMode,

    /// Output stats format (JSON/TOML), requires setting a stats output option
    #[arg(
        name = "STATS FORMAT",
        short = 'D',
        long = "stats-format",
        requires = "OUTPUT FINAL STATS"
    )]
    stats_output_format: Option<DataOutputFormat>,

    /// Generate completion scripts for the specified shell.
    /// Note: The completion script is printed to stdout
    #[arg(
        long = "generate-completions",
        value_hint = clap::ValueHint::Other,
        value_name = "SHELL"
    )]
    pub generate_completions: Option<Shell>,
}

impl Cfg {
    /// Get a reference to the global config
    pub fn global() -> &'static Cfg {
        CONFIG.get().expect("Config is not initialized")
    }

    /// Generate completion scripts for the specified shell.
    pub fn generate_completion_script(shell: Shell) {
        clap_complete::generate(
            shell,
            &mut <Cfg as clap::CommandFactory>::command(),
            "vqeconv",
            &mut io::stdout(),
        );
    }
}

/// Implementing the config super trait requires implementing all the sub traits
impl Config for Cfg {}

impl InputOutputOpt for Cfg {
    #[inline]
    fn input_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    #[inline]
    fn provider(&self) -> Option<Provider> {
        self.provider
    }

    #[inline]
    fn ck_repos(&self) -> Option<&Path> {
        self.ck_repos.as_deref()
    }

    fn stats_output_mode(&self) -> DataOutputMode {
        self.stats_output.clone()
    }

    fn stats_output_format(&self) -> Option<DataOutputFormat> {
        self.stats_output_format
    }
}

impl DisplayOpt for Cfg {
    #[inline]
    fn summary(&self) -> bool {
        self.summary
    }

    #[inline]
    fn refresh_ms(&self) -> u64 {
        self.refresh_ms
    }

    fn y_range(&self) -> (f64, f64) {
        match self.y_range.as_slice() {
            [min, max] => (*min, *max),
            // clap enforces exactly two values
            _ => display::DEFAULT_Y_RANGE,
        }
    }

    #[inline]
    fn numerical_markers(&self) -> bool {
        !self.no_numerical_markers
    }

    #[inline]
    fn color(&self) -> bool {
        self.color
    }
}

impl UtilOpt for Cfg {
    #[inline]
    fn verbosity(&self) -> u8 {
        self.verbosity
    }
    #[inline]
    fn max_tolerate_errors(&self) -> u32 {
        self.max_tolerate_errors
    }
    fn any_errors_exit_code(&self) -> Option<u8> {
        self.any_errors_exit_code
    }
    fn mute_errors(&self) -> bool {
        self.mute_errors
    }
}

/// Get the [config][super::config::Cfg] from the command line arguments and set the static [CONFIG] variable.
pub fn init_config() -> Result<(), String> {
    let cfg = <super::config::Cfg as clap::Parser>::parse();
    cfg.validate_args()?;
    CONFIG
        .set(cfg)
        .map_err(|_| "Config is already initialized".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let cfg = Cfg::try_parse_from(["vqeconv"]).unwrap();
        assert_eq!(cfg.input_file(), None);
        assert_eq!(cfg.provider(), None);
        assert!(!cfg.summary());
        assert_eq!(cfg.refresh_ms(), 100);
        assert_eq!(cfg.y_range(), (-1.7, -1.6));
        assert!(cfg.numerical_markers());
        assert!(!DisplayOpt::color(&cfg));
        assert_eq!(cfg.verbosity(), 1);
        assert_eq!(cfg.stats_output_mode(), DataOutputMode::None);
        assert!(cfg.validate_args().is_ok());
    }

    #[test]
    fn test_parse_all_display_options() {
        let cfg = Cfg::try_parse_from([
            "vqeconv",
            "stream.json",
            "--summary",
            "--refresh-ms",
            "250",
            "--y-range",
            "-2.5",
            "-1",
            "--no-numerical-markers",
            "--color",
        ])
        .unwrap();
        assert_eq!(cfg.input_file(), Some(Path::new("stream.json")));
        assert!(cfg.summary());
        assert_eq!(cfg.refresh_ms(), 250);
        assert_eq!(cfg.y_range(), (-2.5, -1.0));
        assert!(!cfg.numerical_markers());
        assert!(DisplayOpt::color(&cfg));
    }

    #[test]
    fn test_parse_provider_case_insensitive() {
        let cfg = Cfg::try_parse_from(["vqeconv", "--provider", "Rigetti"]).unwrap();
        assert_eq!(cfg.provider(), Some(Provider::Rigetti));
    }

    #[test]
    fn test_provider_conflicts_with_file() {
        let res = Cfg::try_parse_from(["vqeconv", "stream.json", "--provider", "ibm"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_stats_output_requires_format() {
        let res = Cfg::try_parse_from(["vqeconv", "f.json", "-s", "-S", "stdout"]);
        assert!(res.is_err());
        let cfg = Cfg::try_parse_from(["vqeconv", "f.json", "-s", "-S", "stdout", "-D", "toml"])
            .unwrap();
        assert_eq!(cfg.stats_output_mode(), DataOutputMode::Stdout);
        assert_eq!(cfg.stats_output_format(), Some(DataOutputFormat::TOML));
    }
}
