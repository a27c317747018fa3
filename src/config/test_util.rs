#![allow(missing_docs)]

use super::display::DEFAULT_Y_RANGE;
use crate::util::*;

#[derive(Debug, Clone)]
/// Complete configurable Mock config for testing
pub struct MockConfig {
    pub input_file: Option<PathBuf>,
    pub provider: Option<Provider>,
    pub ck_repos: Option<PathBuf>,
    pub summary: bool,
    pub refresh_ms: u64,
    pub y_range: (f64, f64),
    pub numerical_markers: bool,
    pub color: bool,
    pub verbosity: u8,
    pub max_tolerate_errors: u32,
    pub any_errors_exit_code: Option<u8>,
    pub mute_errors: bool,
    pub stats_output_mode: DataOutputMode,
    pub stats_output_format: Option<DataOutputFormat>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConfig {
    pub fn new() -> Self {
        Self {
            input_file: None,
            provider: None,
            ck_repos: None,
            summary: false,
            refresh_ms: 100,
            y_range: DEFAULT_Y_RANGE,
            numerical_markers: true,
            color: false,
            verbosity: 0,
            max_tolerate_errors: 0,
            any_errors_exit_code: None,
            mute_errors: false,
            stats_output_mode: DataOutputMode::None,
            stats_output_format: None,
        }
    }

    pub fn new_summary() -> Self {
        Self {
            summary: true,
            ..Default::default()
        }
    }
}

impl Config for MockConfig {}

impl InputOutputOpt for MockConfig {
    fn input_file(&self) -> Option<&Path> {
        self.input_file.as_deref()
    }
    fn provider(&self) -> Option<Provider> {
        self.provider
    }
    fn ck_repos(&self) -> Option<&Path> {
        self.ck_repos.as_deref()
    }
    fn stats_output_mode(&self) -> DataOutputMode {
        self.stats_output_mode.clone()
    }
    fn stats_output_format(&self) -> Option<DataOutputFormat> {
        self.stats_output_format
    }
}

impl DisplayOpt for MockConfig {
    fn summary(&self) -> bool {
        self.summary
    }
    fn refresh_ms(&self) -> u64 {
        self.refresh_ms
    }
    fn y_range(&self) -> (f64, f64) {
        self.y_range
    }
    fn numerical_markers(&self) -> bool {
        self.numerical_markers
    }
    fn color(&self) -> bool {
        self.color
    }
}

impl UtilOpt for MockConfig {
    fn verbosity(&self) -> u8 {
        self.verbosity
    }
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
