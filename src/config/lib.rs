//! Contains the [Config] super trait, and all the sub traits required by it
//!
//! Implementing the [Config] super trait is required by configs passed to structs in other modules as part of instantiation.

use super::{display::DisplayOpt, inputoutput::DataOutputMode, prelude::InputOutputOpt, util::UtilOpt};
use clap::builder::{
    styling::{AnsiColor, Effects},
    Styles,
};

/// Super trait for all the traits that needed to be implemented by the config struct
// Generic traits that are required by the config struct
pub trait Config: Send + Sync + std::marker::Sized
where
    // Subtraits that group together related configuration options
    Self: UtilOpt + InputOutputOpt + DisplayOpt,
{
    /// Validate the arguments of the config
    fn validate_args(&self) -> Result<(), String> {
        if self.refresh_ms() == 0 {
            return Err("Invalid config: Refresh period must be at least 1 ms".to_string());
        }
        let (y_min, y_max) = self.y_range();
        if !y_min.is_finite() || !y_max.is_finite() {
            return Err(format!(
                "Invalid config: Energy axis range must be finite (got: {y_min} {y_max})"
            ));
        }
        if y_min >= y_max {
            return Err(format!(
                "Invalid config: Energy axis range minimum must be less than maximum (got: {y_min} {y_max})"
            ));
        }
        if self.any_errors_exit_code().is_some_and(|val| val == 0) {
            return Err("Invalid config: Exit code for any errors cannot be 0".to_string());
        }
        if self.stats_output_mode() != DataOutputMode::None && !self.summary() {
            return Err(
                "Invalid config: Writing final stats is only possible in summary mode (--summary)"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl<T> Config for &T
where
    T: Config,
{
    fn validate_args(&self) -> Result<(), String> {
        (*self).validate_args()
    }
}

impl<T> Config for Box<T>
where
    T: Config,
{
    fn validate_args(&self) -> Result<(), String> {
        (**self).validate_args()
    }
}

impl<T> Config for std::sync::Arc<T>
where
    T: Config,
{
    fn validate_args(&self) -> Result<(), String> {
        (**self).validate_args()
    }
}

/// Styling of the help text
pub fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_util::MockConfig;

    #[test]
    fn test_default_mock_config_is_valid() {
        assert!(MockConfig::default().validate_args().is_ok());
    }

    #[test]
    fn test_zero_refresh_is_invalid() {
        let cfg = MockConfig {
            refresh_ms: 0,
            ..Default::default()
        };
        let err = cfg.validate_args().unwrap_err();
        assert!(err.contains("Refresh period"), "{err}");
    }

    #[test]
    fn test_reversed_y_range_is_invalid() {
        let cfg = MockConfig {
            y_range: (-1.0, -2.0),
            ..Default::default()
        };
        let err = cfg.validate_args().unwrap_err();
        assert!(err.contains("less than maximum"), "{err}");

        let cfg = MockConfig {
            y_range: (-1.0, -1.0),
            ..Default::default()
        };
        assert!(cfg.validate_args().is_err());
    }

    #[test]
    fn test_non_finite_y_range_is_invalid() {
        let cfg = MockConfig {
            y_range: (f64::NEG_INFINITY, 0.0),
            ..Default::default()
        };
        assert!(cfg.validate_args().unwrap_err().contains("finite"));
    }

    #[test]
    fn test_zero_exit_code_is_invalid() {
        let cfg = MockConfig {
            any_errors_exit_code: Some(0),
            ..Default::default()
        };
        assert!(cfg.validate_args().unwrap_err().contains("cannot be 0"));
    }

    #[test]
    fn test_stats_output_requires_summary() {
        let cfg = MockConfig {
            stats_output_mode: DataOutputMode::Stdout,
            ..Default::default()
        };
        assert!(cfg.validate_args().unwrap_err().contains("summary mode"));

        let cfg = MockConfig {
            stats_output_mode: DataOutputMode::Stdout,
            summary: true,
            ..Default::default()
        };
        assert!(cfg.validate_args().is_ok());
    }

    #[test]
    fn test_blanket_impls_forward_validation() {
        let cfg = std::sync::Arc::new(MockConfig {
            refresh_ms: 0,
            ..Default::default()
        });
        assert!(cfg.validate_args().is_err());
        assert!((&cfg).validate_args().is_err());
    }
}
