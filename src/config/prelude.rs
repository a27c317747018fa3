//! Re-exports the [Config] super trait and all its sub traits
pub use super::display::DisplayOpt;
pub use super::inputoutput::DataOutputMode;
pub use super::inputoutput::InputOutputOpt;
pub use super::lib::Config;
pub use super::util::UtilOpt;
