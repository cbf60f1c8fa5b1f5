//! CLI command implementations

mod classify;
mod config;
mod estimate;
mod lexicon;
mod package;

pub use classify::cmd_classify;
pub use config::{cmd_config_init, cmd_config_show};
pub use estimate::cmd_estimate;
pub use lexicon::cmd_lexicon;
pub use package::{PackageOptions, cmd_package};
