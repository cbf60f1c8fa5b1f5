//! Configuration commands

use anyhow::{Context, Result, bail};
use std::path::Path;
use tempus_core::Config;

/// Show current effective configuration
pub fn cmd_config_show(cwd: &Path, config: &Config) -> Result<()> {
  let project_config = Config::project_config_path(cwd);
  let user_config = Config::user_config_path();

  println!("Effective configuration for: {}", cwd.display());
  println!();

  if project_config.exists() {
    println!("Using working directory config: {}", project_config.display());
  } else if let Some(ref user_path) = user_config
    && user_path.exists()
  {
    println!("Using user config: {}", user_path.display());
  } else {
    println!("Using default configuration (no config file found)");
  }
  println!();

  let toml_str = toml::to_string_pretty(config)?;
  println!("{}", toml_str);

  if let Err(e) = config.validate() {
    println!("Warning: configuration is invalid: {}", e);
  }

  Ok(())
}

/// Write the default template to ./tempus.toml
pub fn cmd_config_init(cwd: &Path, force: bool) -> Result<()> {
  let config_path = Config::project_config_path(cwd);

  if config_path.exists() && !force {
    bail!(
      "Config file already exists: {} (use --force to overwrite)",
      config_path.display()
    );
  }

  std::fs::write(&config_path, Config::generate_template())
    .with_context(|| format!("Failed to write {}", config_path.display()))?;

  println!("Created config: {}", config_path.display());
  println!("Edit the file to customize settings.");

  Ok(())
}
