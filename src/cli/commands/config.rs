use colored::Colorize;

use crate::cli::args::{ConfigArgs, ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::Result;

/// Handle the config command
pub fn config(
    config: &mut Config,
    paths: &Paths,
    args: &ConfigArgs,
    format: OutputFormat,
) -> Result<String> {
    match &args.command {
        ConfigCommands::Show => config_show(config, paths, format),
        ConfigCommands::Set { key, value } => config_set(config, paths, key, value, format),
        ConfigCommands::Path => config_path(paths, format),
    }
}

/// Show current configuration
fn config_show(config: &Config, paths: &Paths, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("{}\n", "Configuration".bold()));
            output.push_str(&"─".repeat(40));
            output.push('\n');

            output.push_str(&format!("\n{}\n", "[upstream]".cyan()));
            output.push_str(&format!("  url = {}\n", config.upstream.url));
            output.push_str(&format!("  timeout_secs = {}\n", config.upstream.timeout_secs));

            output.push_str(&format!("\n{}\n", "[refresh]".cyan()));
            output.push_str(&format!("  interval_secs = {}\n", config.refresh.interval_secs));
            output.push_str(&format!(
                "  source = {}\n",
                format!("{:?}", config.refresh.source).to_lowercase()
            ));

            output.push_str(&format!("\n{}\n", "[search]".cyan()));
            output.push_str(&format!("  cutoff = {}\n", config.search.cutoff));
            output.push_str(&format!("  legacy_cutoff = {}\n", config.search.legacy_cutoff));
            output.push_str(&format!("  limit = {}\n", config.search.limit));
            output.push_str(&format!("  unique_samples = {}\n", config.search.unique_samples));

            output.push_str(&format!("\n{}\n", "[server]".cyan()));
            output.push_str(&format!("  bind = {}\n", config.server.bind));

            output.push_str(&format!("\n{}\n", "[cache]".cyan()));
            let dir = match &config.cache.dir {
                Some(dir) => dir.display().to_string(),
                None => format!("{} {}", paths.cache_dir.display(), "(default)".dimmed()),
            };
            output.push_str(&format!("  dir = {}\n", dir));

            output.push_str(&format!("\n{}\n", "[logging]".cyan()));
            output.push_str(&format!(
                "  format = {}\n",
                format!("{:?}", config.logging.format).to_lowercase()
            ));

            Ok(output.trim_end().to_string())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
    }
}

/// Set a configuration value
fn config_set(
    config: &mut Config,
    paths: &Paths,
    key: &str,
    value: &str,
    format: OutputFormat,
) -> Result<String> {
    config.set_value(key, value)?;
    config.save_to(paths)?;

    match format {
        OutputFormat::Pretty => Ok(format!("{} Set {} = {}", "✓".green(), key, value)),
        OutputFormat::Json => {
            let result = serde_json::json!({
                "success": true,
                "key": key,
                "value": value
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}

/// Show configuration file path
fn config_path(paths: &Paths, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("Config file: {}\n", paths.config_file.display()));
            output.push_str(&format!(
                "Exists: {}",
                if paths.config_exists() {
                    "yes".green()
                } else {
                    "no".yellow()
                }
            ));
            Ok(output)
        }
        OutputFormat::Json => {
            let result = serde_json::json!({
                "path": paths.config_file.display().to_string(),
                "exists": paths.config_exists()
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}
