//! Config command - show current configuration

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Only print the path of the configuration file in use
    #[arg(long)]
    pub path: bool,
}

/// Effective configuration, with the API key reduced to set/unset
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: Option<String>,
    pub api_key: &'static str,
    pub base_url: String,
    pub timeout_sec: u64,
    pub comment_count: usize,
    pub max_query_length: Option<usize>,
}

impl ConfigResponse {
    pub fn from_config(config: &Config) -> Self {
        Self {
            config_file: Config::config_file().map(|p| p.to_string_lossy().into_owned()),
            api_key: if config.has_api_key() { "set" } else { "not set" },
            base_url: config.kakao.base_url.clone(),
            timeout_sec: config.kakao.timeout_sec,
            comment_count: config.search.comment_count,
            max_query_length: config.search.max_query_length,
        }
    }
}

/// Execute the config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = ConfigResponse::from_config(config);

    if args.path {
        match format {
            OutputFormat::Human => {
                println!("{}", response.config_file.as_deref().unwrap_or("(defaults)"))
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "config_file": response.config_file }))
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Human => {
            println!("{}", colors::label("Configuration:"));
            println!(
                "  config_file: {}",
                response.config_file.as_deref().unwrap_or("(defaults)")
            );
            println!("  kakao:");
            println!("    api_key: {}", response.api_key);
            println!("    base_url: {}", response.base_url);
            println!("    timeout_sec: {}", response.timeout_sec);
            println!("  search:");
            println!("    comment_count: {}", response.comment_count);
            match response.max_query_length {
                Some(len) => println!("    max_query_length: {len}"),
                None => println!("    max_query_length: unlimited"),
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
