//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the glance server
#[derive(Parser, Debug)]
#[command(name = "glance")]
#[command(author, version, about = "Visual question answering over a SmolVLM-class model")]
#[command(long_about = r#"
Glance serves a browser-facing VQA API: upload an image, get a caption,
then ask free-form follow-up questions answered with the full prior
conversation as context. Sessions expire after an idle timeout.

Inference is delegated to an OpenAI-compatible runtime (llama.cpp
server, vLLM, ...) configured via [model].backend_url.

Configuration files are loaded from (in priority order):
1. GLANCE_* environment variables
2. --config <path>     Explicit config file
3. ./glance.toml       Project-level config
4. ~/.config/glance/config.toml   Global config

Example:
  glance
  glance --port 9000 --model-size 2.2B -vv
"#)]
pub struct Cli {
    /// Address to bind (overrides config)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Model size tier: 256M, 500M, or 2.2B (overrides config)
    #[arg(long, value_name = "SIZE")]
    pub model_size: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,
}
