use std::path::PathBuf;

use amap_common::Platform;
use clap::Parser;

/// Drive the AMap bridge through a scripted session against an in-memory
/// page and native plugin, and print every call that reached the native side.
#[derive(Parser, Debug)]
#[command(name = "amap-sim", version, about)]
pub struct Args {
    /// Platform the page reports (android, ios, web).
    #[arg(short, long, default_value = "android")]
    pub platform: Platform,

    /// Bridge settings file (TOML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Place the map inside a page container (affects iOS display handling).
    #[arg(long)]
    pub in_page_container: bool,

    /// Print the call log as JSON.
    #[arg(long)]
    pub json: bool,

    /// Print the default settings file and exit.
    #[arg(long)]
    pub print_default_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
