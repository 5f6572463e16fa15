//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了CLI命令行接口。

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::manager::CacheManager;

#[derive(Parser, Debug)]
#[command(name = "liveattr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(name = "status", about = "Check connectivity to the configured store")]
    Status(StatusArgs),

    #[command(name = "get", about = "Read raw cached values from a namespace")]
    Get(GetArgs),

    #[command(name = "clean", about = "Remove the field keys and snapshot of an identity")]
    Clean(CleanArgs),
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    #[arg(short, long, help = "Show detailed information")]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    #[arg(short, long, help = "Namespace (prefix plus type name)")]
    pub namespace: String,

    #[arg(required = true, help = "Keys to read")]
    pub keys: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct CleanArgs {
    #[arg(short, long, help = "Namespace (prefix plus type name)")]
    pub namespace: String,

    #[arg(short, long, help = "Identity whose keys are removed")]
    pub identity: String,

    #[arg(short, long, value_delimiter = ',', help = "Live field names, comma separated")]
    pub fields: Vec<String>,

    #[arg(long, help = "Ask for confirmation before deleting")]
    pub confirm: bool,
}

mod clean;
mod get;
mod status;

/// 加载配置，未指定文件时使用默认配置
fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// 建立存储连接
async fn connect(config: Config) -> Result<CacheManager> {
    CacheManager::init(config)
        .await
        .context("Failed to initialize cache store")
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Commands::Status(args) => status::execute(config, args).await,
        Commands::Get(args) => get::execute(&connect(config).await?, args).await,
        Commands::Clean(args) => clean::execute(&connect(config).await?, args).await,
    }
}
