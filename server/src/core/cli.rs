use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DATABASE_MAX_CONNECTIONS, ENV_DATABASE_URL, ENV_DEBUG, ENV_HOST, ENV_PORT,
    ENV_SEED_RESTAURANTS_URL, ENV_SEED_USERS_URL,
};

#[derive(Parser)]
#[command(name = "frenzy")]
#[command(version, about = "Restaurant discovery API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug mode (verbose SQL and request logging)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// SQLite connection URL (defaults to a file in the data directory)
    #[arg(long, global = true, env = ENV_DATABASE_URL)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, global = true, env = ENV_DATABASE_MAX_CONNECTIONS)]
    pub database_max_connections: Option<u32>,

    /// Restaurant seed data URL
    #[arg(long, global = true, env = ENV_SEED_RESTAURANTS_URL)]
    pub seed_restaurants_url: Option<String>,

    /// User seed data URL
    #[arg(long, global = true, env = ENV_SEED_USERS_URL)]
    pub seed_users_url: Option<String>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Database maintenance commands
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum DbCommands {
    /// Create the database and apply the schema
    Init,
    /// Download seed data and load restaurants, menus, timings and users
    Populate {
        /// Load restaurants only
        #[arg(long)]
        skip_users: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub seed_restaurants_url: Option<String>,
    pub seed_users_url: Option<String>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        debug: cli.debug,
        config: cli.config,
        database_url: cli.database_url,
        database_max_connections: cli.database_max_connections,
        seed_restaurants_url: cli.seed_restaurants_url,
        seed_users_url: cli.seed_users_url,
    };
    (config, cli.command)
}
