//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, Commands, DbCommands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::SqliteService;
use crate::data::sqlite::repositories::{count_restaurants, count_transactions};
use crate::domain::seed;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub database: Arc<SqliteService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();

        let (cli_config, command) = cli::parse();
        Self::init_logging(cli_config.debug);
        tracing::trace!(command = ?command, "Parsed command");

        let config = AppConfig::load(&cli_config)?;

        match command {
            Some(Commands::Db {
                command: DbCommands::Init,
            }) => Self::init_database(&config).await,
            Some(Commands::Db {
                command: DbCommands::Populate { skip_users },
            }) => Self::populate_database(&config, skip_users).await,
            Some(Commands::Start) | None => {
                let app = Self::init(config).await?;
                app.start_server().await
            }
        }
    }

    async fn init(config: AppConfig) -> Result<Self> {
        let storage = AppStorage::init().await?;
        let database = Arc::new(
            SqliteService::init(&config.database, &storage)
                .await
                .context("Failed to open database")?,
        );
        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            database,
        })
    }

    /// `db init`: create the database and apply the schema
    async fn init_database(config: &AppConfig) -> Result<()> {
        let storage = AppStorage::init().await?;
        let database = SqliteService::init(&config.database, &storage)
            .await
            .context("Failed to initialize database")?;
        let version = database.schema_version().await?;
        let restaurants = count_restaurants(database.pool()).await?;
        let transactions = count_transactions(database.pool()).await?;
        database.close().await;

        println!("Database ready (schema version {})", version);
        println!(
            "Holding {} restaurants, {} purchase records",
            restaurants, transactions
        );
        if restaurants == 0 {
            println!("Run `{} db populate` to load seed data", APP_NAME_LOWER);
        }
        Ok(())
    }

    /// `db populate`: download seed data and replace the database contents
    async fn populate_database(config: &AppConfig, skip_users: bool) -> Result<()> {
        let storage = AppStorage::init().await?;
        let database = SqliteService::init(&config.database, &storage)
            .await
            .context("Failed to initialize database")?;

        let result =
            seed::populate_from_remote(&config.seed, &storage, database.pool(), skip_users).await;

        if let Err(e) = database.checkpoint().await {
            tracing::warn!("SQLite checkpoint failed: {}", e);
        }
        database.close().await;

        let summary = result.context("Failed to populate database")?;
        println!(
            "Loaded {} restaurants, {} dishes, {} opening windows",
            summary.restaurants, summary.menu_items, summary.timings
        );
        if !skip_users {
            println!(
                "Loaded {} users, {} transactions ({} skipped)",
                summary.users, summary.transactions, summary.skipped_transactions
            );
        }
        Ok(())
    }

    fn init_logging(debug: bool) {
        let default_filter = if debug {
            format!("info,{}=debug,tower_http=debug", APP_NAME_LOWER)
        } else {
            format!("info,{}=info", APP_NAME_LOWER)
        };

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        self.shutdown.install_signal_handlers();
        self.start_background_tasks().await;

        let schema_version = self.database.schema_version().await?;
        banner::print_banner(
            &self.config.server.host,
            self.config.server.port,
            &self.storage.data_dir().display().to_string(),
            schema_version,
        );
        if self.config.debug {
            tracing::debug!(config = ?self.config, "Effective configuration");
        }

        let server = ApiServer::new(
            self.config.server.clone(),
            self.database.clone(),
            self.shutdown.clone(),
        );
        let served = server.start().await;

        // Stop background tasks and close the pool even if serving failed
        self.shutdown.shutdown().await;
        served
    }

    pub async fn start_background_tasks(&self) {
        self.shutdown
            .register(
                self.database
                    .start_checkpoint_task(self.shutdown.subscribe()),
            )
            .await;

        tracing::debug!("Background tasks started");
    }
}
