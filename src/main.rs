use std::{error::Error, path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use diesel_migrations::MigrationHarness;
use tally::{
    MIGRATIONS,
    admin::{Admin, setup::reset_database},
    config::{cookie_key, create_app_with},
    settings::Settings,
    state::{AppState, make_pool},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Course evaluation server")]
struct Cli {
    /// Path to a TOML settings file (defaults to `tally.toml` if present).
    #[arg(long, short)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Runs the web server.
    Serve,
    /// Wipes the database and creates the seed administrator.
    InitDb,
    /// Adds an administrator account.
    CreateAdmin { username: String, password: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    let pool = make_pool(&settings.database_url)?;
    {
        let mut conn = pool.get()?;
        conn.run_pending_migrations(MIGRATIONS)?;
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let state = AppState {
                pool,
                key: cookie_key(&settings)?,
                settings: Arc::new(settings),
            };
            let listener =
                tokio::net::TcpListener::bind(&state.settings.bind_address)
                    .await?;
            tracing::info!(
                "listening on http://{}",
                state.settings.bind_address
            );
            axum::serve(listener, create_app_with(state)).await?;
        }
        Command::InitDb => {
            let mut conn = pool.get()?;
            reset_database(
                &settings.seed_admin_username,
                &settings.seed_admin_password,
                &mut conn,
            )?;
            tracing::info!(
                username = %settings.seed_admin_username,
                "database initialised"
            );
        }
        Command::CreateAdmin { username, password } => {
            let mut conn = pool.get()?;
            let id = Admin::create(&username, &password, &mut conn)?;
            tracing::info!(id, %username, "administrator created");
        }
    }

    Ok(())
}
