mod config;
mod graphql;
mod http;
mod seed;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, connect};
use platform_obs::{ObsConfig, init_tracing, shutdown_tracing};
use products_hr::{EmployeeService, InMemoryEmployeeService, SeaOrmEmployeeService};
use tracing::{info, warn};

use crate::{
    config::{AppConfig, StoreKind},
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "rh-server", version, about = "RH Suite employee records service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert demo employees into an empty database.
    Seed,
    /// Print the GraphQL schema snapshot.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig::from_env("rh-server"))?;
    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Serve(cmd) => run_server(cmd).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up().await,
            MigrateCommand::Down => migrate_down().await,
        },
        Command::Seed => run_seed().await,
        Command::SchemaPrint { output } => schema_print(output),
    };
    shutdown_tracing();
    outcome
}

async fn run_seed() -> Result<()> {
    let pool = setup_pool().await?;
    ensure_migrations(&pool, false).await?;
    let service = SeaOrmEmployeeService::new(Arc::new(pool));
    seed::seed_employees(&service)
        .await
        .context("seeding employees failed")?;
    Ok(())
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let schema = graphql::build_schema(Arc::new(InMemoryEmployeeService::new()), None);
    let sdl = schema.sdl();
    match path {
        Some(target) => {
            std::fs::write(&target, sdl)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(path = %target.display(), "schema snapshot written");
        }
        None => println!("{sdl}"),
    }
    Ok(())
}

async fn setup_pool() -> Result<DbPool> {
    let settings = DatabaseSettings::from_env();
    connect(&settings).await.map_err(Into::into)
}

async fn run_server(cmd: ServeCommand) -> Result<()> {
    let config = Arc::new(AppConfig::load()?);
    let (employees, pool): (Arc<dyn EmployeeService>, Option<DbPool>) = match config.store {
        StoreKind::Database => {
            let pool = setup_pool().await?;
            ensure_migrations(&pool, cmd.allow_dirty).await?;
            (
                Arc::new(SeaOrmEmployeeService::new(Arc::new(pool.clone()))),
                Some(pool),
            )
        }
        StoreKind::Memory => {
            warn!("EMPLOYEE_STORE=memory; records are lost on shutdown");
            (Arc::new(InMemoryEmployeeService::new()), None)
        }
    };
    if config.seed_on_start {
        seed::seed_employees(employees.as_ref())
            .await
            .context("seeding employees failed")?;
    }
    let state = AppState {
        schema: graphql::build_schema(employees.clone(), pool.clone()),
        employees,
        config,
        pool,
    };
    http::serve((&cmd).into(), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `rh-server migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn migrate_up() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}
