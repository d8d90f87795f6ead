use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tracing::{error, info};
use uuid::Uuid;

use configs::{AppConfig, LogFormat};

const SERVICE: &str = "agenda-migrate";

#[derive(Debug, Clone, Copy)]
enum Command {
    Up,
    Down,
    Status,
}

impl Command {
    fn parse(arg: Option<&str>) -> Result<Self, String> {
        match arg {
            None | Some("up") => Ok(Command::Up),
            Some("down") => Ok(Command::Down),
            Some("status") => Ok(Command::Status),
            Some(other) => Err(format!("unknown command '{other}', expected up | down | status")),
        }
    }
}

fn init_logging(format: LogFormat) {
    match format {
        LogFormat::Compact => common::utils::logging::init_logging_default(),
        LogFormat::Json => common::utils::logging::init_logging_json(),
    }
    info!(service = SERVICE, event = "logger_init", ?format, "tracing subscriber initialized");
}

async fn run(cfg: &AppConfig, command: Command) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::test_connection(&db).await?;
    match command {
        Command::Up => Migrator::up(&db, None).await?,
        // one step back; the schema is never dropped wholesale from here
        Command::Down => Migrator::down(&db, Some(1)).await?,
        Command::Status => Migrator::status(&db).await?,
    }
    Ok(())
}

fn main() -> std::process::ExitCode {
    // .env first so RUST_LOG, CONFIG_PATH and DATABASE_URL apply
    dotenv().ok();

    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = SERVICE, event = "config_invalid", error = %e, "configuration rejected");
            return std::process::ExitCode::FAILURE;
        }
    };
    init_logging(cfg.logging.format);

    let run_id = Uuid::now_v7();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = SERVICE, event = "panic", %run_id, pid, message = %info, "unhandled panic occurred");
    }));

    let arg = std::env::args().nth(1);
    let command = match Command::parse(arg.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!(service = SERVICE, event = "bad_arguments", error = %e, "invalid command line");
            return std::process::ExitCode::from(2);
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = SERVICE, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(service = SERVICE, event = "start", %run_id, pid, version, ?command, "schema migration starting");
    match rt.block_on(run(&cfg, command)) {
        Ok(()) => {
            info!(service = SERVICE, event = "stop", %run_id, ?command, "schema migration finished");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = SERVICE, event = "run_failed", %run_id, error = %e, "schema migration failed");
            std::process::ExitCode::FAILURE
        }
    }
}
