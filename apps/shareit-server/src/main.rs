use anyhow::{anyhow, Context, Result};
use axum::{response::Json, routing::get, Router};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use modkit::http::web;
use modkit::{apply_ingress_layers, IngressConfig};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use shareit::config::ShareItConfig;
use shareit::domain::ports::SystemClock;
use shareit::ShareIt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MODULE_NAME: &str = "shareit";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// ShareIt Server - peer-to-peer item sharing
#[derive(Parser)]
#[command(name = "shareit-server")]
#[command(about = "ShareIt Server - peer-to-peer item sharing")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("ShareIt Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
    }
}

/// Detect DB backend from URL scheme.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim().to_owned();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if raw.eq_ignore_ascii_case("sqlite::memory:") {
        return Ok("sqlite");
    }

    let url = Url::parse(&raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

async fn connect_db(config: &AppConfig, args: &CliArgs) -> Result<DatabaseConnection> {
    let base_dir = PathBuf::from(&config.server.home_dir);

    let db_config = if args.mock {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_conns: Some(1),
            busy_timeout_ms: None,
        }
    } else {
        config
            .database
            .clone()
            .ok_or_else(|| anyhow!("No database configuration found (use --mock for in-memory)"))?
    };

    let backend = detect_from_dsn(&db_config)?;
    let mut dsn = db_config.url.trim().to_owned();
    if backend == "sqlite" {
        dsn = absolutize_sqlite_dsn(&dsn, &base_dir, true)?;
    }

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if dsn == "sqlite::memory:" {
        // Every pooled connection would otherwise get its own empty database.
        opts.max_connections(1).min_connections(1);
    } else if let Some(max) = db_config.max_conns {
        opts.max_connections(max);
    }
    if backend == "sqlite" {
        let busy = db_config
            .busy_timeout_ms
            .map(|ms| Duration::from_millis(u64::from(ms)));
        opts.map_sqlx_sqlite_opts(move |o| {
            let o = o.create_if_missing(true);
            match busy {
                Some(t) => o.busy_timeout(t),
                None => o,
            }
        });
    }

    tracing::info!("Connecting to database: {}", dsn);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to {backend} database"))?;
    tracing::info!("Connected DB backend: {}", backend);
    Ok(db)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let module_cfg: ShareItConfig = config.module_config(MODULE_NAME)?;
    let db = connect_db(&config, &args).await?;
    ShareIt::migrate(&db).await?;

    let module = ShareIt::init(db, &module_cfg, Arc::new(SystemClock));
    let mut router = module.register_rest(Router::new());

    if config.server.enable_docs {
        let doc = ShareIt::openapi();
        router = router
            .route(
                "/openapi.json",
                get(move || {
                    let doc = doc.clone();
                    async move { Json(doc) }
                }),
            )
            .route("/docs", get(web::serve_docs));
        tracing::info!("API docs enabled at /docs");
    }

    let ingress = IngressConfig {
        request_timeout: Duration::from_secs(config.server.timeout_sec.max(1)),
        cors_enabled: config.server.cors_enabled,
        ..Default::default()
    };
    let router = apply_ingress_layers(router, &ingress);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                config.server.host, config.server.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = modkit::runtime::wait_for_shutdown().await {
                tracing::error!("Signal handling failed: {e}");
            }
        })
        .await?;

    tracing::info!("ShareIt Server stopped");
    Ok(())
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    let module_cfg: ShareItConfig = config.module_config(MODULE_NAME)?;
    if !args.mock {
        if let Some(db) = &config.database {
            detect_from_dsn(db)?;
        }
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);
    println!("Module config: {module_cfg:?}");

    Ok(())
}
