use axum::http::{Method, header};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use license_server::config::Config;
use license_server::crypto::hash_password;
use license_server::db::{AppState, create_pool, init_db, queries};
use license_server::error::Result;
use license_server::handlers;
use license_server::jwt::SessionSigner;
use license_server::models::{CreateLicense, CreateSubscription};
use license_server::util::{license_expiry, now};

#[derive(Parser, Debug)]
#[command(name = "license-server")]
#[command(about = "Accounts, device-bound license keys and payment webhooks")]
struct Cli {
    /// Seed the database with a dev user, subscription and license
    #[arg(long)]
    seed: bool,

    /// Delete the database on exit (dev mode only, useful for fresh starts)
    #[arg(long)]
    ephemeral: bool,
}

const DEV_EMAIL: &str = "dev@license-server.local";
const DEV_PASSWORD: &str = "devpassword";
const DEV_FINGERPRINT: &str = "dev-machine";
const DEV_PLAN: &str = "pro";

/// Seeds the database with dev data for testing.
/// Creates: user, active subscription, and a license bound to a dev device.
/// Skipped when the dev user already exists.
fn seed_dev_data(state: &AppState) -> Result<()> {
    let mut conn = state.db.get()?;

    if queries::get_user_by_email(&conn, DEV_EMAIL)?.is_some() {
        tracing::info!("Dev user already exists, skipping seed");
        return Ok(());
    }

    tracing::info!("============================================");
    tracing::info!("SEEDING DEV DATA");
    tracing::info!("============================================");

    let password_hash = hash_password(DEV_PASSWORD)?;
    let user = queries::create_user(&conn, DEV_EMAIL, &password_hash)?;
    tracing::info!("User: {} (id: {})", user.email, user.id);

    let started_at = now();
    let subscription = queries::create_subscription(
        &conn,
        &user.id,
        &CreateSubscription {
            provider: Some("dev".to_string()),
            status: Some("active".to_string()),
            plan: Some(DEV_PLAN.to_string()),
            started_at: Some(started_at),
            expires_at: Some(license_expiry(started_at)?),
        },
    )?;
    tracing::info!("Subscription: {} (id: {})", DEV_PLAN, subscription.id);

    let activation = queries::activate_license(
        &mut conn,
        &user.id,
        DEV_FINGERPRINT,
        &CreateLicense {
            plan: DEV_PLAN.to_string(),
            payment_provider: Some("dev".to_string()),
            payment_id: None,
        },
    )?;
    tracing::info!(
        "License: {} (device: {}, expires_at: {})",
        activation.license.key,
        DEV_FINGERPRINT,
        activation.license.expires_at
    );

    tracing::info!("============================================");
    tracing::info!("DEV DATA SEEDED SUCCESSFULLY");
    tracing::info!("============================================");

    println!();
    println!("--- COPY FROM HERE ---");
    println!("  email: {}", DEV_EMAIL);
    println!("  password: {}", DEV_PASSWORD);
    println!("  user_id: {}", user.id);
    println!("  device_fingerprint: {}", DEV_FINGERPRINT);
    println!("  license_key: {}", activation.license.key);
    println!("--- END COPY ---");
    println!();

    Ok(())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "license_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }

    let db_pool = create_pool(&config.database_path).expect("Failed to create database pool");
    {
        let conn = db_pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize database");
    }

    let sessions = SessionSigner::new(&config.jwt_secret, config.token_ttl_secs).unwrap_or_else(|e| {
        tracing::error!("Invalid session signing key: {}", e);
        std::process::exit(1);
    });

    let state = AppState {
        db: db_pool,
        sessions,
        razorpay_webhook_secret: config.razorpay_webhook_secret.clone(),
    };

    if state.razorpay_webhook_secret.is_none() {
        tracing::warn!("RAZORPAY_WEBHOOK_SECRET not set, Razorpay webhooks are unauthenticated");
    }

    if cli.seed {
        if !config.dev_mode {
            tracing::warn!("--seed flag ignored: not in dev mode (set LICENSE_SERVER_ENV=dev)");
        } else if let Err(e) = seed_dev_data(&state) {
            tracing::error!("Failed to seed dev data: {}", e);
        }
    }

    let app = handlers::router()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    let cleanup_on_exit = cli.ephemeral && config.dev_mode;
    let db_path = config.database_path.clone();

    if cleanup_on_exit {
        tracing::info!("EPHEMERAL MODE: database will be deleted on exit");
    } else if cli.ephemeral {
        tracing::warn!("--ephemeral flag ignored: not in dev mode (set LICENSE_SERVER_ENV=dev)");
    }

    tracing::info!("License server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");

    if cleanup_on_exit {
        tracing::info!("Cleaning up ephemeral database...");
        if let Err(e) = std::fs::remove_file(&db_path) {
            tracing::warn!("Failed to remove {}: {}", db_path, e);
        } else {
            tracing::info!("Removed {}", db_path);
        }
        let _ = std::fs::remove_file(format!("{}-wal", db_path));
        let _ = std::fs::remove_file(format!("{}-shm", db_path));
        tracing::info!("Ephemeral cleanup complete");
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
