//! Hospital site application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Connect to Redis
//! 3. Seed the admin account
//! 4. Build router with API routes + admin page gate + static file serving
//! 5. Start Axum server
//!
//! Also supports `hash-password` subcommand for producing ADMIN_PASSWORD_HASH.

use hospital_site::{
    auth::{hash_password, AppState},
    config::Config,
    models::unix_now,
    routes, storage,
};
use std::net::SocketAddr;

fn print_hash_password_usage() {
    eprintln!("Usage: hospital-site hash-password <password>");
    eprintln!();
    eprintln!("Generate an Argon2id hash for ADMIN_PASSWORD_HASH.");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  hospital-site hash-password 'correct horse battery staple'");
    eprintln!();
    eprintln!("Then set in .env (single-quoted, the hash contains '$'):");
    eprintln!("  ADMIN_USERNAME=admin");
    eprintln!("  ADMIN_PASSWORD_HASH='<output>'");
}

#[tokio::main]
async fn main() {
    // Check for hash-password subcommand
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "hash-password" {
        if args.len() != 3 {
            print_hash_password_usage();
            std::process::exit(1);
        }

        match hash_password(&args[2]) {
            Ok(hash) => {
                println!("{}", hash);
            }
            Err(e) => {
                eprintln!("Error hashing password: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!("Starting hospital-site on {}", config.bind_addr);

    // Connect to Redis
    let redis_client = redis::Client::open(config.redis_url.as_str()).expect("Invalid Redis URL");

    // Verify Redis connection
    let mut con = redis_client
        .get_multiplexed_async_connection()
        .await
        .expect("Failed to connect to Redis");

    // Seed admin account (existing account and its password are kept)
    let created = storage::admin::seed_admin(
        &mut con,
        &config.admin_username,
        &config.admin_password_hash,
        config.admin_email.as_deref(),
        unix_now(),
    )
    .await
    .expect("Failed to seed admin account");
    if created {
        tracing::info!("Admin account '{}' created", config.admin_username);
    } else {
        tracing::info!("Admin account '{}' already present", config.admin_username);
    }

    let bind_addr = config.bind_addr;
    let app = routes::build_app(AppState::new(redis_client, config));

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", bind_addr);

    // Start server (with_connect_info required for ConnectInfo<SocketAddr> extractors)
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
