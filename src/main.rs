use std::sync::Arc;

use anyhow::Context;

use family_profiles::config::AppConfig;
use family_profiles::console;
use family_profiles::engine::Engine;
use family_profiles::menu::ItemCatalog;
use family_profiles::profiles::ProfileRegistry;
use family_profiles::routes::{ProfileRouteState, profile_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();

    eprintln!("Family profiles v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Menu: {}", config.menu_path.display());
    eprintln!("   Profiles: {}", config.profiles_path.display());
    eprintln!("   Language: {}", config.language);

    // Both are configuration defects if broken; refuse to start.
    let catalog = Arc::new(
        ItemCatalog::load(&config.menu_path)
            .with_context(|| format!("failed to load {}", config.menu_path.display()))?,
    );
    let registry = Arc::new(
        ProfileRegistry::open(&config.profiles_path).with_context(|| {
            format!("failed to read existing profiles from {}", config.profiles_path.display())
        })?,
    );
    eprintln!("   Registered profiles: {}", registry.len());

    if let Some(port) = config.http_port {
        let app = profile_routes(ProfileRouteState {
            registry: Arc::clone(&registry),
        });
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
            .await
            .with_context(|| format!("failed to bind port {port}"))?;
        eprintln!("   Profile API: http://0.0.0.0:{port}/api/profiles");
        tokio::spawn(async move {
            tracing::info!(port, "Profile API server started");
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Profile API server stopped: {}", e);
            }
        });
    }

    eprintln!("   Caller: {}\n", config.msisdn);

    let engine = Engine::new(catalog, registry, config.language.clone());
    console::run_session(
        &engine,
        &config.msisdn,
        &config.entry_item,
        console::stdin_lines(),
        console::print_screen,
    )
    .await?;

    Ok(())
}
