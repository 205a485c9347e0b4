use std::net::SocketAddr;

use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use userhub::CountryStore;
use userhub_axum::{API_ROUTE_PREFIX, userhub_router};

const COUNTRY_SEED: &[&str] = &[
    "Argentina",
    "Australia",
    "Brazil",
    "Canada",
    "China",
    "Egypt",
    "France",
    "Germany",
    "India",
    "Indonesia",
    "Italy",
    "Japan",
    "Kenya",
    "Mexico",
    "Netherlands",
    "Nigeria",
    "Norway",
    "Poland",
    "Portugal",
    "South Africa",
    "South Korea",
    "Spain",
    "Sweden",
    "Switzerland",
    "Thailand",
    "Turkey",
    "United Kingdom",
    "United States",
    "Vietnam",
];

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        {
            "userhub_axum=debug,userhub=debug,demo_server=debug,info".into()
        }

        #[cfg(not(debug_assertions))]
        {
            "info".into()
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn seed_countries() {
    for country in COUNTRY_SEED {
        if let Err(e) = CountryStore::upsert_country(country).await {
            tracing::warn!("Failed to seed country {country}: {e}");
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("Initializing database connection");
    if let Err(e) = userhub::init().await {
        tracing::error!("Failed to initialize the database: {e}");
        std::process::exit(1);
    }
    seed_countries().await;
    tracing::info!("Database initialized successfully");

    let app = Router::new().nest(API_ROUTE_PREFIX.as_str(), userhub_router());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Web server is running on port {port}");
    axum::serve(listener, app).await.expect("Server error");
}
