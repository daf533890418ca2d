use momento_places::app::create_app;
use momento_places::config::{load_config, save_default_config};
use momento_places::constants::CONFIG_PATH;
use momento_places::geo::GeocodeService;
use momento_places::logging::{init_logging, install_panic_hook};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--init-config") {
        match save_default_config(&CONFIG_PATH) {
            Ok(_) => {
                println!("Default configuration saved to {:?}", *CONFIG_PATH);
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("Failed to save default configuration: {}", e);
                std::process::exit(1);
            }
        }
    }

    init_logging();
    install_panic_hook();

    let config = Arc::new(load_config(&CONFIG_PATH));

    let geocoder = match GeocodeService::from_config(&config.reverse_geocoding) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!("Failed to set up reverse geocoder: {}", e);
            std::process::exit(1);
        }
    };

    if config.reverse_geocoding.enabled {
        info!(
            "Reverse geocoding via {} (min interval {:?})",
            config.reverse_geocoding.base_url,
            config.reverse_geocoding.min_interval()
        );
    } else {
        info!("Reverse geocoding disabled; places resolve to coordinate labels");
    }

    let app = create_app(Arc::clone(&config), geocoder);

    let addr: SocketAddr = match format!("{}:{}", config.server.host, config.server.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid listen address {}:{}: {}", config.server.host, config.server.port, e);
            std::process::exit(1);
        }
    };
    info!("Starting Momento Places on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server failed");
}
