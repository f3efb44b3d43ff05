use std::net::SocketAddr;

use axum::routing::{get, post};
use tracing::info;

use crate::{config::Tables, record_store::RecordStore, routes, telemetry, Config};

fn routes() -> axum::Router {
    axum::Router::new()
        .route("/", get(routes::home))
        .route("/health", get(routes::health))
        .route("/subscriptions", post(routes::subscribe))
        .route("/events", get(routes::events))
        .route("/content", get(routes::site_content))
        .route("/content/:key", get(routes::site_content_value))
        .route("/conference", get(routes::conference))
        .route("/conference/schedule", get(routes::schedule))
        .route("/conference/registrations", post(routes::register))
        .route(
            "/conference/sponsors",
            get(routes::sponsor_tiers).post(routes::sponsor_inquiry),
        )
}

fn debug_routes() -> axum::Router {
    axum::Router::new()
        .route("/debug", get(routes::debug_environment))
        .route("/debug/tables/:table", get(routes::debug_table))
}

pub struct App {
    addr: SocketAddr,
    service: axum::routing::IntoMakeService<axum::Router>,
}

pub type Server =
    axum::Server<hyper::server::conn::AddrIncoming, axum::routing::IntoMakeService<axum::Router>>;

impl App {
    pub fn new(config: Config) -> Self {
        let store = RecordStore::new(
            config.store_url.clone(),
            config.base_id.clone(),
            config.credentials.clone(),
            config.request_timeout,
        );

        let mut router = routes();
        if config.debug_routes {
            info!("debug routes are enabled");
            router = router.merge(debug_routes());
        }

        let service = router
            .layer(
                tower::ServiceBuilder::new()
                    .layer(telemetry::id_layer())
                    .layer(telemetry::trace_layer())
                    .layer(axum::Extension(store))
                    .layer(axum::Extension::<Tables>(config.tables)),
            )
            .into_make_service();

        Self {
            addr: config.address,
            service,
        }
    }

    pub fn serve(self) -> Result<Server, hyper::Error> {
        Ok(axum::Server::try_bind(&self.addr)?.serve(self.service))
    }
}
