use tracing::info;
use wnyai::App;

#[tokio::main]
async fn main() {
    wnyai::telemetry::init(env!("CARGO_PKG_NAME"), std::io::stdout);

    let config = wnyai::Config::builder()
        .merge_env()
        .expect("invalid configuration in environment")
        .build()
        .expect("failed to read configuration");

    let app = App::new(config);
    let server = app.serve().expect("failed to bind server");

    info!("Listening on {}", server.local_addr());
    server.await.expect("error while running server")
}
