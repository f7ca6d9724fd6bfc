use actix_web::{rt::System, web};
use dotenvy::dotenv;
use foodcart_service::config::Config;
use foodcart_service::{build_server, build_state, create_pool, run_migrations};

fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match create_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to create database connection pool: {}", e);
            std::process::exit(1);
        }
    };
    run_migrations(&pool);

    // The geocoder's blocking HTTP client has to be created, and finally
    // dropped, outside the async runtime.
    let state = match build_state(pool, &config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to initialise geocoder: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let server_state = state.clone();
    let result = System::new()
        .block_on(async move { build_server(server_state, &config.host, config.port)?.await });
    drop(state);
    result
}
