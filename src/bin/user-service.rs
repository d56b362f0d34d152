use std::io;

use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use taskboard::{Config, UserService};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(io::Error::other)?;
    let service = UserService::start(&config).await.map_err(io::Error::other)?;

    log::info!(
        "User service running on {}",
        config.server_url(config.user_service_port)
    );

    let app_service = service.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(|cfg| app_service.configure(cfg))
    })
    .bind((config.server_host.as_str(), config.user_service_port))?
    .run()
    .await?;

    service.shutdown().await;
    log::info!("User service stopped");
    Ok(())
}
