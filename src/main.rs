use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

use sukari_portal::databases;
use sukari_portal::databases::signup::sessiondb::PgSessionStore;
use sukari_portal::routes;
use sukari_portal::services::iprs::{HttpIdentityRegistry, IdentityRegistry};
use sukari_portal::session::store::SessionStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let pool = match databases::setup_backend().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Backend setup failed: {:?}", e);
            std::process::exit(1);
        }
    };

    let registry: Arc<dyn IdentityRegistry> = match HttpIdentityRegistry::from_env() {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            eprintln!("Identity registry misconfigured: {:?}", e);
            std::process::exit(1);
        }
    };
    let store: Arc<dyn SessionStore> = Arc::new(PgSessionStore::new(pool.clone()));

    println!("Sukari Portal signup service listening on 127.0.0.1:8080");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(registry.clone()))
            .app_data(web::Data::new(store.clone()))
            .configure(routes::verification::init)
            .configure(routes::auth::init)
            .configure(routes::otp::init)
            .configure(routes::pin::init)
            .configure(routes::session::init)
            .configure(routes::login::init)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
