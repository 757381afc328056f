use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};

use scribble_server::handlers;
use scribble_server::server::spawn_server;
use scribble_server::store::PathStore;
use scribble_server::users::UserStore;

const STROKE_FILE: &str = "strokes.json";
const USER_FILE: &str = "users.json";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    // Both stores are ready before the listener binds, so a handler never
    // sees a half-initialized store handle.
    let paths = PathStore::load(STROKE_FILE).await?;
    let users = UserStore::load(USER_FILE).await?;
    let srv_tx = spawn_server(paths, users);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3000);

    log::info!("listening on port {}", port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .data(srv_tx.clone())
            .configure(handlers::root)
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
