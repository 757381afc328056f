use actix_web::error;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::Result;

use scribble_system::serde::Deserialize;
use scribble_system::serde_json::json;

use crate::api::ApiCommand;
use crate::server::{ServerCommand, ServerTx};
use crate::users::LoginOutcome;

pub fn configure_login_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)));
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

async fn login(
    body: web::Json<LoginRequest>,
    srv_tx: web::Data<ServerTx>,
) -> Result<impl Responder> {
    let LoginRequest { username, password } = body.into_inner();
    let (tx, rx) = tokio::sync::oneshot::channel();

    srv_tx
        .get_ref()
        .clone()
        .send(ServerCommand::Api(ApiCommand::Login {
            username,
            password,
            tx,
        }))
        .await
        .map_err(|_| error::ErrorInternalServerError("Internal Server Error"))?;

    let outcome = rx
        .await
        .map_err(|_| error::ErrorInternalServerError("Receiver await error"))?
        .map_err(error::ErrorInternalServerError)?;

    Ok(match outcome {
        LoginOutcome::Created | LoginOutcome::Verified => {
            HttpResponse::Found().header("Location", "/home").finish()
        }
        LoginOutcome::Rejected => {
            HttpResponse::Unauthorized().json(json!({ "error": "Wrong password" }))
        }
    })
}
