use actix_web::error;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::Result;

use scribble_system::serde::Deserialize;
use scribble_system::{Stroke, UserId};

use crate::api::ApiCommand;
use crate::server::{ServerCommand, ServerTx};

pub fn configure_canvas_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/canvas").route(web::get().to(snapshot)))
        .service(web::resource("/draw").route(web::post().to(draw)))
        .service(web::resource("/clear").route(web::delete().to(clear)))
        .service(web::resource("/remove").route(web::delete().to(remove)));
}

async fn snapshot(srv_tx: web::Data<ServerTx>) -> Result<impl Responder> {
    let (tx, rx) = tokio::sync::oneshot::channel();

    srv_tx
        .get_ref()
        .clone()
        .send(ServerCommand::Api(ApiCommand::Snapshot { tx }))
        .await
        .map_err(|_| error::ErrorInternalServerError("Internal Server Error"))?;

    let strokes = rx
        .await
        .map_err(|_| error::ErrorInternalServerError("Receiver await error"))?;

    Ok(HttpResponse::Ok().json(strokes))
}

/// The single durable ingestion path for strokes; the socket only notifies.
async fn draw(body: web::Json<Stroke>, srv_tx: web::Data<ServerTx>) -> Result<impl Responder> {
    let (tx, rx) = tokio::sync::oneshot::channel();

    srv_tx
        .get_ref()
        .clone()
        .send(ServerCommand::Api(ApiCommand::Draw {
            stroke: body.into_inner(),
            tx,
        }))
        .await
        .map_err(|_| error::ErrorInternalServerError("Internal Server Error"))?;

    let strokes = rx
        .await
        .map_err(|_| error::ErrorInternalServerError("Receiver await error"))?
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(strokes))
}

#[derive(Deserialize)]
pub struct ClearRequest {
    #[serde(rename = "userID")]
    user_id: UserId,
}

async fn clear(
    body: web::Json<ClearRequest>,
    srv_tx: web::Data<ServerTx>,
) -> Result<impl Responder> {
    let (tx, rx) = tokio::sync::oneshot::channel();

    srv_tx
        .get_ref()
        .clone()
        .send(ServerCommand::Api(ApiCommand::Clear {
            user_id: body.into_inner().user_id,
            tx,
        }))
        .await
        .map_err(|_| error::ErrorInternalServerError("Internal Server Error"))?;

    let strokes = rx
        .await
        .map_err(|_| error::ErrorInternalServerError("Receiver await error"))?
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(strokes))
}

async fn remove(body: web::Json<Stroke>, srv_tx: web::Data<ServerTx>) -> Result<impl Responder> {
    let (tx, rx) = tokio::sync::oneshot::channel();

    srv_tx
        .get_ref()
        .clone()
        .send(ServerCommand::Api(ApiCommand::Remove {
            stroke: body.into_inner(),
            tx,
        }))
        .await
        .map_err(|_| error::ErrorInternalServerError("Internal Server Error"))?;

    rx.await
        .map_err(|_| error::ErrorInternalServerError("Receiver await error"))?
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().finish())
}
