use actix_web::web;

use crate::connection::ws_index;

mod canvas;
mod login;

pub fn root(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws/").route(web::get().to(ws_index)));

    canvas::configure_canvas_handlers(cfg);
    login::configure_login_handlers(cfg);
}
