use actix::{Actor, ActorContext, AsyncContext, Handler, Message, Running, StreamHandler};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;

use scribble_system::{SessionId, SyncMessage};

use crate::connection_tx_storage::ConnectionTx;
use crate::server::{ServerCommand, ServerTx};

#[derive(Debug)]
pub enum ConnectionCommand {
    Connect { tx: ConnectionTx },
    Disconnect { from: SessionId },
    Message { from: SessionId, message: SyncMessage },
}

#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    Connected { session_id: SessionId },
    Push(SyncMessage),
}

#[derive(Message)]
#[rtype(result = "()")]
struct ConnectionActorMessage(ConnectionEvent);

enum ConnectionState {
    Idle,
    Connected(SessionId),
}

struct ConnectionActor {
    state: ConnectionState,
    srv_tx: ServerTx,
}

impl Actor for ConnectionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<ConnectionEvent>(32);

        self.srv_tx
            .try_send(ServerCommand::Connection(ConnectionCommand::Connect { tx }))
            .expect("server must not be closed yet");

        let addr = ctx.address().recipient();

        tokio::spawn(async move {
            let addr = addr;
            log::debug!("connection green thread - started");
            while let Some(event) = rx.recv().await {
                if addr.try_send(ConnectionActorMessage(event)).is_err() {
                    break;
                }
            }
            log::debug!("connection green thread - terminated");
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        if let ConnectionState::Connected(from) = self.state {
            let _ = self
                .srv_tx
                .try_send(ServerCommand::Connection(ConnectionCommand::Disconnect { from }));
        }

        Running::Stop
    }
}

/// Ingress
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ConnectionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Text(text)) => {
                if let ConnectionState::Connected(from) = self.state {
                    match SyncMessage::decode(&text) {
                        Ok(message) => {
                            log::debug!("ingress from {}: {:?}", from, message);
                            let _ = self.srv_tx.try_send(ServerCommand::Connection(
                                ConnectionCommand::Message { from, message },
                            ));
                        }
                        // A bad frame costs only itself; the connection
                        // stays up.
                        Err(err) => {
                            log::warn!("ignoring malformed frame from {}: {}", from, err)
                        }
                    }
                }
            }
            Ok(ws::Message::Close(_)) => {
                if let ConnectionState::Connected(from) = self.state {
                    let _ = self
                        .srv_tx
                        .try_send(ServerCommand::Connection(ConnectionCommand::Disconnect {
                            from,
                        }));
                    self.state = ConnectionState::Idle;
                }
                ctx.stop();
            }
            _ => (),
        }
    }
}

/// Egress
impl Handler<ConnectionActorMessage> for ConnectionActor {
    type Result = ();

    fn handle(
        &mut self,
        msg: ConnectionActorMessage,
        ctx: &mut ws::WebsocketContext<Self>,
    ) -> Self::Result {
        match msg.0 {
            ConnectionEvent::Connected { session_id } => {
                self.state = ConnectionState::Connected(session_id);
            }
            ConnectionEvent::Push(message) => match message.encode() {
                Ok(text) => ctx.text(text),
                Err(err) => log::warn!("failed to encode push frame: {}", err),
            },
        }
    }
}

pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    srv_tx: web::Data<ServerTx>,
) -> Result<HttpResponse, Error> {
    ws::start(
        ConnectionActor {
            srv_tx: srv_tx.get_ref().clone(),
            state: ConnectionState::Idle,
        },
        &req,
        stream,
    )
}
