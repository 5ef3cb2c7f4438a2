//! WebSocket transport: one socket per active room membership.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use protocol::{Event, Message, Payload};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::dispatch::Dispatcher;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketStatus {
    Active,
    Closed,
}

pub struct Transport {
    socket: Option<WsStream>,
    dispatcher: Dispatcher,
    identity: Rc<Cell<Option<i32>>>,
}

impl Transport {
    /// `identity` is owned by the session facade; the transport only clears
    /// it when the connection dies underneath us.
    pub fn new(identity: Rc<Cell<Option<i32>>>) -> Self {
        Self {
            socket: None,
            dispatcher: Dispatcher::new(),
            identity,
        }
    }

    /// Opens the game socket for `room_id`. Any previous socket is closed
    /// first: at most one live connection per client, no pooling. Identity
    /// must already be recorded by the caller.
    pub async fn connect(
        &mut self,
        ws_base: &str,
        room_id: u16,
        player_id: i32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(mut old) = self.socket.take() {
            let _ = old.close(None).await;
        }

        let url = format!("{ws_base}/play?playerId={player_id}&roomId={room_id}");
        let (socket, _) = connect_async(url.as_str()).await?;
        info!("connected to room {room_id} as player {player_id}");

        self.socket = Some(socket);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Fire-and-forget: encodes one envelope and writes one frame. A send
    /// while disconnected is dropped (logged), never queued and never an
    /// error to the caller.
    pub async fn send(&mut self, event: Event, payload: Payload, id: Option<i32>) {
        let Some(socket) = self.socket.as_mut() else {
            debug!("not connected, dropping outbound {event}");
            return;
        };

        let message = Message {
            event,
            id,
            time: Some(now_millis()),
            payload: Some(payload),
        };

        let bytes = match message.encode() {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("failed to encode {event}: {err}");
                return;
            }
        };

        if let Err(err) = socket.send(WsMessage::Binary(bytes)).await {
            warn!("failed to send {event}: {err}");
        }
    }

    /// Waits for the next inbound frame and hands it to the dispatcher.
    /// Malformed frames are logged and dropped; the connection stays open.
    /// A close from the far side tears down exactly like `disconnect` and
    /// additionally clears the local identity.
    pub async fn poll(&mut self) -> SocketStatus {
        let Some(socket) = self.socket.as_mut() else {
            return SocketStatus::Closed;
        };

        match socket.next().await {
            Some(Ok(WsMessage::Binary(data))) => {
                match Message::decode(&data) {
                    Ok(message) => self.dispatcher.dispatch(message),
                    Err(err) => warn!("dropping undecodable frame: {err}"),
                }
                SocketStatus::Active
            }
            Some(Ok(WsMessage::Close(_))) | None => {
                self.teardown();
                SocketStatus::Closed
            }
            Some(Ok(_)) => SocketStatus::Active,
            Some(Err(err)) => {
                warn!("socket error: {err}");
                self.teardown();
                SocketStatus::Closed
            }
        }
    }

    /// Idempotent. The socket is detached before dispatch state is cleared
    /// so a close-triggered frame can never race the teardown.
    pub async fn disconnect(&mut self) {
        let socket = self.socket.take();
        self.dispatcher.clear();
        if let Some(mut socket) = socket {
            let _ = socket.close(None).await;
        }
    }

    fn teardown(&mut self) {
        self.socket = None;
        self.identity.set(None);
        self.dispatcher.clear();
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}
