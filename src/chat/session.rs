use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, http::{header::COOKIE, HeaderValue}, Message},
};
use tracing::{debug, error, info};

use crate::{ClientResult, Config, Disposer};

/// The page's one chat connection. There is no reconnect: once it closes or
/// errors it stays dead until a new session is made.
pub struct ChatSession {
    incoming: mpsc::UnboundedReceiver<String>,
    outbox: mpsc::UnboundedSender<String>,
}

impl ChatSession {
    pub async fn connect(config: &Config) -> ClientResult<(ChatSession, Disposer)> {
        let url = config.socket_url()?;
        let mut request = url.as_str().into_client_request()?;
        if let Some(cookie) = config.session_cookie() {
            request.headers_mut().insert(COOKIE, HeaderValue::from_str(&cookie)?);
        }

        let (stream, _) = connect_async(request).await?;
        info!("chat connection to {url} is ready");

        let (mut sender, mut receiver) = stream.split();
        let (outbox, mut outgoing) = mpsc::unbounded_channel::<String>();
        let (inbox, incoming) = mpsc::unbounded_channel::<String>();

        let send_task = tokio::spawn(async move {
            while let Some(payload) = outgoing.recv().await {
                if let Err(e) = sender.send(Message::text(payload)).await {
                    error!("chat socket error: {e}");
                    break;
                }
            }
        });

        let recv_task = tokio::spawn(async move {
            while let Some(frame) = receiver.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        if inbox.send(text.as_str().to_owned()).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(other) => debug!("ignoring chat frame {other:?}"),
                    Err(e) => {
                        error!("chat socket error: {e}");
                        break;
                    }
                }
            }
            info!("chat connection closed");
        });

        Ok((
            ChatSession { incoming, outbox },
            Disposer::new([send_task.abort_handle(), recv_task.abort_handle()]),
        ))
    }

    /// Where [`ChatController`](super::ChatController) queues outgoing payloads.
    pub fn outbox(&self) -> mpsc::UnboundedSender<String> {
        self.outbox.clone()
    }

    /// The next text payload, or `None` once the connection is gone.
    pub async fn next_payload(&mut self) -> Option<String> {
        self.incoming.recv().await
    }
}
