use serde::{Deserialize, Serialize};

/// One entry of the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: Option<i64>,
    pub sender: String,
    pub message: String,
    pub timestamp: String,
}

/// What the socket delivers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Incoming {
    pub username: String,
    pub message: String,
    pub time: String,
}

/// What we put on the socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outgoing {
    pub message: String,
    pub username: String,
    pub time: String,
}
