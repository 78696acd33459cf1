use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::{page::{Mutation, Port}, Api, PageContext};

use super::{wall_clock, Bubble, ChatView, Incoming, Outgoing};

pub struct ChatController {
    viewer: String,
    view: ChatView,
    history: PageContext,
    outbox: mpsc::UnboundedSender<String>,
}

impl ChatController {
    pub fn new(viewer: impl Into<String>, outbox: mpsc::UnboundedSender<String>) -> ChatController {
        ChatController {
            viewer: viewer.into(),
            view: ChatView::default(),
            history: PageContext::default(),
            outbox,
        }
    }

    pub fn view(&self) -> &ChatView {
        &self.view
    }

    pub fn history_context(&self) -> PageContext {
        self.history
    }

    /// Appends `bubbles` to the page and keeps the newest one in view.
    pub fn show(&mut self, bubbles: &[Bubble]) -> Vec<Mutation> {
        let mut mutations = self.view.append(bubbles);
        mutations.push(Mutation::ScrollToBottom(Port::ChatContainer));
        mutations
    }

    /// Fetches the next history page and advances the cursor past it.
    /// `None` when the page couldn't be loaded.
    pub async fn fetch_history(&mut self, api: &Api) -> Option<Vec<Bubble>> {
        let messages = match api.load_messages(self.history).await {
            Ok(messages) => messages,
            Err(e) => {
                error!("error loading messages: {e}");
                return None;
            }
        };

        self.history = self.history.next(messages.last().and_then(|msg| msg.id));

        Some(
            messages.iter()
                .map(|msg| Bubble::new(&msg.sender, &msg.message, &msg.timestamp, &self.viewer))
                .collect()
        )
    }

    pub async fn load_history(&mut self, api: &Api) -> Vec<Mutation> {
        match self.fetch_history(api).await {
            Some(bubbles) => self.show(&bubbles),
            None => Vec::new(),
        }
    }

    /// Decodes one socket payload. Undecodable payloads are logged and dropped.
    pub fn receive(&self, payload: &str) -> Option<Bubble> {
        match serde_json::from_str::<Incoming>(payload) {
            Ok(incoming) => Some(Bubble::new(&incoming.username, &incoming.message, &incoming.time, &self.viewer)),
            Err(e) => {
                error!("undecodable chat payload {payload:?}: {e}");
                None
            }
        }
    }

    pub fn on_incoming(&mut self, payload: &str) -> Vec<Mutation> {
        match self.receive(payload) {
            Some(bubble) => self.show(&[bubble]),
            None => Vec::new(),
        }
    }

    /// Queues `input` on the socket and clears it, whether or not the socket took it.
    pub fn send_message(&mut self, input: &mut String) -> Vec<Mutation> {
        let outgoing = Outgoing {
            message: std::mem::take(input),
            username: self.viewer.clone(),
            time: wall_clock(),
        };

        match serde_json::to_string(&outgoing) {
            Ok(payload) => {
                if self.outbox.send(payload).is_err() {
                    error!("chat socket is closed, message dropped");
                }
            }
            Err(e) => error!("can't encode chat message: {e}"),
        }

        vec![Mutation::ClearInput(Port::MessageInput)]
    }

    pub fn on_key_up(&mut self, key: &str, input: &mut String) -> Vec<Mutation> {
        if key != "Enter" {
            return Vec::new();
        }
        debug!("enter pressed, sending");
        self.send_message(input)
    }

    pub fn open_menu(&mut self) -> Vec<Mutation> {
        self.view.set_menu(true)
    }

    pub fn close_menu(&mut self) -> Vec<Mutation> {
        self.view.set_menu(false)
    }
}
