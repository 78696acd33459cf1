//! The page the components render into.
//!
//! Components never touch a document directly. Every state change comes
//! back as a list of [`Mutation`]s addressed to a [`Port`], and the host
//! applies them.

use tokio::task::AbortHandle;

/// Elements the components write into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    ChatContainer,
    MessageInput,
    ChatMenu,
    Feed,
    MatchesMenu,
    Gallery,
}

impl Port {
    pub fn selector(&self) -> &'static str {
        use Port::*;
        match self {
            ChatContainer => "#id_chat_item_container",
            MessageInput => "#id_message_send_input",
            ChatMenu => "#chatMenu",
            Feed => "#feed",
            MatchesMenu => "#matchesMenu",
            Gallery => ".photo-gallery",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Append { port: Port, html: String },
    Remove { selector: String },
    ScrollToBottom(Port),
    ClearInput(Port),
    SetVisible { port: Port, visible: bool },
}

/// Blocking user-facing dialogs.
pub trait Prompt {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

impl<P: Prompt + ?Sized> Prompt for &P {
    fn alert(&self, message: &str) {
        (**self).alert(message)
    }

    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }
}

/// Tears down the background tasks a component started. Dropping it has the same effect.
#[must_use = "dropping a Disposer stops the component immediately"]
pub struct Disposer {
    tasks: Vec<AbortHandle>,
}

impl Disposer {
    pub(crate) fn new(tasks: impl IntoIterator<Item = AbortHandle>) -> Disposer {
        Disposer { tasks: tasks.into_iter().collect() }
    }

    pub fn dispose(self) {}
}

impl Drop for Disposer {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
