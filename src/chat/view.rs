use std::fmt;

use uuid::Uuid;

use crate::{include_res, page::{Mutation, Port}, res};

use super::format_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

impl Align {
    /// Only the viewer's own messages go right. Nobody owns anything when logged out.
    pub fn for_sender(sender: &str, viewer: &str) -> Align {
        if !viewer.is_empty() && sender == viewer {
            Align::Right
        } else {
            Align::Left
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub key: Uuid,
    pub sender: String,
    pub text: String,
    pub time: String,
    pub align: Align,
}

impl Bubble {
    pub fn new(sender: &str, text: &str, timestamp: &str, viewer: &str) -> Bubble {
        Bubble {
            key: Uuid::now_v7(),
            sender: sender.to_owned(),
            text: text.to_owned(),
            time: format_time(timestamp),
            align: Align::for_sender(sender, viewer),
        }
    }

    pub fn to_html(&self) -> String {
        include_res!(str, "/pages/chat/bubble.html")
            .replace("{align}", self.align.class())
            .replace("{key}", &self.key.simple().to_string())
            .replace("{time}", &res::escape(&self.time))
            .replace("{sender}", &res::escape(&self.sender))
            .replace("{text}", &res::escape(&self.text))
    }
}

impl fmt::Display for Bubble {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.align {
            Align::Left => write!(f, "[{}] {}: {}", self.time, self.sender, self.text),
            Align::Right => write!(f, "{:>60}", format!("{} [{}]", self.text, self.time)),
        }
    }
}

/// Render state of the chat panel. Bubbles are handed to the page and
/// forgotten; only how many have been shown is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatView {
    shown: usize,
    menu_open: bool,
}

impl ChatView {
    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn append(&mut self, bubbles: &[Bubble]) -> Vec<Mutation> {
        self.shown += bubbles.len();
        bubbles.iter()
            .map(|bubble| Mutation::Append { port: Port::ChatContainer, html: bubble.to_html() })
            .collect()
    }

    pub fn set_menu(&mut self, open: bool) -> Vec<Mutation> {
        if self.menu_open == open {
            return Vec::new();
        }
        self.menu_open = open;
        vec![Mutation::SetVisible { port: Port::ChatMenu, visible: open }]
    }
}
