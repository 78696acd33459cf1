use std::fmt;

use serde::Deserialize;

use crate::{include_res, page::{Mutation, Port}, res};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileCard {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub bio: String,
    pub photo: String,
}

impl ProfileCard {
    pub fn to_html(&self) -> String {
        include_res!(str, "/pages/feed/card.html")
            .replace("{id}", &self.id.to_string())
            .replace("{age}", &self.age.map(|age| age.to_string()).unwrap_or_default())
            .replace("{photo}", &res::escape(&self.photo))
            .replace("{username}", &res::escape(&self.username))
            .replace("{bio}", &res::escape(&self.bio))
    }
}

impl fmt::Display for ProfileCard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.username)?;
        if let Some(age) = self.age {
            write!(f, ", {age}")?;
        }
        if !self.bio.is_empty() {
            write!(f, ": {}", self.bio)?;
        }
        Ok(())
    }
}

/// Render state of the profile feed. Cards are never de-duplicated, and
/// once handed to the page only their count is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Feed {
    shown: usize,
    matches_open: bool,
}

impl Feed {
    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn matches_open(&self) -> bool {
        self.matches_open
    }

    pub fn append(&mut self, profiles: &[ProfileCard]) -> Vec<Mutation> {
        self.shown += profiles.len();
        profiles.iter()
            .map(|card| Mutation::Append { port: Port::Feed, html: card.to_html() })
            .collect()
    }

    pub fn set_matches(&mut self, open: bool) -> Vec<Mutation> {
        if self.matches_open == open {
            return Vec::new();
        }
        self.matches_open = open;
        vec![Mutation::SetVisible { port: Port::MatchesMenu, visible: open }]
    }
}
