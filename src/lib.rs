pub mod api;
pub mod chat;
pub mod config;
pub mod cursor;
pub mod feed;
pub mod page;
pub mod photos;
pub mod res;

use std::fmt;

pub use api::Api;
pub use config::Config;
pub use cursor::PageContext;
pub use page::{Disposer, Mutation, Port, Prompt};

pub type ClientResult<T> = Result<T, ClientError>;
#[derive(Debug)]
pub struct ClientError(pub anyhow::Error);

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

impl std::error::Error for ClientError {}

impl From<String> for ClientError {
    fn from(err: String) -> Self {
        Self(anyhow::Error::msg(err))
    }
}

impl From<&str> for ClientError {
    fn from(err: &str) -> Self {
        Self(anyhow::Error::msg(err.to_owned()))
    }
}

macro_rules! clienterr_impl {
    ($E:ty) => {
        impl From<$E> for ClientError {
            fn from(err: $E) -> Self {
                Self(anyhow::Error::from(err))
            }
        }
    };
}

clienterr_impl!(serde_json::Error);
clienterr_impl!(reqwest::Error);
clienterr_impl!(reqwest::header::InvalidHeaderValue);
clienterr_impl!(tokio_tungstenite::tungstenite::Error);
clienterr_impl!(std::io::Error);
