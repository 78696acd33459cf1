use reqwest::Url;

use crate::{api::CHAT_SOCKET, feed::Overlap, ClientError, ClientResult};

pub const DEFAULT_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    /// Username of whoever the page was rendered for. Empty when logged out.
    pub viewer: String,
    pub csrf_token: String,
    /// Value of the `sessionid` cookie every request carries.
    pub session: Option<String>,
    pub overlap: Overlap,
}

impl Config {
    pub fn new(base_url: &str) -> ClientResult<Config> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::from(format!("invalid base url {base_url:?}: {e}")))?;

        Ok(Config {
            base_url,
            viewer: String::new(),
            csrf_token: String::new(),
            session: None,
            overlap: Overlap::default(),
        })
    }

    pub fn from_env() -> ClientResult<Config> {
        dotenv::dotenv().ok();

        let base_url = dotenv::var("KINDRED_URL").unwrap_or_else(|_| DEFAULT_URL.to_owned());
        let mut config = Config::new(&base_url)?
            .with_viewer(dotenv::var("KINDRED_USER").unwrap_or_default())
            .with_csrf_token(dotenv::var("KINDRED_CSRF_TOKEN").unwrap_or_default());

        if let Ok(session) = dotenv::var("KINDRED_SESSION") {
            config = config.with_session(session);
        }
        if let Ok(guard) = dotenv::var("KINDRED_FEED_GUARD") {
            if matches!(guard.as_str(), "1" | "true" | "yes") {
                config = config.with_overlap(Overlap::Guard);
            }
        }

        Ok(config)
    }

    pub fn with_viewer(mut self, viewer: impl Into<String>) -> Self {
        self.viewer = viewer.into();
        self
    }

    pub fn with_csrf_token(mut self, csrf_token: impl Into<String>) -> Self {
        self.csrf_token = csrf_token.into();
        self
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        let session: String = session.into();
        self.session = Some(session).filter(|s| !s.is_empty());
        self
    }

    pub fn with_overlap(mut self, overlap: Overlap) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn session_cookie(&self) -> Option<String> {
        self.session.as_ref().map(|session| format!("sessionid={session}"))
    }

    /// The chat socket lives on the same host, over ws or wss to match the page.
    pub fn socket_url(&self) -> ClientResult<Url> {
        let mut url = self.base_url.join(CHAT_SOCKET)
            .map_err(|e| ClientError::from(format!("invalid socket url: {e}")))?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|_| ClientError::from(format!("can't open a socket to {}", self.base_url)))?;
        Ok(url)
    }
}
