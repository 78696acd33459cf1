use reqwest::{header::{HeaderMap, HeaderValue, COOKIE}, multipart, Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{chat::ChatMessage, feed::ProfileCard, photos::{PhotoFile, PhotoRecord}, ClientError, ClientResult, Config, PageContext};

pub const LOAD_MESSAGES: &str = "/api/load_messages/";
pub const LOAD_PROFILES: &str = "/api/load_profiles/";
pub const UPLOAD_PHOTOS: &str = "/upload_photos/";
pub const DELETE_PHOTOS: &str = "/delete_selected_photos/";
pub const CHAT_SOCKET: &str = "/ws/chat/";

pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const PHOTO_FIELD: &str = "profilePhotos";

#[derive(Deserialize)]
struct MessagesResponse {
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ProfilesResponse {
    profiles: Vec<ProfileCard>,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(rename = "profilePhotos", default)]
    pub profile_photos: Option<Vec<PhotoRecord>>,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    photo_ids: &'a [i64],
}

#[derive(Debug, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Serialize)]
struct CursorQuery {
    last_id: i64,
}

/// Http side of the page. Every request carries the session cookie, mutating
/// ones carry the csrf token as well.
#[derive(Debug, Clone)]
pub struct Api {
    http: Client,
    base_url: Url,
    csrf_token: String,
}

impl Api {
    pub fn new(config: &Config) -> ClientResult<Api> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = config.session_cookie() {
            headers.insert(COOKIE, HeaderValue::from_str(&cookie)?);
        }

        let http = Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Api {
            http,
            base_url: config.base_url.clone(),
            csrf_token: config.csrf_token.clone(),
        })
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        self.base_url.join(path)
            .map_err(|e| ClientError::from(format!("invalid endpoint {path}: {e}")))
    }

    pub async fn load_messages(&self, ctx: PageContext) -> ClientResult<Vec<ChatMessage>> {
        debug!("loading messages after {}", ctx.cursor);
        let body: MessagesResponse = self.http.get(self.url(LOAD_MESSAGES)?)
            .query(&CursorQuery { last_id: ctx.cursor })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body.messages)
    }

    pub async fn load_profiles(&self, ctx: PageContext) -> ClientResult<Vec<ProfileCard>> {
        debug!("loading profiles after {}", ctx.cursor);
        let body: ProfilesResponse = self.http.get(self.url(LOAD_PROFILES)?)
            .query(&CursorQuery { last_id: ctx.cursor })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body.profiles)
    }

    pub async fn upload_photos(&self, files: Vec<PhotoFile>) -> ClientResult<UploadResponse> {
        let mut form = multipart::Form::new();
        for PhotoFile { name, mime, bytes } in files {
            let part = multipart::Part::bytes(bytes)
                .file_name(name)
                .mime_str(&mime)?;
            form = form.part(PHOTO_FIELD, part);
        }

        Ok(
            self.http.post(self.url(UPLOAD_PHOTOS)?)
                .header(CSRF_HEADER, &self.csrf_token)
                .multipart(form)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?
        )
    }

    pub async fn delete_photos(&self, photo_ids: &[i64]) -> ClientResult<DeleteResponse> {
        Ok(
            self.http.post(self.url(DELETE_PHOTOS)?)
                .header(CSRF_HEADER, &self.csrf_token)
                .json(&DeleteRequest { photo_ids })
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?
        )
    }
}
