use std::path::Path;

use tracing::{error, info};

use crate::{page::Mutation, Api, ClientError, ClientResult, Prompt};

use super::Gallery;

pub const UPLOAD_FAILED: &str = "Failed to upload photos. Please try again later.";
pub const SELECT_FIRST: &str = "Please select photos to delete.";
pub const CONFIRM_DELETE: &str = "Are you sure you want to delete the selected photos?";
pub const DELETE_FAILED: &str = "Failed to delete photos. Please try again later.";

/// One file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> PhotoFile {
        PhotoFile { name: name.into(), mime: mime.into(), bytes }
    }

    pub async fn open(path: impl AsRef<Path>) -> ClientResult<PhotoFile> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path.file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ClientError::from(format!("{} has no usable file name", path.display())))?;

        Ok(PhotoFile::new(name, mime_for(path), bytes))
    }
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Upload and multi-select delete for the profile gallery. Mutations are only
/// produced once the server has confirmed a change.
pub struct PhotoManager<P> {
    gallery: Gallery,
    prompt: P,
}

impl<P: Prompt> PhotoManager<P> {
    pub fn new(gallery: Gallery, prompt: P) -> PhotoManager<P> {
        PhotoManager { gallery, prompt }
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn toggle(&mut self, photo_id: i64, checked: bool) {
        if !self.gallery.set_selected(photo_id, checked) {
            error!("no photo {photo_id} in the gallery");
        }
    }

    pub async fn upload_photos(&mut self, api: &Api, files: Vec<PhotoFile>) -> Vec<Mutation> {
        if files.is_empty() {
            info!("no files selected");
            return Vec::new();
        }

        let response = match api.upload_photos(files).await {
            Ok(response) => response,
            Err(e) => {
                error!("error uploading photos: {e}");
                self.prompt.alert(UPLOAD_FAILED);
                return Vec::new();
            }
        };

        if !response.success {
            error!("unexpected upload response: {response:?}");
            return Vec::new();
        }
        let Some(records) = response.profile_photos else {
            error!("upload response without photos");
            return Vec::new();
        };

        self.gallery.append(&records)
    }

    pub async fn delete_selected(&mut self, api: &Api) -> Vec<Mutation> {
        let photo_ids = self.gallery.selected_ids();
        if photo_ids.is_empty() {
            self.prompt.alert(SELECT_FIRST);
            return Vec::new();
        }

        if !self.prompt.confirm(CONFIRM_DELETE) {
            return Vec::new();
        }

        match api.delete_photos(&photo_ids).await {
            Ok(response) if response.success => self.gallery.remove(&photo_ids),
            Ok(response) => {
                error!("server refused to delete photos: {}", response.error.as_deref().unwrap_or("no reason given"));
                self.prompt.alert(DELETE_FAILED);
                Vec::new()
            }
            Err(e) => {
                error!("error deleting photos: {e}");
                self.prompt.alert(DELETE_FAILED);
                Vec::new()
            }
        }
    }
}
