mod gallery;
mod manager;

pub use gallery::{Gallery, PhotoItem, PhotoRecord, PLACEHOLDER_SELECTOR};
pub use manager::{PhotoFile, PhotoManager, CONFIRM_DELETE, DELETE_FAILED, SELECT_FIRST, UPLOAD_FAILED};
