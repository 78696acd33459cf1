use serde::Deserialize;

use crate::{include_res, page::{Mutation, Port}, res};

pub const PLACEHOLDER_SELECTOR: &str = "#photoHolder";

/// A photo as the upload endpoint reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoRecord {
    pub id: i64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoItem {
    pub id: i64,
    pub url: String,
    pub selected: bool,
}

impl PhotoItem {
    pub fn selector(&self) -> String {
        format!(r#".photo-item[data-photo-id="{}"]"#, self.id)
    }

    pub fn to_html(&self) -> String {
        include_res!(str, "/pages/photos/photo_item.html")
            .replace("{id}", &self.id.to_string())
            .replace("{url}", &res::escape(&self.url))
    }
}

impl From<&PhotoRecord> for PhotoItem {
    fn from(record: &PhotoRecord) -> Self {
        PhotoItem { id: record.id, url: record.url.clone(), selected: false }
    }
}

/// Render state of the photo gallery. The "no photos yet" placeholder is not
/// stored; it is shown exactly when there are no items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    items: Vec<PhotoItem>,
}

impl Gallery {
    /// The gallery as the server rendered it.
    pub fn new(items: Vec<PhotoItem>) -> Gallery {
        Gallery { items }
    }

    pub fn items(&self) -> &[PhotoItem] {
        &self.items
    }

    pub fn shows_placeholder(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_ids(&self) -> Vec<i64> {
        self.items.iter()
            .filter(|item| item.selected)
            .map(|item| item.id)
            .collect()
    }

    pub fn set_selected(&mut self, id: i64, selected: bool) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Appends one item per record, in the order given. Ids are taken as the
    /// server reports them, repeats included.
    pub fn append(&mut self, records: &[PhotoRecord]) -> Vec<Mutation> {
        if records.is_empty() {
            return Vec::new();
        }

        let mut mutations = Vec::with_capacity(records.len() + 1);
        if self.shows_placeholder() {
            mutations.push(Mutation::Remove { selector: PLACEHOLDER_SELECTOR.to_owned() });
        }

        for record in records {
            let item = PhotoItem::from(record);
            mutations.push(Mutation::Append { port: Port::Gallery, html: item.to_html() });
            self.items.push(item);
        }
        mutations
    }

    pub fn remove(&mut self, ids: &[i64]) -> Vec<Mutation> {
        let had_items = !self.shows_placeholder();

        let mut mutations = Vec::new();
        self.items.retain(|item| {
            let gone = ids.contains(&item.id);
            if gone {
                mutations.push(Mutation::Remove { selector: item.selector() });
            }
            !gone
        });

        if had_items && self.shows_placeholder() {
            mutations.push(Mutation::Append {
                port: Port::Gallery,
                html: include_res!(str, "/pages/photos/placeholder.html").trim_end().to_owned(),
            });
        }

        mutations
    }
}
