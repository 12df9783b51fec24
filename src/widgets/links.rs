use super::checklist::{ChecklistItem, ChecklistWidget, ItemId};
use crate::error::ValidationError;
use crate::store::{StoreHandle, CUSTOM_LINKS_KEY};
use serde::{Deserialize, Serialize};

/// User defined shortcut shown in the link list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    pub url: String,
}

impl LinkItem {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            id: 0,
            name: name.trim().to_string(),
            url: url.trim().to_string(),
        }
    }
}

impl ChecklistItem for LinkItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn set_id(&mut self, id: ItemId) {
        self.id = id;
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("link name"));
        }
        if self.url.trim().is_empty() {
            return Err(ValidationError::EmptyField("url"));
        }
        Ok(())
    }
}

pub type LinkList = ChecklistWidget<LinkItem>;

impl ChecklistWidget<LinkItem> {
    pub fn load_links(store: StoreHandle) -> Self {
        Self::load(store, CUSTOM_LINKS_KEY)
    }
}
