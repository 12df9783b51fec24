use crate::store::{StoreHandle, MEMO_KEY};
use crate::widget_state::WidgetState;

/// Free text memo. Edits go to a draft that is saved explicitly or by the
/// dashboard's debounced autosave.
pub struct MemoWidget {
    state: WidgetState<String>,
    draft: String,
}

impl MemoWidget {
    pub fn load(store: StoreHandle) -> Self {
        let state = WidgetState::load(store, MEMO_KEY, String::new);
        let draft = state.get().clone();
        Self { state, draft }
    }

    /// Text currently shown in the editor.
    pub fn text(&self) -> &str {
        &self.draft
    }

    /// Text last written to the store.
    pub fn saved(&self) -> &str {
        self.state.get()
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != *self.state.get()
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn save(&mut self) -> anyhow::Result<()> {
        let draft = self.draft.clone();
        self.state.replace(draft)?;
        tracing::debug!(len = self.draft.len(), "memo saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn edit_is_not_persisted_until_saved() {
        let store = MemoryStore::shared();
        let mut memo = MemoWidget::load(store.clone());
        memo.edit("draft");
        assert!(memo.is_dirty());
        assert_eq!(MemoWidget::load(store.clone()).text(), "");

        memo.save().unwrap();
        assert!(!memo.is_dirty());
        assert_eq!(MemoWidget::load(store).text(), "draft");
    }
}
