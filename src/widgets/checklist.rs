use crate::error::{ValidationError, WidgetError};
use crate::store::StoreHandle;
use crate::widget_state::WidgetState;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashSet;

/// Stable identifier assigned to a checklist item when it is created.
pub type ItemId = u64;

/// An entry of a [`ChecklistWidget`].
pub trait ChecklistItem: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> ItemId;
    fn set_id(&mut self, id: ItemId);
    /// Text the user recognises the item by.
    fn label(&self) -> &str;
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Ordered list of items persisted under one store key.
pub struct ChecklistWidget<I> {
    state: WidgetState<Vec<I>>,
}

impl<I: ChecklistItem> ChecklistWidget<I> {
    pub fn load(store: StoreHandle, key: &'static str) -> Self {
        Self {
            state: WidgetState::load_with(store, key, Vec::new, assign_missing_ids),
        }
    }

    pub fn items(&self) -> &[I] {
        self.state.get()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&I> {
        self.items().iter().find(|item| item.id() == id)
    }

    /// Validate `item`, give it a fresh id and append it.
    pub fn add(&mut self, mut item: I) -> Result<ItemId, WidgetError> {
        item.validate()?;
        let id = self.state.mutate(|items| {
            let id = match next_id(items) {
                Some(id) => id,
                None => {
                    renumber(items);
                    items.len() as ItemId + 1
                }
            };
            item.set_id(id);
            items.push(item);
            id
        })?;
        tracing::debug!(key = self.state.key(), id, "checklist item added");
        Ok(id)
    }

    /// Apply `f` to the item with `id`. Returns `false` for unknown ids.
    pub fn update(&mut self, id: ItemId, f: impl FnOnce(&mut I)) -> anyhow::Result<bool> {
        let Some(pos) = self.items().iter().position(|item| item.id() == id) else {
            return Ok(false);
        };
        self.state.mutate(|items| f(&mut items[pos]))?;
        Ok(true)
    }

    /// Remove every item matching `predicate` and return how many went.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&I) -> bool) -> anyhow::Result<usize> {
        let matching = self.items().iter().filter(|item| predicate(*item)).count();
        if matching == 0 {
            return Ok(0);
        }
        self.state.mutate(|items| items.retain(|item| !predicate(item)))?;
        tracing::debug!(key = self.state.key(), removed = matching, "checklist items removed");
        Ok(matching)
    }

    /// Remove the items whose ids are in `ids`.
    pub fn remove_ids(&mut self, ids: &[ItemId]) -> anyhow::Result<usize> {
        let ids: HashSet<ItemId> = ids.iter().copied().collect();
        self.remove_where(|item| ids.contains(&item.id()))
    }

    /// Remove the items whose trimmed label equals one of `labels`.
    ///
    /// Items sharing a label cannot be told apart here, so every duplicate
    /// is removed. Prefer [`ChecklistWidget::remove_ids`].
    pub fn remove_labels<S: AsRef<str>>(&mut self, labels: &[S]) -> anyhow::Result<usize> {
        let labels: HashSet<&str> = labels.iter().map(|l| l.as_ref().trim()).collect();
        self.remove_where(|item| labels.contains(item.label().trim()))
    }
}

/// One past the largest id in use, or `None` once ids are exhausted.
fn next_id<I: ChecklistItem>(items: &[I]) -> Option<ItemId> {
    items.iter().map(I::id).max().unwrap_or(0).checked_add(1)
}

/// Number every item `1..=n` in list order.
fn renumber<I: ChecklistItem>(items: &mut [I]) {
    tracing::warn!(count = items.len(), "checklist ids exhausted, renumbering");
    for (id, item) in (1..).zip(items.iter_mut()) {
        item.set_id(id);
    }
}

/// Give entries saved without an id (or with a duplicated one) a fresh id.
fn assign_missing_ids<I: ChecklistItem>(items: &mut Vec<I>) {
    // at most every item needs a new id
    let next = next_id(items).filter(|next| next.checked_add(items.len() as ItemId).is_some());
    let Some(mut next) = next else {
        renumber(items);
        return;
    };
    let mut seen = HashSet::new();
    for item in items.iter_mut() {
        if item.id() == 0 || !seen.insert(item.id()) {
            item.set_id(next);
            seen.insert(next);
            next += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        #[serde(default)]
        id: ItemId,
        text: String,
    }

    impl ChecklistItem for Item {
        fn id(&self) -> ItemId {
            self.id
        }

        fn set_id(&mut self, id: ItemId) {
            self.id = id;
        }

        fn label(&self) -> &str {
            &self.text
        }

        fn validate(&self) -> Result<(), ValidationError> {
            if self.text.trim().is_empty() {
                return Err(ValidationError::EmptyField("text"));
            }
            Ok(())
        }
    }

    fn item(text: &str) -> Item {
        Item { id: 0, text: text.into() }
    }

    #[test]
    fn legacy_entries_get_unique_ids() {
        let mut items = vec![
            item("a"),
            item("b"),
            Item { id: 4, text: "c".into() },
            Item { id: 4, text: "d".into() },
        ];
        assign_missing_ids(&mut items);
        let ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![5, 6, 4, 7]);
    }

    #[test]
    fn exhausted_ids_are_renumbered_on_load() {
        let mut items = vec![Item { id: ItemId::MAX, text: "a".into() }, item("b")];
        assign_missing_ids(&mut items);
        let ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn stored_max_id_loads_and_accepts_new_items() {
        let store = crate::store::MemoryStore::shared();
        store
            .write_raw(
                "items",
                r#"[{"id":18446744073709551615,"text":"a"},{"id":0,"text":"b"}]"#,
            )
            .unwrap();
        let mut list = ChecklistWidget::<Item>::load(store, "items");
        let c = list.add(item("c")).unwrap();
        let ids: Vec<ItemId> = list.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(c, 3);
    }

    #[test]
    fn add_renumbers_when_ids_run_out() {
        let store = crate::store::MemoryStore::shared();
        let mut list = ChecklistWidget::<Item>::load(store, "items");
        list.add(item("a")).unwrap();
        let a = list.items()[0].id;
        list.update(a, |i| i.id = ItemId::MAX).unwrap();
        let b = list.add(item("b")).unwrap();
        let ids: Vec<ItemId> = list.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(b, 2);
    }

    #[test]
    fn ids_keep_growing_after_removal() {
        let store = crate::store::MemoryStore::shared();
        let mut list = ChecklistWidget::<Item>::load(store, "items");
        let a = list.add(item("a")).unwrap();
        let b = list.add(item("b")).unwrap();
        list.remove_ids(&[a]).unwrap();
        let c = list.add(item("c")).unwrap();
        assert!(c > b);
    }
}
