use crate::store::{self, StoreHandle, StoreRead};
use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};

/// Where the value held by a [`WidgetState`] came from when it was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Stored,
    Absent,
    /// The stored value was unreadable and the default was used instead.
    Corrupt,
}

/// Binds one store key to the in-memory value of one widget.
///
/// [`WidgetState::mutate`] is the only way to change the value. It persists
/// the new value before committing it to memory, so after any completed
/// mutation the store and memory hold the same thing.
pub struct WidgetState<T> {
    store: StoreHandle,
    key: &'static str,
    value: T,
    origin: LoadOrigin,
}

impl<T> WidgetState<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn load(store: StoreHandle, key: &'static str, default: impl FnOnce() -> T) -> Self {
        Self::load_with(store, key, default, |_| {})
    }

    /// Load the value and run `normalize` over it before it is exposed.
    ///
    /// The normalized value is not written back; it reaches the store with
    /// the next mutation. `normalize` must therefore give the same result
    /// when applied to the same stored value again.
    pub fn load_with(
        store: StoreHandle,
        key: &'static str,
        default: impl FnOnce() -> T,
        normalize: impl FnOnce(&mut T),
    ) -> Self {
        let (mut value, origin) = match store::get::<T>(store.as_ref(), key) {
            StoreRead::Present(value) => (value, LoadOrigin::Stored),
            StoreRead::Absent => (default(), LoadOrigin::Absent),
            StoreRead::Corrupt(reason) => {
                tracing::warn!(key, %reason, "using default widget state");
                (default(), LoadOrigin::Corrupt)
            }
        };
        normalize(&mut value);
        Self {
            store,
            key,
            value,
            origin,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }

    /// Apply `f` to a copy of the value, persist the copy and then keep it.
    ///
    /// When persisting fails the in-memory value is left untouched and the
    /// error is returned.
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> anyhow::Result<R> {
        let mut next = self.value.clone();
        let out = f(&mut next);
        store::set(self.store.as_ref(), self.key, &next)
            .with_context(|| format!("failed to persist `{}`", self.key))?;
        self.value = next;
        Ok(out)
    }

    pub fn replace(&mut self, value: T) -> anyhow::Result<()> {
        self.mutate(|current| *current = value)
    }
}
