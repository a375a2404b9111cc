use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use super::storage;
use super::types::Theme;

type Listener = Arc<dyn Fn(Theme) + Send + Sync>;

struct Inner {
    theme: Theme,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Process-wide theme cell with a subscriber registry.
///
/// Constructed once and handed to every view that needs it. Changes are
/// persisted (when backed by a file) and then broadcast synchronously to all
/// live subscribers, outside the lock, so listeners may read the store.
#[derive(Clone)]
pub struct ThemeStore {
    inner: Arc<Mutex<Inner>>,
    path: Option<PathBuf>,
}

impl ThemeStore {
    /// Load the saved preference from `path`, falling back to `detect()`
    /// when nothing usable has been saved.
    pub fn load(path: PathBuf, detect: impl FnOnce() -> Theme) -> Self {
        let theme = match storage::load_theme(&path) {
            Ok(Some(theme)) => theme,
            Ok(None) => detect(),
            Err(e) => {
                log::warn!("Ignoring saved theme: {:#}", e);
                detect()
            }
        };
        log::debug!("Starting with {} theme", theme);
        Self::build(theme, Some(path))
    }

    /// A store that never touches the filesystem
    pub fn in_memory(theme: Theme) -> Self {
        Self::build(theme, None)
    }

    fn build(theme: Theme, path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                theme,
                listeners: Vec::new(),
                next_id: 0,
            })),
            path,
        }
    }

    pub fn get(&self) -> Theme {
        lock(&self.inner).theme
    }

    /// Switch to `theme`. Returns false (and notifies nobody) when unchanged.
    pub fn set(&self, theme: Theme) -> bool {
        let listeners: Vec<Listener> = {
            let mut inner = lock(&self.inner);
            if inner.theme == theme {
                return false;
            }
            inner.theme = theme;
            inner.listeners.iter().map(|(_, l)| l.clone()).collect()
        };

        if let Some(path) = &self.path {
            if let Err(e) = storage::save_theme(path, theme) {
                log::warn!("Failed to save theme preference: {:#}", e);
            }
        }

        for listener in listeners {
            listener(theme);
        }
        true
    }

    pub fn toggle(&self) -> Theme {
        let next = self.get().toggled();
        self.set(next);
        next
    }

    /// Register `listener` for changes. It stays registered until the
    /// returned guard is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(Theme) + Send + Sync + 'static) -> Subscription {
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

/// Registration guard returned by [`ThemeStore::subscribe`]
pub struct Subscription {
    id: u64,
    inner: Weak<Mutex<Inner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_load_prefers_saved_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        storage::save_theme(&path, Theme::Light).unwrap();

        let store = ThemeStore::load(path, || Theme::Dark);

        assert_eq!(store.get(), Theme::Light);
    }

    #[test]
    fn test_load_falls_back_to_detected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::load(dir.path().join("theme.json"), || Theme::Light);
        assert_eq!(store.get(), Theme::Light);
    }

    #[test]
    fn test_load_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        std::fs::write(&path, "not json").unwrap();

        let store = ThemeStore::load(path, || Theme::Dark);

        assert_eq!(store.get(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        let store = ThemeStore::load(path.clone(), || Theme::Dark);

        assert_eq!(store.toggle(), Theme::Light);

        let reloaded = ThemeStore::load(path, || Theme::Dark);
        assert_eq!(reloaded.get(), Theme::Light);
    }

    #[test]
    fn test_toggle_notifies_every_subscriber() {
        let store = ThemeStore::in_memory(Theme::Dark);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let seen = seen.clone();
            store.subscribe(move |t| seen.lock().unwrap().push(("first", t)))
        };
        let second = {
            let seen = seen.clone();
            store.subscribe(move |t| seen.lock().unwrap().push(("second", t)))
        };

        store.toggle();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", Theme::Light), ("second", Theme::Light)]
        );
        drop(first);
        drop(second);
    }

    #[test]
    fn test_dropped_subscription_stops_notifications() {
        let store = ThemeStore::in_memory(Theme::Dark);
        let count = Arc::new(AtomicUsize::new(0));
        let subscription = {
            let count = count.clone();
            store.subscribe(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        store.toggle();
        drop(subscription);
        store.toggle();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_set_same_theme_is_silent() {
        let store = ThemeStore::in_memory(Theme::Dark);
        let count = Arc::new(AtomicUsize::new(0));
        let _subscription = {
            let count = count.clone();
            store.subscribe(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        assert!(!store.set(Theme::Dark));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_can_read_store() {
        let store = ThemeStore::in_memory(Theme::Light);
        let observed = Arc::new(Mutex::new(None));
        let _subscription = {
            let observed = observed.clone();
            let reader = store.clone();
            store.subscribe(move |_| *observed.lock().unwrap() = Some(reader.get()))
        };

        store.toggle();

        assert_eq!(*observed.lock().unwrap(), Some(Theme::Dark));
    }

    #[test]
    fn test_subscription_outliving_store() {
        let store = ThemeStore::in_memory(Theme::Dark);
        let subscription = store.subscribe(|_| {});
        drop(store);
        drop(subscription);
    }
}
