//! Process-wide registry of translate shortcuts.
//!
//! Hosts look shortcuts up by name (the default name is `__`). The translator
//! only produces the bound function; registering it here is an explicit call
//! made on the host's behalf when `register_globally` is configured.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// `shortcut(key, lang)`; `None` for `lang` means the current default language.
pub type Shortcut = Arc<dyn Fn(&str, Option<&str>) -> Option<String> + Send + Sync>;

/// Named shortcuts.
#[derive(Default)]
pub struct ShortcutRegistry {
    shortcuts: RwLock<HashMap<String, Shortcut>>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<ShortcutRegistry> = OnceLock::new();

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static ShortcutRegistry {
        REGISTRY.get_or_init(ShortcutRegistry::new)
    }

    /// Register `shortcut` under `name`, replacing any previous entry.
    pub fn register(&self, name: &str, shortcut: Shortcut) {
        self.shortcuts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), shortcut);
    }

    /// Remove the shortcut registered under `name`.
    ///
    /// # Returns
    /// * `Some(Shortcut)` with the removed shortcut
    /// * `None` if nothing was registered under `name`
    pub fn unregister(&self, name: &str) -> Option<Shortcut> {
        self.shortcuts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    /// Get a shortcut by name.
    ///
    /// # Arguments
    /// * `name` - Registration name (e.g., "__")
    ///
    /// # Returns
    /// * `Some(Shortcut)` if a shortcut is registered under `name`
    /// * `None` if it is not
    pub fn get(&self, name: &str) -> Option<Shortcut> {
        self.shortcuts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Check whether a shortcut is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.shortcuts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_returns_singleton() {
        let registry1 = ShortcutRegistry::global();
        let registry2 = ShortcutRegistry::global();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_register_get_unregister() {
        let registry = ShortcutRegistry::new();
        let shortcut: Shortcut = Arc::new(|key: &str, lang: Option<&str>| {
            Some(format!("{}:{}", lang.unwrap_or("-"), key))
        });

        registry.register("t", shortcut);

        assert!(registry.contains("t"));
        let t = registry.get("t").unwrap();
        assert_eq!(t("title", Some("de")).as_deref(), Some("de:title"));
        assert_eq!(t("title", None).as_deref(), Some("-:title"));

        assert!(registry.unregister("t").is_some());
        assert!(!registry.contains("t"));
        assert!(registry.get("t").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let registry = ShortcutRegistry::new();
        registry.register("__", Arc::new(|_: &str, _: Option<&str>| Some("first".to_string())));
        registry.register("__", Arc::new(|_: &str, _: Option<&str>| Some("second".to_string())));

        let shortcut = registry.get("__").unwrap();
        assert_eq!(shortcut("k", None).as_deref(), Some("second"));
    }
}
