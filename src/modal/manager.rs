//! Registry of dialogs by id.

use super::dialog::{Modal, ModalOptions};

/// Owns every dialog of the application.
#[derive(Debug, Default)]
pub struct ModalManager {
    modals: Vec<Modal>,
}

impl ModalManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new dialog. An existing dialog with the same id is replaced.
    pub fn create(&mut self, id: &str, options: ModalOptions) -> &mut Modal {
        if let Some(index) = self.modals.iter().position(|m| m.id() == id) {
            self.modals.remove(index);
        }
        self.modals.push(Modal::new(id, options));
        let last = self.modals.len() - 1;
        &mut self.modals[last]
    }

    /// Look up a dialog.
    pub fn get(&self, id: &str) -> Option<&Modal> {
        self.modals.iter().find(|m| m.id() == id)
    }

    /// Look up a dialog for changes.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Modal> {
        self.modals.iter_mut().find(|m| m.id() == id)
    }

    /// Hide and unregister a dialog.
    pub fn destroy(&mut self, id: &str) -> bool {
        let Some(index) = self.modals.iter().position(|m| m.id() == id) else {
            return false;
        };
        let mut modal = self.modals.remove(index);
        modal.destroy();
        true
    }

    /// Hide every dialog.
    pub fn hide_all(&mut self) {
        for modal in self.modals.iter_mut().filter(|m| m.is_visible()) {
            modal.hide();
        }
    }

    /// Most recently registered dialog that is visible.
    pub fn active(&self) -> Option<&Modal> {
        self.modals.iter().rev().find(|m| m.is_visible())
    }

    /// Number of registered dialogs.
    pub fn len(&self) -> usize {
        self.modals.len()
    }

    /// Whether no dialog is registered.
    pub fn is_empty(&self) -> bool {
        self.modals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::{ModalEvent, ModalSize};

    #[test]
    fn test_create_get_destroy() {
        let mut manager = ModalManager::new();
        manager.create("help", ModalOptions::default()).create("text");
        assert!(manager.get("help").is_some());
        assert!(manager.destroy("help"));
        assert!(!manager.destroy("help"));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_create_replaces_same_id() {
        let mut manager = ModalManager::new();
        manager.create("ai", ModalOptions::default()).create("old");
        manager.create("ai", ModalOptions::locked(ModalSize::Large));
        assert_eq!(manager.len(), 1);
        let modal = manager.get("ai").unwrap();
        assert_eq!(modal.content(), None);
        assert!(!modal.options().backdrop);
    }

    #[test]
    fn test_active_and_hide_all() {
        let mut manager = ModalManager::new();
        manager.create("a", ModalOptions::default()).create("a").show();
        manager.create("b", ModalOptions::default()).create("b").show();
        assert_eq!(manager.active().map(Modal::id), Some("b"));

        manager.get_mut("b").unwrap().handle(ModalEvent::Escape);
        assert_eq!(manager.active().map(Modal::id), Some("a"));

        manager.hide_all();
        assert!(manager.active().is_none());
    }
}
