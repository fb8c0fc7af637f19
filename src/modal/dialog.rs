//! A single modal dialog.

use std::fmt;

/// Width class of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalSize {
    /// Narrow dialog for short confirmations
    Compact,
    /// Regular dialog
    #[default]
    Default,
    /// Wide dialog for result lists
    Large,
    /// Widest dialog
    Xl,
}

impl ModalSize {
    /// Dialog width in logical pixels.
    pub fn width(&self) -> f32 {
        match self {
            ModalSize::Compact => 400.0,
            ModalSize::Default => 560.0,
            ModalSize::Large => 800.0,
            ModalSize::Xl => 1140.0,
        }
    }
}

/// How a dialog may be dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalOptions {
    /// Width class
    pub size: ModalSize,
    /// Clicking the backdrop hides the dialog
    pub backdrop: bool,
    /// Escape hides the dialog
    pub keyboard: bool,
}

impl ModalOptions {
    /// Set the width class.
    pub fn size(mut self, size: ModalSize) -> Self {
        self.size = size;
        self
    }

    /// Set whether a backdrop click dismisses.
    pub fn backdrop(mut self, backdrop: bool) -> Self {
        self.backdrop = backdrop;
        self
    }

    /// Set whether Escape dismisses.
    pub fn keyboard(mut self, keyboard: bool) -> Self {
        self.keyboard = keyboard;
        self
    }

    /// Options for dialogs that must not be dismissed while work is running.
    pub fn locked(size: ModalSize) -> Self {
        Self {
            size,
            backdrop: false,
            keyboard: false,
        }
    }
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            size: ModalSize::Default,
            backdrop: true,
            keyboard: true,
        }
    }
}

/// User input a dialog reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    /// Click outside the dialog body
    BackdropClick,
    /// Escape key
    Escape,
    /// A close button inside the dialog
    CloseButton,
}

type Callback = Box<dyn FnMut()>;

/// A dialog with content, visibility and show/hide callbacks.
///
/// Nothing is shown until content has been created.
pub struct Modal {
    id: String,
    options: ModalOptions,
    content: Option<String>,
    visible: bool,
    on_show: Option<Callback>,
    on_hide: Option<Callback>,
}

impl fmt::Debug for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modal")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("visible", &self.visible)
            .field("has_content", &self.content.is_some())
            .finish_non_exhaustive()
    }
}

impl Modal {
    /// Create an empty, hidden dialog.
    pub fn new(id: impl Into<String>, options: ModalOptions) -> Self {
        Self {
            id: id.into(),
            options,
            content: None,
            visible: false,
            on_show: None,
            on_hide: None,
        }
    }

    /// Dialog id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Dismissal options.
    pub fn options(&self) -> &ModalOptions {
        &self.options
    }

    /// Current content.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Whether the dialog is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Build the dialog with its content, replacing anything built before.
    pub fn create(&mut self, content: impl Into<String>) -> &mut Self {
        self.content = Some(content.into());
        self
    }

    /// Swap the content of a built dialog. Ignored before [`Modal::create`].
    pub fn set_content(&mut self, content: impl Into<String>) -> &mut Self {
        if self.content.is_some() {
            self.content = Some(content.into());
        }
        self
    }

    /// Register the callback run each time the dialog is shown.
    pub fn on_show(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.on_show = Some(Box::new(callback));
        self
    }

    /// Register the callback run each time the dialog is hidden.
    pub fn on_hide(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.on_hide = Some(Box::new(callback));
        self
    }

    /// Show the dialog.
    pub fn show(&mut self) -> &mut Self {
        if self.content.is_some() {
            self.visible = true;
            log::debug!("Modal '{}' shown", self.id);
            if let Some(callback) = self.on_show.as_mut() {
                callback();
            }
        }
        self
    }

    /// Hide the dialog.
    pub fn hide(&mut self) -> &mut Self {
        if self.content.is_some() {
            self.visible = false;
            log::debug!("Modal '{}' hidden", self.id);
            if let Some(callback) = self.on_hide.as_mut() {
                callback();
            }
        }
        self
    }

    /// Hide the dialog and drop its content.
    pub fn destroy(&mut self) {
        self.hide();
        self.content = None;
    }

    /// React to user input. Returns whether the dialog was dismissed.
    ///
    /// Hidden dialogs ignore every event.
    pub fn handle(&mut self, event: ModalEvent) -> bool {
        if !self.visible {
            return false;
        }
        let dismiss = match event {
            ModalEvent::BackdropClick => self.options.backdrop,
            ModalEvent::Escape => self.options.keyboard,
            ModalEvent::CloseButton => true,
        };
        if dismiss {
            self.hide();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_show_requires_content() {
        let mut modal = Modal::new("help", ModalOptions::default());
        modal.show();
        assert!(!modal.is_visible());

        modal.create("<p>Help</p>").show();
        assert!(modal.is_visible());
    }

    #[test]
    fn test_backdrop_and_escape_honour_options() {
        let mut open = Modal::new("open", ModalOptions::default());
        open.create("body").show();
        assert!(open.handle(ModalEvent::BackdropClick));
        assert!(!open.is_visible());

        open.show();
        assert!(open.handle(ModalEvent::Escape));
        assert!(!open.handle(ModalEvent::Escape));

        let mut locked = Modal::new("locked", ModalOptions::locked(ModalSize::Large));
        locked.create("body").show();
        assert!(!locked.handle(ModalEvent::BackdropClick));
        assert!(!locked.handle(ModalEvent::Escape));
        assert!(locked.is_visible());
        assert!(locked.handle(ModalEvent::CloseButton));
        assert!(!locked.is_visible());
    }

    #[test]
    fn test_callbacks_fire() {
        let shown = Rc::new(Cell::new(0));
        let hidden = Rc::new(Cell::new(0));
        let (s, h) = (Rc::clone(&shown), Rc::clone(&hidden));

        let mut modal = Modal::new("cb", ModalOptions::default());
        modal
            .on_show(move || s.set(s.get() + 1))
            .on_hide(move || h.set(h.get() + 1))
            .create("body")
            .show();
        modal.destroy();

        assert_eq!(shown.get(), 1);
        assert_eq!(hidden.get(), 1);
        assert_eq!(modal.content(), None);
    }

    #[test]
    fn test_hidden_dialog_ignores_events() {
        let hidden = Rc::new(Cell::new(0));
        let h = Rc::clone(&hidden);

        let mut modal = Modal::new("once", ModalOptions::default());
        modal.on_hide(move || h.set(h.get() + 1)).create("body").show();
        assert!(modal.handle(ModalEvent::BackdropClick));
        assert!(!modal.handle(ModalEvent::BackdropClick));
        assert!(!modal.handle(ModalEvent::CloseButton));
        assert!(!modal.handle(ModalEvent::Escape));
        assert_eq!(hidden.get(), 1);
    }

    #[test]
    fn test_set_content_after_create() {
        let mut modal = Modal::new("steps", ModalOptions::default().size(ModalSize::Large));
        modal.set_content("ignored");
        assert_eq!(modal.content(), None);

        modal.create("confirm").set_content("processing");
        assert_eq!(modal.content(), Some("processing"));
        assert_eq!(modal.options().size.width(), 800.0);
    }
}
