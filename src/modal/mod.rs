//! Dialogs and notifications.
//!
//! Rendering belongs to the host UI. These types hold what is shown and
//! decide how user input dismisses it.

mod dialog;
mod manager;
mod notifications;

pub use dialog::{Modal, ModalEvent, ModalOptions, ModalSize};
pub use manager::ModalManager;
pub use notifications::{Notification, NotificationKind, Notifications};
