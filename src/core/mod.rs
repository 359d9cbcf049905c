pub mod error;
pub mod event;
pub mod notification;
pub mod notifier;
pub mod session;
