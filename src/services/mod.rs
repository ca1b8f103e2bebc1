pub mod activity_service;
pub mod notification;
pub mod participation;

pub use activity_service::ActivityService;
pub use notification::{LogNotifier, MailRelayNotifier, Notifier};
pub use participation::ConfirmationPath;
