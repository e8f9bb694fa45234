pub mod error;
pub mod types;

pub use error::NotifeedError;
pub use types::{NotificationKind, NotificationRecord};
