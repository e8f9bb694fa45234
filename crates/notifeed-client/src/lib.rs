pub mod config;
pub mod engine;
pub mod http;
pub mod registry;
pub mod source;
pub mod state;
pub mod subscription;

pub use config::ClientConfig;
pub use engine::PollingEngine;
pub use http::HttpNotificationSource;
pub use notifeed_core::{NotifeedError, NotificationKind, NotificationRecord};
pub use registry::{BoxError, HandlerId, HandlerRegistry, NotificationHandler};
pub use source::NotificationSource;
pub use state::SubscriptionState;
pub use subscription::Subscription;
