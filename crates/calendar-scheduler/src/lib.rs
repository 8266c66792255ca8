// Calendar scheduler
//
// The ticker loop of the notification pipeline: on a fixed period it asks
// the event store for events whose lead window has been entered and hands
// the batch to the Notifier, which publishes each one to the durable queue
// with bounded retry.

pub mod config;
pub mod notifier;
pub mod scheduler;

pub use config::Settings;
pub use notifier::{Notifier, NotifierConfig};
pub use scheduler::{Scheduler, SchedulerConfig};
