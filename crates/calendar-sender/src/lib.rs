// Calendar sender
//
// The consumer half of the notification pipeline: drains the queue,
// decodes each message into a Notification and dispatches it to the
// configured sink (webhook POST or log line).

pub mod config;
pub mod consumer;
pub mod sink;

pub use config::{SenderMode, Settings};
pub use consumer::Consumer;
pub use sink::{LogSink, WebhookSink};
