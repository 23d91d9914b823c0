//! Queue plumbing on top of the durable message log.
//!
//! - `TopicPoller`: reads a topic partition and feeds a bounded channel
//! - `LogDeadLetterSink`: appends unprocessable payloads to the dead-letter topic

pub mod dead_letter;
pub mod poller;

pub use dead_letter::LogDeadLetterSink;
pub use poller::TopicPoller;
