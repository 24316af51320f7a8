//! [`Notifier`](crate::domain::ports::Notifier) implementations.

pub mod terminal;
pub mod recording;

pub use terminal::ConsoleNotifier;
pub use recording::RecordingNotifier;
