//! Collaborators of the analysis core and the command handlers built on them.

pub mod analyze;
pub mod sender;
pub mod store;
pub mod trace;

pub use analyze::handle_analyze;
pub use sender::{LogResponseSender, RecordingResponseSender, TaskResponse, TaskResponseSender};
pub use store::{FileModelStore, ModelStore};
pub use trace::handle_trace;
