//! Service layer: the public `Dispatcher` and `CompletionGroup` facades.

pub mod completion_group;
pub mod dispatcher;

pub use completion_group::{CompletionGroup, GroupToken};
pub use dispatcher::{Dispatcher, MAIN_QUEUE_LABEL};
