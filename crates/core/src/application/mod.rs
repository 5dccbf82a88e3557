// Application Layer - Use Cases and Business Logic

pub mod label_desk;
pub mod queue_item_factory;

// Re-exports
pub use label_desk::{LabelDeskService, CLEAR_PROMPT};
pub use queue_item_factory::QueueItemFactory;
