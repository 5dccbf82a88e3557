// Port Layer - Interfaces for external dependencies

pub mod confirmation;
pub mod id_provider; // For deterministic testing
pub mod label_renderer;
pub mod reference_data;
pub mod time_provider;

// Re-exports
pub use confirmation::Confirmation;
pub use id_provider::IdProvider;
pub use label_renderer::LabelRenderer;
pub use reference_data::ReferenceDataProvider;
pub use time_provider::TimeProvider;
