// Document Renderer Port
//
// Receives expanded labels in print order. Layout and styling belong to the
// implementation; the core only guarantees order and field content.

use crate::domain::LabelBatch;
use crate::error::Result;

pub trait LabelRenderer {
    fn render(&self, batch: &LabelBatch) -> Result<()>;
}

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every rendered batch for inspection
    #[derive(Default)]
    pub struct RecordingRenderer {
        batches: Mutex<Vec<LabelBatch>>,
    }

    impl RecordingRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn batches(&self) -> Vec<LabelBatch> {
            self.batches.lock().map(|b| b.clone()).unwrap_or_default()
        }
    }

    impl LabelRenderer for RecordingRenderer {
        fn render(&self, batch: &LabelBatch) -> Result<()> {
            self.batches
                .lock()
                .map_err(|e| crate::AppError::Render(e.to_string()))?
                .push(batch.clone());
            Ok(())
        }
    }
}
