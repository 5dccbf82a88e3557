// Confirmation Port
//
// Destructive operations (clearing the queue) ask the user through this port.

/// Yes/no prompt answered by the presentation layer
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Pre-recorded answer (e.g. a `--yes` flag, or tests)
pub struct FixedAnswer(pub bool);

impl Confirmation for FixedAnswer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
