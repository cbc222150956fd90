use std::num::NonZeroUsize;

use serde::Deserialize;

/// Knobs of a [`Recognizer`](crate::Recognizer) run.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Upper bound on decide loop iterations. `None` runs until the grammar accepts or rejects,
    /// which never happens for a grammar that keeps rewriting without consuming input.
    ///
    /// A ceiling is at least one, so every run gets to look at the first lookahead.
    pub max_steps: Option<NonZeroUsize>,
}

impl RecognizerConfig {
    pub fn with_max_steps(mut self, max_steps: NonZeroUsize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}
