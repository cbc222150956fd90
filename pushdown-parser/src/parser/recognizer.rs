use std::{hash::Hash, num::NonZeroUsize};

use tracing::{debug, trace, warn};

use super::{
    config::RecognizerConfig,
    result::{Outcome, ParseResult},
};
use crate::{Action, Grammar, Item, Terminal};

/// Drives the pushdown automaton of a [`Grammar`] over an input.
///
/// The grammar is only borrowed, every run owns its stack, subject and counters, so one grammar
/// can serve any number of recognizers at once.
#[derive(Debug)]
pub struct Recognizer<'g, N, T, S = ()> {
    grammar: &'g Grammar<N, T, S>,
    config: RecognizerConfig,
}

impl<'g, N, T, S> Recognizer<'g, N, T, S> {
    pub fn new(grammar: &'g Grammar<N, T, S>) -> Self {
        Self {
            grammar,
            config: RecognizerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RecognizerConfig) -> Self {
        self.config = config;
        self
    }
}

impl<'g, N, T, S> Recognizer<'g, N, T, S>
where
    N: Eq + Hash,
    T: Ord + Hash,
{
    /// Runs the decide loop until the grammar accepts or rejects `input`, threading `subject`
    /// through the semantic actions met on the way.
    pub fn decide(&self, input: &[T], subject: S) -> ParseResult<S> {
        let mut position = 0;
        let mut steps = 1;
        let mut subject = subject;
        let mut stack: Vec<&'g Item<N, T, S>> = Vec::from([self.grammar.start_item()]);

        loop {
            if let Some(max_steps) = self.config.max_steps.map(NonZeroUsize::get) {
                if steps > max_steps {
                    warn!(max_steps, position, "step limit reached before the grammar decided");
                    return ParseResult::new(Outcome::StepLimitExceeded, max_steps, subject);
                }
            }

            let top = stack
                .last()
                .copied()
                .unwrap_or_else(|| self.grammar.bottom_item());

            let symbol = match top {
                Item::Semantic(action) => {
                    // modify the subject, the lookahead does not matter here
                    trace!(step = steps, position, action = action.name(), "semantic item");
                    stack.pop();
                    subject = action.apply(subject);
                    steps += 1;
                    continue;
                }
                Item::Symbol(symbol) => symbol,
            };

            let lookahead = match input.get(position) {
                Some(t) => Terminal::T(t),
                None => Terminal::Eof,
            };

            let action = self.grammar.resolve(symbol, lookahead);
            trace!(
                step = steps,
                position,
                depth = stack.len(),
                action = action.kind(),
                "resolved"
            );

            match action {
                Action::Accept | Action::Reject => {
                    let outcome = match action {
                        Action::Accept => Outcome::Accepted,
                        _ => Outcome::Rejected,
                    };
                    debug!(?outcome, steps, position, "recognition finished");

                    return ParseResult::new(outcome, steps, subject);
                }
                Action::Consume { advance, push } => {
                    stack.pop();
                    // the first pushed item ends up on top
                    stack.extend(push.iter().rev());
                    if *advance {
                        position += 1;
                    }
                }
                Action::Semantic(action) => {
                    stack.pop();
                    subject = action.apply(subject);
                }
            }

            steps += 1;
        }
    }
}

/// Recognizes `input` with the default subject and configuration.
pub fn decide<N, T, S>(grammar: &Grammar<N, T, S>, input: &[T]) -> ParseResult<S>
where
    N: Eq + Hash,
    T: Ord + Hash,
    S: Default,
{
    decide_with(grammar, input, S::default())
}

/// Recognizes `input` starting from `subject`, with the default configuration.
pub fn decide_with<N, T, S>(grammar: &Grammar<N, T, S>, input: &[T], subject: S) -> ParseResult<S>
where
    N: Eq + Hash,
    T: Ord + Hash,
{
    Recognizer::new(grammar).decide(input, subject)
}
