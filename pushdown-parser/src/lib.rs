pub use action::{Action, Item, SemanticAction};
pub use grammar::{Grammar, GrammarBuilder};
pub use parser::{
    config::RecognizerConfig,
    error::GrammarError,
    recognizer::{decide, decide_with, Recognizer},
    result::{Outcome, ParseResult},
};

mod action;
mod grammar;
mod matcher;
mod parser;

/// Represents a single entry a grammar rule is written in terms of: a class of terminals, a
/// placeholder that rules expand, or the empty marker.
///
/// `N` is the nonterminal type supplied by the grammar author (usually an enum) and `T` the
/// terminal type of the input alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol<N, T> {
    /// Exactly one terminal value.
    Literal(T),
    /// Any terminal `v` with `low <= v <= high`.
    Range(T, T),
    /// Any of the listed terminals.
    Set(Vec<T>),
    /// Any terminal except the listed ones.
    NegatedSet(Vec<T>),
    /// Any terminal.
    Wildcard,
    /// Grammar placeholder. It never matches input directly and must be rewritten by a rule.
    Nonterminal(N),
    /// Nothing left to match. Read from an empty stack and matches only [`Terminal::Eof`].
    Epsilon,
}

/// Lookahead of the recognizer: the terminal at the current position, or the end of the input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Terminal<T> {
    T(T),
    Eof,
}

impl<T> From<T> for Terminal<T> {
    fn from(value: T) -> Self {
        Self::T(value)
    }
}

impl<T> Terminal<T> {
    pub fn as_ref(&self) -> Terminal<&T> {
        match self {
            Terminal::T(t) => Terminal::T(t),
            Terminal::Eof => Terminal::Eof,
        }
    }
}
