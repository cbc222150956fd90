use thiserror::Error;

/// Defect in a grammar detected while building it. Symbols are rendered with their `Debug`
/// representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("[ERROR] grammar has no start symbol")]
    MissingStart,
    /// Two rules with the same stack top and priority can match the same lookahead.
    #[error(
        "[ERROR] rules {first} and {second} are ambiguous: both rewrite `{top}` (priority \
         {priority}) on lookaheads `{first_lookahead}` and `{second_lookahead}`"
    )]
    Ambiguous {
        top: String,
        priority: i32,
        first: usize,
        first_lookahead: String,
        second: usize,
        second_lookahead: String,
    },
    /// A nonterminal never matches input, so it cannot be used as a lookahead pattern.
    #[error("[ERROR] rule {rule} uses nonterminal `{lookahead}` as a lookahead pattern")]
    NonterminalLookahead { rule: usize, lookahead: String },
    #[error("[ERROR] nonterminal `{0}` is used but no rule rewrites it")]
    UndefinedNonterminal(String),
}
