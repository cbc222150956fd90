use crate::{Action, GrammarError, Item, Symbol, Terminal};

use std::{
    collections::{HashMap, HashSet},
    fmt::Debug,
    hash::Hash,
};

use tracing::{debug, warn};

/// Rule table of a pushdown recognizer: author rules indexed by the stack top they rewrite, on
/// top of a fixed augmentation layer.
///
/// A [`Grammar`] is read-only once built, recognition runs only borrow it.
pub struct Grammar<N, T, S = ()> {
    start: Symbol<N, T>,
    /// Item the stack is initialized with, holding a copy of `start`.
    seed: Item<N, T, S>,
    /// Mapping of stack tops to their rules, ordered by descending priority.
    rules: Rules<N, T, S>,
    augmentation: Augmentation<N, T, S>,
}

/// Map of stack tops to a list of [`Rule`]s.
type Rules<N, T, S> = HashMap<Symbol<N, T>, Vec<Rule<N, T, S>>>;

struct Rule<N, T, S> {
    /// Pattern the lookahead is matched with.
    lookahead: Symbol<N, T>,
    action: Action<N, T, S>,
    priority: i32,
    /// Position of the rule in the order of declaration.
    index: usize,
}

/// Built-in lowest priority rules. The actions are stored so resolution can always hand out a
/// reference into the grammar.
struct Augmentation<N, T, S> {
    accept: Action<N, T, S>,
    reject: Action<N, T, S>,
    pop_input: Action<N, T, S>,
    /// Read as the top of an empty stack.
    bottom: Item<N, T, S>,
}

impl<N, T, S> Augmentation<N, T, S> {
    fn new() -> Self {
        Self {
            accept: Action::Accept,
            reject: Action::Reject,
            pop_input: Action::pop_input(),
            bottom: Item::Symbol(Symbol::Epsilon),
        }
    }
}

impl<N, T, S> Augmentation<N, T, S>
where
    T: Ord,
{
    fn resolve(&self, top: &Symbol<N, T>, lookahead: Terminal<&T>) -> &Action<N, T, S> {
        match (top, lookahead) {
            // empty stack and empty input means we are accepting
            (Symbol::Epsilon, Terminal::Eof) => &self.accept,
            // a terminal class on the stack that matches the lookahead consumes it
            (Symbol::Literal(_) | Symbol::Range(..) | Symbol::Set(_), Terminal::T(_))
                if top.matches(lookahead) =>
            {
                &self.pop_input
            }
            _ => &self.reject,
        }
    }
}

impl<N, T, S> Grammar<N, T, S> {
    /// Creates a new `GrammarBuilder`.
    pub fn builder() -> GrammarBuilder<N, T, S> {
        GrammarBuilder::new()
    }

    /// Returns the symbol the stack is initialized with.
    pub fn start_symbol(&self) -> &Symbol<N, T> {
        &self.start
    }

    /// Number of author rules.
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub(crate) fn start_item(&self) -> &Item<N, T, S> {
        &self.seed
    }

    pub(crate) fn bottom_item(&self) -> &Item<N, T, S> {
        &self.augmentation.bottom
    }
}

impl<N, T, S> Grammar<N, T, S>
where
    N: Eq + Hash,
    T: Ord + Hash,
{
    /// Resolves the action for the stack top and lookahead.
    ///
    /// The highest priority author rule rewriting `top` whose lookahead pattern matches wins.
    /// Otherwise the augmentation layer applies: a literal, range or set that matches the
    /// lookahead consumes it, [`Symbol::Epsilon`] against [`Terminal::Eof`] accepts, everything
    /// else rejects.
    pub fn resolve(&self, top: &Symbol<N, T>, lookahead: Terminal<&T>) -> &Action<N, T, S> {
        self.rules
            .get(top)
            .and_then(|rules| rules.iter().find(|rule| rule.lookahead.matches(lookahead)))
            .map(|rule| &rule.action)
            .unwrap_or_else(|| self.augmentation.resolve(top, lookahead))
    }
}

impl<N: Debug, T: Debug, S> Debug for Grammar<N, T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rules: Vec<_> = self
            .rules
            .iter()
            .flat_map(|(top, rules)| rules.iter().map(move |rule| (top, rule)))
            .collect();
        rules.sort_by_key(|(_, rule)| rule.index);

        f.debug_struct("Grammar")
            .field("start", &self.start)
            .field(
                "rules",
                &rules
                    .into_iter()
                    .map(|(top, rule)| (top, &rule.lookahead, rule.priority, &rule.action))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder struct for the [`Grammar`].
pub struct GrammarBuilder<N, T, S = ()> {
    start: Option<Symbol<N, T>>,
    /// Rules in order of declaration.
    rules: Vec<PendingRule<N, T, S>>,
}

struct PendingRule<N, T, S> {
    priority: i32,
    top: Symbol<N, T>,
    lookahead: Symbol<N, T>,
    action: Action<N, T, S>,
}

impl<N, T, S> GrammarBuilder<N, T, S> {
    /// Creates a new [`GrammarBuilder`] with no start symbol and no rules.
    fn new() -> Self {
        Self {
            start: None,
            rules: Vec::new(),
        }
    }

    /// Sets the start symbol of the [`Grammar`].
    pub fn with_start(mut self, symbol: impl Into<Symbol<N, T>>) -> Self {
        self.set_start(symbol);
        self
    }

    /// Sets the start symbol of the [`Grammar`].
    pub fn set_start(&mut self, symbol: impl Into<Symbol<N, T>>) {
        self.start = Some(symbol.into());
    }

    /// Adds a rule with the default priority of `0`.
    pub fn with_rule(
        mut self,
        top: impl Into<Symbol<N, T>>,
        lookahead: impl Into<Symbol<N, T>>,
        action: Action<N, T, S>,
    ) -> Self {
        self.add_rule(top, lookahead, action);
        self
    }

    /// Adds a rule with the default priority of `0`.
    pub fn add_rule(
        &mut self,
        top: impl Into<Symbol<N, T>>,
        lookahead: impl Into<Symbol<N, T>>,
        action: Action<N, T, S>,
    ) {
        self.add_prioritized_rule(0, top, lookahead, action);
    }

    /// Adds a rule that takes precedence over all rules with a lower `priority`.
    pub fn with_prioritized_rule(
        mut self,
        priority: i32,
        top: impl Into<Symbol<N, T>>,
        lookahead: impl Into<Symbol<N, T>>,
        action: Action<N, T, S>,
    ) -> Self {
        self.add_prioritized_rule(priority, top, lookahead, action);
        self
    }

    /// Adds a rule that takes precedence over all rules with a lower `priority`.
    pub fn add_prioritized_rule(
        &mut self,
        priority: i32,
        top: impl Into<Symbol<N, T>>,
        lookahead: impl Into<Symbol<N, T>>,
        action: Action<N, T, S>,
    ) {
        self.rules.push(PendingRule {
            priority,
            top: top.into(),
            lookahead: lookahead.into(),
            action,
        });
    }

    /// Adds a set of rules rewriting the same stack top.
    pub fn with_rules<L>(
        mut self,
        top: impl Into<Symbol<N, T>>,
        rules: impl IntoIterator<Item = (L, Action<N, T, S>)>,
    ) -> Self
    where
        N: Clone,
        T: Clone,
        L: Into<Symbol<N, T>>,
    {
        let top = top.into();
        rules
            .into_iter()
            .for_each(|(lookahead, action)| self.add_rule(top.clone(), lookahead, action));
        self
    }
}

impl<N, T, S> GrammarBuilder<N, T, S>
where
    N: Clone,
    T: Clone,
{
    /// Lets `symbol` consume every terminal it matches when it is on top of the stack.
    ///
    /// The augmentation layer only does this for literals, ranges and sets. A
    /// [`Symbol::Wildcard`] or [`Symbol::NegatedSet`] rejects unless opted in this way.
    pub fn with_consuming(mut self, symbol: impl Into<Symbol<N, T>>) -> Self {
        self.add_consuming(symbol);
        self
    }

    /// Lets `symbol` consume every terminal it matches when it is on top of the stack.
    pub fn add_consuming(&mut self, symbol: impl Into<Symbol<N, T>>) {
        let symbol = symbol.into();
        self.add_rule(symbol.clone(), symbol, Action::pop_input());
    }
}

impl<N, T, S> GrammarBuilder<N, T, S>
where
    N: Clone + Eq + Hash + Debug,
    T: Clone + Ord + Hash + Debug,
{
    /// Builds the [`Grammar`] and validates the rules (a start symbol is set, lookahead patterns
    /// are terminal classes, used nonterminals have at least one rule, and no two rules of the
    /// same priority compete for a lookahead).
    pub fn build(self) -> Result<Grammar<N, T, S>, GrammarError> {
        let start = self.start.ok_or(GrammarError::MissingStart)?;

        for (index, rule) in self.rules.iter().enumerate() {
            if matches!(rule.lookahead, Symbol::Nonterminal(_)) {
                return Err(GrammarError::NonterminalLookahead {
                    rule: index,
                    lookahead: format!("{:?}", rule.lookahead),
                });
            }

            if rule.lookahead.is_empty_class() {
                warn!(
                    rule = index,
                    lookahead = ?rule.lookahead,
                    "lookahead pattern matches no terminal, rule is unreachable"
                );
            }
        }

        Self::check_nonterminals(&start, &self.rules)?;
        Self::check_ambiguity(&self.rules)?;

        let rule_count = self.rules.len();
        let mut rules = Rules::new();
        for (
            index,
            PendingRule {
                priority,
                top,
                lookahead,
                action,
            },
        ) in self.rules.into_iter().enumerate()
        {
            rules.entry(top).or_insert_with(Vec::new).push(Rule {
                lookahead,
                action,
                priority,
                index,
            });
        }

        // stable, so declaration order breaks ties between disjoint rules of equal priority
        for rules in rules.values_mut() {
            rules.sort_by(|lhs, rhs| rhs.priority.cmp(&lhs.priority));
        }

        debug!(
            start = ?start,
            rules = rule_count,
            tops = rules.len(),
            "built grammar"
        );

        Ok(Grammar {
            seed: Item::Symbol(start.clone()),
            start,
            rules,
            augmentation: Augmentation::new(),
        })
    }

    /// Checks that every nonterminal the recognizer can meet on the stack is rewritten by a rule.
    fn check_nonterminals(
        start: &Symbol<N, T>,
        rules: &[PendingRule<N, T, S>],
    ) -> Result<(), GrammarError> {
        let heads: HashSet<&N> = rules
            .iter()
            .filter_map(|rule| match &rule.top {
                Symbol::Nonterminal(n) => Some(n),
                _ => None,
            })
            .collect();

        let used = std::iter::once(start).chain(rules.iter().flat_map(|rule| {
            rule.action.pushed().iter().filter_map(|item| match item {
                Item::Symbol(symbol) => Some(symbol),
                Item::Semantic(_) => None,
            })
        }));

        for symbol in used {
            if let Symbol::Nonterminal(n) = symbol {
                if !heads.contains(n) {
                    return Err(GrammarError::UndefinedNonterminal(format!("{:?}", symbol)));
                }
            }
        }

        Ok(())
    }

    fn check_ambiguity(rules: &[PendingRule<N, T, S>]) -> Result<(), GrammarError> {
        for (first, lhs) in rules.iter().enumerate() {
            for (second, rhs) in rules.iter().enumerate().skip(first + 1) {
                if lhs.top == rhs.top
                    && lhs.priority == rhs.priority
                    && lhs.lookahead.overlaps(&rhs.lookahead)
                {
                    return Err(GrammarError::Ambiguous {
                        top: format!("{:?}", lhs.top),
                        priority: lhs.priority,
                        first,
                        first_lookahead: format!("{:?}", lhs.lookahead),
                        second,
                        second_lookahead: format!("{:?}", rhs.lookahead),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Grammar;
    use crate::{Action, GrammarError, Item, Symbol, Terminal};

    #[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
    enum Variable {
        Expr,
        Term,
    }

    impl From<Variable> for Symbol<Variable, char> {
        fn from(v: Variable) -> Self {
            Symbol::Nonterminal(v)
        }
    }

    fn lit(c: char) -> Symbol<Variable, char> {
        Symbol::Literal(c)
    }

    fn t(c: &char) -> Terminal<&char> {
        Terminal::T(c)
    }

    mod grammar_construction {
        use super::{lit, Action, Grammar, GrammarError, Item, Symbol, Variable};

        #[test]
        fn grammar() -> Result<(), GrammarError> {
            let grammar: Grammar<Variable, char> = Grammar::builder()
                .with_start(Variable::Expr)
                .with_rule(
                    Variable::Expr,
                    lit('('),
                    Action::push([lit('('), Variable::Term.into(), lit(')')]),
                )
                .with_rule(Variable::Term, lit('x'), Action::push([lit('x')]))
                .build()?;

            assert_eq!(grammar.start_symbol(), &Symbol::Nonterminal(Variable::Expr));
            assert!(matches!(
                grammar.start_item(),
                Item::Symbol(Symbol::Nonterminal(Variable::Expr))
            ));
            assert_eq!(grammar.rule_count(), 2);
            Ok(())
        }

        #[test]
        fn missing_start() {
            let result: Result<Grammar<Variable, char>, _> = Grammar::builder()
                .with_rule(Variable::Expr, lit('x'), Action::pop_input())
                .build();

            assert_eq!(result.err(), Some(GrammarError::MissingStart));
        }

        #[test]
        fn undefined_start_nonterminal() {
            let result: Result<Grammar<Variable, char>, _> =
                Grammar::builder().with_start(Variable::Expr).build();

            assert_eq!(
                result.err(),
                Some(GrammarError::UndefinedNonterminal(
                    "Nonterminal(Expr)".to_string()
                ))
            );
        }

        #[test]
        fn undefined_pushed_nonterminal() {
            let result: Result<Grammar<Variable, char>, _> = Grammar::builder()
                .with_start(Variable::Expr)
                .with_rule(
                    Variable::Expr,
                    Symbol::Wildcard,
                    Action::push([Symbol::from(Variable::Term)]),
                )
                .build();

            assert_eq!(
                result.err(),
                Some(GrammarError::UndefinedNonterminal(
                    "Nonterminal(Term)".to_string()
                ))
            );
        }

        #[test]
        fn nonterminal_lookahead() {
            let result: Result<Grammar<Variable, char>, _> = Grammar::builder()
                .with_start(Variable::Expr)
                .with_rule(Variable::Expr, Variable::Term, Action::Accept)
                .build();

            assert!(matches!(
                result.err(),
                Some(GrammarError::NonterminalLookahead { rule: 0, .. })
            ));
        }

        #[test]
        fn terminal_start_needs_no_rules() {
            let grammar: Result<Grammar<Variable, char>, _> =
                Grammar::builder().with_start(lit('a')).build();

            assert!(grammar.is_ok());
        }
    }

    mod ambiguity {
        use super::{lit, Action, Grammar, GrammarError, Symbol, Variable};

        #[test]
        fn overlapping_rules_are_rejected() {
            let result: Result<Grammar<Variable, char>, _> = Grammar::builder()
                .with_start(Variable::Expr)
                .with_rule(Variable::Expr, Symbol::Range('a', 'z'), Action::Accept)
                .with_rule(Variable::Expr, lit('q'), Action::Reject)
                .build();

            assert_eq!(
                result.err(),
                Some(GrammarError::Ambiguous {
                    top: "Nonterminal(Expr)".to_string(),
                    priority: 0,
                    first: 0,
                    first_lookahead: "Range('a', 'z')".to_string(),
                    second: 1,
                    second_lookahead: "Literal('q')".to_string(),
                })
            );
        }

        #[test]
        fn priority_resolves_overlap() {
            let result: Result<Grammar<Variable, char>, _> = Grammar::builder()
                .with_start(Variable::Expr)
                .with_rule(Variable::Expr, Symbol::Range('a', 'z'), Action::Accept)
                .with_prioritized_rule(1, Variable::Expr, lit('q'), Action::Reject)
                .build();

            assert!(result.is_ok());
        }

        #[test]
        fn different_tops_never_compete() {
            let result: Result<Grammar<Variable, char>, _> = Grammar::builder()
                .with_start(Variable::Expr)
                .with_rule(Variable::Expr, Symbol::Wildcard, Action::Accept)
                .with_rule(Variable::Term, Symbol::Wildcard, Action::Accept)
                .build();

            assert!(result.is_ok());
        }

        #[test]
        fn disjoint_rules_are_accepted() {
            let result: Result<Grammar<Variable, char>, _> = Grammar::builder()
                .with_start(Variable::Expr)
                .with_rules(
                    Variable::Expr,
                    [
                        (Symbol::Range('0', '9'), Action::pop_input()),
                        (Symbol::Set(vec!['+', '-']), Action::pop_input()),
                        (Symbol::Epsilon, Action::Accept),
                    ],
                )
                .build();

            assert!(result.is_ok());
        }
    }

    mod resolution {
        use super::{lit, t, Action, Grammar, GrammarError, Item, Symbol, Terminal, Variable};

        fn grammar() -> Result<Grammar<Variable, char>, GrammarError> {
            Grammar::builder()
                .with_start(Variable::Expr)
                .with_rule(Variable::Expr, Symbol::Range('a', 'z'), Action::Accept)
                .with_prioritized_rule(
                    1,
                    Variable::Expr,
                    lit('q'),
                    Action::push([Symbol::from(Variable::Term)]),
                )
                .with_rule(Variable::Term, Symbol::Wildcard, Action::pop_input())
                .with_consuming(Symbol::NegatedSet(vec!['"']))
                .build()
        }

        #[test]
        fn highest_priority_wins() -> Result<(), GrammarError> {
            let grammar = grammar()?;
            let expr = Symbol::Nonterminal(Variable::Expr);

            assert!(matches!(
                grammar.resolve(&expr, t(&'q')),
                Action::Consume { advance: false, push }
                    if matches!(push.as_slice(), [Item::Symbol(Symbol::Nonterminal(Variable::Term))])
            ));
            assert!(matches!(grammar.resolve(&expr, t(&'b')), Action::Accept));
            Ok(())
        }

        #[test]
        fn unmatched_author_rules_fall_back_to_reject() -> Result<(), GrammarError> {
            let grammar = grammar()?;
            let expr = Symbol::Nonterminal(Variable::Expr);

            assert!(matches!(grammar.resolve(&expr, t(&'7')), Action::Reject));
            assert!(matches!(
                grammar.resolve(&expr, Terminal::Eof),
                Action::Reject
            ));
            Ok(())
        }

        #[test]
        fn augmentation() -> Result<(), GrammarError> {
            let grammar = grammar()?;

            let consumes = |action: &Action<Variable, char>| {
                matches!(action, Action::Consume { advance: true, push } if push.is_empty())
            };

            assert!(consumes(grammar.resolve(&lit('a'), t(&'a'))));
            assert!(consumes(grammar.resolve(&Symbol::Range('0', '9'), t(&'4'))));
            assert!(consumes(grammar.resolve(&Symbol::Set(vec!['x', 'y']), t(&'y'))));
            assert!(matches!(
                grammar.resolve(&Symbol::Epsilon, Terminal::Eof),
                Action::Accept
            ));

            assert!(matches!(grammar.resolve(&lit('a'), t(&'b')), Action::Reject));
            assert!(matches!(
                grammar.resolve(&lit('a'), Terminal::Eof),
                Action::Reject
            ));
            assert!(matches!(
                grammar.resolve(&Symbol::Epsilon, t(&'a')),
                Action::Reject
            ));
            Ok(())
        }

        #[test]
        fn wildcard_and_negated_set_need_explicit_rules() -> Result<(), GrammarError> {
            let grammar = grammar()?;

            assert!(matches!(
                grammar.resolve(&Symbol::Wildcard, t(&'a')),
                Action::Reject
            ));
            assert!(matches!(
                grammar.resolve(&Symbol::NegatedSet(vec!['a']), t(&'b')),
                Action::Reject
            ));

            // opted in with `with_consuming`
            let quoted = Symbol::NegatedSet(vec!['"']);
            assert!(matches!(
                grammar.resolve(&quoted, t(&'b')),
                Action::Consume { advance: true, .. }
            ));
            assert!(matches!(grammar.resolve(&quoted, t(&'"')), Action::Reject));
            Ok(())
        }
    }

    #[test]
    fn grammar_is_shareable() {
        fn assert_send_sync<G: Send + Sync>() {}
        assert_send_sync::<Grammar<Variable, char, usize>>();
    }
}
