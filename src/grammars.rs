//! Demonstration grammars bundled with the driver. Both count into a `usize` subject.

use clap::ValueEnum;
use pushdown_parser::{Action, Grammar, GrammarError, Item, SemanticAction, Symbol};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Rule {
    Nested,
    Pattern,
    Class,
    ClassRest,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum DemoGrammar {
    /// Balanced parentheses, counts matched pairs.
    Balanced,
    /// Literal characters, `.`, `\x` escapes and `[az09]` style classes of letters and digits, counts atoms.
    Pattern,
}

impl DemoGrammar {
    pub fn build(self) -> Result<Grammar<Rule, char, usize>, GrammarError> {
        match self {
            DemoGrammar::Balanced => balanced(),
            DemoGrammar::Pattern => pattern(),
        }
    }
}

impl From<Rule> for Symbol<Rule, char> {
    fn from(value: Rule) -> Self {
        Symbol::Nonterminal(value)
    }
}

impl From<Rule> for Item<Rule, char, usize> {
    fn from(value: Rule) -> Self {
        Item::Symbol(value.into())
    }
}

fn lit(c: char) -> Item<Rule, char, usize> {
    Item::Symbol(Symbol::Literal(c))
}

fn count(name: &'static str) -> Item<Rule, char, usize> {
    Item::Semantic(SemanticAction::new(name, |n: usize| n + 1))
}

/// `Nested ::= '(' Nested ')' Nested | ε`
fn balanced() -> Result<Grammar<Rule, char, usize>, GrammarError> {
    Grammar::builder()
        .with_start(Rule::Nested)
        .with_rules(
            Rule::Nested,
            [
                (
                    Symbol::Literal('('),
                    Action::push_input([
                        count("pair"),
                        Rule::Nested.into(),
                        lit(')'),
                        Rule::Nested.into(),
                    ]),
                ),
                (Symbol::Literal(')'), Action::pop()),
                (Symbol::Epsilon, Action::pop()),
            ],
        )
        .build()
}

const SPECIAL: [char; 4] = ['[', ']', '\\', '.'];

/// ```ebnf
/// pattern    ::= atom pattern | ε;
/// atom       ::= '[' class ']' | '\' ANY | '.' | CHARACTER;
/// class      ::= class_item class_rest;
/// class_rest ::= class_item class_rest | ε;
/// class_item ::= 'a'..'z' | '0'..'9';
/// ```
fn pattern() -> Result<Grammar<Rule, char, usize>, GrammarError> {
    let class_items = |rule: Rule| {
        [
            (
                Symbol::Range('a', 'z'),
                Action::push([Item::Symbol(Symbol::Range('a', 'z')), Rule::ClassRest.into()]),
            ),
            (
                Symbol::Range('0', '9'),
                Action::push([Item::Symbol(Symbol::Range('0', '9')), Rule::ClassRest.into()]),
            ),
        ]
        .map(|(lookahead, action)| (rule, lookahead, action))
    };

    let mut builder = Grammar::builder()
        .with_start(Rule::Pattern)
        .with_rules(
            Rule::Pattern,
            [
                (
                    Symbol::Literal('['),
                    Action::push_input([
                        Rule::Class.into(),
                        lit(']'),
                        count("class"),
                        Rule::Pattern.into(),
                    ]),
                ),
                (
                    Symbol::Literal('\\'),
                    Action::push_input([
                        Item::Symbol(Symbol::Wildcard),
                        count("escape"),
                        Rule::Pattern.into(),
                    ]),
                ),
                (
                    Symbol::Literal('.'),
                    Action::push_input([count("any"), Rule::Pattern.into()]),
                ),
                (
                    Symbol::NegatedSet(SPECIAL.to_vec()),
                    Action::push_input([count("char"), Rule::Pattern.into()]),
                ),
                (Symbol::Epsilon, Action::pop()),
            ],
        )
        .with_rule(Rule::ClassRest, Symbol::Literal(']'), Action::pop())
        // an escape takes whatever character follows
        .with_consuming(Symbol::Wildcard);

    for (rule, lookahead, action) in class_items(Rule::Class)
        .into_iter()
        .chain(class_items(Rule::ClassRest))
    {
        builder.add_rule(rule, lookahead, action);
    }

    builder.build()
}
