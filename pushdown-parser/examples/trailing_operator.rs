use pushdown_parser::{decide_with, Action, Grammar, Item, SemanticAction, Symbol};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum Variables {
    Expr,
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Terminals {
    Mul,
    Plus,
    Val(usize),
}

impl From<Variables> for Symbol<Variables, Terminals> {
    fn from(value: Variables) -> Self {
        Symbol::Nonterminal(value)
    }
}

impl From<Variables> for Item<Variables, Terminals, usize> {
    fn from(value: Variables) -> Self {
        Item::Symbol(value.into())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use {Terminals::*, Variables::*};

    // every `Val(_)` sorts between these two
    let operand = || Item::Symbol(Symbol::Range(Val(0), Val(usize::MAX)));
    let count = || Item::Semantic(SemanticAction::new("operand", |n: usize| n + 1));

    let grammar: Grammar<Variables, Terminals, usize> = Grammar::builder()
        .with_start(Expr)
        .with_rule(
            Expr,
            Symbol::Range(Val(0), Val(usize::MAX)),
            Action::push([operand(), count(), Rest.into()]),
        )
        .with_rule(
            Rest,
            Symbol::Set(vec![Plus, Mul]),
            Action::push_input([operand(), count(), Rest.into()]),
        )
        .with_rule(Rest, Symbol::Epsilon, Action::pop())
        .build()?;

    println!("{:#?}", grammar);

    println!("{:#?}", decide_with(&grammar, &[Val(3), Plus, Val(4), Mul, Val(3)], 0));
    println!("{:#?}", decide_with(&grammar, &[Val(3), Plus, Val(4), Mul], 0));

    Ok(())
}
