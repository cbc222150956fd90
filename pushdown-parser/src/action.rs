use std::{borrow::Cow, fmt::Debug, sync::Arc};

use crate::Symbol;

/// Outcome of resolving a `(stack top, lookahead)` pair against a [`Grammar`](crate::Grammar).
pub enum Action<N, T, S = ()> {
    /// The input is not part of the language.
    Reject,
    /// The input is part of the language.
    Accept,
    /// Pop the stack top and replace it with `push`, where `push[0]` becomes the new top.
    Consume {
        /// Whether the lookahead terminal is consumed.
        advance: bool,
        push: Vec<Item<N, T, S>>,
    },
    /// Transform the subject and pop the stack top, without moving in the input.
    Semantic(SemanticAction<S>),
}

/// Entry of the recognizer stack.
pub enum Item<N, T, S = ()> {
    Symbol(Symbol<N, T>),
    /// Pending semantic action, applied as soon as it reaches the top of the stack. The lookahead
    /// is not consulted for it.
    Semantic(SemanticAction<S>),
}

/// Named transformation of the subject threaded through a recognition run.
pub struct SemanticAction<S> {
    name: Cow<'static, str>,
    f: Arc<dyn Fn(S) -> S + Send + Sync>,
}

impl<N, T, S> Action<N, T, S> {
    /// Consumes the lookahead terminal and pops the stack top.
    pub fn pop_input() -> Self {
        Self::Consume {
            advance: true,
            push: Vec::new(),
        }
    }

    /// Pops the stack top without consuming input.
    pub fn pop() -> Self {
        Self::Consume {
            advance: false,
            push: Vec::new(),
        }
    }

    /// Replaces the stack top with `items` without consuming input.
    pub fn push<I>(items: impl IntoIterator<Item = I>) -> Self
    where
        I: Into<Item<N, T, S>>,
    {
        Self::Consume {
            advance: false,
            push: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Consumes the lookahead terminal and replaces the stack top with `items`.
    pub fn push_input<I>(items: impl IntoIterator<Item = I>) -> Self
    where
        I: Into<Item<N, T, S>>,
    {
        Self::Consume {
            advance: true,
            push: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn semantic(
        name: impl Into<Cow<'static, str>>,
        f: impl Fn(S) -> S + Send + Sync + 'static,
    ) -> Self {
        Self::Semantic(SemanticAction::new(name, f))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Action::Reject => "reject",
            Action::Accept => "accept",
            Action::Consume { advance: true, .. } => "consume",
            Action::Consume { advance: false, .. } => "expand",
            Action::Semantic(_) => "semantic",
        }
    }

    /// Items pushed by this action.
    pub(crate) fn pushed(&self) -> &[Item<N, T, S>] {
        match self {
            Action::Consume { push, .. } => push,
            _ => &[],
        }
    }
}

impl<S> SemanticAction<S> {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        f: impl Fn(S) -> S + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, subject: S) -> S {
        (self.f)(subject)
    }
}

impl<N, T, S> From<Symbol<N, T>> for Item<N, T, S> {
    fn from(value: Symbol<N, T>) -> Self {
        Self::Symbol(value)
    }
}

impl<N, T, S> From<SemanticAction<S>> for Item<N, T, S> {
    fn from(value: SemanticAction<S>) -> Self {
        Self::Semantic(value)
    }
}

// NOTE: Manual implementations, derives would require the subject to be `Clone`/`Debug` even
// though only the shared closure is stored.

impl<S> Clone for SemanticAction<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            f: Arc::clone(&self.f),
        }
    }
}

impl<N: Clone, T: Clone, S> Clone for Item<N, T, S> {
    fn clone(&self) -> Self {
        match self {
            Item::Symbol(symbol) => Item::Symbol(symbol.clone()),
            Item::Semantic(action) => Item::Semantic(action.clone()),
        }
    }
}

impl<N: Clone, T: Clone, S> Clone for Action<N, T, S> {
    fn clone(&self) -> Self {
        match self {
            Action::Reject => Action::Reject,
            Action::Accept => Action::Accept,
            Action::Consume { advance, push } => Action::Consume {
                advance: *advance,
                push: push.clone(),
            },
            Action::Semantic(action) => Action::Semantic(action.clone()),
        }
    }
}

impl<S> Debug for SemanticAction<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SemanticAction").field(&self.name).finish()
    }
}

impl<N: Debug, T: Debug, S> Debug for Item<N, T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Item::Symbol(symbol) => f.debug_tuple("Symbol").field(symbol).finish(),
            Item::Semantic(action) => f.debug_tuple("Semantic").field(&action.name).finish(),
        }
    }
}

impl<N: Debug, T: Debug, S> Debug for Action<N, T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Reject => write!(f, "Reject"),
            Action::Accept => write!(f, "Accept"),
            Action::Consume { advance, push } => f
                .debug_struct("Consume")
                .field("advance", advance)
                .field("push", push)
                .finish(),
            Action::Semantic(action) => f.debug_tuple("Semantic").field(&action.name).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, Item, SemanticAction};
    use crate::Symbol;

    #[test]
    fn push_keeps_order() {
        let action = Action::<(), char>::push([Symbol::Literal('a'), Symbol::Literal('b')]);

        let Action::Consume { advance, push } = action else {
            panic!("expected a consume action");
        };
        assert!(!advance);
        assert!(matches!(
            push.as_slice(),
            [
                Item::Symbol(Symbol::Literal('a')),
                Item::Symbol(Symbol::Literal('b'))
            ]
        ));
    }

    #[test]
    fn pop_input_advances_without_push() {
        let action = Action::<(), char>::pop_input();
        assert_eq!(action.kind(), "consume");
        assert!(action.pushed().is_empty());
    }

    #[test]
    fn semantic_action_is_shared_between_clones() {
        let double = SemanticAction::new("double", |n: u32| n * 2);
        let clone = double.clone();

        assert_eq!(double.apply(3), 6);
        assert_eq!(clone.apply(5), 10);
        assert_eq!(clone.name(), "double");
        assert_eq!(format!("{:?}", double), r#"SemanticAction("double")"#);
    }

    #[test]
    fn mixed_items() {
        let items: Vec<Item<(), char, u32>> = vec![
            Symbol::Literal('x').into(),
            SemanticAction::new("inc", |n: u32| n + 1).into(),
        ];

        assert_eq!(
            format!("{:?}", items),
            r#"[Symbol(Literal('x')), Semantic("inc")]"#
        );
    }
}
