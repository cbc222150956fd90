use crate::{Symbol, Terminal};

impl<N, T> Symbol<N, T>
where
    T: Ord,
{
    /// Returns whether the lookahead is accepted by this symbol read as a terminal class.
    ///
    /// Terminal classes never match [`Terminal::Eof`], only [`Symbol::Epsilon`] does. A
    /// [`Symbol::Nonterminal`] matches nothing.
    pub fn matches(&self, lookahead: Terminal<&T>) -> bool {
        let Terminal::T(v) = lookahead else {
            return matches!(self, Symbol::Epsilon);
        };

        match self {
            Symbol::Literal(t) => t == v,
            Symbol::Range(low, high) => low <= v && v <= high,
            Symbol::Set(values) => values.contains(v),
            Symbol::NegatedSet(values) => !values.contains(v),
            Symbol::Wildcard => true,
            Symbol::Nonterminal(_) | Symbol::Epsilon => false,
        }
    }

    /// Whether the symbol is a terminal class that cannot match any terminal.
    pub(crate) fn is_empty_class(&self) -> bool {
        match self {
            Symbol::Range(low, high) => low > high,
            Symbol::Set(values) => values.is_empty(),
            _ => false,
        }
    }

    /// Returns whether some lookahead could be matched by both symbols.
    ///
    /// Note: the terminal domain is not enumerable, so pairs that can only be told apart by
    /// enumerating it (two negated sets, a negated set against a range whose bounds are both
    /// excluded) are reported as overlapping.
    pub(crate) fn overlaps(&self, other: &Self) -> bool {
        use Symbol::*;

        if self.is_empty_class() || other.is_empty_class() {
            return false;
        }

        match (self, other) {
            (Nonterminal(_), _) | (_, Nonterminal(_)) => false,
            (Epsilon, Epsilon) => true,
            (Epsilon, _) | (_, Epsilon) => false,
            (Wildcard, _) | (_, Wildcard) => true,
            (Literal(v), class) | (class, Literal(v)) => class.matches(Terminal::T(v)),
            (Set(values), class) | (class, Set(values)) => {
                values.iter().any(|v| class.matches(Terminal::T(v)))
            }
            (Range(a, b), Range(c, d)) => std::cmp::max(a, c) <= std::cmp::min(b, d),
            (Range(low, high), NegatedSet(excluded)) | (NegatedSet(excluded), Range(low, high)) => {
                !(low == high && excluded.contains(low))
            }
            (NegatedSet(_), NegatedSet(_)) => true,
        }
    }
}
