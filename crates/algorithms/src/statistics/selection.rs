//! Statistic selection
//!
//! Callers name statistics with case-insensitive tokens. A [`Selection`] is
//! the dependency closure of those tokens, resolved once into a bitmask so
//! every intermediate grid a statistic needs is allocated exactly once.

use std::fmt;
use std::marker::PhantomData;

/// A family of statistics that can be selected by name.
pub trait StatisticKind: Copy + Eq + fmt::Debug + 'static {
    /// Every statistic of the family, in output order
    const ALL: &'static [Self];

    /// Code used in tokens and output names
    fn code(self) -> &'static str;

    /// Statistics that must be computed before this one
    fn dependencies(self) -> &'static [Self];

    /// Statistics named by a group token such as `"SecondOrder"`
    fn bundle(token: &str) -> Option<&'static [Self]>;

    /// Position in [`StatisticKind::ALL`]
    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }

    /// Statistic whose code matches `token`, ignoring case
    fn from_code(token: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.code().eq_ignore_ascii_case(token))
    }
}

/// Closed set of statistics of one family.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Selection<S> {
    bits: u64,
    _kind: PhantomData<S>,
}

impl<S: StatisticKind> Selection<S> {
    /// Nothing selected
    pub fn empty() -> Self {
        Self { bits: 0, _kind: PhantomData }
    }

    /// Resolve tokens (statistic codes or group names, any case) and their
    /// dependencies. Unrecognised tokens are skipped.
    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut selection = Self::empty();
        for token in tokens {
            let token = token.as_ref().trim();
            if let Some(stat) = S::from_code(token) {
                selection = selection.with(stat);
            } else if let Some(group) = S::bundle(token) {
                selection = group.iter().fold(selection, |sel, &s| sel.with(s));
            } else {
                tracing::debug!("ignoring unknown statistic token {token:?}");
            }
        }
        selection
    }

    /// This selection plus `stat` and everything it depends on
    pub fn with(mut self, stat: S) -> Self {
        let mut pending = vec![stat];
        while let Some(s) = pending.pop() {
            let bit = 1u64 << s.index();
            if self.bits & bit == 0 {
                self.bits |= bit;
                pending.extend_from_slice(s.dependencies());
            }
        }
        self
    }

    /// Whether `stat` is part of the closure
    pub fn contains(&self, stat: S) -> bool {
        self.bits & (1u64 << stat.index()) != 0
    }

    /// Selected statistics in output order
    pub fn iter(&self) -> impl Iterator<Item = S> + '_ {
        S::ALL.iter().copied().filter(|&s| self.contains(s))
    }

    /// Number of selected statistics
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl<S: StatisticKind> Default for Selection<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: StatisticKind> FromIterator<S> for Selection<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl<S: StatisticKind> fmt::Debug for Selection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|s| s.code())).finish()
    }
}
