//! Search, filter and sort for event and post listings.
//!
//! Every surface shows the same projection: category filters first, then a
//! case-insensitive name search, then a sort with deterministic tie-breaks.
//! The projection copies its input, so re-running it with the same query is
//! a no-op on an already projected list.

use chrono::{DateTime, Utc};
use std::{borrow::Cow, cmp::Ordering};

/// Anything that can appear in a listing.
pub trait Listed {
    fn display_name(&self) -> &str;
    fn sort_date(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    DateAsc,
    #[default]
    DateDsc,
    NameAsc,
    NameDsc,
}

/// Case-insensitive name order with the raw name as a deterministic
/// secondary key, so equal-looking names cannot flip between runs.
fn by_name(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

impl SortBy {
    pub fn apply<T: Listed>(&self, items: &mut [T]) {
        self.apply_delegate(items, |it| it)
    }

    pub fn apply_delegate<T, L: Listed>(&self, items: &mut [T], f: impl Fn(&T) -> &L) {
        match self {
            Self::DateAsc => items.sort_by(|x, y| {
                let (x, y) = (f(x), f(y));
                x.sort_date()
                    .cmp(&y.sort_date())
                    .then_with(|| by_name(x.display_name(), y.display_name()))
            }),
            Self::DateDsc => items.sort_by(|x, y| {
                let (x, y) = (f(x), f(y));
                y.sort_date()
                    .cmp(&x.sort_date())
                    .then_with(|| by_name(y.display_name(), x.display_name()))
            }),
            Self::NameAsc => items.sort_by(|x, y| by_name(f(x).display_name(), f(y).display_name())),
            Self::NameDsc => items.sort_by(|x, y| by_name(f(y).display_name(), f(x).display_name())),
        }
    }
}

/// A composed query over one listing. Filters run in the order they were
/// added, then the search term, then the sort.
pub struct Projection<'a, T> {
    search: Cow<'a, str>,
    sort: SortBy,
    filters: Vec<Box<dyn Fn(&T) -> bool + 'a>>,
}

impl<'a, T> Default for Projection<'a, T> {
    fn default() -> Self {
        Self {
            search: Cow::Borrowed(""),
            sort: SortBy::default(),
            filters: Vec::new(),
        }
    }
}

impl<'a, T: Listed + Clone> Projection<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<Cow<'a, str>>) -> Self {
        self.search = term.into();
        self
    }

    pub fn sort(mut self, sort: SortBy) -> Self {
        self.sort = sort;
        self
    }

    pub fn keep(mut self, pred: impl Fn(&T) -> bool + 'a) -> Self {
        self.filters.push(Box::new(pred));
        self
    }

    pub fn apply(&self, items: &[T]) -> Vec<T> {
        let term = self.search.to_lowercase();
        let mut out: Vec<T> = items
            .iter()
            .filter(|it| self.filters.iter().all(|keep| keep(it)))
            .filter(|it| term.is_empty() || it.display_name().to_lowercase().contains(&term))
            .cloned()
            .collect();
        self.sort.apply(&mut out);
        out
    }
}
