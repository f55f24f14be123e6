use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// The four service classes, in a fixed canonical order. Replaces the
/// dynamic per-class dict vectors of the source with a type a missing
/// class can't silently slip through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Class {
    First,
    Business,
    PremiumEconomy,
    Economy,
}

impl Class {
    pub const ALL: [Class; 4] = [Class::First, Class::Business, Class::PremiumEconomy, Class::Economy];

    pub fn index(self) -> usize {
        match self {
            Class::First => 0,
            Class::Business => 1,
            Class::PremiumEconomy => 2,
            Class::Economy => 3,
        }
    }
}

/// A fixed-width, per-class vector indexed by `Class`. All kit-count and
/// per-class money quantities in this crate use this shape rather than a
/// `HashMap<Class, T>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassVec<T> {
    values: [T; 4],
}

impl<T: Copy> ClassVec<T> {
    pub fn new(first: T, business: T, premium_economy: T, economy: T) -> Self {
        Self { values: [first, business, premium_economy, economy] }
    }

    pub fn from_fn(mut f: impl FnMut(Class) -> T) -> Self {
        Self { values: [f(Class::First), f(Class::Business), f(Class::PremiumEconomy), f(Class::Economy)] }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Class, T)> + '_ {
        Class::ALL.into_iter().map(move |c| (c, self.values[c.index()]))
    }

    pub fn values(&self) -> &[T; 4] {
        &self.values
    }
}

impl<T: Copy + Default> Default for ClassVec<T> {
    fn default() -> Self {
        Self { values: [T::default(); 4] }
    }
}

impl<T> Index<Class> for ClassVec<T> {
    type Output = T;
    fn index(&self, c: Class) -> &T {
        &self.values[c.index()]
    }
}

impl<T> IndexMut<Class> for ClassVec<T> {
    fn index_mut(&mut self, c: Class) -> &mut T {
        &mut self.values[c.index()]
    }
}

impl ClassVec<i64> {
    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn sum(&self) -> i64 {
        self.values.iter().sum()
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::from_fn(|c| self[c] + other[c])
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::from_fn(|c| self[c] - other[c])
    }

    pub fn clamp_to(&self, cap: &Self) -> Self {
        Self::from_fn(|c| self[c].min(cap[c]).max(0))
    }

    pub fn is_all_nonneg(&self) -> bool {
        self.values.iter().all(|&v| v >= 0)
    }
}
