//! The solved quantities and containers indexed by them.

use core::fmt;
use core::ops::{Index, IndexMut};

/// A quantity the solver carries a discrete field for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldKind {
    Velocity,
    Pressure,
}

impl FieldKind {
    /// Every field kind, in output order.
    pub const ALL: [FieldKind; 2] = [FieldKind::Velocity, FieldKind::Pressure];

    /// Conventional one-letter symbol ("u", "p").
    pub fn symbol(self) -> &'static str {
        match self {
            FieldKind::Velocity => "u",
            FieldKind::Pressure => "p",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Velocity => "Velocity",
            FieldKind::Pressure => "Pressure",
        }
    }

    /// Number of components per point for a mesh of dimension `dim`.
    pub fn value_size(self, dim: usize) -> usize {
        match self {
            FieldKind::Velocity => dim,
            FieldKind::Pressure => 1,
        }
    }

    fn slot(self) -> usize {
        match self {
            FieldKind::Velocity => 0,
            FieldKind::Pressure => 1,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per [`FieldKind`], always fully populated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMap<T> {
    slots: [T; 2],
}

impl<T> FieldMap<T> {
    pub fn new(velocity: T, pressure: T) -> Self {
        Self {
            slots: [velocity, pressure],
        }
    }

    /// Build a map by evaluating `f` for each kind.
    pub fn from_fn(mut f: impl FnMut(FieldKind) -> T) -> Self {
        Self::new(f(FieldKind::Velocity), f(FieldKind::Pressure))
    }

    /// Fallible variant of [`FieldMap::from_fn`]; stops at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(FieldKind) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self::new(f(FieldKind::Velocity)?, f(FieldKind::Pressure)?))
    }

    pub fn get(&self, kind: FieldKind) -> &T {
        &self.slots[kind.slot()]
    }

    pub fn get_mut(&mut self, kind: FieldKind) -> &mut T {
        &mut self.slots[kind.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKind, &T)> {
        FieldKind::ALL.into_iter().zip(self.slots.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (FieldKind, &mut T)> {
        FieldKind::ALL.into_iter().zip(self.slots.iter_mut())
    }

    /// Both slots mutably at once, velocity first.
    pub fn pair_mut(&mut self) -> (&mut T, &mut T) {
        let [velocity, pressure] = &mut self.slots;
        (velocity, pressure)
    }

    pub fn map<U>(&self, mut f: impl FnMut(FieldKind, &T) -> U) -> FieldMap<U> {
        FieldMap::from_fn(|kind| f(kind, self.get(kind)))
    }
}

impl<T> Index<FieldKind> for FieldMap<T> {
    type Output = T;

    fn index(&self, kind: FieldKind) -> &T {
        self.get(kind)
    }
}

impl<T> IndexMut<FieldKind> for FieldMap<T> {
    fn index_mut(&mut self, kind: FieldKind) -> &mut T {
        self.get_mut(kind)
    }
}
