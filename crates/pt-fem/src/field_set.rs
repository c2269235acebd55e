//! Current and previous iterates of every solved field.

use pt_core::{FieldKind, FieldMap};

use crate::error::FemResult;
use crate::field::Field;
use crate::space::FunctionSpace;

/// The newest iterate of a field and the one before it.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldPair {
    pub current: Field,
    pub previous: Field,
}

impl FieldPair {
    /// Both iterates zero on `space`, named `<symbol>_n` and `<symbol>_nminus1`.
    pub fn allocate(kind: FieldKind, space: FunctionSpace) -> Self {
        let symbol = kind.symbol();
        Self {
            current: Field::new(space.clone(), format!("{symbol}_n")),
            previous: Field::new(space, format!("{symbol}_nminus1")),
        }
    }

    /// Overwrite the previous iterate with the current one.
    pub fn advance(&mut self) -> FemResult<()> {
        self.previous.assign(&self.current)
    }

    /// Squared change between the iterates, summed over the local dofs.
    pub fn local_change_sq(&self) -> f64 {
        self.current.distance_sq(&self.previous)
    }
}

/// Velocity and pressure iterate pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSet {
    pairs: FieldMap<FieldPair>,
}

impl FieldSet {
    pub fn allocate(spaces: FieldMap<FunctionSpace>) -> Self {
        let [velocity, pressure] = [FieldKind::Velocity, FieldKind::Pressure]
            .map(|kind| FieldPair::allocate(kind, spaces[kind].clone()));
        Self {
            pairs: FieldMap::new(velocity, pressure),
        }
    }

    pub fn pair(&self, kind: FieldKind) -> &FieldPair {
        &self.pairs[kind]
    }

    pub fn pair_mut(&mut self, kind: FieldKind) -> &mut FieldPair {
        &mut self.pairs[kind]
    }

    pub fn current(&self, kind: FieldKind) -> &Field {
        &self.pairs[kind].current
    }

    pub fn current_mut(&mut self, kind: FieldKind) -> &mut Field {
        &mut self.pairs[kind].current
    }

    pub fn previous(&self, kind: FieldKind) -> &Field {
        &self.pairs[kind].previous
    }

    /// Mutable access to the current velocity and pressure at once.
    pub fn currents_mut(&mut self) -> (&mut Field, &mut Field) {
        let (velocity, pressure) = self.pairs.pair_mut();
        (&mut velocity.current, &mut pressure.current)
    }

    /// Copy current into previous for every field.
    pub fn advance(&mut self) -> FemResult<()> {
        for (_, pair) in self.pairs.iter_mut() {
            pair.advance()?;
        }
        Ok(())
    }

    /// Local squared change and local dof count per field.
    pub fn local_changes(&self) -> FieldMap<(f64, usize)> {
        self.pairs
            .map(|_, pair| (pair.local_change_sq(), pair.current.space().num_dofs()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKind, &FieldPair)> {
        self.pairs.iter()
    }

    pub fn is_finite(&self) -> bool {
        self.pairs.iter().all(|(_, pair)| pair.current.is_finite())
    }
}
