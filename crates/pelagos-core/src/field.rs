//! Particle buffer keys and the [`FieldSet`] bitset.

use std::fmt;

/// A named per-particle array held by the buffer subsystem.
///
/// Each field stores [`components()`](ParticleField::components) `f32`
/// slots per particle, interleaved (`x0 y0 z0 x1 y1 z1 ...` for vectors).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParticleField {
    /// Particle position, 3 components.
    Position,
    /// Particle velocity, 3 components.
    Velocity,
    /// Particle density, 1 component.
    Density,
    /// Particle mass, 1 component.
    Mass,
}

impl ParticleField {
    /// Every field, in bit order.
    pub const ALL: [ParticleField; 4] = [
        ParticleField::Position,
        ParticleField::Velocity,
        ParticleField::Density,
        ParticleField::Mass,
    ];

    /// Number of `f32` slots this field occupies per particle.
    pub const fn components(self) -> usize {
        match self {
            Self::Position | Self::Velocity => 3,
            Self::Density | Self::Mass => 1,
        }
    }

    /// Human-readable buffer name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Velocity => "velocity",
            Self::Density => "density",
            Self::Mass => "mass",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for ParticleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of particle fields implemented as a fixed-width bitset.
///
/// Used by filter engines to declare which buffers they read and write,
/// so the schedule can hand one engine's output to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldSet {
    bits: u8,
}

impl FieldSet {
    /// Create an empty field set.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Return a copy of the set with `field` added.
    pub const fn with(self, field: ParticleField) -> Self {
        Self {
            bits: self.bits | field.bit(),
        }
    }

    /// Insert a field into the set.
    pub fn insert(&mut self, field: ParticleField) {
        self.bits |= field.bit();
    }

    /// Check whether the set contains a field.
    pub const fn contains(&self, field: ParticleField) -> bool {
        self.bits & field.bit() != 0
    }

    /// Return the union of two sets.
    pub const fn union(&self, other: &Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Return the intersection of two sets.
    pub const fn intersection(&self, other: &Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Returns `true` if the set contains no fields.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns the number of fields in the set.
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterate over the fields in the set, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = ParticleField> + '_ {
        ParticleField::ALL
            .into_iter()
            .filter(move |f| self.contains(*f))
    }
}

impl FromIterator<ParticleField> for FieldSet {
    fn from_iter<I: IntoIterator<Item = ParticleField>>(iter: I) -> Self {
        let mut set = Self::empty();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn components_match_layout() {
        assert_eq!(ParticleField::Position.components(), 3);
        assert_eq!(ParticleField::Velocity.components(), 3);
        assert_eq!(ParticleField::Density.components(), 1);
        assert_eq!(ParticleField::Mass.components(), 1);
    }

    #[test]
    fn iter_in_declaration_order() {
        let set: FieldSet = [ParticleField::Mass, ParticleField::Position]
            .into_iter()
            .collect();
        let fields: Vec<_> = set.iter().collect();
        assert_eq!(fields, vec![ParticleField::Position, ParticleField::Mass]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn const_builder_matches_insert() {
        const READS: FieldSet = FieldSet::empty()
            .with(ParticleField::Position)
            .with(ParticleField::Density);
        let mut set = FieldSet::empty();
        set.insert(ParticleField::Density);
        set.insert(ParticleField::Position);
        assert_eq!(READS, set);
    }

    fn arb_field_set() -> impl Strategy<Value = FieldSet> {
        prop::collection::vec(0usize..4, 0..6).prop_map(|idx| {
            idx.into_iter()
                .map(|i| ParticleField::ALL[i])
                .collect::<FieldSet>()
        })
    }

    proptest! {
        #[test]
        fn union_commutative(a in arb_field_set(), b in arb_field_set()) {
            prop_assert_eq!(a.union(&b), b.union(&a));
        }

        #[test]
        fn intersection_is_subset_of_both(a in arb_field_set(), b in arb_field_set()) {
            let i = a.intersection(&b);
            for f in i.iter() {
                prop_assert!(a.contains(f) && b.contains(f));
            }
        }
    }
}
