/*!
A (partial) function from atoms to truth values.

If all atoms are assigned a value the valuation is 'full', otherwise the valuation is 'partial'.

The canonical representation of a valuation as a vector of optional booleans, where:
- The zero index (first) element is true, interpreted as some arbitrary tautology.
- Each non-zero index of the vector is interpreted as an atom.

The trait is implemented for anything which can be dereferenced to a slice of optional booleans.

```rust
# use otter_smt::structures::valuation::Valuation;
let valuation = vec![Some(true), None, Some(true), None];

assert_eq!(valuation.value_of(1), Some(None));
assert_eq!(valuation.value_of(7), None);
assert_eq!(valuation.unvalued_atoms().count(), 2);
```
*/

use super::atom::Atom;

/// The canonical representation of a valuation.
pub type CValuation = Vec<Option<bool>>;

/// A valuation is something which stores some value of a atom and/or perhaps the information that the atom has no value.
pub trait Valuation {
    /// Some value of a atom under the valuation, or otherwise nothing if the atom is not part of the valuation.
    fn value_of(&self, atom: Atom) -> Option<Option<bool>>;

    /// An iterator through all (Atom, Value) pairs for such that the atom has some value (excluding top).
    fn atom_valued_pairs(&self) -> impl Iterator<Item = (Atom, bool)>;

    /// An iterator through atoms which do not have some value.
    fn unvalued_atoms(&self) -> impl Iterator<Item = Atom>;

    /// A count of atoms in the valuation, including top.
    fn atom_count(&self) -> usize;
}

impl<T: std::ops::Deref<Target = [Option<bool>]>> Valuation for T {
    fn value_of(&self, atom: Atom) -> Option<Option<bool>> {
        self.get(atom as usize).copied()
    }

    fn atom_valued_pairs(&self) -> impl Iterator<Item = (Atom, bool)> {
        self.iter()
            .enumerate()
            .skip(1)
            .filter_map(|(atom, value)| value.map(|v| (atom as Atom, v)))
    }

    fn unvalued_atoms(&self) -> impl Iterator<Item = Atom> {
        self.iter().enumerate().filter_map(|(atom, value)| match value {
            None => Some(atom as Atom),
            _ => None,
        })
    }

    fn atom_count(&self) -> usize {
        self.len()
    }
}
