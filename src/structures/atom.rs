/*!
(The internal representation of) an atom (aka. a 'variable').

Each atom is a u32 *u* such that either:
- *u* is 0, or:
- *u - 1* is an atom.

So, the atoms of a context are [0..*m*) for some *m*, and atoms may be used as the indicies of a structure without taking too much space.

The atom `0` is reserved by the context and fixed with a value of true.
Atoms created through [fresh_atom](crate::context::GenericContext::fresh_atom) begin at `1`.

```rust
# use otter_smt::structures::atom::{Atom, TOP_ATOM};
let atoms = (1..4).collect::<Vec<Atom>>();
assert!(atoms.iter().all(|atom| *atom != TOP_ATOM));
```

# Notes
- In the SAT literature these are often called 'variables' while in the logic literature these are often called 'atoms'.
- Theories identify the atoms they are interested in by [observing](crate::context::GenericContext::observe) them.
*/

/// An atom, aka. a 'variable'.
pub type Atom = u32;

/// The atom `0` is fixed internally with a value of true.
pub const TOP_ATOM: Atom = 0;

/// The maximum instance of an atom.
///
/// Literals are signed integers, so the atom of a literal is bounded by the maximum of a (signed) literal.
pub const ATOM_MAX: Atom = i32::MAX.unsigned_abs();
