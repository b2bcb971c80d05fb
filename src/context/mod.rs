/*!
The context --- to which atoms, clauses, and theories are added and within which solves take place, etc.

Strictly, a [GenericContext] and a [Context].

The generic context is designed to be generic over various parameters.
Though, for the moment this is limited to the source of randomness.

Still, this helps distinguish generic context methods against those intended for external use or a particular application.
In particular, [from_config](Context::from_config) is implemented for a context rather than a generic context to avoid requiring a source of randomness to be supplied alongside a config.

# Example
```rust
# use otter_smt::context::Context;
# use otter_smt::config::Config;
# use otter_smt::reports::Report;
# use otter_smt::structures::literal::{CLiteral, Literal};
# use otter_smt::theories::cardinality::AtMost;
let mut the_context = Context::from_config(Config::default());

let p = the_context.fresh_or_max_literal();
let q = the_context.fresh_or_max_literal();

assert!(the_context.add_clause(vec![p, q]).is_ok());

let at_most = AtMost::new(vec![p, q], 1);
let atoms = at_most.atoms().collect::<Vec<_>>();
let index = the_context.add_theory(Box::new(at_most)).unwrap();
for atom in atoms {
    the_context.observe(index, atom).unwrap();
}

assert!(the_context.solve().is_ok());
assert_eq!(the_context.report(), Report::Satisfiable);

let p_value = the_context.atom_db.value_of(p.atom());
let q_value = the_context.atom_db.value_of(q.atom());
assert_ne!(p_value, q_value);
```
*/

mod counters;
pub use counters::Counters;
mod generic;
pub use generic::GenericContext;
mod specific;
pub use specific::Context;

/// The state of a context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContextState {
    /// The context allows for configuration.
    Configuration,

    /// The context allows input.
    Input,

    /// The consistency of the context is unknown, and some search is in progress.
    Solving,

    /// The context is known to be consistent, with a complete valuation satisfying every clause and theory.
    Satisfiable,

    /// The context is known to be inconsistent.
    Unsatisfiable,
}

impl ContextState {
    /// The stage of the state, used to bound when configuration options may be set.
    ///
    /// Configuration precedes input, which precedes any other state.
    pub fn stage(&self) -> u8 {
        match self {
            Self::Configuration => 0,
            Self::Input => 1,
            Self::Solving | Self::Satisfiable | Self::Unsatisfiable => 2,
        }
    }
}

impl std::fmt::Display for ContextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Input => write!(f, "Input"),
            Self::Solving => write!(f, "Solving"),
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
        }
    }
}
