/*!
A context method to aid boolean constraint propagation

See [GenericContext::bcp] for the relevant context method.

# Overview
Propagates each assignment on the trail which has not yet been propagated, in order of assignment.

For an assignment *l* every clause containing ¬*l* is examined (through the occurrence list of ¬*l*), and:
- If the clause has some true literal, nothing happens.
- If the clause has exactly one literal without a value, the literal is valued, with the clause as the reason.
- If every literal of the clause is false, the key to the clause is returned as a conflict.

Consequences are stored on the trail, and so propagated in turn.

# Example

bcp is a mutating method, and a typical application will match against the result of the mutation.

```rust,ignore
match self.bcp() {
    Err(err::BCPError::Conflict(key)) => {
        // Analysis, etc.
    }
    Err(e) => ..., // Some corruption of the databases.
    Ok(()) => {
        // Delivery to theories, etc.
    }
}
```
*/

use crate::{
    context::GenericContext,
    db::atom::{AtomValue, Reason},
    misc::log::targets::{self},
    structures::literal::{CLiteral, Literal},
    types::err::{self},
};

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// For documentation see [procedures::bcp](crate::procedures::bcp).
    pub fn bcp(&mut self) -> Result<(), err::BCPError> {
        while let Some(&literal) = self.atom_db.trail.literals.get(self.atom_db.trail.q_head) {
            self.bcp_literal(literal)?;
            self.atom_db.trail.q_head += 1;
        }
        Ok(())
    }

    /// Propagates a single assignment, without advancing the queue head.
    fn bcp_literal(&mut self, literal: CLiteral) -> Result<(), err::BCPError> {
        let clause_db = &self.clause_db;
        let atom_db = &mut self.atom_db;

        'clause_loop: for &key in clause_db.occurrences(literal.negate()) {
            let Ok(clause) = clause_db.get(key) else {
                return Err(err::BCPError::CorruptOccurrence(key));
            };

            let mut unvalued = None;
            for &clause_literal in clause {
                match atom_db.literal_status(clause_literal) {
                    AtomValue::Same => continue 'clause_loop,
                    AtomValue::Different => {}
                    AtomValue::NotSet => match unvalued {
                        None => unvalued = Some(clause_literal),
                        Some(_) => continue 'clause_loop,
                    },
                }
            }

            match unvalued {
                None => {
                    log::trace!(target: targets::PROPAGATION, "Conflict on {key} from {literal}");
                    return Err(err::BCPError::Conflict(key));
                }
                Some(consequence) => {
                    log::trace!(target: targets::PROPAGATION, "{consequence} from {key}");
                    if atom_db.assign(consequence, Reason::Clause(key)).is_err() {
                        return Err(err::BCPError::CorruptOccurrence(key));
                    }
                }
            }
        }

        Ok(())
    }
}
