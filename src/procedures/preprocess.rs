/*!
One-time preparation of theories, before the first decision.

For each theory not yet preprocessed:
1. [preprocess](crate::theory::Theory::preprocess) is called.
2. For both polarities of each atom observed by the theory, the theory is told whether the literal [occurs](crate::theory::Theory::set_literal_occurs) in some clause of the context.

Preprocessing is made at the start of a [solve](crate::procedures::solve), and before any decision, whichever comes first.
A theory registered after preprocessing (for example, between solves) is preprocessed before the next decision.
*/

use crate::{
    context::GenericContext,
    misc::log::targets::{self},
    structures::literal::{CLiteral, Literal},
    types::err::ErrorKind,
};

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// For documentation, see [procedures::preprocess](crate::procedures::preprocess).
    pub fn preprocess(&mut self) -> Result<(), ErrorKind> {
        let theories = self.theory_db.theories.iter_mut();
        let records = self.theory_db.records.iter_mut();

        for (index, (theory, record)) in theories.zip(records).enumerate() {
            if record.preprocessed {
                continue;
            }
            log::info!(target: targets::PREPROCESSING, "Preprocessing theory {index}");

            theory.preprocess();

            for atom in record.observed_atoms() {
                for polarity in [true, false] {
                    let literal = CLiteral::new(atom, polarity);
                    theory.set_literal_occurs(literal, self.clause_db.occurs(literal));
                }
            }

            record.preprocessed = true;
        }

        Ok(())
    }
}
