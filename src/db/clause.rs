/*!
A database of clauses.

Clauses are stored by kind, and accessed through a [ClauseKey].
For each literal the database keeps an occurrence list of the keys of clauses containing the literal, indexed by [index](crate::structures::literal::Literal::index).
The occurrence lists are used by [BCP](crate::procedures::bcp) and to inform theories of which literals occur in some clause.

```rust
# use otter_smt::db::{clause::ClauseDB, ClauseKey};
# use otter_smt::structures::literal::Literal;
let mut clause_db = ClauseDB::default();
let key = clause_db.store(vec![1, -2], false).unwrap();

assert_eq!(key, ClauseKey::Original(0));
assert!(clause_db.occurs(-2));
assert!(!clause_db.occurs(2));
```
*/

use crate::{
    db::ClauseKey,
    misc::log::targets::{self},
    structures::{
        clause::{CClause, Clause},
        literal::{CLiteral, Literal},
    },
    types::err::ClauseDBError,
};

/// The clause database.
#[derive(Default)]
pub struct ClauseDB {
    /// Clauses added from some external source.
    original: Vec<CClause>,

    /// Clauses learnt during a solve.
    addition: Vec<CClause>,

    /// The keys of clauses containing each literal, indexed by literal index.
    occurrences: Vec<Vec<ClauseKey>>,
}

impl ClauseDB {
    /// Stores a clause, as an addition if `addition` is true and as an original clause otherwise.
    ///
    /// No check is made on the literals of the clause, beyond a check that the clause is non-empty.
    pub fn store(&mut self, clause: CClause, addition: bool) -> Result<ClauseKey, ClauseDBError> {
        if clause.is_empty() {
            return Err(ClauseDBError::EmptyClause);
        }

        let key = match addition {
            false => match u32::try_from(self.original.len()) {
                Ok(index) => ClauseKey::Original(index),
                Err(_) => return Err(ClauseDBError::StorageExhausted),
            },
            true => match u32::try_from(self.addition.len()) {
                Ok(index) => ClauseKey::Addition(index),
                Err(_) => return Err(ClauseDBError::StorageExhausted),
            },
        };

        for literal in clause.literals() {
            let index = literal.index();
            if self.occurrences.len() <= index {
                self.occurrences.resize_with(index + 1, Vec::default);
            }
            self.occurrences[index].push(key);
        }

        log::trace!(target: targets::CLAUSE_DB, "{key}: {}", clause.as_dimacs(false));

        match key {
            ClauseKey::Original(_) => self.original.push(clause),
            ClauseKey::Addition(_) => self.addition.push(clause),
        }

        Ok(key)
    }

    /// The clause with the given key.
    pub fn get(&self, key: ClauseKey) -> Result<&CClause, ClauseDBError> {
        let clause = match key {
            ClauseKey::Original(index) => self.original.get(index as usize),
            ClauseKey::Addition(index) => self.addition.get(index as usize),
        };
        clause.ok_or(ClauseDBError::Missing)
    }

    /// The keys of every clause containing `literal`.
    pub fn occurrences(&self, literal: CLiteral) -> &[ClauseKey] {
        match self.occurrences.get(literal.index()) {
            Some(keys) => keys,
            None => &[],
        }
    }

    /// True if `literal` occurs in some clause.
    pub fn occurs(&self, literal: CLiteral) -> bool {
        !self.occurrences(literal).is_empty()
    }

    /// A count of original clauses.
    pub fn original_count(&self) -> usize {
        self.original.len()
    }

    /// A count of added clauses.
    pub fn addition_count(&self) -> usize {
        self.addition.len()
    }

    /// An iterator over every clause, original clauses first.
    pub fn all_clauses(&self) -> impl Iterator<Item = &CClause> {
        self.original.iter().chain(self.addition.iter())
    }
}

/// A clause with duplicate literals removed, or None if the clause is a tautology.
///
/// The order of first occurrence is preserved.
pub fn normalise(clause: CClause) -> Option<CClause> {
    let mut normalised: CClause = Vec::with_capacity(clause.len());
    for literal in clause {
        if normalised.contains(&literal.negate()) {
            return None;
        }
        if !normalised.contains(&literal) {
            normalised.push(literal);
        }
    }
    Some(normalised)
}

#[cfg(test)]
mod clause_db_tests {
    use super::*;

    #[test]
    fn occurrence_lists() {
        let mut clause_db = ClauseDB::default();
        let a = clause_db.store(vec![1, 2], false).unwrap();
        let b = clause_db.store(vec![-1, 2], true).unwrap();

        assert_eq!(clause_db.occurrences(2), &[a, b]);
        assert_eq!(clause_db.occurrences(-1), &[b]);
        assert!(clause_db.occurrences(7).is_empty());
        assert_eq!(clause_db.get(b), Ok(&vec![-1, 2]));
        assert_eq!(clause_db.get(ClauseKey::Addition(3)), Err(ClauseDBError::Missing));
        assert_eq!(clause_db.store(vec![], false), Err(ClauseDBError::EmptyClause));
    }

    #[test]
    fn normalisation() {
        assert_eq!(normalise(vec![3, -1, 3, 2]), Some(vec![3, -1, 2]));
        assert_eq!(normalise(vec![1, 2, -1]), None);
        assert_eq!(normalise(vec![]), Some(vec![]));
    }
}
