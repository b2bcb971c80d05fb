//! The trail of assignments made during a solve, partitioned by level.
//!
//! The trail is owned by the [atom database](crate::db::atom), and theories read the trail through a [TheoryTrail](crate::theory::TheoryTrail).

use crate::structures::literal::CLiteral;

use super::LevelIndex;

/// A stack of assignments, partitioned by level.
#[derive(Default)]
pub struct Trail {
    /// Every assignment, in order of assignment.
    pub literals: Vec<CLiteral>,

    /// Indicies at which a new level begins.
    ///
    /// So, level *i* (for *i* > 0) begins at `literals[level_indicies[i - 1]]`.
    pub level_indicies: Vec<usize>,

    /// The index of the first assignment whose consequences have not been propagated by BCP.
    pub q_head: usize,
}

impl Trail {
    /// The current level.
    pub fn level(&self) -> LevelIndex {
        self.level_indicies.len() as LevelIndex
    }

    /// Pushes a fresh level, whose first assignment will be the next assignment stored.
    pub fn new_level(&mut self) {
        self.level_indicies.push(self.literals.len());
    }

    /// Stores an assignment at the current level.
    pub fn store_assignment(&mut self, literal: CLiteral) {
        self.literals.push(literal);
    }

    /// Every assignment, in order of assignment.
    pub fn assignments(&self) -> &[CLiteral] {
        &self.literals
    }

    /// The assignments made at the (current) top level, in order of assignment.
    pub fn top_level_assignments(&self) -> &[CLiteral] {
        match self.level_indicies.last() {
            Some(&level_start) => &self.literals[level_start..],
            None => &self.literals,
        }
    }

    /// The index of the first assignment after every assignment at or below `level`.
    pub fn end_of_level(&self, level: LevelIndex) -> usize {
        self.level_indicies
            .get(level as usize)
            .copied()
            .unwrap_or(self.literals.len())
    }

    /// Removes levels above the given level index, if they exist, and returns the removed assignments in order of assignment.
    ///
    /// The queue head is clamped to the remaining assignments.
    ///
    /// # Soundness
    /// Does not clear the *valuation* of any assignment.
    pub fn clear_assignments_above(&mut self, level: LevelIndex) -> Vec<CLiteral> {
        // level_indicies stores with zero-indexing, so every assignment above level i is at or after literals[level_indicies[i]].
        match self.level_indicies.get(level as usize) {
            Some(&level_start) => {
                self.level_indicies.truncate(level as usize);
                let cleared = self.literals.split_off(level_start);
                self.q_head = std::cmp::min(self.q_head, self.literals.len());
                cleared
            }
            None => Vec::default(),
        }
    }
}
