/*!
A log of facts, partitioned by decision level.

[LevelLog] helps a theory keep the facts it has been told (or has derived) in sync with the decision levels of a context:
- [new_level](LevelLog::new_level) corresponds to [new_decision_level](crate::theory::Theory::new_decision_level).
- [backtrack_until](LevelLog::backtrack_until) corresponds to [backtrack_until](crate::theory::Theory::backtrack_until), and returns the undone entries, most recent first.

# Lazy backtracking

A theory with the [lazy backtracking](crate::theory::Capabilities::lazy_backtracking) capability may instead [defer](LevelLog::defer_backtrack) a backtrack.
Deferred backtracks accumulate (the lowest target wins) until [reconcile](LevelLog::reconcile) is called, or some change is made to the log.

Still, every query on the log answers as if each backtrack had been made.
In particular, [entries](LevelLog::entries) excludes any entry above the lowest deferred target, and so the laziness of a theory is not observable from the entries of a log.

```rust
# use otter_smt::theory::levels::LevelLog;
let mut log = LevelLog::default();
log.record('a');
log.new_level();
log.record('b');
log.new_level();
log.record('c');

log.defer_backtrack(1);
log.defer_backtrack(0);

assert!(!log.is_reconciled());
assert_eq!(log.level(), 0);
assert_eq!(log.entries(), &['a']);

assert_eq!(log.reconcile(), vec!['c', 'b']);
assert!(log.is_reconciled());
```
*/

use crate::db::LevelIndex;

/// A log of entries, partitioned by level.
#[derive(Clone, Debug)]
pub struct LevelLog<T> {
    /// Every entry, in order of recording.
    entries: Vec<T>,

    /// Indicies at which a new level begins, so level *i* begins at `level_indicies[i - 1]`.
    level_indicies: Vec<usize>,

    /// The lowest target of any deferred backtrack.
    deferred: Option<LevelIndex>,
}

impl<T> Default for LevelLog<T> {
    fn default() -> Self {
        LevelLog {
            entries: Vec::default(),
            level_indicies: Vec::default(),
            deferred: None,
        }
    }
}

impl<T> LevelLog<T> {
    /// The current level, as if every deferred backtrack had been made.
    pub fn level(&self) -> LevelIndex {
        match self.deferred {
            Some(target) => target,
            None => self.level_indicies.len() as LevelIndex,
        }
    }

    /// The index of the first entry above the effective level.
    fn effective_end(&self) -> usize {
        match self.deferred {
            Some(target) => self
                .level_indicies
                .get(target as usize)
                .copied()
                .unwrap_or(self.entries.len()),
            None => self.entries.len(),
        }
    }

    /// Every entry at or below the current level, in order of recording.
    pub fn entries(&self) -> &[T] {
        &self.entries[..self.effective_end()]
    }

    /// The first `count` entries at or below the current level, or every such entry if there are fewer than `count`.
    pub fn prefix(&self, count: usize) -> &[T] {
        let entries = self.entries();
        &entries[..count.min(entries.len())]
    }

    /// The entries recorded at exactly `level`.
    pub fn entries_at(&self, level: LevelIndex) -> &[T] {
        if level > self.level() {
            return &[];
        }
        let start = match level {
            0 => 0,
            _ => self.level_indicies[level as usize - 1],
        };
        let end = self
            .level_indicies
            .get(level as usize)
            .copied()
            .unwrap_or(self.entries.len())
            .min(self.effective_end());
        &self.entries[start..end]
    }

    /// A count of the entries at or below the current level.
    pub fn len(&self) -> usize {
        self.effective_end()
    }

    /// True if there are no entries at or below the current level.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if no backtrack has been deferred.
    pub fn is_reconciled(&self) -> bool {
        self.deferred.is_none()
    }

    /// Pushes a level.
    ///
    /// Any deferred backtrack is reconciled first, and the entries undone are dropped.
    pub fn new_level(&mut self) {
        self.reconcile();
        self.level_indicies.push(self.entries.len());
    }

    /// Records an entry at the current level.
    ///
    /// Any deferred backtrack is reconciled first, and the entries undone are dropped.
    pub fn record(&mut self, entry: T) {
        self.reconcile();
        self.entries.push(entry);
    }

    /// Pops every level above `level`, returning the entries of those levels, most recent first.
    ///
    /// Any deferred backtrack is made as part of the pop.
    pub fn backtrack_until(&mut self, level: LevelIndex) -> Vec<T> {
        self.defer_backtrack(level);
        self.reconcile()
    }

    /// Notes a backtrack to `level`, without undoing any entry.
    pub fn defer_backtrack(&mut self, level: LevelIndex) {
        if level < self.level() {
            self.deferred = Some(level);
        }
    }

    /// Makes any deferred backtrack, returning the entries undone, most recent first.
    pub fn reconcile(&mut self) -> Vec<T> {
        match self.deferred.take() {
            None => Vec::default(),
            Some(target) => {
                let end = self.effective_end_for(target);
                self.level_indicies.truncate(target as usize);
                let mut undone = self.entries.split_off(end);
                undone.reverse();
                undone
            }
        }
    }

    fn effective_end_for(&self, target: LevelIndex) -> usize {
        self.level_indicies
            .get(target as usize)
            .copied()
            .unwrap_or(self.entries.len())
    }
}

#[cfg(test)]
mod level_log_tests {
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::generic::random::Pcg32;

    #[test]
    fn eager() {
        let mut log = LevelLog::default();
        log.record(1);
        log.new_level();
        log.record(2);
        log.record(3);
        log.new_level();
        log.new_level();
        log.record(4);

        assert_eq!(log.level(), 3);
        assert_eq!(log.entries_at(1), &[2, 3]);
        assert!(log.entries_at(2).is_empty());

        assert_eq!(log.backtrack_until(1), vec![4]);
        assert_eq!(log.entries(), &[1, 2, 3]);
        assert_eq!(log.level(), 1);

        assert_eq!(log.backtrack_until(0), vec![3, 2]);
        assert_eq!(log.entries(), &[1]);

        // Nothing above the base.
        assert!(log.backtrack_until(0).is_empty());
    }

    #[test]
    fn deferred_then_recorded() {
        let mut log = LevelLog::default();
        log.new_level();
        log.record('a');
        log.new_level();
        log.record('b');

        log.defer_backtrack(1);
        assert_eq!(log.entries(), &['a']);
        assert_eq!(log.entries_at(1), &['a']);
        assert!(log.entries_at(2).is_empty());

        log.record('c');
        assert!(log.is_reconciled());
        assert_eq!(log.entries(), &['a', 'c']);

        log.defer_backtrack(5);
        assert!(log.is_reconciled());
    }

    // For any interleaving of new levels, records, and backtracks, the entries after a backtrack to some level are exactly those recorded at or below the level.
    #[test]
    fn interleavings() {
        let mut rng = Pcg32::from_seed(73_u64.to_le_bytes());

        for _ in 0..64 {
            let mut eager = LevelLog::default();
            let mut lazy = LevelLog::default();
            let mut expected: Vec<(LevelIndex, u32)> = Vec::default();
            let mut level: LevelIndex = 0;

            for step in 0..256 {
                match rng.random_range(0..4) {
                    0 => {
                        eager.new_level();
                        lazy.new_level();
                        level += 1;
                    }
                    1 | 2 => {
                        eager.record(step);
                        lazy.record(step);
                        expected.push((level, step));
                    }
                    _ => {
                        let target = rng.random_range(0..=level);
                        eager.backtrack_until(target);
                        lazy.defer_backtrack(target);
                        expected.retain(|(entry_level, _)| *entry_level <= target);
                        level = target;
                    }
                }

                let expected_entries = expected.iter().map(|(_, e)| *e).collect::<Vec<_>>();
                assert_eq!(eager.entries(), expected_entries.as_slice());
                assert_eq!(lazy.entries(), expected_entries.as_slice());
                assert_eq!(eager.level(), level);
                assert_eq!(lazy.level(), level);
            }
        }
    }
}
