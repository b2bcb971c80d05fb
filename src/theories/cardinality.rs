/*!
A bound on the count of true literals from some collection.

[AtMost] requires at most *k* of some literals to be true.

# Propagation

The theory keeps a [LevelLog] of every literal it has been told of whose atom is the atom of some member.
So, the *true members* are those entries of the log which are members, and the *false members* are those entries of the log whose negation is a member.

- If more than *k* members are true, the negation of the first *k* + 1 true members is a conflict.
- If exactly *k* members are true, the negation of every other member is propagated.

# Reasons

A propagation is marked with the length of the log at the time of propagation.
As the log only grows between backtracks, the reason for a propagated literal *-m* is *-m* together with the negation of each true member in the prefix of the log of the marked length.
The reason is built only if requested by the context.

# Backtracking

The theory backtracks lazily.
Backtracks are [deferred](LevelLog::defer_backtrack) until the next recorded fact or pushed level, and as the [entries](LevelLog::entries) of the log answer as if each backtrack had been made the theory otherwise behaves as if eager.

If the context refuses a propagation, for example as the atom of some member is unknown, the theory stops propagating and fails each later [check](crate::theory::Theory::check_propagated).

# Satisfaction

If at least *n* - *k* members are false, the constraint is satisfied.
At the base level this can not change, and so the theory remembers satisfaction when asked to [clear satisfied](crate::theory::Theory::clear_satisfied) constraints.

# Example

```rust
# use otter_smt::config::Config;
# use otter_smt::context::Context;
# use otter_smt::reports::Report;
# use otter_smt::theories::cardinality::AtMost;
let mut the_context = Context::from_config(Config::default());
let literals = the_context.fresh_or_max_literals(4);

let at_most = AtMost::new(literals.clone(), 2);
let atoms = at_most.atoms().collect::<Vec<_>>();
let index = the_context.add_theory(Box::new(at_most)).unwrap();
for atom in atoms {
    the_context.observe(index, atom).unwrap();
}

assert!(the_context.add_clause(vec![literals[0]]).is_ok());
assert!(the_context.add_clause(vec![literals[1]]).is_ok());
assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
assert_eq!(the_context.value_of(literals[2]), Some(false));
assert_eq!(the_context.value_of(literals[3]), Some(false));
```
*/

use std::collections::HashSet;

use crate::{
    db::{atom::AtomValue, LevelIndex},
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        clause::{CClause, Clause},
        literal::{CLiteral, Literal},
    },
    theory::{
        levels::LevelLog, Capabilities, Conflict, ReasonMarker, Theory, TheoryIndex, TheoryTrail,
    },
};

/// Counts kept by [AtMost].
#[derive(Clone, Copy, Debug, Default)]
pub struct AtMostStats {
    pub propagations: usize,
    pub conflicts: usize,
    pub reasons: usize,
}

/// At most `bound` of `members` are true.
pub struct AtMost {
    index: Option<TheoryIndex>,

    /// The members, in order of construction.
    members: Vec<CLiteral>,

    /// The members, for quick lookup.
    member_set: HashSet<CLiteral>,

    bound: usize,

    /// Every literal enqueued whose atom is the atom of some member.
    log: LevelLog<CLiteral>,

    /// Whether the constraint is known to be satisfied at the base level.
    satisfied_at_base: bool,

    /// Some propagation was refused by the context, and so the theory is incomplete.
    failed: bool,

    stats: AtMostStats,
}

impl AtMost {
    /// At most `bound` of `members` are true.
    ///
    /// Duplicate members are dropped.
    pub fn new(members: Vec<CLiteral>, bound: usize) -> Self {
        let mut member_set = HashSet::default();
        let members = members
            .into_iter()
            .filter(|member| member_set.insert(*member))
            .collect();

        AtMost {
            index: None,
            members,
            member_set,
            bound,
            log: LevelLog::default(),
            satisfied_at_base: false,
            failed: false,
            stats: AtMostStats::default(),
        }
    }

    /// An iterator over the atoms of the members.
    pub fn atoms(&self) -> impl Iterator<Item = Atom> + '_ {
        self.members.iter().map(|member| member.atom())
    }

    /// The members, in order of construction.
    pub fn members(&self) -> &[CLiteral] {
        &self.members
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn stats(&self) -> AtMostStats {
        self.stats
    }

    fn is_member(&self, literal: CLiteral) -> bool {
        self.member_set.contains(&literal)
    }

    /// The true members among `entries`, in order.
    fn true_members<'a>(&'a self, entries: &'a [CLiteral]) -> impl Iterator<Item = CLiteral> + 'a {
        entries
            .iter()
            .copied()
            .filter(|literal| self.is_member(*literal))
    }

    fn false_member_count(&self, entries: &[CLiteral]) -> usize {
        entries
            .iter()
            .filter(|literal| self.is_member(literal.negate()))
            .count()
    }

    /// The count of false members sufficient for satisfaction.
    fn satisfying_false_count(&self) -> usize {
        self.members.len().saturating_sub(self.bound)
    }

    /// The reason for `literal`, given the true members of the prefix of the log of length `marker`.
    fn reason(&self, literal: CLiteral, marker: ReasonMarker) -> CClause {
        let prefix = self.log.prefix(marker.value() as usize);
        let mut reason = vec![literal];
        reason.extend(
            self.true_members(prefix)
                .take(self.bound)
                .map(|member| member.negate()),
        );
        reason
    }

    /// Propagation and conflict detection, shared by propagate and solve.
    fn examine(&mut self, trail: &mut TheoryTrail) -> Result<(), Conflict> {
        let true_members = self.true_members(self.log.entries()).collect::<Vec<_>>();

        if true_members.len() > self.bound {
            self.stats.conflicts += 1;
            let clause = true_members[..=self.bound]
                .iter()
                .map(|member| member.negate())
                .collect();
            return Err(Conflict::new(clause));
        }

        if true_members.len() < self.bound {
            return Ok(());
        }

        let marker = ReasonMarker::new(self.log.len() as u32);
        let unvalued = self
            .members
            .iter()
            .copied()
            .filter(|member| !true_members.contains(member))
            .collect::<Vec<_>>();

        for member in unvalued {
            match trail.propagate(member.negate(), marker) {
                Ok(AtomValue::NotSet) => self.stats.propagations += 1,

                Ok(AtomValue::Same) => {}

                // The member is true on the trail, though not yet enqueued.
                Ok(AtomValue::Different) => {
                    self.stats.conflicts += 1;
                    return Err(Conflict::new(self.reason(member.negate(), marker)));
                }

                Err(e) => {
                    log::error!(target: targets::THEORY, "Propagation of {} failed: {e:?}", member.negate());
                    self.failed = true;
                    return Ok(());
                }
            }
        }

        Ok(())
    }
}

impl Theory for AtMost {
    fn theory_index(&self) -> Option<TheoryIndex> {
        self.index
    }

    fn set_theory_index(&mut self, index: TheoryIndex) {
        self.index = Some(index);
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            lazy_backtracking: true,
            clear_satisfied: true,
            satisfaction_hint: true,
            ..Default::default()
        }
    }

    fn new_decision_level(&mut self) {
        self.log.new_level();
    }

    fn backtrack_until(&mut self, level: LevelIndex) {
        self.log.defer_backtrack(level);
    }

    fn enqueue(&mut self, literal: CLiteral) {
        if self.is_member(literal) || self.is_member(literal.negate()) {
            self.log.record(literal);
        }
    }

    fn clear_satisfied(&mut self) {
        if self.log.level() == 0
            && self.false_member_count(self.log.entries()) >= self.satisfying_false_count()
        {
            self.satisfied_at_base = true;
        }
    }

    fn propagate(&mut self, trail: &mut TheoryTrail) -> Result<(), Conflict> {
        if self.satisfied_at_base {
            return Ok(());
        }
        self.examine(trail)
    }

    fn solve(&mut self, trail: &mut TheoryTrail) -> Result<(), Conflict> {
        self.examine(trail)
    }

    fn is_satisfied(&self) -> bool {
        self.satisfied_at_base
            || self.false_member_count(self.log.entries()) >= self.satisfying_false_count()
    }

    fn build_reason(&mut self, literal: CLiteral, marker: ReasonMarker) -> CClause {
        self.stats.reasons += 1;
        self.reason(literal, marker)
    }

    fn write_stats(&self, detail_level: u32, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(
            out,
            "at most {} of {}: {} propagations, {} conflicts, {} reasons",
            self.bound,
            self.members.len(),
            self.stats.propagations,
            self.stats.conflicts,
            self.stats.reasons
        )?;
        if detail_level > 0 {
            writeln!(out, "  members: {}", self.members.as_dimacs(false))?;
        }
        Ok(())
    }

    fn write_solution(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        let true_members = self.true_members(self.log.entries()).collect::<Vec<_>>();
        writeln!(out, "at most {}: {}", self.bound, true_members.as_dimacs(false))
    }

    fn write_witness(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        let true_members = self.true_members(self.log.entries()).collect::<Vec<_>>();
        writeln!(out, "{}", true_members.as_dimacs(true))
    }

    fn check_propagated(&self, trail: &TheoryTrail) -> bool {
        if self.failed {
            return false;
        }

        let entries = self.log.entries();
        if entries
            .iter()
            .any(|literal| trail.value_of_literal(*literal) != Some(true))
        {
            return false;
        }

        let true_count = self.true_members(entries).count();
        match true_count.cmp(&self.bound) {
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => self
                .members
                .iter()
                .all(|member| trail.value_of_literal(*member).is_some()),
            std::cmp::Ordering::Less => true,
        }
    }

    fn check_solved(&self, trail: &TheoryTrail) -> bool {
        let true_count = self
            .members
            .iter()
            .filter(|member| trail.value_of_literal(**member) == Some(true))
            .count();
        true_count <= self.bound
    }
}
