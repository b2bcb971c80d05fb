/*!
The protocol between the boolean core of a context and background theories.

A theory is a decision procedure for some sub-domain (arithmetic, reachability in a graph, etc.) plugged into the search of a context in the lazy DPLL(T) style.
The context assigns literals, tells interested theories about those literals, and asks each theory to propagate consequences or report a conflict.
On conflict the context learns a clause (asking theories to explain their propagations as needed) and backjumps, and theories follow the backjump.

Theories implement the [Theory] trait, and are registered with a context through [add_theory](crate::context::GenericContext::add_theory).

# Overview

```none
                     +------------------------- new_decision_level / backtrack_until
                     |
+-------+  enqueue   ⌄   propagate   +--------+
| trail | ---------> theory -------> | trail  |  (via TheoryTrail::propagate, with a ReasonMarker)
+-------+            |               +--------+
                     |
                     +---> Err(Conflict)  ----> analysis ----> build_reason(literal, marker) ----> learnt clause
```

- [enqueue](Theory::enqueue) records a literal is true, and should be cheap.
- [propagate](Theory::propagate) brings the theory to a local fixpoint, either assigning literals or returning a [Conflict].
- [solve](Theory::solve) is a (possibly expensive) complete check, made when every atom has a value.
- [build_reason](Theory::build_reason) explains a propagation, on demand, using the [ReasonMarker] given at the time of propagation.
- [decide](Theory::decide) allows a theory to propose a decision, if the theory has the [decisions](Capabilities::decisions) capability.

# Capabilities

Some parts of the protocol are optional.
Rather than rely on silent defaults, a theory states which optional parts it supports through [Capabilities].
The capabilities of a theory are read once, at registration, and the context only calls an optional method if the relevant capability is present.

# Invariants

<div class="warning">
Every literal of a conflict clause is false on the current valuation, and every literal of a reason clause other than the reasoned literal is false and was valued before the reasoned literal.
</div>

A context checks the first part of this invariant whenever [check_theories](crate::config::Config::check_theories) is set.
Soundness of a conflict or reason with respect to the semantics of a theory can not be checked by the context, and is the responsibility of the theory.

# Decision levels

A context calls [new_decision_level](Theory::new_decision_level) on every theory whenever a decision is made, and so a theory is always aware of the current level.
On a backjump to level *l*, decisions proposed by a theory above *l* are retracted via [undecide](Theory::undecide), most recent first, and then [backtrack_until](Theory::backtrack_until) is called with *l*.

[LevelLog](levels::LevelLog) may help with tracking facts by level, and supports lazy backtracking.
*/

pub mod levels;
pub mod scheduler;

mod trail;
pub use trail::TheoryTrail;

use crate::{
    db::LevelIndex,
    structures::{clause::CClause, literal::CLiteral},
};

/// The index of a theory, given when the theory is registered with a context.
pub type TheoryIndex = u32;

/// An opaque marker chosen by a theory when propagating a literal, and returned to the theory when building a reason for the propagation.
///
/// A context stores markers, but never inspects them.
///
/// ```rust
/// # use otter_smt::theory::ReasonMarker;
/// let marker = ReasonMarker::new(7);
/// assert_eq!(marker.value(), 7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReasonMarker(u32);

impl ReasonMarker {
    /// A marker wrapping some value of interest to the theory.
    pub fn new(value: u32) -> Self {
        ReasonMarker(value)
    }

    /// The value wrapped by the marker.
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// A conflict found by a theory.
///
/// The clause of a conflict is a consequence of the theory, each of whose literals is false on the current valuation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    pub clause: CClause,
}

impl Conflict {
    pub fn new(clause: CClause) -> Self {
        Conflict { clause }
    }
}

/// A decision proposed by a theory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TheoryDecision {
    /// The literal to value.
    pub literal: CLiteral,

    /// Some indication that the decision is (partially) forced by the theory.
    ///
    /// The marker is valid through the level at which the decision was made, and is dropped by the context on a backjump from that level.
    pub reason: Option<ReasonMarker>,
}

impl TheoryDecision {
    /// A decision without any reason.
    pub fn free(literal: CLiteral) -> Self {
        TheoryDecision {
            literal,
            reason: None,
        }
    }
}

/// Optional parts of the protocol supported by a theory.
///
/// By default, no optional part is supported.
///
/// ```rust
/// # use otter_smt::theory::Capabilities;
/// let capabilities = Capabilities {
///     decisions: true,
///     ..Default::default()
/// };
/// assert!(!capabilities.lazy_backtracking);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// The theory may propose decisions, and so [decide](Theory::decide) and [undecide](Theory::undecide) are called.
    pub decisions: bool,

    /// The theory may defer rollback across backtracks, reconciling its state when queried.
    pub lazy_backtracking: bool,

    /// The theory defers recording some enqueued literals, and [enqueue_any_unqueued](Theory::enqueue_any_unqueued) is called before each propagation.
    pub deferred_enqueue: bool,

    /// The theory caches constraints which may be found satisfied at the base level, and [clear_satisfied](Theory::clear_satisfied) is called when new facts are known at the base level.
    pub clear_satisfied: bool,

    /// The theory offers a hint of satisfaction through [is_satisfied](Theory::is_satisfied).
    pub satisfaction_hint: bool,
}

/// The trait implemented by a theory.
///
/// For an overview of the protocol, see the [module documentation](crate::theory).
///
/// Methods which are part of an optional capability have a default implementation, and are only called if the theory states the capability.
pub trait Theory {
    /// The index of the theory, if set.
    fn theory_index(&self) -> Option<TheoryIndex>;

    /// Sets the index of the theory.
    ///
    /// Called exactly once by a context, when the theory is registered.
    fn set_theory_index(&mut self, index: TheoryIndex);

    /// The optional parts of the protocol supported by the theory.
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// A one-time hook, called before the first decision of the first solve.
    fn preprocess(&mut self) {}

    /// Informs the theory of whether the literal (with the given polarity) occurs in some clause of the context.
    fn set_literal_occurs(&mut self, _literal: CLiteral, _occurs: bool) {}

    /// Pushes a decision level.
    fn new_decision_level(&mut self);

    /// Pops every level above `level`, undoing any literal enqueued at those levels.
    fn backtrack_until(&mut self, level: LevelIndex);

    /// Records that the literal is true.
    ///
    /// Expensive reasoning should be deferred to [propagate](Theory::propagate).
    fn enqueue(&mut self, literal: CLiteral);

    /// Records any enqueued literals whose recording was deferred.
    fn enqueue_any_unqueued(&mut self, _trail: &TheoryTrail) {}

    /// Drops any constraints known to be satisfied at the base level.
    fn clear_satisfied(&mut self) {}

    /// Propagates the consequences of enqueued literals to a fixpoint, or returns a conflict.
    fn propagate(&mut self, trail: &mut TheoryTrail) -> Result<(), Conflict>;

    /// Checks the consistency of the theory with respect to a full valuation of the atoms of the context, or returns a conflict.
    fn solve(&mut self, trail: &mut TheoryTrail) -> Result<(), Conflict>;

    /// True only if the theory is known to be satisfied by the current valuation.
    ///
    /// A return of false indicates satisfaction is unknown.
    fn is_satisfied(&self) -> bool {
        false
    }

    /// Proposes a literal to decide on, or declines with `None`.
    fn decide(&mut self, _trail: &TheoryTrail) -> Option<TheoryDecision> {
        None
    }

    /// Retracts a decision previously proposed by the theory.
    fn undecide(&mut self, _literal: CLiteral) {}

    /// A clause explaining the propagation of `literal`, given the marker supplied when the literal was propagated.
    ///
    /// The clause contains `literal`, and every other literal is false and was valued before `literal`.
    fn build_reason(&mut self, literal: CLiteral, marker: ReasonMarker) -> CClause;

    /// Writes some statistics about the theory.
    fn write_stats(&self, _detail_level: u32, _out: &mut dyn std::io::Write) -> std::io::Result<()> {
        Ok(())
    }

    /// Writes the valuation of the theory, after a satisfiable solve.
    fn write_solution(&self, _out: &mut dyn std::io::Write) -> std::io::Result<()> {
        Ok(())
    }

    /// Writes some witness to the valuation of the theory, for independent certification.
    fn write_witness(&self, _out: &mut dyn std::io::Write) -> std::io::Result<()> {
        Ok(())
    }

    /// False if some consequence or conflict was not propagated.
    ///
    /// A return of false indicates a defect in the theory.
    fn check_propagated(&self, _trail: &TheoryTrail) -> bool {
        true
    }

    /// False if the valuation does not satisfy the theory.
    ///
    /// A return of false indicates a defect in the theory.
    fn check_solved(&self, _trail: &TheoryTrail) -> bool {
        true
    }
}
