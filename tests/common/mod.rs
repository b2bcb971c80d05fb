#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use otter_smt::{
    config::Config,
    context::Context,
    db::LevelIndex,
    structures::{
        atom::Atom,
        clause::{CClause, Clause},
        literal::{CLiteral, Literal},
    },
    theory::{
        levels::LevelLog, Capabilities, Conflict, ReasonMarker, Theory, TheoryDecision,
        TheoryIndex, TheoryTrail,
    },
};

/// Initialises a logger, if `RUST_LOG` is set.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A context which verifies every exchange with a theory.
pub fn checked_context() -> Context {
    init_logging();
    let mut config = Config::default();
    config.check_theories.value = true;
    Context::from_config(config)
}

/// Registers the theory and observes each atom.
pub fn register(context: &mut Context, theory: Box<dyn Theory>, atoms: &[Atom]) -> TheoryIndex {
    let index = context.add_theory(theory).unwrap();
    for atom in atoms {
        context.observe(index, *atom).unwrap();
    }
    index
}

/// A call made to a theory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Preprocess,
    LiteralOccurs(CLiteral, bool),
    NewDecisionLevel,
    BacktrackUntil(LevelIndex),
    Enqueue(CLiteral),
    EnqueueAnyUnqueued,
    ClearSatisfied,
    Propagate,
    Solve,
    Decide,
    Undecide(CLiteral),
    BuildReason(CLiteral, ReasonMarker),
}

/// Calls made to any recording theory, in order, each with the id of the theory.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<(usize, Event)>>>);

impl Journal {
    fn push(&self, id: usize, event: Event) {
        self.0.borrow_mut().push((id, event));
    }

    pub fn events(&self) -> Vec<(usize, Event)> {
        self.0.borrow().clone()
    }

    pub fn events_of(&self, id: usize) -> Vec<Event> {
        self.0
            .borrow()
            .iter()
            .filter(|(event_id, _)| *event_id == id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn count(&self, id: usize, event: &Event) -> usize {
        self.events_of(id).iter().filter(|e| *e == event).count()
    }

    /// The position of the first matching event of the theory, if any.
    pub fn position(&self, id: usize, event: &Event) -> Option<usize> {
        self.events_of(id).iter().position(|e| e == event)
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// A theory with scripted behaviour, which records every call made to the theory.
pub struct RecordingTheory {
    id: usize,
    index: Option<TheoryIndex>,
    keeps_index: bool,
    journal: Journal,
    facts: Rc<RefCell<LevelLog<CLiteral>>>,
    capabilities: Capabilities,

    /// A conflict clause, returned once the trigger is enqueued.
    conflicts: Vec<(CLiteral, CClause)>,

    /// Clauses returned as a conflict once the negation of each literal is enqueued.
    forbidden: Vec<CClause>,

    /// A consequent, propagated once each antecedent is enqueued.
    implications: Vec<(Vec<CLiteral>, CLiteral)>,

    malformed_reasons: bool,

    /// Reasons given in place of those built from implications.
    explanations: Vec<(CLiteral, CClause)>,

    proposals: Vec<CLiteral>,

    /// Propose the first proposal, even if valued.
    stubborn: bool,

    passes_propagated_check: bool,
    passes_solved_check: bool,
}

impl RecordingTheory {
    pub fn new(id: usize, journal: &Journal) -> Self {
        RecordingTheory {
            id,
            index: None,
            keeps_index: true,
            journal: journal.clone(),
            facts: Rc::default(),
            capabilities: Capabilities::default(),
            conflicts: Vec::default(),
            forbidden: Vec::default(),
            implications: Vec::default(),
            malformed_reasons: false,
            explanations: Vec::default(),
            proposals: Vec::default(),
            stubborn: false,
            passes_propagated_check: true,
            passes_solved_check: true,
        }
    }

    /// A handle on the facts enqueued to the theory.
    pub fn facts(&self) -> Rc<RefCell<LevelLog<CLiteral>>> {
        self.facts.clone()
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn conflict_on(mut self, trigger: CLiteral, clause: CClause) -> Self {
        self.conflicts.push((trigger, clause));
        self
    }

    pub fn forbids(mut self, clause: CClause) -> Self {
        self.forbidden.push(clause);
        self
    }

    pub fn implies(mut self, antecedents: Vec<CLiteral>, consequent: CLiteral) -> Self {
        self.implications.push((antecedents, consequent));
        self
    }

    pub fn with_malformed_reasons(mut self) -> Self {
        self.malformed_reasons = true;
        self
    }

    pub fn explains(mut self, literal: CLiteral, reason: CClause) -> Self {
        self.explanations.push((literal, reason));
        self
    }

    pub fn proposes(mut self, literal: CLiteral) -> Self {
        self.proposals.push(literal);
        self
    }

    pub fn stubborn(mut self) -> Self {
        self.stubborn = true;
        self
    }

    pub fn with_index(mut self, index: TheoryIndex) -> Self {
        self.index = Some(index);
        self
    }

    pub fn forgetful(mut self) -> Self {
        self.keeps_index = false;
        self
    }

    pub fn failing_propagated_check(mut self) -> Self {
        self.passes_propagated_check = false;
        self
    }

    pub fn failing_solved_check(mut self) -> Self {
        self.passes_solved_check = false;
        self
    }

    fn record(&self, event: Event) {
        self.journal.push(self.id, event);
    }

    fn examine(&mut self, trail: &mut TheoryTrail) -> Result<(), Conflict> {
        let facts = self.facts.borrow().entries().to_vec();

        for (trigger, clause) in &self.conflicts {
            if facts.contains(trigger) {
                return Err(Conflict::new(clause.clone()));
            }
        }

        for clause in &self.forbidden {
            if clause.iter().all(|literal| facts.contains(&literal.negate())) {
                return Err(Conflict::new(clause.clone()));
            }
        }

        let marker = ReasonMarker::new(facts.len() as u32);
        for (antecedents, consequent) in &self.implications {
            if antecedents.iter().all(|antecedent| facts.contains(antecedent))
                && trail.is_false(*consequent)
            {
                let mut clause = vec![*consequent];
                clause.extend(antecedents.iter().map(|antecedent| antecedent.negate()));
                return Err(Conflict::new(clause));
            }
        }

        for (antecedents, consequent) in &self.implications {
            if antecedents.iter().all(|antecedent| facts.contains(antecedent)) {
                let _ = trail.propagate(*consequent, marker);
            }
        }
        Ok(())
    }
}

impl Theory for RecordingTheory {
    fn theory_index(&self) -> Option<TheoryIndex> {
        self.index
    }

    fn set_theory_index(&mut self, index: TheoryIndex) {
        if self.keeps_index {
            self.index = Some(index);
        }
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn preprocess(&mut self) {
        self.record(Event::Preprocess);
    }

    fn set_literal_occurs(&mut self, literal: CLiteral, occurs: bool) {
        self.record(Event::LiteralOccurs(literal, occurs));
    }

    fn new_decision_level(&mut self) {
        self.record(Event::NewDecisionLevel);
        self.facts.borrow_mut().new_level();
    }

    fn backtrack_until(&mut self, level: LevelIndex) {
        self.record(Event::BacktrackUntil(level));
        match self.capabilities.lazy_backtracking {
            true => self.facts.borrow_mut().defer_backtrack(level),
            false => {
                self.facts.borrow_mut().backtrack_until(level);
            }
        }
    }

    fn enqueue(&mut self, literal: CLiteral) {
        self.record(Event::Enqueue(literal));
        self.facts.borrow_mut().record(literal);
    }

    fn enqueue_any_unqueued(&mut self, _trail: &TheoryTrail) {
        self.record(Event::EnqueueAnyUnqueued);
    }

    fn clear_satisfied(&mut self) {
        self.record(Event::ClearSatisfied);
    }

    fn propagate(&mut self, trail: &mut TheoryTrail) -> Result<(), Conflict> {
        self.record(Event::Propagate);
        self.examine(trail)
    }

    fn solve(&mut self, trail: &mut TheoryTrail) -> Result<(), Conflict> {
        self.record(Event::Solve);
        self.examine(trail)
    }

    fn decide(&mut self, trail: &TheoryTrail) -> Option<TheoryDecision> {
        self.record(Event::Decide);
        if self.stubborn {
            return self.proposals.first().copied().map(TheoryDecision::free);
        }
        self.proposals
            .iter()
            .copied()
            .find(|proposal| trail.value_of(proposal.atom()).is_none())
            .map(|literal| TheoryDecision {
                literal,
                reason: Some(ReasonMarker::new(self.facts.borrow().len() as u32)),
            })
    }

    fn undecide(&mut self, literal: CLiteral) {
        self.record(Event::Undecide(literal));
    }

    fn build_reason(&mut self, literal: CLiteral, marker: ReasonMarker) -> CClause {
        self.record(Event::BuildReason(literal, marker));
        if let Some((_, reason)) = self.explanations.iter().find(|(l, _)| *l == literal) {
            return reason.clone();
        }
        let Some((antecedents, _)) = self
            .implications
            .iter()
            .find(|(_, consequent)| *consequent == literal)
        else {
            return vec![literal];
        };

        let mut reason = match self.malformed_reasons {
            true => Vec::default(),
            false => vec![literal],
        };
        reason.extend(antecedents.iter().map(|antecedent| antecedent.negate()));
        reason
    }

    fn write_stats(&self, _detail_level: u32, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(
            out,
            "recording {}: {} events",
            self.id,
            self.journal.events_of(self.id).len()
        )
    }

    fn write_solution(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(
            out,
            "recording {}: {}",
            self.id,
            self.facts.borrow().entries().as_dimacs(false)
        )
    }

    fn check_propagated(&self, trail: &TheoryTrail) -> bool {
        self.passes_propagated_check
            && self
                .facts
                .borrow()
                .entries()
                .iter()
                .all(|fact| trail.value_of_literal(*fact) == Some(true))
    }

    fn check_solved(&self, _trail: &TheoryTrail) -> bool {
        self.passes_solved_check
    }
}
