/*!
Reachability between two nodes of a directed graph.

[Reachability] relates a *reach* atom to the existence of a path from a source node to a target node, over edges each of which is enabled by some atom.
That is, reach is true if and only if there is a path from source to target on which every edge atom is true.

# Approximations

The theory reasons with two approximations of the graph, taken from the literals it has been told of:
- The *under*-approximation, whose edges are those with a true atom.
- The *over*-approximation, whose edges are those without a false atom.

If target is reachable on the under-approximation reach is propagated, with the reason that reach holds if each edge on the path holds.
If target is unreachable on the over-approximation the negation of reach is propagated, with the reason that reach requires some edge in the cut between the nodes reachable from source and the remaining nodes.

In either case, if reach already has the opposite value the same clause is a conflict.

# Reasons

As with [AtMost](crate::theories::cardinality::AtMost), a propagation is marked with the length of the log of enqueued literals, and a reason is built from the prefix of the log of the marked length.
Paths are found by breadth-first search, and so the reason for a marker is the same each time the reason is built.

# Decisions

If reach is true and target is not (yet) reachable on the under-approximation, the theory proposes the first edge without a value on a shortest path on the over-approximation.
A proposal is noted as a decision only once the context enqueues the proposed literal as the first literal of a fresh level, so a rejected proposal is forgotten.

# Occurrence

The theory skips propagation of a reach literal which does not occur in any clause, as nothing follows from the literal.
Completeness is kept by [solve](crate::theory::Theory::solve), which does not skip.

# Example

```rust
# use otter_smt::config::Config;
# use otter_smt::context::Context;
# use otter_smt::reports::Report;
# use otter_smt::theories::reach::Reachability;
let mut the_context = Context::from_config(Config::default());
let reach = the_context.fresh_or_max_atom();
let a = the_context.fresh_or_max_atom();
let b = the_context.fresh_or_max_atom();

// 0 -a-> 1 -b-> 2
let mut reachability = Reachability::new(3, 0, 2, reach);
reachability.add_edge(0, 1, a);
reachability.add_edge(1, 2, b);

let atoms = reachability.atoms().collect::<Vec<_>>();
let index = the_context.add_theory(Box::new(reachability)).unwrap();
for atom in atoms {
    the_context.observe(index, atom).unwrap();
}

assert!(the_context.add_clause(vec![reach as i32]).is_ok());
assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
assert_eq!(the_context.value_of_atom(a), Some(true));
assert_eq!(the_context.value_of_atom(b), Some(true));
```
*/

use std::collections::{HashMap, VecDeque};

use petgraph::{
    algo::has_path_connecting,
    graph::{DiGraph, EdgeIndex, EdgeReference, NodeIndex},
    visit::{EdgeFiltered, EdgeRef},
    Direction,
};

use crate::{
    db::{atom::AtomValue, LevelIndex},
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        clause::CClause,
        literal::{CLiteral, Literal},
    },
    theory::{
        levels::LevelLog, Capabilities, Conflict, ReasonMarker, Theory, TheoryDecision,
        TheoryIndex, TheoryTrail,
    },
};

/// Counts kept by [Reachability].
#[derive(Clone, Copy, Debug, Default)]
pub struct ReachStats {
    pub propagations: usize,
    pub conflicts: usize,
    pub reasons: usize,

    /// Proposals accepted as decisions.
    pub decisions: usize,

    /// Propagations skipped, as the propagated literal did not occur.
    pub skipped: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Approximation {
    Under,
    Over,
}

/// The value of each atom, given some literals.
type Status = HashMap<Atom, bool>;

fn status_of(literals: &[CLiteral]) -> Status {
    literals
        .iter()
        .map(|literal| (literal.atom(), literal.polarity()))
        .collect()
}

fn enabled(status: &Status, atom: Atom, approximation: Approximation) -> bool {
    match approximation {
        Approximation::Under => status.get(&atom) == Some(&true),
        Approximation::Over => status.get(&atom) != Some(&false),
    }
}

/// The reach atom holds if and only if target is reachable from source.
pub struct Reachability {
    index: Option<TheoryIndex>,

    /// The graph, with each edge weighted by the atom which enables the edge.
    graph: DiGraph<(), Atom>,

    source: NodeIndex,

    target: NodeIndex,

    reach: Atom,

    /// Every literal enqueued.
    log: LevelLog<CLiteral>,

    /// Whether a literal occurs in some clause, if known.
    occurs: HashMap<CLiteral, bool>,

    /// Decisions accepted by the context and not yet retracted, in order of acceptance.
    decisions: Vec<CLiteral>,

    /// A proposed decision, with the level of the proposal, held until the decision is enqueued.
    proposal: Option<(CLiteral, LevelIndex)>,

    /// Some propagation was refused by the context, and so the theory is incomplete.
    failed: bool,

    stats: ReachStats,
}

impl Reachability {
    /// A graph with `node_count` nodes and no edges, relating `reach` to a path from `source` to `target`.
    ///
    /// Nodes are added as required, if either `source` or `target` is not less than `node_count`.
    pub fn new(node_count: usize, source: usize, target: usize, reach: Atom) -> Self {
        let mut reachability = Reachability {
            index: None,
            graph: DiGraph::with_capacity(node_count, 0),
            source: NodeIndex::new(source),
            target: NodeIndex::new(target),
            reach,
            log: LevelLog::default(),
            occurs: HashMap::default(),
            decisions: Vec::default(),
            proposal: None,
            failed: false,
            stats: ReachStats::default(),
        };
        reachability.ensure_node(node_count.max(source + 1).max(target + 1) - 1);
        reachability
    }

    fn ensure_node(&mut self, node: usize) -> NodeIndex {
        while self.graph.node_count() <= node {
            self.graph.add_node(());
        }
        NodeIndex::new(node)
    }

    /// Adds an edge from `from` to `to`, enabled by `atom`.
    pub fn add_edge(&mut self, from: usize, to: usize, atom: Atom) {
        let from = self.ensure_node(from);
        let to = self.ensure_node(to);
        self.graph.add_edge(from, to, atom);
    }

    /// An iterator over the reach atom and every edge atom.
    pub fn atoms(&self) -> impl Iterator<Item = Atom> + '_ {
        std::iter::once(self.reach).chain(self.graph.edge_weights().copied())
    }

    pub fn reach_atom(&self) -> Atom {
        self.reach
    }

    /// Decisions proposed by the theory, accepted by the context, and not yet retracted.
    pub fn outstanding_decisions(&self) -> &[CLiteral] {
        &self.decisions
    }

    pub fn stats(&self) -> ReachStats {
        self.stats
    }

    fn literal_occurs(&self, literal: CLiteral) -> bool {
        self.occurs.get(&literal).copied().unwrap_or(true)
    }

    /// The edges of a shortest path from source to target on the given approximation, if some path exists.
    fn shortest_path(&self, status: &Status, approximation: Approximation) -> Option<Vec<EdgeIndex>> {
        let mut visited = vec![false; self.graph.node_count()];
        let mut predecessor: Vec<Option<EdgeIndex>> = vec![None; self.graph.node_count()];
        let mut queue = VecDeque::from([self.source]);
        visited[self.source.index()] = true;

        while let Some(node) = queue.pop_front() {
            if node == self.target {
                let mut path = Vec::default();
                let mut current = node;
                while let Some(edge) = predecessor[current.index()] {
                    path.push(edge);
                    current = self.graph.edge_endpoints(edge)?.0;
                }
                path.reverse();
                return Some(path);
            }

            for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                let next = edge.target();
                if !visited[next.index()] && enabled(status, *edge.weight(), approximation) {
                    visited[next.index()] = true;
                    predecessor[next.index()] = Some(edge.id());
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Whether each node is reachable from source on the over-approximation.
    fn reachable(&self, status: &Status) -> Vec<bool> {
        let mut visited = vec![false; self.graph.node_count()];
        let mut queue = VecDeque::from([self.source]);
        visited[self.source.index()] = true;

        while let Some(node) = queue.pop_front() {
            for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                let next = edge.target();
                if !visited[next.index()] && enabled(status, *edge.weight(), Approximation::Over) {
                    visited[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }
        visited
    }

    /// The clause: reach, or some edge on `path` is disabled.
    fn path_clause(&self, path: &[EdgeIndex]) -> CClause {
        let mut clause = vec![CLiteral::new(self.reach, true)];
        for edge in path {
            let literal = CLiteral::new(self.graph[*edge], false);
            if !clause.contains(&literal) {
                clause.push(literal);
            }
        }
        clause
    }

    /// The clause: not reach, or some edge leaving the nodes reachable on the over-approximation is enabled.
    fn cut_clause(&self, status: &Status) -> CClause {
        let reachable = self.reachable(status);
        let mut clause = vec![CLiteral::new(self.reach, false)];
        for edge in self.graph.edge_references() {
            if reachable[edge.source().index()] && !reachable[edge.target().index()] {
                let literal = CLiteral::new(*edge.weight(), true);
                if !clause.contains(&literal) {
                    clause.push(literal);
                }
            }
        }
        clause
    }

    fn reason(&self, literal: CLiteral, marker: ReasonMarker) -> CClause {
        let status = status_of(self.log.prefix(marker.value() as usize));
        if literal.polarity() {
            match self.shortest_path(&status, Approximation::Under) {
                Some(path) => self.path_clause(&path),
                None => vec![literal],
            }
        } else {
            self.cut_clause(&status)
        }
    }

    /// Propagation and conflict detection, shared by propagate and solve.
    fn examine(&mut self, trail: &mut TheoryTrail, skip_unoccurring: bool) -> Result<(), Conflict> {
        let status = status_of(self.log.entries());
        let marker = ReasonMarker::new(self.log.len() as u32);
        let reach_value = status.get(&self.reach).copied();

        let clause = if let Some(path) = self.shortest_path(&status, Approximation::Under) {
            if reach_value == Some(true) {
                return Ok(());
            }
            self.path_clause(&path)
        } else if self.shortest_path(&status, Approximation::Over).is_none() {
            if reach_value == Some(false) {
                return Ok(());
            }
            self.cut_clause(&status)
        } else {
            return Ok(());
        };

        // The first literal of either clause is the reach literal.
        let literal = clause[0];
        if reach_value.is_some() {
            self.stats.conflicts += 1;
            return Err(Conflict::new(clause));
        }

        if skip_unoccurring && !self.literal_occurs(literal) {
            self.stats.skipped += 1;
            return Ok(());
        }

        match trail.propagate(literal, marker) {
            Ok(AtomValue::NotSet) => self.stats.propagations += 1,

            Ok(AtomValue::Same) => {}

            // Valued, though not yet enqueued.
            Ok(AtomValue::Different) => {
                self.stats.conflicts += 1;
                return Err(Conflict::new(clause));
            }

            Err(e) => {
                log::error!(target: targets::THEORY, "Propagation of {literal} failed: {e:?}");
                self.failed = true;
            }
        }
        Ok(())
    }
}

impl Theory for Reachability {
    fn theory_index(&self) -> Option<TheoryIndex> {
        self.index
    }

    fn set_theory_index(&mut self, index: TheoryIndex) {
        self.index = Some(index);
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            decisions: true,
            ..Default::default()
        }
    }

    fn set_literal_occurs(&mut self, literal: CLiteral, occurs: bool) {
        self.occurs.insert(literal, occurs);
    }

    fn new_decision_level(&mut self) {
        self.log.new_level();
    }

    fn backtrack_until(&mut self, level: LevelIndex) {
        self.log.backtrack_until(level);
        self.proposal = None;
    }

    fn enqueue(&mut self, literal: CLiteral) {
        // An accepted decision is the first literal of a fresh level.
        if let Some((proposal, level)) = self.proposal {
            if self.log.level() > level {
                self.proposal = None;
                if proposal == literal {
                    self.decisions.push(literal);
                    self.stats.decisions += 1;
                }
            }
        }
        self.log.record(literal);
    }

    fn propagate(&mut self, trail: &mut TheoryTrail) -> Result<(), Conflict> {
        self.examine(trail, true)
    }

    fn solve(&mut self, trail: &mut TheoryTrail) -> Result<(), Conflict> {
        self.examine(trail, false)
    }

    fn decide(&mut self, trail: &TheoryTrail) -> Option<TheoryDecision> {
        let status = status_of(self.log.entries());
        if status.get(&self.reach) != Some(&true)
            || self.shortest_path(&status, Approximation::Under).is_some()
        {
            return None;
        }

        let path = self.shortest_path(&status, Approximation::Over)?;
        let atom = path
            .iter()
            .map(|edge| self.graph[*edge])
            .find(|atom| trail.value_of(*atom).is_none())?;

        let literal = CLiteral::new(atom, true);
        self.proposal = Some((literal, trail.level()));
        Some(TheoryDecision {
            literal,
            reason: Some(ReasonMarker::new(self.log.len() as u32)),
        })
    }

    fn undecide(&mut self, literal: CLiteral) {
        if let Some(position) = self.decisions.iter().rposition(|d| *d == literal) {
            self.decisions.remove(position);
        }
    }

    fn build_reason(&mut self, literal: CLiteral, marker: ReasonMarker) -> CClause {
        self.stats.reasons += 1;
        self.reason(literal, marker)
    }

    fn write_stats(&self, detail_level: u32, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(
            out,
            "reach {} -> {}: {} propagations, {} conflicts, {} reasons, {} decisions, {} skipped",
            self.source.index(),
            self.target.index(),
            self.stats.propagations,
            self.stats.conflicts,
            self.stats.reasons,
            self.stats.decisions,
            self.stats.skipped
        )?;
        if detail_level > 0 {
            writeln!(
                out,
                "  {} nodes, {} edges",
                self.graph.node_count(),
                self.graph.edge_count()
            )?;
        }
        Ok(())
    }

    fn write_solution(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        let status = status_of(self.log.entries());
        let enabled_count = self
            .graph
            .edge_weights()
            .filter(|atom| enabled(&status, **atom, Approximation::Under))
            .count();
        writeln!(
            out,
            "reach {} -> {}: {}, {} of {} edges enabled",
            self.source.index(),
            self.target.index(),
            status.get(&self.reach) == Some(&true),
            enabled_count,
            self.graph.edge_count()
        )
    }

    fn write_witness(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        let status = status_of(self.log.entries());
        match self.shortest_path(&status, Approximation::Under) {
            Some(path) => {
                let mut nodes = vec![self.source.index().to_string()];
                for edge in path {
                    if let Some((_, to)) = self.graph.edge_endpoints(edge) {
                        nodes.push(to.index().to_string());
                    }
                }
                writeln!(out, "path {}", nodes.join(" "))
            }
            None => writeln!(out, "no path"),
        }
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

        let status = status_of(entries);
        let reach_value = status.get(&self.reach).copied();
        if self.shortest_path(&status, Approximation::Under).is_some() {
            match reach_value {
                Some(value) => value,
                None => !self.literal_occurs(CLiteral::new(self.reach, true)),
            }
        } else if self.shortest_path(&status, Approximation::Over).is_none() {
            match reach_value {
                Some(value) => !value,
                None => !self.literal_occurs(CLiteral::new(self.reach, false)),
            }
        } else {
            true
        }
    }

    fn check_solved(&self, trail: &TheoryTrail) -> bool {
        let enabled_edges = EdgeFiltered::from_fn(&self.graph, |edge: EdgeReference<Atom>| {
            trail.value_of(*edge.weight()) == Some(true)
        });
        let reachable = has_path_connecting(&enabled_edges, self.source, self.target, None);
        trail.value_of(self.reach) == Some(reachable)
    }
}

#[cfg(test)]
mod reach_tests {
    use super::*;
    use crate::db::atom::{AtomDB, Reason};

    // reach is atom 1, and the edges 0 -2-> 1 -3-> 2 and 0 -4-> 2.
    fn diamond() -> (Reachability, AtomDB) {
        let mut atom_db = AtomDB::default();
        for _ in 0..4 {
            atom_db.fresh_atom(false).unwrap();
        }

        let mut reachability = Reachability::new(3, 0, 2, 1);
        reachability.add_edge(0, 1, 2);
        reachability.add_edge(1, 2, 3);
        reachability.add_edge(0, 2, 4);
        reachability.set_theory_index(0);
        (reachability, atom_db)
    }

    #[test]
    fn atoms() {
        let (reachability, _) = diamond();
        assert_eq!(reachability.atoms().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn reach_on_path() {
        let (mut reachability, mut atom_db) = diamond();
        atom_db.assign(2, Reason::Decision).unwrap();
        atom_db.assign(3, Reason::Decision).unwrap();
        reachability.enqueue(2);
        reachability.enqueue(3);

        {
            let mut trail = TheoryTrail::new(&mut atom_db, 0);
            assert!(reachability.propagate(&mut trail).is_ok());
        }
        assert_eq!(atom_db.value_of(1), Some(true));

        let Some(Reason::Theory { marker, .. }) = atom_db.reason_of(1) else {
            panic!("expected a theory reason");
        };
        assert_eq!(reachability.build_reason(1, marker), vec![1, -2, -3]);
    }

    #[test]
    fn unreach_on_cut() {
        let (mut reachability, mut atom_db) = diamond();
        atom_db.assign(-2, Reason::Decision).unwrap();
        atom_db.assign(-4, Reason::Decision).unwrap();
        reachability.enqueue(-2);
        reachability.enqueue(-4);

        {
            let mut trail = TheoryTrail::new(&mut atom_db, 0);
            assert!(reachability.propagate(&mut trail).is_ok());
        }
        assert_eq!(atom_db.value_of(1), Some(false));

        let Some(Reason::Theory { marker, .. }) = atom_db.reason_of(1) else {
            panic!("expected a theory reason");
        };
        assert_eq!(reachability.build_reason(-1, marker), vec![-1, 2, 4]);
    }

    #[test]
    fn conflict_on_path() {
        let (mut reachability, mut atom_db) = diamond();
        reachability.enqueue(-1);
        reachability.enqueue(4);

        let mut trail = TheoryTrail::new(&mut atom_db, 0);
        assert_eq!(
            reachability.propagate(&mut trail),
            Err(Conflict::new(vec![1, -4]))
        );
    }

    #[test]
    fn skip_unoccurring() {
        let (mut reachability, mut atom_db) = diamond();
        reachability.set_literal_occurs(1, false);
        reachability.enqueue(4);

        let mut trail = TheoryTrail::new(&mut atom_db, 0);
        assert!(reachability.propagate(&mut trail).is_ok());
        assert_eq!(trail.propagated_count(), 0);
        assert_eq!(reachability.stats().skipped, 1);

        assert!(reachability.solve(&mut trail).is_ok());
        assert_eq!(trail.propagated_count(), 1);
    }

    #[test]
    fn decide_along_shortest_path() {
        let (mut reachability, mut atom_db) = diamond();
        atom_db.assign(1, Reason::Decision).unwrap();
        reachability.enqueue(1);

        let trail = TheoryTrail::new(&mut atom_db, 0);
        let decision = reachability.decide(&trail).map(|decision| decision.literal);
        assert_eq!(decision, Some(4));
        assert!(reachability.outstanding_decisions().is_empty());

        reachability.new_decision_level();
        reachability.enqueue(4);
        assert_eq!(reachability.outstanding_decisions(), &[4]);

        reachability.undecide(4);
        assert!(reachability.outstanding_decisions().is_empty());
    }

    #[test]
    fn rejected_decision_forgotten() {
        let (mut reachability, mut atom_db) = diamond();
        atom_db.assign(1, Reason::Decision).unwrap();
        reachability.enqueue(1);

        let trail = TheoryTrail::new(&mut atom_db, 0);
        assert!(reachability.decide(&trail).is_some());

        // Some other decision is made on the fresh level.
        reachability.new_decision_level();
        reachability.enqueue(-2);
        reachability.enqueue(4);
        assert!(reachability.outstanding_decisions().is_empty());
        assert_eq!(reachability.stats().decisions, 0);
    }

    #[test]
    fn unknown_reach_atom() {
        let mut atom_db = AtomDB::default();
        for _ in 0..3 {
            atom_db.fresh_atom(false).unwrap();
        }

        // The reach atom 9 is unknown to the context.
        let mut reachability = Reachability::new(2, 0, 1, 9);
        reachability.add_edge(0, 1, 2);
        reachability.set_theory_index(0);

        atom_db.assign(2, Reason::Decision).unwrap();
        reachability.enqueue(2);

        let mut trail = TheoryTrail::new(&mut atom_db, 0);
        assert!(reachability.propagate(&mut trail).is_ok());
        assert_eq!(trail.propagated_count(), 0);
        assert!(!reachability.check_propagated(&trail));
    }

    #[test]
    fn eager_backtrack() {
        let (mut reachability, mut atom_db) = diamond();
        reachability.new_decision_level();
        reachability.enqueue(4);
        reachability.backtrack_until(0);

        let mut trail = TheoryTrail::new(&mut atom_db, 0);
        assert!(reachability.propagate(&mut trail).is_ok());
        assert_eq!(trail.propagated_count(), 0);
    }
}
