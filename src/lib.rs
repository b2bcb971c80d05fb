//! A library for determining the satisfiability of boolean formulas together with background theories.
//!
//! otter_smt pairs a conflict-driven clause-learning core with a protocol for plugging in decision procedures for some background theory (reachability in a graph, bounds on a count of true literals, etc.), in the lazy DPLL(T) style.
//!
//! The core of the library is the [theory] protocol, and the state machine implied by the protocol: synchronisation of levels, the exchange of propagations and conflicts, lazy construction of reasons, delegation of decisions, and the scheduling of theories.
//! The boolean core is kept minimal, and exists to exercise the protocol.
//!
//! # Orientation
//!
//! The library is design around the core structure of a [context].
//!
//! Contexts are built with a [configuration](crate::config), to which atoms, clauses, and theories are [added](crate::builder).
//!
//! Internally, and at a high-level, a solve is viewed in terms of manipulation of, and relationships between, a handful of databases.
//! Notably:
//! - A formula is stored in a clause database.
//! - A valuation, and the trail of assignments which led to the valuation, is stored in an atom database.
//! - Theories, and the record the core keeps of each theory, are stored in a theory database.
//!
//! Useful starting points, then, may be:
//! - The [theory] module, and the [Theory](crate::theory::Theory) trait, to write a theory.
//! - The [reference theories](crate::theories), as examples of theories.
//! - The high-level [solve procedure](crate::procedures::solve) to inspect the dynamics of a solve.
//! - The [database module](crate::db) to inspect the data considered during a solve.
//!
//! # Examples
//!
//! + At most one of three literals, each of which is required by some clause to be true with another.
//!
//! ```rust
//! # use otter_smt::config::Config;
//! # use otter_smt::context::Context;
//! # use otter_smt::reports::Report;
//! # use otter_smt::theories::cardinality::AtMost;
//! let mut the_context = Context::from_config(Config::default());
//! let literals = the_context.fresh_or_max_literals(3);
//! let (p, q, r) = (literals[0], literals[1], literals[2]);
//!
//! let at_most = AtMost::new(vec![p, q, r], 1);
//! let atoms = at_most.atoms().collect::<Vec<_>>();
//! let index = the_context.add_theory(Box::new(at_most)).unwrap();
//! for atom in atoms {
//!     the_context.observe(index, atom).unwrap();
//! }
//!
//! assert!(the_context.add_clause(vec![p, q]).is_ok());
//! assert!(the_context.add_clause(vec![q, r]).is_ok());
//! assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
//!
//! the_context.clear_decisions();
//! assert!(the_context.add_clause(vec![p, r]).is_ok());
//! assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
//! ```
//!
//! # Logs
//!
//! To help diagnose issues (somewhat) detailed calls to [log!](log) are made, and a variety of targets are defined in order to help narrow output to relevant parts of the library.
//! As logging is only built on request, and further can be requested by level, logs are verbose.
//!
//! The targets are lists in [misc::log].

#![allow(clippy::single_match)]
#![allow(clippy::derivable_impls)]

pub mod builder;
pub mod procedures;

pub mod config;
pub mod context;
pub mod reports;
pub mod structures;
pub mod types;

pub mod generic;

pub mod db;

pub mod misc;

pub mod theories;
pub mod theory;
