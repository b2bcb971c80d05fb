//! Error types used in the library.
//!
//! - Some of these are internally expected --- e.g. BCP errors are used to control the flow of a solve.
//! - Some indicate a defect in a theory --- e.g. a conflict clause containing a literal which is not false.
//!   Errors of this kind are not recoverable, and a solve returns the error rather than continue from some undefined state.
//! - Some are external --- e.g. an attempt to register a theory after a decision has been made.
//!
//! Names of the error enums --- for the most part --- overlap with corresponding structs.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

use crate::{
    db::ClauseKey,
    theory::TheoryIndex,
};

/// A wrapper around the various errors of the library.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Analysis(AnalysisError),
    AtomDB(AtomDBError),
    BCP(BCPError),
    ClauseDB(ClauseDBError),
    Config(ConfigError),
    State(StateError),
    Theory(TheoryError),

    /// A backjump was requested to a level which could not be determined.
    Backjump,

    /// Some request which is not supported in the current state of the context.
    InvalidState,

    /// An attempt to value an atom conflicted with the current valuation.
    ValuationConflict,

    /// Writing some output failed.
    Io(std::io::ErrorKind),
}

impl From<std::io::Error> for ErrorKind {
    fn from(e: std::io::Error) -> Self {
        ErrorKind::Io(e.kind())
    }
}

/// Noted errors during conflict analysis.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnalysisError {
    /// Somehow resolution resolved to an empty clause.
    EmptyResolution,

    /// Analysis was requested on a clause without any literal at the current level.
    NoConflictAtLevel,

    /// Resolution reached a literal without a reason, which was not a decision.
    MissingReason,
}

impl From<AnalysisError> for ErrorKind {
    fn from(e: AnalysisError) -> Self {
        ErrorKind::Analysis(e)
    }
}

/// Errors in the atom database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AtomDBError {
    /// There are no more fresh atoms.
    AtomsExhausted,

    /// Some atom was used before being created.
    UnknownAtom,
}

impl From<AtomDBError> for ErrorKind {
    fn from(e: AtomDBError) -> Self {
        ErrorKind::AtomDB(e)
    }
}

/// Noted errors during boolean constraint propagation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BCPError {
    /// A conflict was found.
    /// This is expected from time to time, and a learning opportunity.
    Conflict(ClauseKey),

    /// An occurrence list held a key to a missing clause, or a clause held an unknown atom.
    CorruptOccurrence(ClauseKey),
}

impl From<BCPError> for ErrorKind {
    fn from(e: BCPError) -> Self {
        ErrorKind::BCP(e)
    }
}

/// Errors in the clause database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClauseDBError {
    /// A key to some clause not in the database.
    Missing,

    /// Some attempt was made to store an empty clause.
    EmptyClause,

    /// All possible keys have been used.
    StorageExhausted,

    /// A clause was added after some decision has been made.
    DecisionMade,
}

impl From<ClauseDBError> for ErrorKind {
    fn from(e: ClauseDBError) -> Self {
        ErrorKind::ClauseDB(e)
    }
}

/// Errors when setting a configuration option.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// The value is outside the bounds of the option.
    OutOfBounds,

    /// The option may not be set in the current state of the context.
    InvalidState,
}

impl From<ConfigError> for ErrorKind {
    fn from(e: ConfigError) -> Self {
        ErrorKind::Config(e)
    }
}

/// Errors related to the state of a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateError {
    /// The request requires the context to be at the base (zero) level.
    SolveInProgress,
}

impl From<StateError> for ErrorKind {
    fn from(e: StateError) -> Self {
        ErrorKind::State(e)
    }
}

/// Errors arising from the interaction with a theory.
///
/// With the exception of registration errors, each of these indicates some defect in the implementation of a theory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TheoryError {
    /// The theory already had an index when registered.
    IndexAlreadySet(TheoryIndex),

    /// The theory did not keep the index given at registration.
    IndexNotKept(TheoryIndex),

    /// No theory has the index.
    UnknownTheory(TheoryIndex),

    /// Theories may only be registered at the base level.
    RegistrationAfterDecision,

    /// A conflict clause from the theory contained a literal which was not false.
    UnfalsifiedConflict(TheoryIndex),

    /// A reason from the theory did not contain the reasoned literal, or contained some literal which was not false.
    MalformedReason(TheoryIndex),

    /// The theory failed its self-check after propagation.
    CheckPropagated(TheoryIndex),

    /// The theory failed its self-check after a successful solve.
    CheckSolved(TheoryIndex),
}

impl From<TheoryError> for ErrorKind {
    fn from(e: TheoryError) -> Self {
        ErrorKind::Theory(e)
    }
}
