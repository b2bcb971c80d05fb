//! Various procedures for mutating a context.
//!
//! For the most part these are methods accessed via a context, and primarily placed here for documentation.
//!
//! - [bcp] and [theory_propagation] are combined to a fixpoint in [apply_consequences].
//! - [analysis] learns a clause from a conflict, asking theories to build reasons on demand.
//! - [backjump] returns the trail and every theory to some lower level.
//! - [decision] makes decisions, on behalf of a theory or otherwise.
//! - [preprocess] prepares theories, once, before the first decision.
//! - [solve] sequences the above.

pub mod analysis;
pub mod apply_consequences;
pub mod backjump;
pub mod bcp;
pub mod decision;
pub mod preprocess;
pub mod solve;
pub mod theory_propagation;
