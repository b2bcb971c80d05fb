//! Key structures, such as atoms, literals, clauses, and valuations.
//!
//! Most structures are made of a trait to capture the key features of the structure and a 'canonical' implementation of the trait.
//!
//! The structures here are shared by the boolean core and every [theory](crate::theory).
//! In particular, a theory observes and produces [literals](literal) and [clauses](clause), and reads values through a [valuation].

pub mod atom;
pub mod clause;
pub mod literal;
pub mod valuation;
