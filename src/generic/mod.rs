//! Generic structures, not particular to the library.

pub mod random;
