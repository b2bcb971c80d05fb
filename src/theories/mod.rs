/*!
Reference theories.

Each theory is small, and is intended as an example of how to implement the [Theory](crate::theory::Theory) trait, rather than as an efficient decision procedure.

- [cardinality] bounds a count of true literals from above, and illustrates lazy backtracking, lazy reasons, and the clearing of satisfied constraints.
- [reach] requires (or forbids) a path between two nodes of a graph whose edges are enabled by atoms, and illustrates decision delegation and the use of literal occurrence.

Each theory provides an iterator over the atoms the theory is interested in, each of which should be [observed](crate::context::GenericContext::observe) after the theory is registered.
*/

pub mod cardinality;
pub mod reach;
