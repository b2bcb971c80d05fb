use crate::{
    config::Config,
    db::{atom::AtomDB, clause::ClauseDB, theory::TheoryDB},
    generic::random::Pcg32,
};

use rand::SeedableRng;

use super::{ContextState, Counters, GenericContext};

/// A context which uses [Pcg32] as a source of randomness.
pub type Context = GenericContext<Pcg32>;

impl Context {
    /// Creates a context from some given configuration.
    ///
    /// The source of randomness is seeded with the [rng_seed](Config::rng_seed) of the configuration.
    pub fn from_config(config: Config) -> Self {
        Self {
            atom_db: AtomDB::new(),
            clause_db: ClauseDB::default(),
            theory_db: TheoryDB::new(&config.scheduler),

            counters: Counters::default(),

            rng: Pcg32::from_seed(config.rng_seed.value.to_le_bytes()),
            state: ContextState::Configuration,

            config,
        }
    }
}
