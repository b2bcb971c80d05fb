/*!
Configuration of a context.

All configuration for a context is contained within a [Config], and each option is a [ConfigOption] bounding the value of the option.
Some structures (e.g. the [scheduler](crate::theory::scheduler)) clone parts of the configuration when created.

```rust
# use otter_smt::config::Config;
# use otter_smt::context::Context;
let mut config = Config::default();
config.check_theories.value = true;
config.phase_saving.value = false;

let the_context = Context::from_config(config);
```
*/

mod config_option;
pub use config_option::ConfigOption;

mod scheduler;
pub use scheduler::{Activity, SchedulerConfig};

use crate::context::ContextState;

/// The probability of assigning positive polarity to an atom when freely choosing an atom.
pub type PolarityLean = f64;

/// The probability of choosing a random atom, rather than the first atom without a value, when making a decision.
pub type RandomDecisionBias = f64;

/// The primary configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// Verify every conflict and reason from a theory, and call the self-check hooks of each theory.
    ///
    /// Failed checks abort a solve with an error.
    pub check_theories: ConfigOption<bool>,

    /// Default to the last set value of an atom when choosing a value for the atom, otherwise decide with the given polarity lean.
    pub phase_saving: ConfigOption<bool>,

    /// The probability of assigning positive polarity to an atom when freely choosing an atom.
    pub polarity_lean: ConfigOption<PolarityLean>,

    /// The probability of choosing a random atom when making a decision.
    pub random_decision_bias: ConfigOption<RandomDecisionBias>,

    /// The seed for the source of rng of a context.
    pub rng_seed: ConfigOption<u64>,

    /// Configuration of the scheduler of theories.
    pub scheduler: SchedulerConfig,

    /// The time limit for a solve, with a zero duration for no limit.
    pub time_limit: ConfigOption<std::time::Duration>,
}

impl Default for Config {
    /// The default context is configured to provide quick, deterministic, results.
    ///
    /// Checks on theories are made only in debug builds.
    fn default() -> Self {
        Config {
            check_theories: ConfigOption {
                name: "check_theories",
                min: false,
                max: true,
                max_state: ContextState::Input,
                value: cfg!(debug_assertions),
            },

            phase_saving: ConfigOption {
                name: "phase_saving",
                min: false,
                max: true,
                max_state: ContextState::Configuration,
                value: true,
            },

            polarity_lean: ConfigOption {
                name: "polarity_lean",
                min: 0.0,
                max: 1.0,
                max_state: ContextState::Configuration,
                value: 0.0,
            },

            random_decision_bias: ConfigOption {
                name: "random_decision_bias",
                min: 0.0,
                max: 1.0,
                max_state: ContextState::Configuration,
                value: 0.0,
            },

            rng_seed: ConfigOption {
                name: "rng_seed",
                min: u64::MIN,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: 0,
            },

            scheduler: SchedulerConfig::default(),

            time_limit: ConfigOption {
                name: "time_limit",
                min: std::time::Duration::from_secs(0),
                max: std::time::Duration::MAX,
                max_state: ContextState::Input,
                value: std::time::Duration::from_secs(0),
            },
        }
    }
}
