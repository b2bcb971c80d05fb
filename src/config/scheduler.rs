use crate::context::ContextState;

use super::ConfigOption;

/// The activity of a theory, used to order theories of equal priority.
pub type Activity = f64;

/// Configuration of the [scheduler](crate::theory::scheduler) of theories.
///
/// The activity of a theory is bumped whenever the theory is the source of a conflict or a reason used during analysis.
/// After each bump the amount of the bump is increased by a factor of `1 / (1 - decay)`, and so older bumps decay relative to new bumps.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// The initial amount to bump the activity of a theory by.
    pub activity_bump: ConfigOption<Activity>,

    /// The decay of past bumps, relative to a fresh bump.
    pub activity_decay: ConfigOption<Activity>,

    /// The maximum activity of a theory, above which all activities are rescaled.
    pub activity_max: ConfigOption<Activity>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            activity_bump: ConfigOption {
                name: "theory_activity_bump",
                min: Activity::MIN_POSITIVE,
                max: 1e100,
                max_state: ContextState::Configuration,
                value: 1.0,
            },

            activity_decay: ConfigOption {
                name: "theory_activity_decay",
                min: 0.0,
                max: 0.5,
                max_state: ContextState::Configuration,
                value: 0.05,
            },

            activity_max: ConfigOption {
                name: "theory_activity_max",
                min: 1.0,
                max: 1e150,
                max_state: ContextState::Configuration,
                value: 1e100,
            },
        }
    }
}
