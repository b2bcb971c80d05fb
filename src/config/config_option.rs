use crate::{context::ContextState, types::err::ConfigError};

/// A configuration option, bounded by some minimum and maximum value.
///
/// Options may be revised only while a context is in a state no later than `max_state`.
#[derive(Clone, Debug)]
pub struct ConfigOption<T> {
    /// The name of the option.
    pub name: &'static str,

    /// The minimum value of the option.
    pub min: T,

    /// The maximum value of the option.
    pub max: T,

    /// The latest state of a context in which the option may be revised.
    pub max_state: ContextState,

    /// The value of the option.
    pub value: T,
}

impl<T: Clone + PartialOrd> ConfigOption<T> {
    /// The minimum and maximum value of the option, as a pair.
    pub fn min_max(&self) -> (T, T) {
        (self.min.clone(), self.max.clone())
    }

    /// Sets the value of the option, if the value is within bounds and the given state is no later than the max state of the option.
    ///
    /// ```rust
    /// # use otter_smt::config::Config;
    /// # use otter_smt::context::ContextState;
    /// let mut config = Config::default();
    /// assert!(config.polarity_lean.set(0.5, &ContextState::Configuration).is_ok());
    /// assert!(config.polarity_lean.set(1.5, &ContextState::Configuration).is_err());
    /// ```
    pub fn set(&mut self, value: T, state: &ContextState) -> Result<(), ConfigError> {
        if state.stage() > self.max_state.stage() {
            return Err(ConfigError::InvalidState);
        }
        if value < self.min || value > self.max {
            return Err(ConfigError::OutOfBounds);
        }
        self.value = value;
        Ok(())
    }
}
