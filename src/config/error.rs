//! Configuration errors.

use crate::core::{EventId, StateId};
use thiserror::Error;

/// A single problem found while building a machine configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Initial state '{0}' is not a configured state")]
    UnknownInitialState(StateId),

    #[error("State '{0}' is configured more than once")]
    DuplicateState(StateId),

    #[error("Transition '{event}' in state '{state}' targets unknown state '{target}'")]
    UnknownTarget {
        state: StateId,
        event: EventId,
        target: StateId,
    },

    #[error("Transition '{event}' in state '{state}' references unbound guard '{guard}'")]
    UnboundGuard {
        state: StateId,
        event: EventId,
        guard: String,
    },

    #[error("State '{state}' references unbound effect '{effect}'")]
    UnboundEffect { state: StateId, effect: String },
}

/// Every problem found in one configuration, in discovery order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid machine configuration: {}", summarize(.0))]
pub struct ConfigErrors(Vec<ConfigError>);

impl ConfigErrors {
    pub fn new(errors: Vec<ConfigError>) -> Self {
        Self(errors)
    }

    pub fn errors(&self) -> &[ConfigError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, error: &ConfigError) -> bool {
        self.0.contains(error)
    }
}

impl From<ConfigError> for ConfigErrors {
    fn from(error: ConfigError) -> Self {
        Self(vec![error])
    }
}

fn summarize(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_error() {
        let errors = ConfigErrors::new(vec![
            ConfigError::UnknownInitialState("idle".to_string()),
            ConfigError::UnknownTarget {
                state: "a".to_string(),
                event: "GO".to_string(),
                target: "b".to_string(),
            },
        ]);

        let message = errors.to_string();
        assert!(message.starts_with("invalid machine configuration: "));
        assert!(message.contains("Initial state 'idle' is not a configured state"));
        assert!(message.contains("Transition 'GO' in state 'a' targets unknown state 'b'"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn single_error_converts() {
        let errors: ConfigErrors = ConfigError::MissingInitialState.into();

        assert_eq!(errors.errors(), [ConfigError::MissingInitialState]);
        assert!(errors.contains(&ConfigError::MissingInitialState));
    }
}
