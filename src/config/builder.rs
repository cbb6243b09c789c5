//! Builder for machine configurations.

use super::error::{ConfigError, ConfigErrors};
use super::{MachineConfig, StateNode};
use crate::core::StateId;
use indexmap::IndexMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing machine configurations with a fluent API.
///
/// `build` validates the whole table and reports every problem it finds at
/// once rather than stopping at the first.
pub struct MachineBuilder<C> {
    initial: Option<StateId>,
    states: IndexMap<StateId, StateNode<C>>,
    debug: bool,
    rejected: Vec<ConfigError>,
}

impl<C> MachineBuilder<C> {
    pub fn new() -> Self {
        Self {
            initial: None,
            states: IndexMap::new(),
            debug: false,
            rejected: Vec::new(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<StateId>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Register a state. Each id may only be registered once.
    pub fn state(mut self, id: impl Into<StateId>, node: StateNode<C>) -> Self {
        let id = id.into();
        if self.states.contains_key(&id) {
            self.rejected.push(ConfigError::DuplicateState(id));
        } else {
            self.states.insert(id, node);
        }
        self
    }

    /// Report every dispatch and context update to the tracing sink.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Record a problem found while assembling the builder's input, so it is
    /// reported together with the structural checks.
    pub(crate) fn reject(mut self, error: ConfigError) -> Self {
        self.rejected.push(error);
        self
    }

    /// Build the configuration, validating every transition target.
    pub fn build(self) -> Result<MachineConfig<C>, ConfigErrors> {
        let validation = Validation::all_vec(self.checks()).map(|_| ());

        match (validation, self.initial) {
            (Validation::Success(_), Some(initial)) => Ok(MachineConfig {
                initial,
                states: self.states,
                debug: self.debug,
            }),
            (Validation::Success(_), None) => Err(ConfigError::MissingInitialState.into()),
            (Validation::Failure(errors), _) => {
                Err(ConfigErrors::new(errors.iter().cloned().collect()))
            }
        }
    }

    fn checks(&self) -> Vec<Validation<(), NonEmptyVec<ConfigError>>> {
        let mut checks = Vec::new();

        checks.push(match &self.initial {
            None => Validation::fail(ConfigError::MissingInitialState),
            Some(initial) if !self.states.contains_key(initial) => {
                Validation::fail(ConfigError::UnknownInitialState(initial.clone()))
            }
            Some(_) => Validation::success(()),
        });

        for error in &self.rejected {
            checks.push(Validation::fail(error.clone()));
        }

        for (state, node) in &self.states {
            for (event, transition) in node.transitions() {
                let target = transition.target();
                let check = if self.states.contains_key(target) {
                    Validation::success(())
                } else {
                    Validation::fail(ConfigError::UnknownTarget {
                        state: state.clone(),
                        event: event.clone(),
                        target: target.to_string(),
                    })
                };
                checks.push(check);
            }
        }

        checks
    }
}

impl<C> Default for MachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Ctx;

    #[test]
    fn builder_requires_initial_state() {
        let result = MachineBuilder::<Ctx>::new()
            .state("idle", StateNode::new())
            .build();

        let errors = result.unwrap_err();
        assert_eq!(errors.errors(), [ConfigError::MissingInitialState]);
    }

    #[test]
    fn initial_must_be_configured() {
        let result = MachineBuilder::<Ctx>::new()
            .initial("missing")
            .state("idle", StateNode::new())
            .build();

        let errors = result.unwrap_err();
        assert!(errors.contains(&ConfigError::UnknownInitialState("missing".to_string())));
    }

    #[test]
    fn empty_machine_is_rejected() {
        let result = MachineBuilder::<Ctx>::new().initial("idle").build();

        assert!(result.is_err());
    }

    #[test]
    fn unknown_targets_are_rejected() {
        let result = MachineBuilder::<Ctx>::new()
            .initial("idle")
            .state("idle", StateNode::new().on("GO", "running"))
            .build();

        let errors = result.unwrap_err();
        assert_eq!(
            errors.errors(),
            [ConfigError::UnknownTarget {
                state: "idle".to_string(),
                event: "GO".to_string(),
                target: "running".to_string(),
            }]
        );
    }

    #[test]
    fn validation_accumulates_all_errors() {
        let result = MachineBuilder::<Ctx>::new()
            .initial("nowhere")
            .state("a", StateNode::new().on("X", "ghost").on("Y", "b"))
            .state("b", StateNode::new().on_guarded("Z", "phantom", |_: &Ctx| true))
            .state("a", StateNode::new())
            .build();

        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ConfigError::UnknownInitialState("nowhere".to_string())));
        assert!(errors.contains(&ConfigError::DuplicateState("a".to_string())));
        assert!(errors
            .errors()
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownTarget { target, .. } if target == "ghost")));
        assert!(errors
            .errors()
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownTarget { target, .. } if target == "phantom")));
    }

    #[test]
    fn valid_configuration_builds() {
        let config = MachineBuilder::<Ctx>::new()
            .initial("inactive")
            .state("inactive", StateNode::new().on("ACTIVATE", "active"))
            .state("active", StateNode::new().on("DEACTIVATE", "inactive"))
            .debug(true)
            .build()
            .unwrap();

        assert_eq!(config.initial(), "inactive");
        assert!(config.debug());
        let ids: Vec<_> = config.state_ids().cloned().collect();
        assert_eq!(ids, ["inactive", "active"]);
    }
}
