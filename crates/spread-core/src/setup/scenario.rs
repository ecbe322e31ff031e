//! Scenario Loading
//!
//! A scenario names every behaviour, belief, and agent explicitly and refers
//! to other entities by name. Building it registers entities in declaration
//! order (which fixes their identifiers) and resolves every name.
//!
//! ```toml
//! behaviours = ["walk", "drive"]
//!
//! [[beliefs]]
//! name = "thrift"
//! relationships = { thrift = 1.0, comfort = -0.5 }
//! perceptions = { walk = 0.8, drive = -0.6 }
//! performance = { walk = 0.7 }
//!
//! [[agents]]
//! name = "ada"
//! known_behaviours = ["walk", "drive"]
//! friends = { bo = 0.5 }
//! deltas = { thrift = 0.9 }
//! activations = { thrift = 0.4 }
//! ```

use serde::{Deserialize, Serialize};
use spread_events::{AgentId, BehaviourId, BeliefId, SimTime};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::components::registry::{BehaviourRegistry, BeliefRegistry};
use crate::error::AgentError;
use crate::population::Population;
use crate::systems::step::SimSettings;

/// Errors raised while loading or resolving a scenario
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },
    #[error("{context} refers to unknown belief '{name}'")]
    UnknownBelief { context: String, name: String },
    #[error("{context} refers to unknown behaviour '{name}'")]
    UnknownBehaviour { context: String, name: String },
    #[error("{context} refers to unknown agent '{name}'")]
    UnknownAgent { context: String, name: String },
    #[error("{context} lists behaviour '{name}' more than once")]
    RepeatedKnownBehaviour { context: String, name: String },
    #[error("{context} has non-finite weight {value} for '{name}'")]
    NonFiniteWeight {
        context: String,
        name: String,
        value: f64,
    },
    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Declaration of one belief
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeliefSpec {
    pub name: String,
    /// Relationship weight per belief name
    #[serde(default)]
    pub relationships: BTreeMap<String, f64>,
    /// Perception weight per behaviour name
    #[serde(default)]
    pub perceptions: BTreeMap<String, f64>,
    /// Performance relationship per behaviour name
    #[serde(default)]
    pub performance: BTreeMap<String, f64>,
}

/// Declaration of one agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    /// Behaviours the agent can choose among, in tie-break order; each may
    /// appear only once
    #[serde(default)]
    pub known_behaviours: Vec<String>,
    /// Influence weight per friend name
    #[serde(default)]
    pub friends: BTreeMap<String, f64>,
    /// Delta per belief name
    #[serde(default)]
    pub deltas: BTreeMap<String, f64>,
    /// Activation at time zero per belief name
    #[serde(default)]
    pub activations: BTreeMap<String, f64>,
}

/// A complete scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub behaviours: Vec<String>,
    #[serde(default)]
    pub beliefs: Vec<BeliefSpec>,
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
}

fn check_unique<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ScenarioError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ScenarioError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn finite(context: &str, name: &str, value: f64) -> Result<f64, ScenarioError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScenarioError::NonFiniteWeight {
            context: context.to_string(),
            name: name.to_string(),
            value,
        })
    }
}

fn resolve_belief(
    registry: &BeliefRegistry,
    context: &str,
    name: &str,
) -> Result<BeliefId, ScenarioError> {
    registry.id_of(name).ok_or_else(|| ScenarioError::UnknownBelief {
        context: context.to_string(),
        name: name.to_string(),
    })
}

fn resolve_behaviour(
    registry: &BehaviourRegistry,
    context: &str,
    name: &str,
) -> Result<BehaviourId, ScenarioError> {
    registry.id_of(name).ok_or_else(|| ScenarioError::UnknownBehaviour {
        context: context.to_string(),
        name: name.to_string(),
    })
}

impl Scenario {
    /// Loads a scenario from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parses a scenario from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the behaviour registry
    pub fn behaviour_registry(&self) -> Result<BehaviourRegistry, ScenarioError> {
        check_unique("behaviour", self.behaviours.iter().map(String::as_str))?;

        let mut registry = BehaviourRegistry::new();
        for name in &self.behaviours {
            registry.register(name.clone());
        }
        Ok(registry)
    }

    /// Build the belief registry, resolving every relationship table
    pub fn belief_registry(
        &self,
        behaviours: &BehaviourRegistry,
    ) -> Result<BeliefRegistry, ScenarioError> {
        check_unique("belief", self.beliefs.iter().map(|b| b.name.as_str()))?;

        let mut registry = BeliefRegistry::new();
        for spec in &self.beliefs {
            registry.register(spec.name.clone());
        }

        for spec in &self.beliefs {
            let context = format!("belief '{}'", spec.name);

            let relationships = spec
                .relationships
                .iter()
                .map(|(name, &w)| {
                    Ok((
                        resolve_belief(&registry, &context, name)?,
                        finite(&context, name, w)?,
                    ))
                })
                .collect::<Result<Vec<_>, ScenarioError>>()?;
            let perceptions = spec
                .perceptions
                .iter()
                .map(|(name, &w)| {
                    Ok((
                        resolve_behaviour(behaviours, &context, name)?,
                        finite(&context, name, w)?,
                    ))
                })
                .collect::<Result<Vec<_>, ScenarioError>>()?;
            let performance = spec
                .performance
                .iter()
                .map(|(name, &w)| {
                    Ok((
                        resolve_behaviour(behaviours, &context, name)?,
                        finite(&context, name, w)?,
                    ))
                })
                .collect::<Result<Vec<_>, ScenarioError>>()?;

            let id = resolve_belief(&registry, &context, &spec.name)?;
            let Some(belief) = registry.get_mut(id) else {
                continue;
            };
            for (other, w) in relationships {
                belief.set_relationship(other, w);
            }
            for (behaviour, w) in perceptions {
                belief.set_perception(behaviour, w);
            }
            for (behaviour, w) in performance {
                belief.set_performance_relationship(behaviour, w);
            }
        }

        Ok(registry)
    }

    /// Build a population with every agent's initial state at time zero
    ///
    /// No actions are chosen yet; call [`Population::prime`] before stepping.
    pub fn build(&self, settings: SimSettings) -> Result<Population, ScenarioError> {
        check_unique("agent", self.agents.iter().map(|a| a.name.as_str()))?;

        let behaviours = self.behaviour_registry()?;
        let beliefs = self.belief_registry(&behaviours)?;

        // Resolve everything before touching the world
        let ids: BTreeMap<&str, AgentId> = self
            .agents
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name.as_str(), AgentId::new(i as u32)))
            .collect();

        let mut resolved = Vec::with_capacity(self.agents.len());
        for spec in &self.agents {
            let context = format!("agent '{}'", spec.name);

            let friends = spec
                .friends
                .iter()
                .map(|(name, &w)| {
                    let id = ids.get(name.as_str()).copied().ok_or_else(|| {
                        ScenarioError::UnknownAgent {
                            context: context.clone(),
                            name: name.clone(),
                        }
                    })?;
                    Ok((id, finite(&context, name, w)?))
                })
                .collect::<Result<Vec<_>, ScenarioError>>()?;
            let deltas = spec
                .deltas
                .iter()
                .map(|(name, &d)| {
                    Ok((
                        resolve_belief(&beliefs, &context, name)?,
                        finite(&context, name, d)?,
                    ))
                })
                .collect::<Result<Vec<_>, ScenarioError>>()?;
            let activations = spec
                .activations
                .iter()
                .map(|(name, &a)| {
                    Ok((
                        resolve_belief(&beliefs, &context, name)?,
                        finite(&context, name, a)?,
                    ))
                })
                .collect::<Result<Vec<_>, ScenarioError>>()?;
            let mut seen = HashSet::new();
            if let Some(name) = spec.known_behaviours.iter().find(|n| !seen.insert(n.as_str())) {
                return Err(ScenarioError::RepeatedKnownBehaviour {
                    context,
                    name: name.clone(),
                });
            }
            let known = spec
                .known_behaviours
                .iter()
                .map(|name| resolve_behaviour(&behaviours, &context, name))
                .collect::<Result<Vec<_>, ScenarioError>>()?;

            resolved.push((friends, deltas, activations, known));
        }

        let mut population = Population::new(beliefs, behaviours, settings);
        for (spec, (friends, deltas, activations, known)) in self.agents.iter().zip(resolved) {
            let id = population.add_agent(spec.name.clone());
            let Some(mut agent) = population.agent_mut(id) else {
                continue;
            };

            for (friend, w) in friends {
                agent.set_friend(friend, w);
            }
            for (belief, d) in deltas {
                agent.set_delta(belief, d);
            }
            for behaviour in known {
                agent.add_known_behaviour(behaviour);
            }
            for (belief, a) in activations {
                agent.set_activation(SimTime::ZERO, belief, a)?;
            }
        }

        tracing::info!(
            behaviours = self.behaviours.len(),
            beliefs = self.beliefs.len(),
            agents = self.agents.len(),
            "scenario built"
        );

        Ok(population)
    }
}
