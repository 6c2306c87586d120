//! Configuration system for Stepwise.
//!
//! Load solver configuration from TOML or YAML to control termination,
//! phases, acceptors and move evaluation threads without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use stepwise_config::{AcceptorConfig, PhaseConfig, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [[phases]]
//!     type = "construction_heuristic"
//!
//!     [[phases]]
//!     type = "local_search"
//!     [phases.acceptor]
//!     type = "late_acceptance"
//!     late_acceptance_size = 400
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.phases.len(), 2);
//! match &config.phases[1] {
//!     PhaseConfig::LocalSearch(ls) => assert!(matches!(
//!         ls.acceptor,
//!         Some(AcceptorConfig::LateAcceptance(_))
//!     )),
//!     other => panic!("unexpected phase {:?}", other),
//! }
//! ```
//!
//! Use the default config when the file is missing:
//!
//! ```
//! use stepwise_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use stepwise_core::StepwiseError;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for StepwiseError {
    fn from(err: ConfigError) -> Self {
        StepwiseError::Config(err.to_string())
    }
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Number of threads for parallel move evaluation.
    #[serde(default)]
    pub move_thread_count: MoveThreadCount,

    /// Capacity factor of the move evaluation queues, per move thread.
    #[serde(default)]
    pub move_thread_buffer_size: Option<usize>,

    /// Termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Phase configurations.
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML or YAML file, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or can't be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that don't depend on the score type.
    ///
    /// Score strings (best score limits, temperatures) are parsed later by
    /// the solver builders, which know the score type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.move_thread_buffer_size == Some(0) {
            return Err(ConfigError::Invalid(
                "move_thread_buffer_size must be at least 1".to_string(),
            ));
        }
        if self.move_thread_count == MoveThreadCount::Count(0) {
            return Err(ConfigError::Invalid(
                "move_thread_count must be at least 1, use \"none\" to disable move threads"
                    .to_string(),
            ));
        }
        for phase in &self.phases {
            phase.validate()?;
        }
        Ok(())
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_move_thread_count(mut self, count: MoveThreadCount) -> Self {
        self.move_thread_count = count;
        self
    }

    /// Adds a phase configuration.
    pub fn with_phase(mut self, phase: PhaseConfig) -> Self {
        self.phases.push(phase);
        self
    }

    /// Returns the termination time limit, if configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwise_config::SolverConfig;
    /// use std::time::Duration;
    ///
    /// let config = SolverConfig::from_toml_str(r#"
    ///     [termination]
    ///     minutes_spent_limit = 1
    ///     seconds_spent_limit = 30
    /// "#).unwrap();
    ///
    /// assert_eq!(config.time_limit(), Some(Duration::from_secs(90)));
    /// ```
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }
}

/// Environment mode affecting reproducibility and self checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Seeds from OS entropy unless a seed is configured.
    NonReproducible,

    /// Deterministic for a given seed.
    #[default]
    Reproducible,

    /// Reproducible, and checks that every undo restores the pre-move score.
    FastAssert,

    /// Like `FastAssert`, plus a from-scratch score check after every move
    /// and every step.
    FullAssert,
}

impl EnvironmentMode {
    pub fn is_reproducible(&self) -> bool {
        !matches!(self, EnvironmentMode::NonReproducible)
    }

    /// True for both assert modes.
    pub fn is_asserted(&self) -> bool {
        matches!(self, EnvironmentMode::FastAssert | EnvironmentMode::FullAssert)
    }

    pub fn is_fully_asserted(&self) -> bool {
        matches!(self, EnvironmentMode::FullAssert)
    }
}

/// Move thread count configuration.
///
/// Written as `"none"`, `"auto"` or a positive integer.
///
/// ```
/// use stepwise_config::{MoveThreadCount, SolverConfig};
///
/// let config = SolverConfig::from_toml_str("move_thread_count = 3").unwrap();
/// assert_eq!(config.move_thread_count, MoveThreadCount::Count(3));
/// assert_eq!(config.move_thread_count.resolve(), Some(3));
///
/// let config = SolverConfig::from_toml_str("move_thread_count = \"none\"").unwrap();
/// assert_eq!(config.move_thread_count.resolve(), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MoveThreadCount {
    /// No parallel move evaluation.
    #[default]
    None,

    /// Two cores fewer than available, at least one.
    Auto,

    /// Specific number of threads.
    Count(usize),
}

impl MoveThreadCount {
    /// Number of move threads to start, or `None` for single threaded solving.
    pub fn resolve(&self) -> Option<usize> {
        match self {
            MoveThreadCount::None => None,
            MoveThreadCount::Auto => {
                let cores = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1);
                Some(cores.saturating_sub(2).max(1))
            }
            MoveThreadCount::Count(n) => Some(*n),
        }
    }
}

impl fmt::Display for MoveThreadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveThreadCount::None => f.write_str("none"),
            MoveThreadCount::Auto => f.write_str("auto"),
            MoveThreadCount::Count(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MoveThreadCountRepr {
    Count(usize),
    Keyword(String),
}

impl<'de> Deserialize<'de> for MoveThreadCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match MoveThreadCountRepr::deserialize(deserializer)? {
            MoveThreadCountRepr::Count(n) => Ok(MoveThreadCount::Count(n)),
            MoveThreadCountRepr::Keyword(word) => match word.to_ascii_lowercase().as_str() {
                "none" => Ok(MoveThreadCount::None),
                "auto" => Ok(MoveThreadCount::Auto),
                other => other
                    .parse::<usize>()
                    .map(MoveThreadCount::Count)
                    .map_err(|_| {
                        serde::de::Error::custom(format!(
                            "invalid move_thread_count '{}', expected \"none\", \"auto\" or a count",
                            word
                        ))
                    }),
            },
        }
    }
}

impl Serialize for MoveThreadCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MoveThreadCount::Count(n) => serializer.serialize_u64(*n as u64),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

/// Termination configuration.
///
/// All configured limits are combined with OR: the first one reached stops
/// the solver (or phase).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,

    /// Target best score to achieve (as string, e.g., "0hard/0soft").
    pub best_score_limit: Option<String>,

    /// Stop as soon as the best solution is feasible.
    pub best_score_feasible: Option<bool>,

    /// Maximum number of steps.
    pub step_count_limit: Option<u64>,

    /// Maximum unimproved steps before terminating.
    pub unimproved_step_count_limit: Option<u64>,

    /// Maximum number of score calculations.
    pub score_calculation_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds =
            self.seconds_spent_limit.unwrap_or(0) + self.minutes_spent_limit.unwrap_or(0) * 60;
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }

    /// True if no limit is configured.
    pub fn is_empty(&self) -> bool {
        self.time_limit().is_none()
            && self.best_score_limit.is_none()
            && !self.best_score_feasible.unwrap_or(false)
            && self.step_count_limit.is_none()
            && self.unimproved_step_count_limit.is_none()
            && self.score_calculation_count_limit.is_none()
    }

    pub fn with_step_count_limit(mut self, limit: u64) -> Self {
        self.step_count_limit = Some(limit);
        self
    }

    pub fn with_unimproved_step_count_limit(mut self, limit: u64) -> Self {
        self.unimproved_step_count_limit = Some(limit);
        self
    }
}

/// Phase configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseConfig {
    /// Construction heuristic phase.
    ConstructionHeuristic(ConstructionHeuristicConfig),

    /// Local search phase.
    LocalSearch(LocalSearchConfig),
}

impl PhaseConfig {
    pub fn termination(&self) -> Option<&TerminationConfig> {
        match self {
            PhaseConfig::ConstructionHeuristic(c) => c.termination.as_ref(),
            PhaseConfig::LocalSearch(c) => c.termination.as_ref(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            PhaseConfig::ConstructionHeuristic(_) => Ok(()),
            PhaseConfig::LocalSearch(c) => c.validate(),
        }
    }
}

/// Construction heuristic configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConstructionHeuristicConfig {
    /// Type of construction heuristic.
    #[serde(default)]
    pub construction_heuristic_type: ConstructionHeuristicType,

    /// Phase termination configuration.
    pub termination: Option<TerminationConfig>,
}

/// Construction heuristic types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionHeuristicType {
    /// Assign each entity the first doable value.
    #[default]
    FirstFit,

    /// Assign each entity the value with the best resulting score.
    BestFit,
}

/// Local search configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LocalSearchConfig {
    /// Acceptor configuration, late acceptance when absent.
    pub acceptor: Option<AcceptorConfig>,

    /// Forager configuration.
    pub forager: Option<ForagerConfig>,

    /// Phase termination configuration.
    pub termination: Option<TerminationConfig>,
}

impl LocalSearchConfig {
    pub fn with_acceptor(mut self, acceptor: AcceptorConfig) -> Self {
        self.acceptor = Some(acceptor);
        self
    }

    pub fn with_forager(mut self, forager: ForagerConfig) -> Self {
        self.forager = Some(forager);
        self
    }

    pub fn with_termination(mut self, termination: TerminationConfig) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Checks the acceptor and forager values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(acceptor) = &self.acceptor {
            acceptor.validate()?;
        }
        if let Some(forager) = &self.forager {
            forager.validate()?;
        }
        Ok(())
    }
}

/// Acceptor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcceptorConfig {
    /// Accept moves that don't make the step score worse.
    HillClimbing,

    /// Tabu search acceptor.
    TabuSearch(TabuSearchConfig),

    /// Simulated annealing acceptor.
    SimulatedAnnealing(SimulatedAnnealingConfig),

    /// Late acceptance acceptor.
    LateAcceptance(LateAcceptanceConfig),

    /// Great deluge acceptor.
    GreatDeluge(GreatDelugeConfig),

    /// Accepts only what every member accepts.
    Composite(CompositeAcceptorConfig),
}

impl AcceptorConfig {
    /// Checks sizes and nesting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            AcceptorConfig::HillClimbing => Ok(()),
            AcceptorConfig::TabuSearch(c) => c.validate(),
            AcceptorConfig::SimulatedAnnealing(_) => Ok(()),
            AcceptorConfig::LateAcceptance(c) => c.validate(),
            AcceptorConfig::GreatDeluge(c) => c.validate(),
            AcceptorConfig::Composite(c) => {
                if c.acceptors.is_empty() {
                    return Err(ConfigError::Invalid(
                        "composite acceptor needs at least one member".to_string(),
                    ));
                }
                c.acceptors.iter().try_for_each(AcceptorConfig::validate)
            }
        }
    }
}

/// Tabu search configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TabuSearchConfig {
    /// Size of entity tabu list.
    pub entity_tabu_size: Option<usize>,

    /// Size of value tabu list.
    pub value_tabu_size: Option<usize>,

    /// Size of move tabu list.
    pub move_tabu_size: Option<usize>,

    /// Accept tabu moves that improve on the best score. Defaults to true.
    pub aspiration_enabled: Option<bool>,
}

impl TabuSearchConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("entity_tabu_size", self.entity_tabu_size),
            ("value_tabu_size", self.value_tabu_size),
            ("move_tabu_size", self.move_tabu_size),
        ];
        for (name, size) in sizes {
            if size == Some(0) {
                return Err(ConfigError::Invalid(format!("{} must be at least 1", name)));
            }
        }
        if sizes.iter().all(|(_, size)| size.is_none()) {
            return Err(ConfigError::Invalid(
                "tabu search needs an entity, value or move tabu size".to_string(),
            ));
        }
        Ok(())
    }
}

/// Simulated annealing configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulatedAnnealingConfig {
    /// Starting temperature, as a score string with one value per level.
    pub starting_temperature: Option<String>,
}

/// Late acceptance configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LateAcceptanceConfig {
    /// Size of late acceptance list.
    pub late_acceptance_size: Option<usize>,
}

impl LateAcceptanceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.late_acceptance_size == Some(0) {
            return Err(ConfigError::Invalid(
                "late_acceptance_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Great deluge configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GreatDelugeConfig {
    /// Starting water level as a score string, the phase starting score when absent.
    pub water_level: Option<String>,

    /// Fixed increment of the water level per step, as a score string.
    pub water_level_increment_score: Option<String>,

    /// Relative increment of the water level per step.
    pub water_level_increment_ratio: Option<f64>,
}

impl GreatDelugeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.water_level_increment_score.is_some() && self.water_level_increment_ratio.is_some()
        {
            return Err(ConfigError::Invalid(
                "great deluge takes water_level_increment_score or water_level_increment_ratio, not both"
                    .to_string(),
            ));
        }
        if let Some(ratio) = self.water_level_increment_ratio {
            if !(ratio > 0.0 && ratio.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "water_level_increment_ratio must be positive, got {}",
                    ratio
                )));
            }
        }
        Ok(())
    }
}

/// Composite acceptor configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CompositeAcceptorConfig {
    pub acceptors: Vec<AcceptorConfig>,
}

/// Forager configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ForagerConfig {
    /// Stop evaluating a step after this many accepted moves.
    pub accepted_count_limit: Option<usize>,

    /// Whether to pick early if an improving move is found.
    pub pick_early_type: Option<PickEarlyType>,

    /// Pick uniformly among equally scored finalists. Defaults to true.
    pub break_tie_randomly: Option<bool>,
}

impl ForagerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.accepted_count_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "accepted_count_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Pick early type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickEarlyType {
    /// Never pick early.
    #[default]
    Never,

    /// Pick the first move that improves on the best score.
    FirstBestScoreImproving,

    /// Pick the first move that improves on the last step score.
    FirstLastStepScoreImproving,
}
