//! Per-session arena configuration

use serde::{Deserialize, Serialize};

use crate::error::SlotError;

/// Default number of rule-defined user attributes per slot
pub const DEFAULT_USER_ATTR_COUNT: usize = 0;

/// Default slot capacity reserved up front
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Rule bytecode addresses user attributes with a single byte
pub const MAX_USER_ATTR_COUNT: usize = 256;

/// Upper bound on the slots reserved before the first allocation
pub const MAX_INITIAL_CAPACITY: usize = 1 << 16;

/// Sizing of a [`SlotArena`](crate::SlotArena) for one shaping session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Length of every slot's user attribute array
    pub user_attr_count: usize,
    /// Slots to reserve before the first allocation
    pub initial_capacity: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            user_attr_count: DEFAULT_USER_ATTR_COUNT,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl ArenaConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for a font whose rules use `count` user attributes
    pub fn with_user_attrs(count: usize) -> Self {
        Self {
            user_attr_count: count,
            ..Self::default()
        }
    }

    /// Load configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, SlotError> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| SlotError::Config(format!("Failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check both sizes against their limits
    pub fn validate(&self) -> Result<(), SlotError> {
        if self.user_attr_count > MAX_USER_ATTR_COUNT {
            return Err(SlotError::Config(format!(
                "user_attr_count {} exceeds {}",
                self.user_attr_count, MAX_USER_ATTR_COUNT
            )));
        }
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(SlotError::Config(format!(
                "initial_capacity {} exceeds {}",
                self.initial_capacity, MAX_INITIAL_CAPACITY
            )));
        }
        Ok(())
    }

    /// Save configuration to YAML string
    pub fn to_yaml(&self) -> Result<String, SlotError> {
        serde_yaml::to_string(self)
            .map_err(|e| SlotError::Config(format!("Failed to serialize YAML: {}", e)))
    }
}

/// Builder for arena configuration
#[derive(Debug)]
pub struct ArenaConfigBuilder {
    config: ArenaConfig,
}

impl ArenaConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: ArenaConfig::default(),
        }
    }

    /// Set the user attribute count
    pub fn user_attr_count(mut self, count: usize) -> Self {
        self.config.user_attr_count = count;
        self
    }

    /// Set the reserved slot capacity
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ArenaConfig {
        self.config
    }
}

impl Default for ArenaConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
