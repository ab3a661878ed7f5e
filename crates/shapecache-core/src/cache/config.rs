use crate::{DEFAULT_CACHE_CAPACITY, DEFAULT_GROWTH_COEFFICIENT, error::InternalError};
use serde::{Deserialize, Serialize};

///
/// PlanCacheConfig
///
/// Per-cache settings. Every field has a default, so partial documents
/// deserialize cleanly.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct PlanCacheConfig {
    /// Maximum number of entries; must be positive.
    pub capacity: usize,

    /// Multiplier applied to an inactive entry's works when a worse
    /// observation arrives; must be finite and greater than 1.0.
    pub growth_coefficient: f64,

    /// Never promote entries past inactive. Every lookup then re-validates.
    pub disable_active_entries: bool,

    /// Create new entries active, skipping the inactive baseline.
    pub disable_inactive_entries: bool,
}

impl PlanCacheConfig {
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub const fn with_growth_coefficient(mut self, coefficient: f64) -> Self {
        self.growth_coefficient = coefficient;
        self
    }

    #[must_use]
    pub const fn with_active_entries_disabled(mut self, disabled: bool) -> Self {
        self.disable_active_entries = disabled;
        self
    }

    #[must_use]
    pub const fn with_inactive_entries_disabled(mut self, disabled: bool) -> Self {
        self.disable_inactive_entries = disabled;
        self
    }

    pub fn validate(&self) -> Result<(), InternalError> {
        if self.capacity == 0 {
            return Err(InternalError::invalid_config(
                "plan cache capacity must be positive",
            ));
        }

        if !Self::growth_coefficient_is_valid(self.growth_coefficient) {
            return Err(InternalError::invalid_config(format!(
                "growth coefficient must be finite and greater than 1.0, got {}",
                self.growth_coefficient
            )));
        }

        if self.disable_active_entries && self.disable_inactive_entries {
            return Err(InternalError::invalid_config(
                "active and inactive entries cannot both be disabled",
            ));
        }

        Ok(())
    }

    pub(crate) const fn growth_coefficient_is_valid(coefficient: f64) -> bool {
        coefficient.is_finite() && coefficient > 1.0
    }
}

impl Default for PlanCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            growth_coefficient: DEFAULT_GROWTH_COEFFICIENT,
            disable_active_entries: false,
            disable_inactive_entries: false,
        }
    }
}
