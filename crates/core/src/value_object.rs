//! Value objects: equality by value, not identity.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};

/// Non-negative monetary amount (whole currency units).
///
/// Used for target raise and annualized revenue. Amounts are validated at
/// construction: finite and `>= 0`. The inner value is a plain `f64` because
/// scoring scales revenue linearly; no arithmetic beyond comparison is done
/// on amounts inside the domain.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Amount = Amount(0.0);

    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        if value < 0.0 {
            return Err(DomainError::validation("amount must not be negative"));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Amount::new(raw).map_err(serde::de::Error::custom)
    }
}
