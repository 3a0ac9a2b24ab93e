//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Turn counter (simulation time unit)
pub type Turn = u64;

/// Index of a region inside the region registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u32);

impl RegionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interned resource identifier, valid only for the registry that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub u16);

impl ResourceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owning nation of a region
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NationId(pub String);

impl NationId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Round a float to the nearest integer, saturating at the i64 range
///
/// NaN maps to 0 so a poisoned intermediate can never leak into integer state.
pub fn round_to_i64(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(i64::MIN as f64, i64::MAX as f64) as i64
}
