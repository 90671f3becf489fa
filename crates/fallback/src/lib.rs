//! Rule-Based Fallback System
//!
//! Provides deterministic recommendations when the advisory service is
//! unavailable or returns nothing usable.

mod rules;

pub use rules::{FallbackConfig, FallbackEngine, FLEET_RECOMMENDATIONS};
