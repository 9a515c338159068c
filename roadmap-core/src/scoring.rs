//! RICE scoring
//!
//! `score = reach * impact * confidence / effort`. Callers floor effort at 1
//! via [`effort_floor`] before scoring; [`score`] itself returns 0 for any
//! non-positive effort.

use std::collections::BTreeMap;

use crate::models::RoleProfile;

/// Minimum effort used when scoring a request
pub const MIN_EFFORT: f64 = 1.0;

/// Computes the RICE priority score
pub fn score(reach: f64, impact: f64, confidence: f64, effort: f64) -> f64 {
    if effort <= 0.0 {
        return 0.0;
    }
    (reach * impact * confidence) / effort
}

/// Sum of the per-role estimates
pub fn total_effort(role_efforts: &BTreeMap<RoleProfile, f64>) -> f64 {
    role_efforts.values().sum()
}

/// Substitutes the minimum effort for anything below it
pub fn effort_floor(effort: f64) -> f64 {
    if effort.is_finite() && effort >= MIN_EFFORT {
        effort
    } else {
        MIN_EFFORT
    }
}
