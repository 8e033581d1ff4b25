//! Configuration sanity checks
//!
//! The engine tolerates misconfiguration at runtime (the assignment fallback
//! guarantees every subject lands somewhere, and statistics degrade to
//! neutral results), so these checks produce warnings and identifier errors
//! for the configuration layer rather than gating the hot path.

use anyhow::{anyhow, Result};

use crate::constants::SPLIT_SUM_TOLERANCE;
use crate::experiment::Variant;

/// Maximum identifier length accepted by the registry
pub const MAX_ID_LENGTH: usize = 128;

/// Validate an experiment or variant identifier
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(anyhow!("identifier cannot be empty"));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(anyhow!(
            "identifier too long: {} chars (max: {})",
            id.len(),
            MAX_ID_LENGTH
        ));
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(anyhow!(
            "identifier contains invalid characters (allowed: alphanumeric, -, _, .)"
        ));
    }

    Ok(())
}

/// Collect configuration warnings for a variant list.
///
/// None of these are fatal: splits that do not reach 100 fall back to the
/// last variant at assignment time, and counter anomalies are the
/// persistence collaborator's bug to fix, not a reason to crash analysis.
pub fn variant_config_warnings(variants: &[Variant]) -> Vec<String> {
    let mut warnings = Vec::new();

    if variants.len() < 2 {
        warnings.push(format!(
            "experiment has {} variant(s); at least 2 are needed to ever conclude",
            variants.len()
        ));
    }

    let split_sum: u32 = variants.iter().map(|v| u32::from(v.split_percentage)).sum();
    if !variants.is_empty() && split_sum.abs_diff(100) > SPLIT_SUM_TOLERANCE {
        warnings.push(format!(
            "variant splits sum to {split_sum}, expected ~100; \
             subjects beyond the configured splits fall back to the last variant"
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for variant in variants {
        if !seen.insert(variant.id.as_str()) {
            warnings.push(format!("duplicate variant id: {}", variant.id));
        }
        if variant.conversions > variant.visitors {
            warnings.push(format!(
                "variant {} has more conversions ({}) than visitors ({})",
                variant.id, variant.conversions, variant.visitors
            ));
        }
    }

    warnings
}
