//! Runtime configuration for the replicator.
//!
//! # Contract
//! - Resolved **once** at startup via [`ReplicatorConfig::from_env`]; the
//!   result is passed into constructors. Do not scatter `std::env::var`
//!   calls across the codebase.
//! - Errors name the missing env var, never a value.
//!
//! | env var              | meaning                            | required |
//! |----------------------|------------------------------------|----------|
//! | `AWS_DEFAULT_REGION` | region of the source store         | yes      |
//! | `AWS_TARGET_REGION`  | region of the target store         | yes      |

use anyhow::{bail, Result};
use serde::Serialize;

pub const ENV_SOURCE_REGION: &str = "AWS_DEFAULT_REGION";
pub const ENV_TARGET_REGION: &str = "AWS_TARGET_REGION";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicatorConfig {
    pub source_region: String,
    pub target_region: String,
}

impl ReplicatorConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source_region = require(&lookup, ENV_SOURCE_REGION)?;
        let target_region = require(&lookup, ENV_TARGET_REGION)?;

        if source_region == target_region {
            bail!(
                "CONFIG_SAME_REGION: {} and {} both resolve to '{}'; \
                 replicating a store onto itself is refused",
                ENV_SOURCE_REGION,
                ENV_TARGET_REGION,
                source_region
            );
        }

        Ok(Self {
            source_region,
            target_region,
        })
    }
}

/// Non-blank, trimmed value of `var`, or an error naming it.
fn require<F>(lookup: &F, var: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        Some(_) => bail!("CONFIG_MISSING_ENV: {var} is set but blank"),
        None => bail!("CONFIG_MISSING_ENV: {var} is not set"),
    }
}
