use psr_store::{Parameter, PutRequest};

use crate::UpsertPlan;

/// Target matches source for replication purposes: same value, same type.
///
/// Tier, version, timestamps and ARN are deliberately ignored, so
/// metadata-only drift is never propagated.
pub fn is_in_sync(source: &Parameter, target: &Parameter) -> bool {
    target.value == source.value && target.param_type == source.param_type
}

/// Deterministic upsert decision:
/// - no target record => Write
/// - value differs or type differs (either alone) => Write
/// - both equal => Skip
///
/// The write carries name, value, type and tier from source with overwrite
/// enabled; source provenance never reaches the target.
pub fn plan_upsert(source: &Parameter, target: Option<&Parameter>) -> UpsertPlan {
    match target {
        Some(t) if is_in_sync(source, t) => UpsertPlan::Skip,
        _ => UpsertPlan::Write(PutRequest::replicate(source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use psr_store::{ParameterTier, ParameterType};

    fn param(value: &str, ty: ParameterType) -> Parameter {
        Parameter {
            name: "/app/feature".to_string(),
            value: value.to_string(),
            param_type: ty,
            tier: ParameterTier::Standard,
            version: 3,
            last_modified: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            arn: "arn:psr:ssm:us-east-1:parameter/app/feature".to_string(),
        }
    }

    #[test]
    fn absent_target_plans_write() {
        let src = param("on", ParameterType::String);
        let plan = plan_upsert(&src, None);
        assert_eq!(plan, UpsertPlan::Write(PutRequest::replicate(&src)));
    }

    #[test]
    fn value_only_change_plans_write() {
        let src = param("on", ParameterType::String);
        let dst = param("off", ParameterType::String);
        assert!(!plan_upsert(&src, Some(&dst)).is_skip());
    }

    #[test]
    fn type_only_change_plans_write() {
        let src = param("on", ParameterType::SecureString);
        let dst = param("on", ParameterType::String);
        match plan_upsert(&src, Some(&dst)) {
            UpsertPlan::Write(req) => assert_eq!(req.param_type, ParameterType::SecureString),
            UpsertPlan::Skip => panic!("type change must force a write"),
        }
    }

    #[test]
    fn equal_value_and_type_plans_skip() {
        let src = param("on", ParameterType::String);
        let dst = param("on", ParameterType::String);
        assert_eq!(plan_upsert(&src, Some(&dst)), UpsertPlan::Skip);
    }

    #[test]
    fn tier_and_provenance_drift_is_ignored() {
        let src = param("on", ParameterType::String);
        let mut dst = param("on", ParameterType::String);
        dst.tier = ParameterTier::Advanced;
        dst.version = 99;
        dst.arn = "arn:psr:ssm:eu-west-1:parameter/app/feature".to_string();
        dst.last_modified = Utc::now();
        assert!(is_in_sync(&src, &dst));
        assert_eq!(plan_upsert(&src, Some(&dst)), UpsertPlan::Skip);
    }

    #[test]
    fn write_carries_source_tier_and_overwrite() {
        let mut src = param("on", ParameterType::StringList);
        src.tier = ParameterTier::IntelligentTiering;
        let UpsertPlan::Write(req) = plan_upsert(&src, None) else {
            panic!("expected write");
        };
        assert_eq!(req.tier, ParameterTier::IntelligentTiering);
        assert!(req.overwrite);
        assert_eq!(req.name, src.name);
        assert_eq!(req.value, src.value);
    }
}
