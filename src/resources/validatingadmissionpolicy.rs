use k8s_openapi::api::admissionregistration::v1::ValidatingAdmissionPolicy;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::resources::webhook::{self, MatchConditionData};
use crate::types::CommonMeta;
use crate::utils::{self, Conditions, RuleData};

pub const RESOURCE_TYPE: &str = "validatingadmissionpolicy";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationData {
    pub expression: String,
    pub message: String,
    pub message_expression: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditAnnotationData {
    pub key: String,
    pub value_expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableData {
    pub name: String,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatingAdmissionPolicyData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub failure_policy: String,
    /// `apiVersion/kind` of the parameter resource, empty when unparameterized.
    pub param_kind: String,
    pub match_constraints: Vec<RuleData>,
    pub validations: Vec<ValidationData>,
    pub audit_annotations: Vec<AuditAnnotationData>,
    pub match_conditions: Vec<MatchConditionData>,
    pub variables: Vec<VariableData>,
    pub observed_generation: i64,
    pub conditions: BTreeMap<String, Option<bool>>,
}

pub fn project(policy: &ValidatingAdmissionPolicy) -> ValidatingAdmissionPolicyData {
    let spec = policy.spec.as_ref();
    let status = policy.status.as_ref();

    ValidatingAdmissionPolicyData {
        metadata: CommonMeta::from_meta(&policy.metadata),
        failure_policy: spec
            .and_then(|s| s.failure_policy.clone())
            .unwrap_or_else(|| "Fail".to_string()),
        param_kind: spec
            .and_then(|s| s.param_kind.as_ref())
            .map(|p| {
                format!(
                    "{}/{}",
                    p.api_version.as_deref().unwrap_or_default(),
                    p.kind.as_deref().unwrap_or_default()
                )
            })
            .unwrap_or_default(),
        match_constraints: utils::match_resource_rules(
            spec.and_then(|s| s.match_constraints.as_ref()),
        ),
        validations: spec
            .and_then(|s| s.validations.as_ref())
            .into_iter()
            .flatten()
            .map(|v| ValidationData {
                expression: v.expression.clone(),
                message: v.message.clone().unwrap_or_default(),
                message_expression: v.message_expression.clone().unwrap_or_default(),
                reason: v.reason.clone().unwrap_or_default(),
            })
            .collect(),
        audit_annotations: spec
            .and_then(|s| s.audit_annotations.as_ref())
            .into_iter()
            .flatten()
            .map(|a| AuditAnnotationData {
                key: a.key.clone(),
                value_expression: a.value_expression.clone(),
            })
            .collect(),
        match_conditions: webhook::match_conditions(
            spec.and_then(|s| s.match_conditions.as_ref()),
        ),
        variables: spec
            .and_then(|s| s.variables.as_ref())
            .into_iter()
            .flatten()
            .map(|v| VariableData {
                name: v.name.clone(),
                expression: v.expression.clone(),
            })
            .collect(),
        observed_generation: status.and_then(|s| s.observed_generation).unwrap_or(0),
        conditions: Conditions::partition(status.and_then(|s| s.conditions.as_deref()), &[])
            .other,
    }
}

pub fn collector(
    source: impl ObjectSource<ValidatingAdmissionPolicy> + 'static,
) -> Collector<ValidatingAdmissionPolicy> {
    Collector::new(RESOURCE_TYPE, Scope::Cluster, source, project)
}
