use chrono::DateTime;
use k8s_openapi::api::admissionregistration::v1 as admissionregistration;
use k8s_openapi::api::apps::v1 as apps;
use k8s_openapi::api::autoscaling::v2 as autoscaling;
use k8s_openapi::api::batch::v1 as batch;
use k8s_openapi::api::certificates::v1 as certificates;
use k8s_openapi::api::core::v1 as core;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{Condition, LabelSelector, ObjectMeta, Time};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::Serialize;
use std::collections::BTreeMap;

/// Owner kind and name taken from the first owner reference, or two empty strings.
pub fn created_by(meta: &ObjectMeta) -> (String, String) {
    meta.owner_references
        .as_ref()
        .and_then(|refs| refs.first())
        .map(|owner| (owner.kind.clone(), owner.name.clone()))
        .unwrap_or_default()
}

/// Unix seconds for an API timestamp.
///
/// The inner representation of `Time` changes between k8s-openapi releases, so
/// this goes through its RFC 3339 wire form.
pub fn unix_time(time: Option<&Time>) -> Option<i64> {
    let value = serde_json::to_value(time?).ok()?;
    let parsed = DateTime::parse_from_rfc3339(value.as_str()?).ok()?;
    Some(parsed.timestamp())
}

pub fn int_or_string(value: Option<&IntOrString>) -> Option<String> {
    value.map(|v| match v {
        IntOrString::Int(i) => i.to_string(),
        IntOrString::String(s) => s.clone(),
    })
}

/// Anything that may carry a label selector.
///
/// Some API fields hold a `LabelSelector` directly and others an optional one;
/// this lets both be rendered the same way.
pub trait AsLabelSelector {
    fn as_selector(&self) -> Option<&LabelSelector>;
}

impl AsLabelSelector for LabelSelector {
    fn as_selector(&self) -> Option<&LabelSelector> {
        Some(self)
    }
}

impl AsLabelSelector for Option<LabelSelector> {
    fn as_selector(&self) -> Option<&LabelSelector> {
        self.as_ref()
    }
}

/// Render a label selector in kubectl's notation, e.g. `app=web,tier in (a,b)`.
///
/// An absent or empty selector renders as an empty string.
pub fn selector_string<S: AsLabelSelector + ?Sized>(selector: &S) -> String {
    let Some(selector) = selector.as_selector() else {
        return String::new();
    };

    let mut parts: Vec<String> = selector
        .match_labels
        .iter()
        .flatten()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();

    for expr in selector.match_expressions.iter().flatten() {
        let values = expr.values.as_deref().unwrap_or_default().join(",");
        let part = match expr.operator.as_str() {
            "In" => format!("{} in ({})", expr.key, values),
            "NotIn" => format!("{} notin ({})", expr.key, values),
            "Exists" => expr.key.clone(),
            "DoesNotExist" => format!("!{}", expr.key),
            op => format!("{} {} ({})", expr.key, op, values),
        };
        parts.push(part);
    }

    parts.join(",")
}

/// Object keys of an optional map, in map order.
pub fn map_keys<V>(map: Option<&BTreeMap<String, V>>) -> Vec<String> {
    map.map(|m| m.keys().cloned().collect()).unwrap_or_default()
}

/// Status condition as reported by most API objects.
pub trait StatusCondition {
    fn condition_type(&self) -> &str;
    fn condition_status(&self) -> &str;
}

macro_rules! impl_status_condition {
    ($($ty:ty),* $(,)?) => {
        $(
            impl StatusCondition for $ty {
                fn condition_type(&self) -> &str {
                    &self.type_
                }

                fn condition_status(&self) -> &str {
                    &self.status
                }
            }
        )*
    };
}

impl_status_condition!(
    Condition,
    core::PodCondition,
    core::NodeCondition,
    core::NamespaceCondition,
    core::PersistentVolumeClaimCondition,
    apps::DeploymentCondition,
    apps::ReplicaSetCondition,
    apps::StatefulSetCondition,
    apps::DaemonSetCondition,
    batch::JobCondition,
    autoscaling::HorizontalPodAutoscalerCondition,
    certificates::CertificateSigningRequestCondition,
);

/// `"True"` and `"False"` map to booleans; `"Unknown"` and anything else to null.
pub fn condition_status(status: &str) -> Option<bool> {
    match status {
        "True" => Some(true),
        "False" => Some(false),
        _ => None,
    }
}

/// Status conditions split into well-known types and everything else.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Conditions {
    known: BTreeMap<String, Option<bool>>,
    pub other: BTreeMap<String, Option<bool>>,
}

impl Conditions {
    pub fn partition<C: StatusCondition>(conditions: Option<&[C]>, known: &[&str]) -> Self {
        let mut result = Self::default();
        for cond in conditions.unwrap_or_default() {
            let status = condition_status(cond.condition_status());
            let ty = cond.condition_type();
            if known.contains(&ty) {
                result.known.insert(ty.to_string(), status);
            } else {
                result.other.insert(ty.to_string(), status);
            }
        }
        result
    }

    /// Status of a well-known condition; null when absent or unknown.
    pub fn get(&self, condition_type: &str) -> Option<bool> {
        self.known.get(condition_type).copied().flatten()
    }
}

/// Common shape of RBAC and admission rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleData {
    pub api_groups: Vec<String>,
    pub api_versions: Vec<String>,
    pub operations: Vec<String>,
    pub resources: Vec<String>,
    pub scope: String,
}

impl From<&admissionregistration::RuleWithOperations> for RuleData {
    fn from(rule: &admissionregistration::RuleWithOperations) -> Self {
        Self {
            api_groups: rule.api_groups.clone().unwrap_or_default(),
            api_versions: rule.api_versions.clone().unwrap_or_default(),
            operations: rule.operations.clone().unwrap_or_default(),
            resources: rule.resources.clone().unwrap_or_default(),
            scope: rule.scope.clone().unwrap_or_else(|| "*".to_string()),
        }
    }
}

impl From<&admissionregistration::NamedRuleWithOperations> for RuleData {
    fn from(rule: &admissionregistration::NamedRuleWithOperations) -> Self {
        Self {
            api_groups: rule.api_groups.clone().unwrap_or_default(),
            api_versions: rule.api_versions.clone().unwrap_or_default(),
            operations: rule.operations.clone().unwrap_or_default(),
            resources: rule.resources.clone().unwrap_or_default(),
            scope: rule.scope.clone().unwrap_or_else(|| "*".to_string()),
        }
    }
}

/// Resource rules of an admission `MatchResources` block.
pub fn match_resource_rules(resources: Option<&admissionregistration::MatchResources>) -> Vec<RuleData> {
    resources
        .and_then(|m| m.resource_rules.as_ref())
        .map(|rules| rules.iter().map(RuleData::from).collect())
        .unwrap_or_default()
}
