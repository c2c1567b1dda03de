use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils::{self, Conditions};

pub const RESOURCE_TYPE: &str = "poddisruptionbudget";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodDisruptionBudgetData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub min_available: Option<String>,
    pub max_unavailable: Option<String>,
    pub selector: String,
    pub unhealthy_pod_eviction_policy: String,
    pub current_healthy: i32,
    pub desired_healthy: i32,
    pub disruptions_allowed: i32,
    pub expected_pods: i32,
    pub observed_generation: i64,
    pub disruption_allowed: Option<bool>,
    pub conditions: BTreeMap<String, Option<bool>>,
}

pub fn project(pdb: &PodDisruptionBudget) -> PodDisruptionBudgetData {
    let spec = pdb.spec.as_ref();
    let status = pdb.status.as_ref();
    let conditions = Conditions::partition(
        status.and_then(|s| s.conditions.as_deref()),
        &["DisruptionAllowed"],
    );

    PodDisruptionBudgetData {
        metadata: CommonMeta::from_meta(&pdb.metadata),
        min_available: utils::int_or_string(spec.and_then(|s| s.min_available.as_ref())),
        max_unavailable: utils::int_or_string(spec.and_then(|s| s.max_unavailable.as_ref())),
        selector: spec
            .map(|s| utils::selector_string(&s.selector))
            .unwrap_or_default(),
        unhealthy_pod_eviction_policy: spec
            .and_then(|s| s.unhealthy_pod_eviction_policy.clone())
            .unwrap_or_else(|| "IfHealthyBudget".to_string()),
        current_healthy: status.map(|s| s.current_healthy).unwrap_or(0),
        desired_healthy: status.map(|s| s.desired_healthy).unwrap_or(0),
        disruptions_allowed: status.map(|s| s.disruptions_allowed).unwrap_or(0),
        expected_pods: status.map(|s| s.expected_pods).unwrap_or(0),
        observed_generation: status.and_then(|s| s.observed_generation).unwrap_or(0),
        disruption_allowed: conditions.get("DisruptionAllowed"),
        conditions: conditions.other,
    }
}

pub fn collector(
    source: impl ObjectSource<PodDisruptionBudget> + 'static,
) -> Collector<PodDisruptionBudget> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
