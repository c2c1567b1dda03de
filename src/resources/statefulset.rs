use k8s_openapi::api::apps::v1::StatefulSet;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils::Conditions;

pub const RESOURCE_TYPE: &str = "statefulset";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatefulSetData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub desired_replicas: i32,
    pub current_replicas: i32,
    pub ready_replicas: i32,
    pub available_replicas: i32,
    pub updated_replicas: i32,
    pub current_revision: String,
    pub update_revision: String,
    pub observed_generation: i64,
    pub pod_management_policy: String,
    pub update_strategy: String,
    pub volume_claim_templates: Vec<String>,
    pub conditions: BTreeMap<String, Option<bool>>,
}

pub fn project(sts: &StatefulSet) -> StatefulSetData {
    let spec = sts.spec.as_ref();
    let status = sts.status.as_ref();

    StatefulSetData {
        metadata: CommonMeta::from_meta(&sts.metadata),
        desired_replicas: spec.and_then(|s| s.replicas).unwrap_or(1),
        current_replicas: status.and_then(|s| s.current_replicas).unwrap_or(0),
        ready_replicas: status.and_then(|s| s.ready_replicas).unwrap_or(0),
        available_replicas: status.and_then(|s| s.available_replicas).unwrap_or(0),
        updated_replicas: status.and_then(|s| s.updated_replicas).unwrap_or(0),
        current_revision: status
            .and_then(|s| s.current_revision.clone())
            .unwrap_or_default(),
        update_revision: status
            .and_then(|s| s.update_revision.clone())
            .unwrap_or_default(),
        observed_generation: status.and_then(|s| s.observed_generation).unwrap_or(0),
        pod_management_policy: spec
            .and_then(|s| s.pod_management_policy.clone())
            .unwrap_or_else(|| "OrderedReady".to_string()),
        update_strategy: spec
            .and_then(|s| s.update_strategy.as_ref())
            .and_then(|u| u.type_.clone())
            .unwrap_or_else(|| "RollingUpdate".to_string()),
        volume_claim_templates: spec
            .and_then(|s| s.volume_claim_templates.as_ref())
            .map(|templates| {
                templates
                    .iter()
                    .filter_map(|t| t.metadata.name.clone())
                    .collect()
            })
            .unwrap_or_default(),
        conditions: Conditions::partition(status.and_then(|s| s.conditions.as_deref()), &[]).other,
    }
}

pub fn collector(source: impl ObjectSource<StatefulSet> + 'static) -> Collector<StatefulSet> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
