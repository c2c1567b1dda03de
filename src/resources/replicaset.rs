use k8s_openapi::api::apps::v1::ReplicaSet;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils::Conditions;

pub const RESOURCE_TYPE: &str = "replicaset";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaSetData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub desired_replicas: i32,
    pub current_replicas: i32,
    pub ready_replicas: i32,
    pub available_replicas: i32,
    pub fully_labeled_replicas: i32,
    pub observed_generation: i64,
    pub replica_failure: Option<bool>,
    pub conditions: BTreeMap<String, Option<bool>>,
}

pub fn project(rs: &ReplicaSet) -> ReplicaSetData {
    let status = rs.status.as_ref();
    let conditions = Conditions::partition(
        status.and_then(|s| s.conditions.as_deref()),
        &["ReplicaFailure"],
    );

    ReplicaSetData {
        metadata: CommonMeta::from_meta(&rs.metadata),
        desired_replicas: rs.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1),
        current_replicas: status.map(|s| s.replicas).unwrap_or(0),
        ready_replicas: status.and_then(|s| s.ready_replicas).unwrap_or(0),
        available_replicas: status.and_then(|s| s.available_replicas).unwrap_or(0),
        fully_labeled_replicas: status.and_then(|s| s.fully_labeled_replicas).unwrap_or(0),
        observed_generation: status.and_then(|s| s.observed_generation).unwrap_or(0),
        replica_failure: conditions.get("ReplicaFailure"),
        conditions: conditions.other,
    }
}

pub fn collector(source: impl ObjectSource<ReplicaSet> + 'static) -> Collector<ReplicaSet> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
