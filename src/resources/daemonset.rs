use k8s_openapi::api::apps::v1::DaemonSet;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils::Conditions;

pub const RESOURCE_TYPE: &str = "daemonset";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonSetData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub desired_number_scheduled: i32,
    pub current_number_scheduled: i32,
    pub number_misscheduled: i32,
    pub number_ready: i32,
    pub number_available: i32,
    pub number_unavailable: i32,
    pub updated_number_scheduled: i32,
    pub observed_generation: i64,
    pub update_strategy: String,
    pub conditions: BTreeMap<String, Option<bool>>,
}

pub fn project(ds: &DaemonSet) -> DaemonSetData {
    let status = ds.status.as_ref();

    DaemonSetData {
        metadata: CommonMeta::from_meta(&ds.metadata),
        desired_number_scheduled: status.map(|s| s.desired_number_scheduled).unwrap_or(0),
        current_number_scheduled: status.map(|s| s.current_number_scheduled).unwrap_or(0),
        number_misscheduled: status.map(|s| s.number_misscheduled).unwrap_or(0),
        number_ready: status.map(|s| s.number_ready).unwrap_or(0),
        number_available: status.and_then(|s| s.number_available).unwrap_or(0),
        number_unavailable: status.and_then(|s| s.number_unavailable).unwrap_or(0),
        updated_number_scheduled: status.and_then(|s| s.updated_number_scheduled).unwrap_or(0),
        observed_generation: status.and_then(|s| s.observed_generation).unwrap_or(0),
        update_strategy: ds
            .spec
            .as_ref()
            .and_then(|s| s.update_strategy.as_ref())
            .and_then(|u| u.type_.clone())
            .unwrap_or_else(|| "RollingUpdate".to_string()),
        conditions: Conditions::partition(status.and_then(|s| s.conditions.as_deref()), &[]).other,
    }
}

pub fn collector(source: impl ObjectSource<DaemonSet> + 'static) -> Collector<DaemonSet> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
