use k8s_openapi::api::scheduling::v1::PriorityClass;
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;

pub const RESOURCE_TYPE: &str = "priorityclass";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityClassData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub value: i32,
    pub global_default: bool,
    pub preemption_policy: String,
    pub description: String,
}

pub fn project(pc: &PriorityClass) -> PriorityClassData {
    PriorityClassData {
        metadata: CommonMeta::from_meta(&pc.metadata),
        value: pc.value,
        global_default: pc.global_default.unwrap_or(false),
        preemption_policy: pc
            .preemption_policy
            .clone()
            .unwrap_or_else(|| "PreemptLowerPriority".to_string()),
        description: pc.description.clone().unwrap_or_default(),
    }
}

pub fn collector(source: impl ObjectSource<PriorityClass> + 'static) -> Collector<PriorityClass> {
    Collector::new(RESOURCE_TYPE, Scope::Cluster, source, project)
}
