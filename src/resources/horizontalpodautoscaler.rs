use k8s_openapi::api::autoscaling::v2::HorizontalPodAutoscaler;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils::{self, Conditions};

pub const RESOURCE_TYPE: &str = "horizontalpodautoscaler";

const KNOWN_CONDITIONS: &[&str] = &["AbleToScale", "ScalingActive", "ScalingLimited"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalPodAutoscalerData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub scale_target_kind: String,
    pub scale_target_name: String,
    pub min_replicas: i32,
    pub max_replicas: i32,
    pub current_replicas: i32,
    pub desired_replicas: i32,
    pub metric_types: Vec<String>,
    pub last_scale_time: Option<i64>,
    pub able_to_scale: Option<bool>,
    pub scaling_active: Option<bool>,
    pub scaling_limited: Option<bool>,
    pub conditions: BTreeMap<String, Option<bool>>,
}

pub fn project(hpa: &HorizontalPodAutoscaler) -> HorizontalPodAutoscalerData {
    let spec = hpa.spec.as_ref();
    let status = hpa.status.as_ref();
    let conditions = Conditions::partition(
        status.and_then(|s| s.conditions.as_deref()),
        KNOWN_CONDITIONS,
    );

    HorizontalPodAutoscalerData {
        metadata: CommonMeta::from_meta(&hpa.metadata),
        scale_target_kind: spec
            .map(|s| s.scale_target_ref.kind.clone())
            .unwrap_or_default(),
        scale_target_name: spec
            .map(|s| s.scale_target_ref.name.clone())
            .unwrap_or_default(),
        min_replicas: spec.and_then(|s| s.min_replicas).unwrap_or(1),
        max_replicas: spec.map(|s| s.max_replicas).unwrap_or(0),
        current_replicas: status.and_then(|s| s.current_replicas).unwrap_or(0),
        desired_replicas: status.map(|s| s.desired_replicas).unwrap_or(0),
        metric_types: spec
            .and_then(|s| s.metrics.as_ref())
            .map(|metrics| metrics.iter().map(|m| m.type_.clone()).collect())
            .unwrap_or_default(),
        last_scale_time: utils::unix_time(status.and_then(|s| s.last_scale_time.as_ref())),
        able_to_scale: conditions.get("AbleToScale"),
        scaling_active: conditions.get("ScalingActive"),
        scaling_limited: conditions.get("ScalingLimited"),
        conditions: conditions.other,
    }
}

pub fn collector(
    source: impl ObjectSource<HorizontalPodAutoscaler> + 'static,
) -> Collector<HorizontalPodAutoscaler> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
