use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::quantity;
use crate::types::CommonMeta;
use crate::utils::Conditions;

pub const RESOURCE_TYPE: &str = "persistentvolumeclaim";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeClaimData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub phase: String,
    pub storage_class_name: String,
    pub volume_name: String,
    pub volume_mode: String,
    pub access_modes: Vec<String>,
    pub requests: BTreeMap<String, String>,
    pub capacity: BTreeMap<String, String>,
    pub capacity_bytes: Option<i64>,
    pub conditions: BTreeMap<String, Option<bool>>,
}

pub fn project(pvc: &PersistentVolumeClaim) -> PersistentVolumeClaimData {
    let spec = pvc.spec.as_ref();
    let status = pvc.status.as_ref();
    let capacity = status.and_then(|s| s.capacity.as_ref());

    PersistentVolumeClaimData {
        metadata: CommonMeta::from_meta(&pvc.metadata),
        phase: status.and_then(|s| s.phase.clone()).unwrap_or_default(),
        storage_class_name: spec
            .and_then(|s| s.storage_class_name.clone())
            .unwrap_or_default(),
        volume_name: spec.and_then(|s| s.volume_name.clone()).unwrap_or_default(),
        volume_mode: spec
            .and_then(|s| s.volume_mode.clone())
            .unwrap_or_else(|| "Filesystem".to_string()),
        access_modes: spec.and_then(|s| s.access_modes.clone()).unwrap_or_default(),
        requests: quantity::canonical_map(
            spec.and_then(|s| s.resources.as_ref())
                .and_then(|r| r.requests.as_ref()),
        ),
        capacity: quantity::canonical_map(capacity),
        capacity_bytes: quantity::integer_value(capacity, "storage"),
        conditions: Conditions::partition(status.and_then(|s| s.conditions.as_deref()), &[]).other,
    }
}

pub fn collector(
    source: impl ObjectSource<PersistentVolumeClaim> + 'static,
) -> Collector<PersistentVolumeClaim> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
