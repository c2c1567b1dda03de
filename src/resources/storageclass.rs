use k8s_openapi::api::storage::v1::StorageClass;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;

pub const RESOURCE_TYPE: &str = "storageclass";

const DEFAULT_CLASS_ANNOTATIONS: &[&str] = &[
    "storageclass.kubernetes.io/is-default-class",
    "storageclass.beta.kubernetes.io/is-default-class",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClassData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub provisioner: String,
    pub reclaim_policy: String,
    pub volume_binding_mode: String,
    pub allow_volume_expansion: bool,
    pub is_default: bool,
    pub parameters: BTreeMap<String, String>,
    pub mount_options: Vec<String>,
}

pub fn project(sc: &StorageClass) -> StorageClassData {
    let annotations = sc.metadata.annotations.as_ref();
    StorageClassData {
        metadata: CommonMeta::from_meta(&sc.metadata),
        provisioner: sc.provisioner.clone(),
        reclaim_policy: sc
            .reclaim_policy
            .clone()
            .unwrap_or_else(|| "Delete".to_string()),
        volume_binding_mode: sc
            .volume_binding_mode
            .clone()
            .unwrap_or_else(|| "Immediate".to_string()),
        allow_volume_expansion: sc.allow_volume_expansion.unwrap_or(false),
        is_default: DEFAULT_CLASS_ANNOTATIONS
            .iter()
            .any(|key| annotations.and_then(|a| a.get(*key)).is_some_and(|v| v == "true")),
        parameters: sc.parameters.clone().unwrap_or_default(),
        mount_options: sc.mount_options.clone().unwrap_or_default(),
    }
}

pub fn collector(source: impl ObjectSource<StorageClass> + 'static) -> Collector<StorageClass> {
    Collector::new(RESOURCE_TYPE, Scope::Cluster, source, project)
}
