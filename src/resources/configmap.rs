use k8s_openapi::api::core::v1::ConfigMap;
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils;

pub const RESOURCE_TYPE: &str = "configmap";

/// Keys only; values never leave the cluster through this record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub data_keys: Vec<String>,
    pub data_count: usize,
    pub binary_data_keys: Vec<String>,
    pub immutable: bool,
}

pub fn project(cm: &ConfigMap) -> ConfigMapData {
    let data_keys = utils::map_keys(cm.data.as_ref());
    ConfigMapData {
        metadata: CommonMeta::from_meta(&cm.metadata),
        data_count: data_keys.len(),
        data_keys,
        binary_data_keys: utils::map_keys(cm.binary_data.as_ref()),
        immutable: cm.immutable.unwrap_or(false),
    }
}

pub fn collector(source: impl ObjectSource<ConfigMap> + 'static) -> Collector<ConfigMap> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
