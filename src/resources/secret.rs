use k8s_openapi::api::core::v1::Secret;
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils;

pub const RESOURCE_TYPE: &str = "secret";

/// Keys only; secret values are never projected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    #[serde(rename = "type")]
    pub type_: String,
    pub data_keys: Vec<String>,
    pub data_count: usize,
    pub immutable: bool,
}

pub fn project(secret: &Secret) -> SecretData {
    let data_keys = utils::map_keys(secret.data.as_ref());
    SecretData {
        metadata: CommonMeta::from_meta(&secret.metadata),
        type_: secret
            .type_
            .clone()
            .unwrap_or_else(|| "Opaque".to_string()),
        data_count: data_keys.len(),
        data_keys,
        immutable: secret.immutable.unwrap_or(false),
    }
}

pub fn collector(source: impl ObjectSource<Secret> + 'static) -> Collector<Secret> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
