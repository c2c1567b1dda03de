use k8s_openapi::api::core::v1::ResourceQuota;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::quantity;
use crate::types::CommonMeta;

pub const RESOURCE_TYPE: &str = "resourcequota";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuotaData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub hard: BTreeMap<String, String>,
    pub used: BTreeMap<String, String>,
    pub scopes: Vec<String>,
}

pub fn project(quota: &ResourceQuota) -> ResourceQuotaData {
    let status = quota.status.as_ref();
    // Status carries the enforced limits; fall back to the spec before the
    // quota controller has reconciled it.
    let hard = status
        .and_then(|s| s.hard.as_ref())
        .or_else(|| quota.spec.as_ref().and_then(|s| s.hard.as_ref()));

    ResourceQuotaData {
        metadata: CommonMeta::from_meta(&quota.metadata),
        hard: quantity::canonical_map(hard),
        used: quantity::canonical_map(status.and_then(|s| s.used.as_ref())),
        scopes: quota
            .spec
            .as_ref()
            .and_then(|s| s.scopes.clone())
            .unwrap_or_default(),
    }
}

pub fn collector(source: impl ObjectSource<ResourceQuota> + 'static) -> Collector<ResourceQuota> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
