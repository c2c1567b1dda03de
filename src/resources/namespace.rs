use k8s_openapi::api::core::v1::Namespace;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils::Conditions;

pub const RESOURCE_TYPE: &str = "namespace";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub phase: String,
    pub conditions: BTreeMap<String, Option<bool>>,
}

pub fn project(ns: &Namespace) -> NamespaceData {
    let status = ns.status.as_ref();
    NamespaceData {
        metadata: CommonMeta::from_meta(&ns.metadata),
        phase: status
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| "Active".to_string()),
        conditions: Conditions::partition(status.and_then(|s| s.conditions.as_deref()), &[]).other,
    }
}

pub fn collector(source: impl ObjectSource<Namespace> + 'static) -> Collector<Namespace> {
    Collector::new(RESOURCE_TYPE, Scope::Cluster, source, project)
}
