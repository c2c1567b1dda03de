use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::resources::ResourceData;
use crate::utils;

/// Annotation written by `kubectl apply`; it can carry a full copy of a Secret.
const LAST_APPLIED_ANNOTATION: &str = "kubectl.kubernetes.io/last-applied-configuration";

/// One point-in-time record for a single cluster object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub resource_type: String,
    pub name: String,
    pub namespace: String,
    pub data: ResourceData,
}

impl LogEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        resource_type: &str,
        name: impl Into<String>,
        namespace: impl Into<String>,
        data: impl Into<ResourceData>,
    ) -> Self {
        Self {
            timestamp,
            resource_type: resource_type.to_string(),
            name: name.into(),
            namespace: namespace.into(),
            data: data.into(),
        }
    }
}

/// Metadata shared by every payload, flattened into it on output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonMeta {
    pub created_timestamp: i64,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub created_by_kind: String,
    pub created_by_name: String,
}

impl CommonMeta {
    pub fn from_meta(meta: &ObjectMeta) -> Self {
        let (created_by_kind, created_by_name) = utils::created_by(meta);
        let mut annotations = meta.annotations.clone().unwrap_or_default();
        annotations.remove(LAST_APPLIED_ANNOTATION);

        Self {
            created_timestamp: utils::unix_time(meta.creation_timestamp.as_ref()).unwrap_or(0),
            labels: meta.labels.clone().unwrap_or_default(),
            annotations,
            created_by_kind,
            created_by_name,
        }
    }
}
