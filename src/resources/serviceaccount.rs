use k8s_openapi::api::core::v1::ServiceAccount;
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;

pub const RESOURCE_TYPE: &str = "serviceaccount";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub automount_service_account_token: bool,
    pub secret_count: usize,
    pub image_pull_secret_count: usize,
}

pub fn project(sa: &ServiceAccount) -> ServiceAccountData {
    ServiceAccountData {
        metadata: CommonMeta::from_meta(&sa.metadata),
        // Token automounting is on unless explicitly disabled.
        automount_service_account_token: sa.automount_service_account_token.unwrap_or(true),
        secret_count: sa.secrets.as_ref().map(Vec::len).unwrap_or(0),
        image_pull_secret_count: sa.image_pull_secrets.as_ref().map(Vec::len).unwrap_or(0),
    }
}

pub fn collector(source: impl ObjectSource<ServiceAccount> + 'static) -> Collector<ServiceAccount> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
