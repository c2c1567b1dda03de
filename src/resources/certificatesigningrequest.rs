use k8s_openapi::api::certificates::v1::{
    CertificateSigningRequest, CertificateSigningRequestCondition,
};
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;

pub const RESOURCE_TYPE: &str = "certificatesigningrequest";

const TERMINAL_CONDITIONS: &[&str] = &["Approved", "Denied", "Failed"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSigningRequestData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub signer_name: String,
    pub username: String,
    pub groups: Vec<String>,
    pub usages: Vec<String>,
    pub expiration_seconds: Option<i32>,
    pub status: String,
    pub certificate_issued: bool,
}

/// Type of the last Approved, Denied or Failed condition; `Pending` if none.
pub fn csr_status(conditions: Option<&[CertificateSigningRequestCondition]>) -> String {
    conditions
        .unwrap_or_default()
        .iter()
        .rev()
        .find(|c| TERMINAL_CONDITIONS.contains(&c.type_.as_str()))
        .map(|c| c.type_.clone())
        .unwrap_or_else(|| "Pending".to_string())
}

pub fn project(csr: &CertificateSigningRequest) -> CertificateSigningRequestData {
    let spec = &csr.spec;
    let status = csr.status.as_ref();
    CertificateSigningRequestData {
        metadata: CommonMeta::from_meta(&csr.metadata),
        signer_name: spec.signer_name.clone(),
        username: spec.username.clone().unwrap_or_default(),
        groups: spec.groups.clone().unwrap_or_default(),
        usages: spec.usages.clone().unwrap_or_default(),
        expiration_seconds: spec.expiration_seconds,
        status: csr_status(status.and_then(|s| s.conditions.as_deref())),
        certificate_issued: status
            .and_then(|s| s.certificate.as_ref())
            .is_some_and(|cert| !cert.0.is_empty()),
    }
}

pub fn collector(
    source: impl ObjectSource<CertificateSigningRequest> + 'static,
) -> Collector<CertificateSigningRequest> {
    Collector::new(RESOURCE_TYPE, Scope::Cluster, source, project)
}
