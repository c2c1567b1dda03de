use k8s_openapi::api::rbac::v1::ClusterRoleBinding;
use serde::Serialize;

use super::rolebinding::{SubjectData, subjects};
use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;

pub const RESOURCE_TYPE: &str = "clusterrolebinding";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleBindingData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub role_ref_kind: String,
    pub role_ref_name: String,
    pub subjects: Vec<SubjectData>,
}

pub fn project(binding: &ClusterRoleBinding) -> ClusterRoleBindingData {
    ClusterRoleBindingData {
        metadata: CommonMeta::from_meta(&binding.metadata),
        role_ref_kind: binding.role_ref.kind.clone(),
        role_ref_name: binding.role_ref.name.clone(),
        subjects: subjects(binding.subjects.as_ref()),
    }
}

pub fn collector(
    source: impl ObjectSource<ClusterRoleBinding> + 'static,
) -> Collector<ClusterRoleBinding> {
    Collector::new(RESOURCE_TYPE, Scope::Cluster, source, project)
}
