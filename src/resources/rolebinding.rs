use k8s_openapi::api::rbac::v1::{RoleBinding, Subject};
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;

pub const RESOURCE_TYPE: &str = "rolebinding";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectData {
    pub kind: String,
    pub name: String,
    pub namespace: String,
}

pub fn subjects(subjects: Option<&Vec<Subject>>) -> Vec<SubjectData> {
    subjects
        .into_iter()
        .flatten()
        .map(|s| SubjectData {
            kind: s.kind.clone(),
            name: s.name.clone(),
            namespace: s.namespace.clone().unwrap_or_default(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleBindingData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub role_ref_kind: String,
    pub role_ref_name: String,
    pub subjects: Vec<SubjectData>,
}

pub fn project(binding: &RoleBinding) -> RoleBindingData {
    RoleBindingData {
        metadata: CommonMeta::from_meta(&binding.metadata),
        role_ref_kind: binding.role_ref.kind.clone(),
        role_ref_name: binding.role_ref.name.clone(),
        subjects: subjects(binding.subjects.as_ref()),
    }
}

pub fn collector(source: impl ObjectSource<RoleBinding> + 'static) -> Collector<RoleBinding> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
