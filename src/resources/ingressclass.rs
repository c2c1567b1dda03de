use k8s_openapi::api::networking::v1::IngressClass;
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;

pub const RESOURCE_TYPE: &str = "ingressclass";

const DEFAULT_CLASS_ANNOTATION: &str = "ingressclass.kubernetes.io/is-default-class";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressClassData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub controller: String,
    pub is_default: bool,
}

pub fn project(class: &IngressClass) -> IngressClassData {
    IngressClassData {
        metadata: CommonMeta::from_meta(&class.metadata),
        controller: class
            .spec
            .as_ref()
            .and_then(|s| s.controller.clone())
            .unwrap_or_default(),
        is_default: class
            .metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get(DEFAULT_CLASS_ANNOTATION))
            .is_some_and(|v| v == "true"),
    }
}

pub fn collector(source: impl ObjectSource<IngressClass> + 'static) -> Collector<IngressClass> {
    Collector::new(RESOURCE_TYPE, Scope::Cluster, source, project)
}
