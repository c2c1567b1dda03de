use k8s_openapi::api::admissionregistration::v1::ValidatingAdmissionPolicyBinding;
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;
use crate::utils::{self, RuleData};

pub const RESOURCE_TYPE: &str = "validatingadmissionpolicybinding";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatingAdmissionPolicyBindingData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub policy_name: String,
    pub validation_actions: Vec<String>,
    pub param_ref_name: String,
    pub param_ref_namespace: String,
    pub match_resources: Vec<RuleData>,
}

pub fn project(binding: &ValidatingAdmissionPolicyBinding) -> ValidatingAdmissionPolicyBindingData {
    let spec = binding.spec.as_ref();
    let param_ref = spec.and_then(|s| s.param_ref.as_ref());

    ValidatingAdmissionPolicyBindingData {
        metadata: CommonMeta::from_meta(&binding.metadata),
        policy_name: spec.and_then(|s| s.policy_name.clone()).unwrap_or_default(),
        validation_actions: spec
            .and_then(|s| s.validation_actions.clone())
            .unwrap_or_default(),
        param_ref_name: param_ref.and_then(|p| p.name.clone()).unwrap_or_default(),
        param_ref_namespace: param_ref
            .and_then(|p| p.namespace.clone())
            .unwrap_or_default(),
        match_resources: utils::match_resource_rules(
            spec.and_then(|s| s.match_resources.as_ref()),
        ),
    }
}

pub fn collector(
    source: impl ObjectSource<ValidatingAdmissionPolicyBinding> + 'static,
) -> Collector<ValidatingAdmissionPolicyBinding> {
    Collector::new(RESOURCE_TYPE, Scope::Cluster, source, project)
}
