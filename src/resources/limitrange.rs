use k8s_openapi::api::core::v1::LimitRange;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::quantity;
use crate::types::CommonMeta;

pub const RESOURCE_TYPE: &str = "limitrange";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitData {
    #[serde(rename = "type")]
    pub type_: String,
    pub max: BTreeMap<String, String>,
    pub min: BTreeMap<String, String>,
    pub default: BTreeMap<String, String>,
    pub default_request: BTreeMap<String, String>,
    pub max_limit_request_ratio: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitRangeData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub limits: Vec<LimitData>,
}

pub fn project(lr: &LimitRange) -> LimitRangeData {
    LimitRangeData {
        metadata: CommonMeta::from_meta(&lr.metadata),
        limits: lr
            .spec
            .as_ref()
            .map(|s| {
                s.limits
                    .iter()
                    .map(|l| LimitData {
                        type_: l.type_.clone(),
                        max: quantity::canonical_map(l.max.as_ref()),
                        min: quantity::canonical_map(l.min.as_ref()),
                        default: quantity::canonical_map(l.default.as_ref()),
                        default_request: quantity::canonical_map(l.default_request.as_ref()),
                        max_limit_request_ratio: quantity::canonical_map(
                            l.max_limit_request_ratio.as_ref(),
                        ),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

pub fn collector(source: impl ObjectSource<LimitRange> + 'static) -> Collector<LimitRange> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
