use k8s_openapi::api::networking::v1::Ingress;
use serde::Serialize;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::types::CommonMeta;

pub const RESOURCE_TYPE: &str = "ingress";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressPathData {
    pub path: String,
    pub path_type: String,
    pub service_name: String,
    pub service_port: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRuleData {
    pub host: String,
    pub paths: Vec<IngressPathData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub ingress_class_name: String,
    pub rules: Vec<IngressRuleData>,
    pub tls_hosts: Vec<String>,
    pub tls_secrets: Vec<String>,
    pub load_balancer_ingress: Vec<String>,
}

pub fn project(ingress: &Ingress) -> IngressData {
    let spec = ingress.spec.as_ref();

    let rules = spec
        .and_then(|s| s.rules.as_ref())
        .map(|rules| {
            rules
                .iter()
                .map(|rule| IngressRuleData {
                    host: rule.host.clone().unwrap_or_default(),
                    paths: rule
                        .http
                        .as_ref()
                        .map(|http| {
                            http.paths
                                .iter()
                                .map(|p| {
                                    let service = p.backend.service.as_ref();
                                    let port = service.and_then(|s| s.port.as_ref());
                                    IngressPathData {
                                        path: p.path.clone().unwrap_or_else(|| "/".to_string()),
                                        path_type: p.path_type.clone(),
                                        service_name: service
                                            .map(|s| s.name.clone())
                                            .unwrap_or_default(),
                                        service_port: port
                                            .and_then(|port| {
                                                port.name
                                                    .clone()
                                                    .or_else(|| port.number.map(|n| n.to_string()))
                                            })
                                            .unwrap_or_default(),
                                    }
                                })
                                .collect()
                        })
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    let tls = spec.and_then(|s| s.tls.as_deref()).unwrap_or_default();

    IngressData {
        metadata: CommonMeta::from_meta(&ingress.metadata),
        ingress_class_name: spec
            .and_then(|s| s.ingress_class_name.clone())
            .unwrap_or_default(),
        rules,
        tls_hosts: tls
            .iter()
            .flat_map(|t| t.hosts.iter().flatten().cloned())
            .collect(),
        tls_secrets: tls.iter().filter_map(|t| t.secret_name.clone()).collect(),
        load_balancer_ingress: ingress
            .status
            .as_ref()
            .and_then(|s| s.load_balancer.as_ref())
            .and_then(|lb| lb.ingress.as_ref())
            .map(|ingress| {
                ingress
                    .iter()
                    .filter_map(|i| i.ip.clone().or_else(|| i.hostname.clone()))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

pub fn collector(source: impl ObjectSource<Ingress> + 'static) -> Collector<Ingress> {
    Collector::new(RESOURCE_TYPE, Scope::Namespaced, source, project)
}
