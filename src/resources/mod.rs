//! One module per resource kind: payload type, projection and collector.
//!
//! The `RESOURCE_TYPE` tag of each module, and the field names of its payload,
//! are what downstream consumers key on.

pub mod certificatesigningrequest;
pub mod clusterrole;
pub mod clusterrolebinding;
pub mod configmap;
pub mod cronjob;
pub mod daemonset;
pub mod deployment;
pub mod horizontalpodautoscaler;
pub mod ingress;
pub mod ingressclass;
pub mod job;
pub mod limitrange;
pub mod namespace;
pub mod networkpolicy;
pub mod node;
pub mod persistentvolume;
pub mod persistentvolumeclaim;
pub mod pod;
pub mod poddisruptionbudget;
pub mod priorityclass;
pub mod replicaset;
pub mod resourcequota;
pub mod role;
pub mod rolebinding;
pub mod secret;
pub mod service;
pub mod serviceaccount;
pub mod statefulset;
pub mod storageclass;
pub mod validatingadmissionpolicy;
pub mod validatingadmissionpolicybinding;
pub mod webhook;

use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingAdmissionPolicy, ValidatingAdmissionPolicyBinding,
    ValidatingWebhookConfiguration,
};
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::autoscaling::v2::HorizontalPodAutoscaler;
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::certificates::v1::CertificateSigningRequest;
use k8s_openapi::api::core::v1::{
    ConfigMap, Endpoints, LimitRange, Namespace, Node, PersistentVolume, PersistentVolumeClaim,
    Pod, ResourceQuota, Secret, Service, ServiceAccount,
};
use k8s_openapi::api::networking::v1::{Ingress, IngressClass, NetworkPolicy};
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};
use k8s_openapi::api::scheduling::v1::PriorityClass;
use k8s_openapi::api::storage::v1::StorageClass;
use serde::Serialize;
use std::sync::Arc;

use crate::collector::Handler;
use crate::kubernetes::{InformerFactory, SetupError};

macro_rules! resource_data {
    ($($variant:ident($data:ty)),* $(,)?) => {
        /// Type-specific payload of a record, serialized as just its fields.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum ResourceData {
            $($variant($data)),*
        }

        $(
            impl From<$data> for ResourceData {
                fn from(data: $data) -> Self {
                    ResourceData::$variant(data)
                }
            }
        )*
    };
}

resource_data!(
    Pod(pod::PodData),
    Container(pod::ContainerData),
    Deployment(deployment::DeploymentData),
    ReplicaSet(replicaset::ReplicaSetData),
    StatefulSet(statefulset::StatefulSetData),
    DaemonSet(daemonset::DaemonSetData),
    Job(job::JobData),
    CronJob(cronjob::CronJobData),
    Service(service::ServiceData),
    Ingress(ingress::IngressData),
    ConfigMap(configmap::ConfigMapData),
    Secret(secret::SecretData),
    PersistentVolumeClaim(persistentvolumeclaim::PersistentVolumeClaimData),
    ServiceAccount(serviceaccount::ServiceAccountData),
    Role(role::RoleData),
    RoleBinding(rolebinding::RoleBindingData),
    NetworkPolicy(networkpolicy::NetworkPolicyData),
    PodDisruptionBudget(poddisruptionbudget::PodDisruptionBudgetData),
    HorizontalPodAutoscaler(horizontalpodautoscaler::HorizontalPodAutoscalerData),
    ResourceQuota(resourcequota::ResourceQuotaData),
    LimitRange(limitrange::LimitRangeData),
    Node(node::NodeData),
    Namespace(namespace::NamespaceData),
    PersistentVolume(persistentvolume::PersistentVolumeData),
    StorageClass(storageclass::StorageClassData),
    ClusterRole(clusterrole::ClusterRoleData),
    ClusterRoleBinding(clusterrolebinding::ClusterRoleBindingData),
    CertificateSigningRequest(certificatesigningrequest::CertificateSigningRequestData),
    Webhook(webhook::WebhookConfigurationData),
    ValidatingAdmissionPolicy(validatingadmissionpolicy::ValidatingAdmissionPolicyData),
    ValidatingAdmissionPolicyBinding(
        validatingadmissionpolicybinding::ValidatingAdmissionPolicyBindingData
    ),
    PriorityClass(priorityclass::PriorityClassData),
    IngressClass(ingressclass::IngressClassData),
);

/// Every collectable kind, in collection order.
pub const RESOURCE_TYPES: &[&str] = &[
    namespace::RESOURCE_TYPE,
    node::RESOURCE_TYPE,
    pod::RESOURCE_TYPE,
    deployment::RESOURCE_TYPE,
    replicaset::RESOURCE_TYPE,
    statefulset::RESOURCE_TYPE,
    daemonset::RESOURCE_TYPE,
    job::RESOURCE_TYPE,
    cronjob::RESOURCE_TYPE,
    service::RESOURCE_TYPE,
    ingress::RESOURCE_TYPE,
    ingressclass::RESOURCE_TYPE,
    networkpolicy::RESOURCE_TYPE,
    configmap::RESOURCE_TYPE,
    secret::RESOURCE_TYPE,
    serviceaccount::RESOURCE_TYPE,
    persistentvolume::RESOURCE_TYPE,
    persistentvolumeclaim::RESOURCE_TYPE,
    storageclass::RESOURCE_TYPE,
    role::RESOURCE_TYPE,
    rolebinding::RESOURCE_TYPE,
    clusterrole::RESOURCE_TYPE,
    clusterrolebinding::RESOURCE_TYPE,
    poddisruptionbudget::RESOURCE_TYPE,
    horizontalpodautoscaler::RESOURCE_TYPE,
    resourcequota::RESOURCE_TYPE,
    limitrange::RESOURCE_TYPE,
    priorityclass::RESOURCE_TYPE,
    certificatesigningrequest::RESOURCE_TYPE,
    webhook::VALIDATING_RESOURCE_TYPE,
    webhook::MUTATING_RESOURCE_TYPE,
    validatingadmissionpolicy::RESOURCE_TYPE,
    validatingadmissionpolicybinding::RESOURCE_TYPE,
];

pub fn is_known(resource_type: &str) -> bool {
    RESOURCE_TYPES.contains(&resource_type)
}

/// Start the caches a kind needs and return its handler.
pub fn build(
    resource_type: &str,
    factory: &mut InformerFactory,
) -> Result<Arc<dyn Handler>, SetupError> {
    let handler: Arc<dyn Handler> = match resource_type {
        namespace::RESOURCE_TYPE => Arc::new(namespace::collector(factory.store::<Namespace>()?)),
        node::RESOURCE_TYPE => Arc::new(node::collector(factory.store::<Node>()?)),
        pod::RESOURCE_TYPE => Arc::new(pod::collector(factory.store::<Pod>()?)),
        deployment::RESOURCE_TYPE => {
            Arc::new(deployment::collector(factory.store::<Deployment>()?))
        }
        replicaset::RESOURCE_TYPE => {
            Arc::new(replicaset::collector(factory.store::<ReplicaSet>()?))
        }
        statefulset::RESOURCE_TYPE => {
            Arc::new(statefulset::collector(factory.store::<StatefulSet>()?))
        }
        daemonset::RESOURCE_TYPE => Arc::new(daemonset::collector(factory.store::<DaemonSet>()?)),
        job::RESOURCE_TYPE => Arc::new(job::collector(factory.store::<Job>()?)),
        cronjob::RESOURCE_TYPE => Arc::new(cronjob::collector(factory.store::<CronJob>()?)),
        service::RESOURCE_TYPE => {
            let services = factory.store::<Service>()?;
            let endpoints = factory.store::<Endpoints>()?;
            Arc::new(service::collector(services, endpoints))
        }
        ingress::RESOURCE_TYPE => Arc::new(ingress::collector(factory.store::<Ingress>()?)),
        ingressclass::RESOURCE_TYPE => {
            Arc::new(ingressclass::collector(factory.store::<IngressClass>()?))
        }
        networkpolicy::RESOURCE_TYPE => {
            Arc::new(networkpolicy::collector(factory.store::<NetworkPolicy>()?))
        }
        configmap::RESOURCE_TYPE => Arc::new(configmap::collector(factory.store::<ConfigMap>()?)),
        secret::RESOURCE_TYPE => Arc::new(secret::collector(factory.store::<Secret>()?)),
        serviceaccount::RESOURCE_TYPE => {
            Arc::new(serviceaccount::collector(factory.store::<ServiceAccount>()?))
        }
        persistentvolume::RESOURCE_TYPE => {
            Arc::new(persistentvolume::collector(factory.store::<PersistentVolume>()?))
        }
        persistentvolumeclaim::RESOURCE_TYPE => Arc::new(persistentvolumeclaim::collector(
            factory.store::<PersistentVolumeClaim>()?,
        )),
        storageclass::RESOURCE_TYPE => {
            Arc::new(storageclass::collector(factory.store::<StorageClass>()?))
        }
        role::RESOURCE_TYPE => Arc::new(role::collector(factory.store::<Role>()?)),
        rolebinding::RESOURCE_TYPE => {
            Arc::new(rolebinding::collector(factory.store::<RoleBinding>()?))
        }
        clusterrole::RESOURCE_TYPE => {
            Arc::new(clusterrole::collector(factory.store::<ClusterRole>()?))
        }
        clusterrolebinding::RESOURCE_TYPE => {
            Arc::new(clusterrolebinding::collector(factory.store::<ClusterRoleBinding>()?))
        }
        poddisruptionbudget::RESOURCE_TYPE => {
            Arc::new(poddisruptionbudget::collector(factory.store::<PodDisruptionBudget>()?))
        }
        horizontalpodautoscaler::RESOURCE_TYPE => Arc::new(horizontalpodautoscaler::collector(
            factory.store::<HorizontalPodAutoscaler>()?,
        )),
        resourcequota::RESOURCE_TYPE => {
            Arc::new(resourcequota::collector(factory.store::<ResourceQuota>()?))
        }
        limitrange::RESOURCE_TYPE => {
            Arc::new(limitrange::collector(factory.store::<LimitRange>()?))
        }
        priorityclass::RESOURCE_TYPE => {
            Arc::new(priorityclass::collector(factory.store::<PriorityClass>()?))
        }
        certificatesigningrequest::RESOURCE_TYPE => Arc::new(certificatesigningrequest::collector(
            factory.store::<CertificateSigningRequest>()?,
        )),
        webhook::VALIDATING_RESOURCE_TYPE => Arc::new(webhook::validating_collector(
            factory.store::<ValidatingWebhookConfiguration>()?,
        )),
        webhook::MUTATING_RESOURCE_TYPE => Arc::new(webhook::mutating_collector(
            factory.store::<MutatingWebhookConfiguration>()?,
        )),
        validatingadmissionpolicy::RESOURCE_TYPE => Arc::new(validatingadmissionpolicy::collector(
            factory.store::<ValidatingAdmissionPolicy>()?,
        )),
        validatingadmissionpolicybinding::RESOURCE_TYPE => {
            Arc::new(validatingadmissionpolicybinding::collector(
                factory.store::<ValidatingAdmissionPolicyBinding>()?,
            ))
        }
        other => return Err(SetupError::UnknownResource(other.to_string())),
    };
    Ok(handler)
}
