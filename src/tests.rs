#[cfg(test)]
mod tests {
    use crate::cli::Cli;
    use crate::collector::{self, Handler, Scope};
    use crate::kubernetes::{DynamicSource, ObjectSource};
    use crate::output::{OutputFormat, Sink};
    use crate::quantity::{self, Format, ParsedQuantity, QuantityError};
    use crate::resources::{
        self, ResourceData, certificatesigningrequest, clusterrole, clusterrolebinding,
        configmap, cronjob, daemonset, deployment, horizontalpodautoscaler, ingress,
        ingressclass, job, limitrange, namespace, networkpolicy, node, persistentvolume,
        persistentvolumeclaim, pod, poddisruptionbudget, priorityclass, replicaset,
        resourcequota, role, rolebinding, secret, service, serviceaccount, statefulset,
        storageclass, validatingadmissionpolicy, validatingadmissionpolicybinding, webhook,
    };
    use crate::types::{CommonMeta, LogEntry};
    use crate::utils::{self, Conditions};
    use chrono::{TimeZone, Utc};
    use clap::Parser;
    use k8s_openapi::api::admissionregistration::v1::{
        MutatingWebhookConfiguration, ValidatingAdmissionPolicy, ValidatingAdmissionPolicyBinding,
        ValidatingWebhookConfiguration,
    };
    use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
    use k8s_openapi::api::autoscaling::v2::HorizontalPodAutoscaler;
    use k8s_openapi::api::batch::v1::{CronJob, Job};
    use k8s_openapi::api::certificates::v1::{
        CertificateSigningRequest, CertificateSigningRequestCondition,
    };
    use k8s_openapi::api::core::v1::{
        ConfigMap, Endpoints, LimitRange, Namespace, Node, PersistentVolume,
        PersistentVolumeClaim, Pod, PodCondition, ResourceQuota, Secret, Service, ServiceAccount,
    };
    use k8s_openapi::api::networking::v1::{Ingress, IngressClass, NetworkPolicy};
    use k8s_openapi::api::policy::v1::PodDisruptionBudget;
    use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};
    use k8s_openapi::api::scheduling::v1::PriorityClass;
    use k8s_openapi::api::storage::v1::StorageClass;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
        LabelSelector, LabelSelectorRequirement, ObjectMeta,
    };
    use kube::Resource;
    use kube::api::{ApiResource, DynamicObject};
    use kube::runtime::reflector::Store;
    use kube::runtime::reflector::store::Writer;
    use kube::runtime::watcher;
    use serde::de::DeserializeOwned;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// A reflector store pre-populated as if the watcher had applied `objects`.
    fn store_of<K>(objects: Vec<K>) -> Store<K>
    where
        K: Resource + Clone + Send + Sync + 'static,
        K::DynamicType: Eq + std::hash::Hash + Clone + Default,
    {
        let mut writer = Writer::default();
        for obj in objects {
            writer.apply_watcher_event(&watcher::Event::Apply(obj));
        }
        writer.as_reader()
    }

    /// Deserialize a fixture, filling in `apiVersion` and `kind` for `K`.
    fn object<K>(mut value: serde_json::Value) -> K
    where
        K: Resource<DynamicType = ()> + DeserializeOwned,
    {
        if let Some(fields) = value.as_object_mut() {
            fields.insert("apiVersion".to_string(), K::api_version(&()).into());
            fields.insert("kind".to_string(), K::kind(&()).into());
        }
        serde_json::from_value(value).unwrap()
    }

    fn configmap_in(namespace: &str, name: &str) -> ConfigMap {
        object(json!({
            "metadata": {"name": name, "namespace": namespace},
            "data": {"app.conf": "listen 80", "mode": "prod"}
        }))
    }

    fn node_named(name: &str) -> Node {
        object(json!({"metadata": {"name": name}}))
    }

    fn captured_at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    // CLI

    #[test]
    fn test_cli_parsing_defaults() {
        let args = vec!["kube-snapshot"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.resources.is_empty());
        assert!(cli.namespace.is_empty());
        assert_eq!(cli.interval, 60);
        assert_eq!(cli.resync_period, 290);
        assert_eq!(cli.sync_timeout, 120);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(!cli.once);
        assert_eq!(
            cli.selected_resources().unwrap().len(),
            resources::RESOURCE_TYPES.len()
        );
    }

    #[test]
    fn test_cli_parsing_resources() {
        let args = vec!["kube-snapshot", "-r", "pod,service", "--resources", "node"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(
            cli.selected_resources().unwrap(),
            vec!["pod".to_string(), "service".to_string(), "node".to_string()]
        );
    }

    #[test]
    fn test_cli_parsing_duplicate_resources() {
        let args = vec!["kube-snapshot", "-r", "Pod,pod"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.selected_resources().unwrap(), vec!["pod".to_string()]);
    }

    #[test]
    fn test_cli_rejects_unknown_resource() {
        let args = vec!["kube-snapshot", "-r", "pod,widget"];
        let cli = Cli::try_parse_from(args).unwrap();
        let err = cli.selected_resources().unwrap_err().to_string();
        assert!(err.contains("widget"));
        assert!(err.contains("configmap"));
    }

    #[test]
    fn test_cli_parsing_namespaces() {
        let args = vec!["kube-snapshot", "-n", "a,b", "-n", "c"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.namespace, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cli_parsing_output_and_once() {
        let args = vec!["kube-snapshot", "-o", "yaml", "--once", "-v", "-i", "15"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.output, OutputFormat::Yaml);
        assert!(cli.once);
        assert!(cli.verbose);
        assert_eq!(cli.interval, 15);
    }

    // Registry

    #[test]
    fn test_resource_types_unique_and_known() {
        let mut seen = std::collections::HashSet::new();
        for resource_type in resources::RESOURCE_TYPES {
            assert!(seen.insert(*resource_type), "duplicate tag {}", resource_type);
            assert!(resources::is_known(resource_type));
            assert_eq!(resource_type.to_lowercase(), *resource_type);
        }
        assert!(resources::is_known("validatingwebhookconfiguration"));
        assert!(resources::is_known("poddisruptionbudget"));
        assert!(!resources::is_known("container"));
    }

    // Collection protocol

    #[test]
    fn test_empty_cache_yields_no_entries() {
        let handlers: Vec<Box<dyn Handler>> = vec![
            Box::new(configmap::collector(store_of::<ConfigMap>(vec![]))),
            Box::new(secret::collector(store_of::<Secret>(vec![]))),
            Box::new(pod::collector(store_of::<Pod>(vec![]))),
            Box::new(node::collector(store_of::<Node>(vec![]))),
            Box::new(service::collector(
                store_of::<Service>(vec![]),
                store_of::<Endpoints>(vec![]),
            )),
        ];
        for handler in handlers {
            assert!(handler.collect(&[], captured_at()).is_empty());
            assert!(handler.collect(&["default".to_string()], captured_at()).is_empty());
        }
    }

    #[test]
    fn test_wrong_type_objects_are_skipped() {
        let cm_resource = ApiResource::erase::<ConfigMap>(&());
        let secret_resource = ApiResource::erase::<Secret>(&());

        let mut writer: Writer<DynamicObject> = Writer::new(cm_resource.clone());
        writer.apply_watcher_event(&watcher::Event::Apply(
            DynamicObject::new("settings", &cm_resource)
                .within("default")
                .data(json!({"data": {"a": "1"}})),
        ));
        writer.apply_watcher_event(&watcher::Event::Apply(
            DynamicObject::new("credentials", &secret_resource)
                .within("default")
                .data(json!({"data": {"b": "Yg=="}})),
        ));

        let source = DynamicSource::<ConfigMap>::new(writer.as_reader());
        assert_eq!(source.list().len(), 1);

        let entries = configmap::collector(source).collect(&[], captured_at());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "settings");
        assert_eq!(entries[0].resource_type, "configmap");
    }

    /// Two objects of `K`, named `first` in `ns-a` and `second` in `ns-b`.
    /// Cluster-scoped objects carry no namespace.
    fn two_namespace_store<K>(scope: Scope, fields: serde_json::Value) -> Store<K>
    where
        K: Resource<DynamicType = ()> + DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let objects = [("first", "ns-a"), ("second", "ns-b")]
            .into_iter()
            .map(|(name, namespace)| {
                let mut value = fields.clone();
                value["metadata"] = match scope {
                    Scope::Namespaced => json!({"name": name, "namespace": namespace}),
                    Scope::Cluster => json!({"name": name}),
                };
                object::<K>(value)
            })
            .collect();
        store_of(objects)
    }

    /// `(scope, collector over an empty cache, collector over two objects)`.
    macro_rules! kind_case {
        ($collector:path, $kind:ty, $scope:expr, $fields:expr) => {
            (
                $scope,
                Box::new($collector(store_of::<$kind>(vec![]))) as Box<dyn Handler>,
                Box::new($collector(two_namespace_store::<$kind>($scope, $fields)))
                    as Box<dyn Handler>,
            )
        };
    }

    #[test]
    fn test_every_kind_follows_collection_rules() {
        let ns = Scope::Namespaced;
        let cluster = Scope::Cluster;
        let role_ref = json!({"roleRef": {
            "apiGroup": "rbac.authorization.k8s.io", "kind": "ClusterRole", "name": "view"
        }});

        let cases = vec![
            kind_case!(namespace::collector, Namespace, cluster, json!({})),
            kind_case!(node::collector, Node, cluster, json!({})),
            kind_case!(pod::collector, Pod, ns, json!({})),
            kind_case!(deployment::collector, Deployment, ns, json!({})),
            kind_case!(replicaset::collector, ReplicaSet, ns, json!({})),
            kind_case!(statefulset::collector, StatefulSet, ns, json!({})),
            kind_case!(daemonset::collector, DaemonSet, ns, json!({})),
            kind_case!(job::collector, Job, ns, json!({})),
            kind_case!(cronjob::collector, CronJob, ns, json!({})),
            (
                ns,
                Box::new(service::collector(
                    store_of::<Service>(vec![]),
                    store_of::<Endpoints>(vec![]),
                )) as Box<dyn Handler>,
                Box::new(service::collector(
                    two_namespace_store::<Service>(ns, json!({})),
                    endpoints_store(),
                )) as Box<dyn Handler>,
            ),
            kind_case!(ingress::collector, Ingress, ns, json!({})),
            kind_case!(ingressclass::collector, IngressClass, cluster, json!({})),
            kind_case!(networkpolicy::collector, NetworkPolicy, ns, json!({})),
            kind_case!(configmap::collector, ConfigMap, ns, json!({})),
            kind_case!(secret::collector, Secret, ns, json!({})),
            kind_case!(serviceaccount::collector, ServiceAccount, ns, json!({})),
            kind_case!(persistentvolume::collector, PersistentVolume, cluster, json!({})),
            kind_case!(persistentvolumeclaim::collector, PersistentVolumeClaim, ns, json!({})),
            kind_case!(
                storageclass::collector,
                StorageClass,
                cluster,
                json!({"provisioner": "ebs.csi.aws.com"})
            ),
            kind_case!(role::collector, Role, ns, json!({})),
            kind_case!(rolebinding::collector, RoleBinding, ns, role_ref.clone()),
            kind_case!(clusterrole::collector, ClusterRole, cluster, json!({})),
            kind_case!(clusterrolebinding::collector, ClusterRoleBinding, cluster, role_ref),
            kind_case!(poddisruptionbudget::collector, PodDisruptionBudget, ns, json!({})),
            kind_case!(
                horizontalpodautoscaler::collector,
                HorizontalPodAutoscaler,
                ns,
                json!({})
            ),
            kind_case!(resourcequota::collector, ResourceQuota, ns, json!({})),
            kind_case!(limitrange::collector, LimitRange, ns, json!({})),
            kind_case!(priorityclass::collector, PriorityClass, cluster, json!({"value": 1000})),
            kind_case!(
                certificatesigningrequest::collector,
                CertificateSigningRequest,
                cluster,
                json!({"spec": {"request": "Y3Ny", "signerName": "kubernetes.io/kube-apiserver-client"}})
            ),
            kind_case!(
                webhook::validating_collector,
                ValidatingWebhookConfiguration,
                cluster,
                json!({})
            ),
            kind_case!(
                webhook::mutating_collector,
                MutatingWebhookConfiguration,
                cluster,
                json!({})
            ),
            kind_case!(
                validatingadmissionpolicy::collector,
                ValidatingAdmissionPolicy,
                cluster,
                json!({})
            ),
            kind_case!(
                validatingadmissionpolicybinding::collector,
                ValidatingAdmissionPolicyBinding,
                cluster,
                json!({})
            ),
        ];

        let only_a = vec!["ns-a".to_string()];
        let mut covered = Vec::new();
        for (scope, empty, populated) in &cases {
            let tag = populated.resource_type();
            assert_eq!(empty.resource_type(), tag);
            covered.push(tag);

            assert!(empty.collect(&[], captured_at()).is_empty(), "{tag}");
            assert!(empty.collect(&only_a, captured_at()).is_empty(), "{tag}");

            let all = populated.collect(&[], captured_at());
            assert_eq!(all.len(), 2, "{tag}");
            assert!(all.iter().all(|e| e.resource_type == tag), "{tag}");

            let filtered = populated.collect(&only_a, captured_at());
            match scope {
                Scope::Namespaced => {
                    assert_eq!(filtered.len(), 1, "{tag}");
                    assert_eq!(filtered[0].name, "first", "{tag}");
                    assert_eq!(filtered[0].namespace, "ns-a", "{tag}");
                }
                Scope::Cluster => {
                    assert_eq!(filtered.len(), 2, "{tag}");
                    assert!(filtered.iter().all(|e| e.namespace.is_empty()), "{tag}");
                }
            }
        }

        covered.sort_unstable();
        let mut expected = resources::RESOURCE_TYPES.to_vec();
        expected.sort_unstable();
        assert_eq!(covered, expected);
    }

    #[test]
    fn test_namespace_filter() {
        let handler = configmap::collector(store_of(vec![
            configmap_in("ns-a", "one"),
            configmap_in("ns-b", "two"),
            configmap_in("ns-a", "three"),
        ]));

        let filtered = handler.collect(&["ns-a".to_string()], captured_at());
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|e| e.namespace == "ns-a"));

        let all = handler.collect(&[], captured_at());
        assert_eq!(all.len(), 3);

        let none = handler.collect(&["ns-c".to_string()], captured_at());
        assert!(none.is_empty());
    }

    #[test]
    fn test_cluster_scoped_ignores_namespace_filter() {
        let handler = node::collector(store_of(vec![node_named("worker-1"), node_named("worker-2")]));
        let entries = handler.collect(&["ns-a".to_string()], captured_at());
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.namespace.is_empty()));
        assert!(entries.iter().all(|e| e.resource_type == "node"));
    }

    #[test]
    fn test_entries_carry_resource_tag() {
        let handler = configmap::collector(store_of(vec![configmap_in("default", "settings")]));
        assert_eq!(handler.resource_type(), "configmap");
        let entries = handler.collect(&[], captured_at());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].resource_type, "configmap");
        assert_eq!(entries[0].timestamp, captured_at());
    }

    #[test]
    fn test_namespace_selected() {
        assert!(collector::namespace_selected("a", &[]));
        assert!(collector::namespace_selected("a", &["b".to_string(), "a".to_string()]));
        assert!(!collector::namespace_selected("a", &["b".to_string()]));
    }

    #[tokio::test]
    async fn test_collect_pass_single_timestamp() {
        let handlers: Vec<Arc<dyn Handler>> = vec![
            Arc::new(node::collector(store_of(vec![node_named("worker-1")]))),
            Arc::new(configmap::collector(store_of(vec![
                configmap_in("default", "one"),
                configmap_in("default", "two"),
            ]))),
        ];

        let entries = collector::collect_pass(&handlers, &[]).await;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].resource_type, "node");
        assert!(entries[1..].iter().all(|e| e.resource_type == "configmap"));
        assert!(entries.iter().all(|e| e.timestamp == entries[0].timestamp));
    }

    // Metadata

    #[test]
    fn test_created_by_first_owner_reference() {
        let meta: ObjectMeta = serde_json::from_value(json!({
            "name": "web-5d9c",
            "ownerReferences": [
                {"apiVersion": "apps/v1", "kind": "Deployment", "name": "x", "uid": "1"},
                {"apiVersion": "apps/v1", "kind": "StatefulSet", "name": "y", "uid": "2"}
            ]
        }))
        .unwrap();
        assert_eq!(
            utils::created_by(&meta),
            ("Deployment".to_string(), "x".to_string())
        );

        let orphan = ObjectMeta::default();
        assert_eq!(utils::created_by(&orphan), (String::new(), String::new()));
    }

    #[test]
    fn test_common_meta() {
        let meta: ObjectMeta = serde_json::from_value(json!({
            "name": "web",
            "creationTimestamp": "2024-01-01T00:00:00Z",
            "labels": {"app": "web"},
            "annotations": {
                "kubectl.kubernetes.io/last-applied-configuration": "{\"kind\":\"Secret\"}",
                "team": "payments"
            }
        }))
        .unwrap();
        let common = CommonMeta::from_meta(&meta);
        assert_eq!(common.created_timestamp, 1704067200);
        assert_eq!(common.labels.get("app").map(String::as_str), Some("web"));
        assert_eq!(common.annotations.len(), 1);
        assert!(common.annotations.contains_key("team"));
        assert!(common.created_by_kind.is_empty());
    }

    #[test]
    fn test_payload_field_names() {
        let cm: ConfigMap = object(json!({
            "metadata": {
                "name": "settings",
                "namespace": "default",
                "ownerReferences": [{"apiVersion": "v1", "kind": "Service", "name": "svc", "uid": "1"}]
            },
            "data": {"a": "1"}
        }));
        let entry = LogEntry::new(
            captured_at(),
            configmap::RESOURCE_TYPE,
            "settings",
            "default",
            configmap::project(&cm),
        );
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["resourceType"], "configmap");
        assert_eq!(value["name"], "settings");
        assert_eq!(value["namespace"], "default");
        assert_eq!(value["data"]["createdByKind"], "Service");
        assert_eq!(value["data"]["createdByName"], "svc");
        assert_eq!(value["data"]["dataKeys"], json!(["a"]));
        assert_eq!(value["data"]["dataCount"], 1);
        assert!(value["data"].get("metadata").is_none());
    }

    // Quantities

    #[test]
    fn test_quantity_parse() {
        let q: ParsedQuantity = "100m".parse().unwrap();
        assert_eq!(q.to_string(), "100m");
        assert_eq!(q.as_integer(), Some(1));
        assert_eq!(q.format(), Format::DecimalSI);

        let q: ParsedQuantity = "1Ki".parse().unwrap();
        assert_eq!(q.as_integer(), Some(1024));
        assert_eq!(q.format(), Format::BinarySI);

        let q: ParsedQuantity = "1e3".parse().unwrap();
        assert_eq!(q.format(), Format::DecimalExponent);
        assert_eq!(q.as_integer(), Some(1000));
    }

    #[test]
    fn test_quantity_parse_errors() {
        assert_eq!("".parse::<ParsedQuantity>(), Err(QuantityError::Empty));
        assert!(matches!(
            "abc".parse::<ParsedQuantity>(),
            Err(QuantityError::InvalidNumber(_))
        ));
        assert!(matches!(
            "12Q".parse::<ParsedQuantity>(),
            Err(QuantityError::UnknownSuffix { .. })
        ));
    }

    #[test]
    fn test_quantity_canonical_form() {
        let canonical = |s: &str| s.parse::<ParsedQuantity>().unwrap().to_string();
        assert_eq!(canonical("1.5Gi"), "1536Mi");
        assert_eq!(canonical("0.5"), "500m");
        assert_eq!(canonical("1000"), "1k");
        assert_eq!(canonical("2"), "2");
        assert_eq!(canonical("1e3"), "1e3");
        assert_eq!(canonical("0"), "0");
    }

    #[test]
    fn test_quantity_sum_maps() {
        let first: BTreeMap<_, _> = [
            ("cpu".to_string(), quantity_of("1")),
            ("memory".to_string(), quantity_of("1Gi")),
        ]
        .into();
        let second: BTreeMap<_, _> = [
            ("cpu".to_string(), quantity_of("500m")),
            ("memory".to_string(), quantity_of("512Mi")),
            ("bogus".to_string(), quantity_of("lots")),
        ]
        .into();

        let totals = quantity::sum_maps([Some(&first), None, Some(&second)]);
        assert_eq!(totals.get("cpu").map(String::as_str), Some("1500m"));
        assert_eq!(totals.get("memory").map(String::as_str), Some("1536Mi"));
        assert!(!totals.contains_key("bogus"));
    }

    #[test]
    fn test_quantity_integer_value() {
        let capacity: BTreeMap<_, _> = [("storage".to_string(), quantity_of("10Gi"))].into();
        assert_eq!(
            quantity::integer_value(Some(&capacity), "storage"),
            Some(10 * 1024 * 1024 * 1024)
        );
        assert_eq!(quantity::integer_value(Some(&capacity), "memory"), None);
        assert_eq!(quantity::integer_value(None, "storage"), None);
    }

    fn quantity_of(s: &str) -> k8s_openapi::apimachinery::pkg::api::resource::Quantity {
        k8s_openapi::apimachinery::pkg::api::resource::Quantity(s.to_string())
    }

    // Conditions and selectors

    #[test]
    fn test_conditions_partition() {
        let conditions = vec![
            PodCondition {
                type_: "Ready".to_string(),
                status: "True".to_string(),
                ..Default::default()
            },
            PodCondition {
                type_: "PodScheduled".to_string(),
                status: "False".to_string(),
                ..Default::default()
            },
            PodCondition {
                type_: "DisruptionTarget".to_string(),
                status: "Unknown".to_string(),
                ..Default::default()
            },
        ];
        let partitioned = Conditions::partition(
            Some(&conditions[..]),
            &["Ready", "PodScheduled", "Initialized"],
        );
        assert_eq!(partitioned.get("Ready"), Some(true));
        assert_eq!(partitioned.get("PodScheduled"), Some(false));
        assert_eq!(partitioned.get("Initialized"), None);
        assert_eq!(partitioned.other.len(), 1);
        assert_eq!(partitioned.other.get("DisruptionTarget"), Some(&None));
    }

    #[test]
    fn test_selector_string() {
        let selector = LabelSelector {
            match_labels: Some([("app".to_string(), "web".to_string())].into()),
            match_expressions: Some(vec![
                LabelSelectorRequirement {
                    key: "tier".to_string(),
                    operator: "In".to_string(),
                    values: Some(vec!["a".to_string(), "b".to_string()]),
                },
                LabelSelectorRequirement {
                    key: "canary".to_string(),
                    operator: "Exists".to_string(),
                    values: None,
                },
                LabelSelectorRequirement {
                    key: "legacy".to_string(),
                    operator: "DoesNotExist".to_string(),
                    values: None,
                },
            ]),
        };
        assert_eq!(
            utils::selector_string(&selector),
            "app=web,tier in (a,b),canary,!legacy"
        );
        assert_eq!(utils::selector_string(&None::<LabelSelector>), "");
    }

    // Pods and containers

    fn sample_pod() -> Pod {
        object(json!({
            "metadata": {"name": "web", "namespace": "default"},
            "spec": {
                "initContainers": [{"name": "migrate", "image": "migrate:1"}],
                "containers": [
                    {
                        "name": "app",
                        "image": "nginx:1.25",
                        "resources": {"requests": {"cpu": "100m", "memory": "128Mi"}}
                    },
                    {
                        "name": "sidecar",
                        "image": "envoy:1.29",
                        "resources": {"requests": {"cpu": "50m", "memory": "64Mi"}}
                    }
                ]
            },
            "status": {
                "phase": "Running",
                "containerStatuses": [{
                    "name": "app",
                    "image": "nginx:1.25",
                    "imageID": "docker.io/library/nginx@sha256:abc",
                    "ready": false,
                    "restartCount": 3,
                    "state": {"waiting": {"reason": "CrashLoopBackOff", "message": "back-off"}},
                    "lastState": {"terminated": {"exitCode": 137, "reason": "OOMKilled"}}
                }]
            }
        }))
    }

    #[test]
    fn test_pod_resource_aggregation() {
        let data = pod::project(&sample_pod());
        assert_eq!(data.resource_requests.get("cpu").map(String::as_str), Some("150m"));
        assert_eq!(data.resource_requests.get("memory").map(String::as_str), Some("192Mi"));
        assert!(data.resource_limits.is_empty());
        assert_eq!(data.qos_class, "BestEffort");
        assert_eq!(data.restart_count, 3);
        assert_eq!(data.container_count, 2);
        assert_eq!(data.init_container_count, 1);
    }

    #[test]
    fn test_pod_fans_out_to_containers() {
        let entries = pod::entries(&sample_pod(), captured_at());
        let tags: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.resource_type.as_str(), e.name.as_str()))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("pod", "web"),
                ("init_container", "migrate"),
                ("container", "app"),
                ("container", "sidecar"),
            ]
        );
        assert!(entries.iter().all(|e| e.namespace == "default"));
        assert!(entries.iter().all(|e| e.timestamp == captured_at()));
    }

    #[test]
    fn test_container_waiting_state() {
        let entries = pod::entries(&sample_pod(), captured_at());
        let ResourceData::Container(app) = &entries[2].data else {
            panic!("expected container data, got {:?}", entries[2].data);
        };
        assert_eq!(app.pod_name, "web");
        assert_eq!(app.state, pod::ContainerStateKind::Waiting);
        assert!(app.state_waiting);
        assert!(!app.state_running);
        assert!(!app.state_terminated);
        assert_eq!(app.waiting_reason, "CrashLoopBackOff");
        assert_eq!(app.exit_code, None);
        assert_eq!(app.last_terminated_reason, "OOMKilled");
        assert_eq!(app.last_terminated_exit_code, Some(137));
        assert_eq!(app.resource_requests.get("cpu").map(String::as_str), Some("100m"));

        let value = serde_json::to_value(&entries[2]).unwrap();
        assert_eq!(value["data"]["state"], "waiting");
    }

    #[test]
    fn test_container_without_status_is_unknown() {
        let entries = pod::entries(&sample_pod(), captured_at());
        let ResourceData::Container(sidecar) = &entries[3].data else {
            panic!("expected container data, got {:?}", entries[3].data);
        };
        assert_eq!(sidecar.state, pod::ContainerStateKind::Unknown);
        assert!(!sidecar.state_running && !sidecar.state_waiting && !sidecar.state_terminated);
    }

    // Services

    fn endpoints_store() -> Store<Endpoints> {
        store_of(vec![object::<Endpoints>(json!({
            "metadata": {"name": "svc", "namespace": "default"},
            "subsets": [{
                "addresses": [{"ip": "10.0.0.1"}, {"ip": "10.0.0.2"}, {"ip": "10.0.0.3"}],
                "notReadyAddresses": [{"ip": "10.0.0.4"}]
            }]
        }))])
    }

    #[test]
    fn test_count_endpoints_for_service() {
        let endpoints = endpoints_store();
        assert_eq!(service::count_endpoints_for_service(&endpoints, "default", "svc"), 3);
        assert_eq!(service::count_endpoints_for_service(&endpoints, "default", "missing"), 0);
        assert_eq!(service::count_endpoints_for_service(&endpoints, "other", "svc"), 0);
    }

    #[test]
    fn test_service_collector_joins_endpoints() {
        let services = store_of(vec![
            object::<Service>(json!({
                "metadata": {"name": "svc", "namespace": "default"},
                "spec": {"clusterIP": "10.96.0.10", "ports": [{"port": 80, "targetPort": "http"}]}
            })),
            object::<Service>(json!({
                "metadata": {"name": "lonely", "namespace": "default"},
                "spec": {"type": "NodePort"}
            })),
        ]);
        let entries = service::collector(services, endpoints_store()).collect(&[], captured_at());
        assert_eq!(entries.len(), 2);

        for entry in &entries {
            let ResourceData::Service(data) = &entry.data else {
                panic!("expected service data, got {:?}", entry.data);
            };
            match entry.name.as_str() {
                "svc" => {
                    assert_eq!(data.endpoint_count, 3);
                    assert_eq!(data.type_, "ClusterIP");
                    assert_eq!(data.ports[0].target_port.as_deref(), Some("http"));
                }
                "lonely" => {
                    assert_eq!(data.endpoint_count, 0);
                    assert_eq!(data.type_, "NodePort");
                }
                other => panic!("unexpected service {}", other),
            }
        }
    }

    // Certificate signing requests

    fn csr_condition(type_: &str) -> CertificateSigningRequestCondition {
        CertificateSigningRequestCondition {
            type_: type_.to_string(),
            status: "True".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_csr_status_mapping() {
        for status in ["Approved", "Denied", "Failed"] {
            let conditions = vec![csr_condition(status)];
            assert_eq!(certificatesigningrequest::csr_status(Some(&conditions[..])), status);
        }
        assert_eq!(certificatesigningrequest::csr_status(None), "Pending");

        let conditions = vec![csr_condition("Approved"), csr_condition("Failed")];
        assert_eq!(certificatesigningrequest::csr_status(Some(&conditions[..])), "Failed");
    }

    // Network policies

    #[test]
    fn test_network_policy_implied_policy_types() {
        let ingress_only: NetworkPolicy = object(json!({
            "metadata": {"name": "deny-all", "namespace": "default"},
            "spec": {"podSelector": {}}
        }));
        let data = networkpolicy::project(&ingress_only);
        assert_eq!(data.policy_types, vec!["Ingress".to_string()]);
        assert!(data.policy_types_defaulted);

        let with_egress: NetworkPolicy = object(json!({
            "metadata": {"name": "egress", "namespace": "default"},
            "spec": {
                "podSelector": {"matchLabels": {"app": "web"}},
                "egress": [{"to": [{"ipBlock": {"cidr": "10.0.0.0/8", "except": ["10.1.0.0/16"]}}]}]
            }
        }));
        let data = networkpolicy::project(&with_egress);
        assert_eq!(data.policy_types, vec!["Ingress".to_string(), "Egress".to_string()]);
        assert!(data.policy_types_defaulted);
        assert_eq!(data.pod_selector, "app=web");
        assert_eq!(data.egress_rule_count, 1);
        assert_eq!(data.egress_rules[0].peers[0].ip_block.as_deref(), Some("10.0.0.0/8"));
        assert_eq!(data.egress_rules[0].peers[0].except, vec!["10.1.0.0/16".to_string()]);
    }

    #[test]
    fn test_network_policy_explicit_policy_types() {
        let explicit: NetworkPolicy = object(json!({
            "metadata": {"name": "egress-only", "namespace": "default"},
            "spec": {"podSelector": {}, "policyTypes": ["Egress"]}
        }));
        let data = networkpolicy::project(&explicit);
        assert_eq!(data.policy_types, vec!["Egress".to_string()]);
        assert!(!data.policy_types_defaulted);
    }

    // Persistent volumes

    #[test]
    fn test_persistent_volume_plugin() {
        let csi: PersistentVolume = object(json!({
            "metadata": {"name": "pv-csi"},
            "spec": {
                "capacity": {"storage": "10Gi"},
                "accessModes": ["ReadWriteOnce", "ReadOnlyMany"],
                "csi": {"driver": "ebs.csi.aws.com", "volumeHandle": "vol-1"},
                "claimRef": {"namespace": "default", "name": "data"}
            },
            "status": {"phase": "Bound"}
        }));
        let data = persistentvolume::project(&csi);
        assert_eq!(data.volume_plugin, "csi");
        assert_eq!(data.csi_driver, "ebs.csi.aws.com");
        assert_eq!(data.capacity_bytes, Some(10 * 1024 * 1024 * 1024));
        assert_eq!(data.capacity.get("storage").map(String::as_str), Some("10Gi"));
        assert_eq!(data.access_modes, vec!["ReadWriteOnce", "ReadOnlyMany"]);
        assert_eq!(data.claim_namespace, "default");
        assert_eq!(data.claim_name, "data");
        assert_eq!(data.phase, "Bound");

        let host_path: PersistentVolume = object(json!({
            "metadata": {"name": "pv-host"},
            "spec": {"hostPath": {"path": "/mnt/data"}}
        }));
        assert_eq!(persistentvolume::project(&host_path).volume_plugin, "hostPath");

        let bare: PersistentVolume = object(json!({"metadata": {"name": "pv-bare"}, "spec": {}}));
        assert_eq!(persistentvolume::project(&bare).volume_plugin, "unknown");

        let both: PersistentVolume = object(json!({
            "metadata": {"name": "pv-both"},
            "spec": {
                "hostPath": {"path": "/mnt/data"},
                "csi": {"driver": "hostpath.csi.k8s.io", "volumeHandle": "vol-2"}
            }
        }));
        assert_eq!(persistentvolume::project(&both).volume_plugin, "csi");

        let nfs: PersistentVolume = object(json!({
            "metadata": {"name": "pv-nfs"},
            "spec": {"nfs": {"server": "10.0.0.5", "path": "/exports"}}
        }));
        let spec = nfs.spec.as_ref().unwrap();
        assert_eq!(persistentvolume::volume_plugin(spec), "nfs");
        assert_eq!(persistentvolume::project(&nfs).volume_plugin, "nfs");
    }

    // Workloads and accounts

    #[test]
    fn test_cronjob_defaults() {
        let cj: CronJob = object(json!({
            "metadata": {"name": "backup", "namespace": "ops"},
            "spec": {"schedule": "0 3 * * *", "jobTemplate": {}},
            "status": {
                "active": [{"kind": "Job", "name": "backup-28000000"}],
                "lastScheduleTime": "2024-01-01T03:00:00Z"
            }
        }));
        let data = cronjob::project(&cj);
        assert_eq!(data.schedule, "0 3 * * *");
        assert_eq!(data.concurrency_policy, "Allow");
        assert!(!data.suspend);
        assert_eq!(data.time_zone, "");
        assert_eq!(data.starting_deadline_seconds, None);
        assert_eq!(data.successful_jobs_history_limit, 3);
        assert_eq!(data.failed_jobs_history_limit, 1);
        assert_eq!(data.active_jobs, vec!["backup-28000000".to_string()]);
        assert_eq!(data.last_schedule_time, Some(1704078000));
        assert_eq!(data.last_successful_time, None);

        let explicit: CronJob = object(json!({
            "metadata": {"name": "report", "namespace": "ops"},
            "spec": {
                "schedule": "@hourly",
                "timeZone": "Etc/UTC",
                "suspend": true,
                "concurrencyPolicy": "Forbid",
                "startingDeadlineSeconds": 120,
                "successfulJobsHistoryLimit": 0,
                "failedJobsHistoryLimit": 5,
                "jobTemplate": {}
            }
        }));
        let data = cronjob::project(&explicit);
        assert_eq!(data.concurrency_policy, "Forbid");
        assert_eq!(data.time_zone, "Etc/UTC");
        assert!(data.suspend);
        assert_eq!(data.starting_deadline_seconds, Some(120));
        assert_eq!(data.successful_jobs_history_limit, 0);
        assert_eq!(data.failed_jobs_history_limit, 5);
        assert!(data.active_jobs.is_empty());
    }

    #[test]
    fn test_service_account_automount_default() {
        let plain: ServiceAccount = object(json!({
            "metadata": {"name": "default", "namespace": "app"}
        }));
        let data = serviceaccount::project(&plain);
        assert!(data.automount_service_account_token);
        assert_eq!(data.secret_count, 0);
        assert_eq!(data.image_pull_secret_count, 0);

        let locked: ServiceAccount = object(json!({
            "metadata": {"name": "builder", "namespace": "app"},
            "automountServiceAccountToken": false,
            "secrets": [{"name": "builder-token"}],
            "imagePullSecrets": [{"name": "registry"}, {"name": "mirror"}]
        }));
        let data = serviceaccount::project(&locked);
        assert!(!data.automount_service_account_token);
        assert_eq!(data.secret_count, 1);
        assert_eq!(data.image_pull_secret_count, 2);
    }

    #[test]
    fn test_validating_admission_policy_fields() {
        let policy: ValidatingAdmissionPolicy = object(json!({
            "metadata": {"name": "replica-limit"},
            "spec": {
                "paramKind": {"apiVersion": "rules.example.com/v1", "kind": "ReplicaLimit"},
                "matchConstraints": {"resourceRules": [{
                    "apiGroups": ["apps"],
                    "apiVersions": ["v1"],
                    "operations": ["CREATE", "UPDATE"],
                    "resources": ["deployments"]
                }]},
                "validations": [{
                    "expression": "object.spec.replicas <= params.maxReplicas",
                    "reason": "Invalid"
                }],
                "auditAnnotations": [{
                    "key": "high-replica-count",
                    "valueExpression": "string(object.spec.replicas)"
                }],
                "matchConditions": [{
                    "name": "exclude-leases",
                    "expression": "request.resource.group != 'coordination.k8s.io'"
                }],
                "variables": [{"name": "replicas", "expression": "object.spec.replicas"}]
            },
            "status": {"observedGeneration": 2}
        }));
        let data = validatingadmissionpolicy::project(&policy);
        assert_eq!(data.failure_policy, "Fail");
        assert_eq!(data.param_kind, "rules.example.com/v1/ReplicaLimit");
        assert_eq!(data.observed_generation, 2);

        assert_eq!(data.match_constraints.len(), 1);
        let rule = &data.match_constraints[0];
        assert_eq!(rule.api_groups, vec!["apps".to_string()]);
        assert_eq!(rule.operations, vec!["CREATE".to_string(), "UPDATE".to_string()]);
        assert_eq!(rule.resources, vec!["deployments".to_string()]);
        assert_eq!(rule.scope, "*");

        assert_eq!(data.validations.len(), 1);
        assert_eq!(
            data.validations[0].expression,
            "object.spec.replicas <= params.maxReplicas"
        );
        assert_eq!(data.validations[0].reason, "Invalid");
        assert_eq!(data.validations[0].message, "");

        assert_eq!(data.audit_annotations[0].key, "high-replica-count");
        assert_eq!(data.audit_annotations[0].value_expression, "string(object.spec.replicas)");
        assert_eq!(data.match_conditions[0].name, "exclude-leases");
        assert_eq!(data.variables[0].name, "replicas");
        assert_eq!(data.variables[0].expression, "object.spec.replicas");

        let bare: ValidatingAdmissionPolicy = object(json!({"metadata": {"name": "bare"}}));
        let data = validatingadmissionpolicy::project(&bare);
        assert_eq!(data.failure_policy, "Fail");
        assert_eq!(data.param_kind, "");
        assert!(data.match_constraints.is_empty());
        assert!(data.validations.is_empty());
        assert!(data.variables.is_empty());
    }

    // Secrets and webhooks

    #[test]
    fn test_secret_values_never_projected() {
        let s: Secret = object(json!({
            "metadata": {"name": "db", "namespace": "default"},
            "data": {"password": "aHVudGVyMg=="}
        }));
        let data = secret::project(&s);
        assert_eq!(data.type_, "Opaque");
        assert_eq!(data.data_keys, vec!["password".to_string()]);

        let encoded = serde_json::to_string(&data).unwrap();
        assert!(!encoded.contains("aHVudGVyMg=="));
    }

    #[test]
    fn test_mutating_webhook_defaults() {
        let cfg: MutatingWebhookConfiguration = object(json!({
            "metadata": {"name": "injector"},
            "webhooks": [{
                "name": "inject.example.com",
                "sideEffects": "None",
                "admissionReviewVersions": ["v1"],
                "clientConfig": {"service": {"namespace": "system", "name": "injector"}},
                "rules": [{"operations": ["CREATE"], "apiGroups": [""], "apiVersions": ["v1"], "resources": ["pods"]}]
            }]
        }));
        let data = webhook::project_mutating(&cfg);
        assert_eq!(data.webhook_count, 1);

        let hook = &data.webhooks[0];
        assert_eq!(hook.failure_policy, "Fail");
        assert_eq!(hook.match_policy, "Equivalent");
        assert_eq!(hook.timeout_seconds, 10);
        assert_eq!(hook.reinvocation_policy.as_deref(), Some("Never"));
        assert_eq!(hook.service_name, "injector");
        assert_eq!(hook.service_port, Some(443));
        assert_eq!(hook.rules[0].resources, vec!["pods".to_string()]);
        assert_eq!(hook.rules[0].scope, "*");
    }

    // Output

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn sample_entries() -> Vec<LogEntry> {
        configmap::collector(store_of(vec![configmap_in("default", "settings")]))
            .collect(&[], captured_at())
    }

    #[test]
    fn test_sink_json_lines() {
        let buffer = SharedBuffer::default();
        let mut sink = Sink::new(OutputFormat::Json, Box::new(buffer.clone()));
        sink.emit(&sample_entries()).unwrap();
        sink.emit(&sample_entries()).unwrap();

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record["resourceType"], "configmap");
        assert_eq!(record["timestamp"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_sink_yaml_documents() {
        let buffer = SharedBuffer::default();
        let mut sink = Sink::new(OutputFormat::Yaml, Box::new(buffer.clone()));
        sink.emit(&sample_entries()).unwrap();

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(written.starts_with("---\n"));
        assert!(written.contains("resourceType: configmap"));
    }
}
