use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeSpec};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::collector::{Collector, Scope};
use crate::kubernetes::ObjectSource;
use crate::quantity;
use crate::types::CommonMeta;

pub const RESOURCE_TYPE: &str = "persistentvolume";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeData {
    #[serde(flatten)]
    pub metadata: CommonMeta,
    pub phase: String,
    pub capacity: BTreeMap<String, String>,
    pub capacity_bytes: Option<i64>,
    pub access_modes: Vec<String>,
    pub reclaim_policy: String,
    pub storage_class_name: String,
    pub volume_mode: String,
    pub claim_namespace: String,
    pub claim_name: String,
    pub volume_plugin: String,
    pub csi_driver: String,
}

/// Name of the volume source set on the spec, or `unknown`.
///
/// Sources are checked in priority order: csi first, then the common in-tree
/// plugins.
pub fn volume_plugin(spec: &PersistentVolumeSpec) -> &'static str {
    let sources = [
        ("csi", spec.csi.is_some()),
        ("hostPath", spec.host_path.is_some()),
        ("local", spec.local.is_some()),
        ("nfs", spec.nfs.is_some()),
        ("awsElasticBlockStore", spec.aws_elastic_block_store.is_some()),
        ("gcePersistentDisk", spec.gce_persistent_disk.is_some()),
        ("azureDisk", spec.azure_disk.is_some()),
        ("azureFile", spec.azure_file.is_some()),
        ("cephfs", spec.cephfs.is_some()),
        ("cinder", spec.cinder.is_some()),
        ("fc", spec.fc.is_some()),
        ("flexVolume", spec.flex_volume.is_some()),
        ("flocker", spec.flocker.is_some()),
        ("glusterfs", spec.glusterfs.is_some()),
        ("iscsi", spec.iscsi.is_some()),
        ("photonPersistentDisk", spec.photon_persistent_disk.is_some()),
        ("portworxVolume", spec.portworx_volume.is_some()),
        ("quobyte", spec.quobyte.is_some()),
        ("rbd", spec.rbd.is_some()),
        ("scaleIO", spec.scale_io.is_some()),
        ("storageos", spec.storageos.is_some()),
        ("vsphereVolume", spec.vsphere_volume.is_some()),
    ];
    sources
        .iter()
        .find(|(_, set)| *set)
        .map(|(name, _)| *name)
        .unwrap_or("unknown")
}

pub fn project(pv: &PersistentVolume) -> PersistentVolumeData {
    let spec = pv.spec.as_ref();
    let claim = spec.and_then(|s| s.claim_ref.as_ref());
    let capacity = spec.and_then(|s| s.capacity.as_ref());

    PersistentVolumeData {
        metadata: CommonMeta::from_meta(&pv.metadata),
        phase: pv
            .status
            .as_ref()
            .and_then(|s| s.phase.clone())
            .unwrap_or_default(),
        capacity: quantity::canonical_map(capacity),
        capacity_bytes: quantity::integer_value(capacity, "storage"),
        access_modes: spec.and_then(|s| s.access_modes.clone()).unwrap_or_default(),
        reclaim_policy: spec
            .and_then(|s| s.persistent_volume_reclaim_policy.clone())
            .unwrap_or_else(|| "Retain".to_string()),
        storage_class_name: spec
            .and_then(|s| s.storage_class_name.clone())
            .unwrap_or_default(),
        volume_mode: spec
            .and_then(|s| s.volume_mode.clone())
            .unwrap_or_else(|| "Filesystem".to_string()),
        claim_namespace: claim.and_then(|c| c.namespace.clone()).unwrap_or_default(),
        claim_name: claim.and_then(|c| c.name.clone()).unwrap_or_default(),
        volume_plugin: spec.map(volume_plugin).unwrap_or("unknown").to_string(),
        csi_driver: spec
            .and_then(|s| s.csi.as_ref())
            .map(|csi| csi.driver.clone())
            .unwrap_or_default(),
    }
}

pub fn collector(source: impl ObjectSource<PersistentVolume> + 'static) -> Collector<PersistentVolume> {
    Collector::new(RESOURCE_TYPE, Scope::Cluster, source, project)
}
