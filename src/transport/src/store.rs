//! Store backend configuration and variable translation.
//!
//! The cluster service persists its state in one or more store backends
//! (etcd, Kubernetes). Bootstrapping a host means handing the automation
//! engine a flat set of variables describing how to reach those backends.
//! Each recognized backend kind owns a disjoint variable-name prefix.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

const VAR_ETCD_SERVER_URL: &str = "commissaire_etcd_server_url";
const VAR_ETCD_CA_PATH: &str = "commissaire_etcd_ca_path_local";
const VAR_ETCD_CLIENT_CERT_PATH: &str = "commissaire_etcd_client_cert_path_local";
const VAR_ETCD_CLIENT_KEY_PATH: &str = "commissaire_etcd_client_key_path_local";
const VAR_KUBE_API_SERVER_URL: &str = "commissaire_kubernetes_api_server_url";
const VAR_KUBE_CLIENT_CERT_PATH: &str = "commissaire_kubernetes_client_cert_path_local";
const VAR_KUBE_CLIENT_KEY_PATH: &str = "commissaire_kubernetes_client_key_path_local";
const VAR_FLANNEL_KEY: &str = "commissaire_flannel_key";

/// Store backend kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Etcd,
    Kubernetes,
    /// A store kind this transport does not translate into variables.
    /// Skipped by the translator, not an error.
    Other(String),
}

/// Connection parameters for one store backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConnection {
    pub server_url: Option<String>,
    pub certificate_ca_path: Option<String>,
    pub certificate_path: Option<String>,
    pub certificate_key_path: Option<String>,
}

/// One configured store backend, as listed by the cluster service.
#[derive(Debug, Clone)]
pub struct StoreBackendConfig {
    pub kind: StoreKind,
    pub connection: StoreConnection,
    /// Driver arguments owned by the store client; carried through
    /// untouched by this crate.
    pub driver_args: Vec<String>,
}

/// Cluster network kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    FlannelEtcd,
    FlannelServer,
}

/// Resolved cluster network topology.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub name: String,
    pub kind: NetworkKind,
}

/// Listing of the configured store backends.
pub trait StoreHandlerSource: Send + Sync {
    fn list_store_handlers(&self) -> Vec<StoreBackendConfig>;
}

/// Lookup of a cluster network by name.
pub trait NetworkSource: Send + Sync {
    fn get(&self, name: &str) -> Option<NetworkConfig>;
}

/// Translate the configured store backends into run variables.
///
/// Unrecognized backend kinds are skipped so the transport keeps working
/// when the cluster service grows store types it does not yet model. A
/// backend missing its required `server_url` fails fast before any run
/// is invoked.
pub fn store_handler_vars(
    stores: &dyn StoreHandlerSource,
    networks: &dyn NetworkSource,
    cluster_network: &str,
) -> Result<HashMap<String, String>, TransportError> {
    let mut vars = HashMap::new();

    for backend in stores.list_store_handlers() {
        match &backend.kind {
            StoreKind::Etcd => {
                etcd_vars(&backend, networks, cluster_network, &mut vars)?;
            }
            StoreKind::Kubernetes => {
                kubernetes_vars(&backend, &mut vars)?;
            }
            StoreKind::Other(name) => {
                tracing::debug!("[StoreVars] Skipping unrecognized store kind: {}", name);
            }
        }
    }

    Ok(vars)
}

fn required_server_url<'a>(
    backend: &'a StoreBackendConfig,
    kind: &str,
) -> Result<&'a str, TransportError> {
    backend
        .connection
        .server_url
        .as_deref()
        .ok_or_else(|| TransportError::Config(format!("{} store handler missing server_url", kind)))
}

fn etcd_vars(
    backend: &StoreBackendConfig,
    networks: &dyn NetworkSource,
    cluster_network: &str,
    vars: &mut HashMap<String, String>,
) -> Result<(), TransportError> {
    let server_url = required_server_url(backend, "etcd")?;
    vars.insert(VAR_ETCD_SERVER_URL.to_string(), server_url.to_string());

    let conn = &backend.connection;
    if let Some(ca) = &conn.certificate_ca_path {
        vars.insert(VAR_ETCD_CA_PATH.to_string(), ca.clone());
    }
    if let Some(cert) = &conn.certificate_path {
        vars.insert(VAR_ETCD_CLIENT_CERT_PATH.to_string(), cert.clone());
    }
    if let Some(key) = &conn.certificate_key_path {
        vars.insert(VAR_ETCD_CLIENT_KEY_PATH.to_string(), key.clone());
    }

    // Flannel-over-etcd networks keep their subnet config under a
    // well-known etcd key tied to the network name.
    if let Some(network) = networks.get(cluster_network) {
        if network.kind == NetworkKind::FlannelEtcd {
            vars.insert(
                VAR_FLANNEL_KEY.to_string(),
                format!("/commissaire/networks/{}", network.name),
            );
        }
    }

    Ok(())
}

fn kubernetes_vars(
    backend: &StoreBackendConfig,
    vars: &mut HashMap<String, String>,
) -> Result<(), TransportError> {
    let server_url = required_server_url(backend, "kubernetes")?;
    vars.insert(VAR_KUBE_API_SERVER_URL.to_string(), server_url.to_string());

    let conn = &backend.connection;
    if let Some(cert) = &conn.certificate_path {
        vars.insert(VAR_KUBE_CLIENT_CERT_PATH.to_string(), cert.clone());
    }
    if let Some(key) = &conn.certificate_key_path {
        vars.insert(VAR_KUBE_CLIENT_KEY_PATH.to_string(), key.clone());
    }

    Ok(())
}
