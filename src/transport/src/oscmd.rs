//! Per-OS command strategy.
//!
//! Provisioning steps differ by OS family: package-based hosts install
//! components through their package manager, image-tree hosts (atomic)
//! ship everything pre-baked and deploy by rebasing. [`OsCmd`] is the
//! strategy seam — one implementation per family, selected through
//! [`get_oscmd`] — and the orchestrator injects the resulting command
//! strings into the run as variables.

use std::fmt;
use std::str::FromStr;

use crate::error::TransportError;

/// Broad operating-system classification driving conditional provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Atomic,
    Centos,
    Fedora,
    Redhat,
    Rhel,
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OsFamily::Atomic => "atomic",
            OsFamily::Centos => "centos",
            OsFamily::Fedora => "fedora",
            OsFamily::Redhat => "redhat",
            OsFamily::Rhel => "rhel",
        };
        f.write_str(name)
    }
}

impl FromStr for OsFamily {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "atomic" => Ok(OsFamily::Atomic),
            "centos" => Ok(OsFamily::Centos),
            "fedora" => Ok(OsFamily::Fedora),
            "redhat" => Ok(OsFamily::Redhat),
            "rhel" => Ok(OsFamily::Rhel),
            other => Err(TransportError::Config(format!(
                "Unknown OS family: {}",
                other
            ))),
        }
    }
}

/// Command strategy for one OS family.
///
/// Command methods return argument vectors; the orchestrator joins them
/// with spaces when injecting them as run variables. Service name
/// defaults cover every current family; command methods without a
/// sensible cross-family default are required.
pub trait OsCmd: Send + Sync {
    fn os_family(&self) -> OsFamily;

    fn docker_service(&self) -> &'static str {
        "docker"
    }

    fn flannel_service(&self) -> &'static str {
        "flanneld"
    }

    fn kubelet_service(&self) -> &'static str {
        "kubelet"
    }

    fn kube_proxy_service(&self) -> &'static str {
        "kube-proxy"
    }

    /// Command enabling extra package repositories. The no-op `true` for
    /// families that need none.
    fn enable_pkg_repos(&self) -> Vec<String> {
        noop()
    }

    fn restart(&self) -> Vec<String> {
        to_args(&["systemctl", "reboot"])
    }

    fn install_libselinux_python(&self) -> Vec<String>;

    fn install_docker(&self) -> Vec<String>;

    fn install_flannel(&self) -> Vec<String>;

    fn install_kube(&self) -> Vec<String>;

    fn upgrade(&self) -> Vec<String>;

    /// Command deploying a specific version. Only meaningful on
    /// image-tree hosts; package-based families fail fast.
    fn deploy(&self, version: &str) -> Result<Vec<String>, TransportError> {
        let _ = version;
        Err(TransportError::Config(format!(
            "deploy is not supported on {}",
            self.os_family()
        )))
    }
}

/// Select the command strategy for an OS family.
pub fn get_oscmd(family: OsFamily) -> Box<dyn OsCmd> {
    match family {
        OsFamily::Atomic => Box::new(Atomic),
        OsFamily::Centos => Box::new(Centos),
        OsFamily::Fedora => Box::new(Fedora),
        OsFamily::Redhat => Box::new(Redhat),
        OsFamily::Rhel => Box::new(Rhel),
    }
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

fn noop() -> Vec<String> {
    to_args(&["true"])
}

fn yum_install(package: &str) -> Vec<String> {
    to_args(&["yum", "install", "-y", package])
}

fn dnf_install(package: &str) -> Vec<String> {
    to_args(&["dnf", "install", "-y", package])
}

fn subscription_repos() -> Vec<String> {
    to_args(&[
        "subscription-manager",
        "repos",
        "--enable",
        "rhel-7-server-extras-rpms",
        "--enable",
        "rhel-7-server-optional-rpms",
    ])
}

/// Image-tree host. Components ship pre-baked, so installs are no-ops and
/// deploy rebases to the requested tree.
pub struct Atomic;

impl OsCmd for Atomic {
    fn os_family(&self) -> OsFamily {
        OsFamily::Atomic
    }

    fn install_libselinux_python(&self) -> Vec<String> {
        noop()
    }

    fn install_docker(&self) -> Vec<String> {
        noop()
    }

    fn install_flannel(&self) -> Vec<String> {
        noop()
    }

    fn install_kube(&self) -> Vec<String> {
        noop()
    }

    fn upgrade(&self) -> Vec<String> {
        to_args(&["rpm-ostree", "upgrade"])
    }

    fn deploy(&self, version: &str) -> Result<Vec<String>, TransportError> {
        Ok(vec![
            "rpm-ostree".to_string(),
            "rebase".to_string(),
            version.to_string(),
        ])
    }
}

pub struct Centos;

impl OsCmd for Centos {
    fn os_family(&self) -> OsFamily {
        OsFamily::Centos
    }

    fn install_libselinux_python(&self) -> Vec<String> {
        yum_install("libselinux-python")
    }

    fn install_docker(&self) -> Vec<String> {
        yum_install("docker")
    }

    fn install_flannel(&self) -> Vec<String> {
        yum_install("flannel")
    }

    fn install_kube(&self) -> Vec<String> {
        yum_install("kubernetes-node")
    }

    fn upgrade(&self) -> Vec<String> {
        to_args(&["yum", "update", "-y"])
    }
}

pub struct Fedora;

impl OsCmd for Fedora {
    fn os_family(&self) -> OsFamily {
        OsFamily::Fedora
    }

    fn install_libselinux_python(&self) -> Vec<String> {
        dnf_install("libselinux-python")
    }

    fn install_docker(&self) -> Vec<String> {
        dnf_install("docker")
    }

    fn install_flannel(&self) -> Vec<String> {
        dnf_install("flannel")
    }

    fn install_kube(&self) -> Vec<String> {
        dnf_install("kubernetes-node")
    }

    fn upgrade(&self) -> Vec<String> {
        to_args(&["dnf", "update", "-y"])
    }
}

/// RHEL host registered through subscription-manager.
pub struct Rhel;

impl OsCmd for Rhel {
    fn os_family(&self) -> OsFamily {
        OsFamily::Rhel
    }

    fn enable_pkg_repos(&self) -> Vec<String> {
        subscription_repos()
    }

    fn install_libselinux_python(&self) -> Vec<String> {
        yum_install("libselinux-python")
    }

    fn install_docker(&self) -> Vec<String> {
        yum_install("docker")
    }

    fn install_flannel(&self) -> Vec<String> {
        yum_install("flannel")
    }

    fn install_kube(&self) -> Vec<String> {
        yum_install("kubernetes-node")
    }

    fn upgrade(&self) -> Vec<String> {
        to_args(&["yum", "update", "-y"])
    }
}

/// Alias family for RHEL — same package manager, same subscription repos.
pub struct Redhat;

impl OsCmd for Redhat {
    fn os_family(&self) -> OsFamily {
        OsFamily::Redhat
    }

    fn enable_pkg_repos(&self) -> Vec<String> {
        subscription_repos()
    }

    fn install_libselinux_python(&self) -> Vec<String> {
        yum_install("libselinux-python")
    }

    fn install_docker(&self) -> Vec<String> {
        yum_install("docker")
    }

    fn install_flannel(&self) -> Vec<String> {
        yum_install("flannel")
    }

    fn install_kube(&self) -> Vec<String> {
        yum_install("kubernetes-node")
    }

    fn upgrade(&self) -> Vec<String> {
        to_args(&["yum", "update", "-y"])
    }
}
