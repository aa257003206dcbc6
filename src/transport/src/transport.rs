//! The transport orchestrator.
//!
//! One [`Transport`] value drives every provisioning operation: it
//! assembles the variable set, materializes the right runbook, hands both
//! to the injected runner and maps the raw engine status into a
//! [`RunOutcome`]. Each call builds its own variable map and scratch
//! directory — nothing is cached across invocations, and retry policy
//! belongs to the caller.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::facts::{normalize_facts, NormalizedFacts};
use crate::observer::{LogForward, RunObserver};
use crate::oscmd::OsCmd;
use crate::runbooks::RunbookLibrary;
use crate::runner::{RunOptions, RunReport, RunRequest, RunbookRunner};
use crate::store::{store_handler_vars, NetworkSource, StoreHandlerSource};

/// Terminal result of a transport operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Raw engine status: 0 success, nonzero failure
    pub status: i32,
    /// Facts gathered for the host, when the operation collects them
    pub facts: Option<NormalizedFacts>,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Adapter between the cluster service and the automation engine.
pub struct Transport {
    runner: Arc<dyn RunbookRunner>,
    observer: Arc<dyn RunObserver>,
    runbooks: RunbookLibrary,
    options: RunOptions,
}

impl Transport {
    pub fn new(runner: Arc<dyn RunbookRunner>) -> Self {
        Self::with_config(runner, &TransportConfig::default())
    }

    pub fn with_config(runner: Arc<dyn RunbookRunner>, config: &TransportConfig) -> Self {
        Self {
            runner,
            observer: Arc::new(LogForward),
            runbooks: RunbookLibrary::new(),
            options: config.run_options(),
        }
    }

    /// Replace the default log-forwarding observer.
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run the full provisioning workflow against a host.
    ///
    /// Builds the complete variable set (store backends, per-OS commands,
    /// service names) and invokes the bootstrap runbook. Facts are not
    /// gathered here — callers wanting them run [`Transport::get_info`]
    /// separately.
    pub async fn bootstrap(
        &self,
        host: &str,
        key_path: &Path,
        cluster_network: &str,
        stores: &dyn StoreHandlerSource,
        networks: &dyn NetworkSource,
        oscmd: &dyn OsCmd,
    ) -> Result<RunOutcome, TransportError> {
        let mut vars = store_handler_vars(stores, networks, cluster_network)?;

        vars.insert("commissaire_targets".to_string(), host.to_string());
        vars.insert(
            "commissaire_target_os".to_string(),
            oscmd.os_family().to_string(),
        );
        vars.insert(
            "commissaire_enable_pkg_repos".to_string(),
            join(&oscmd.enable_pkg_repos()),
        );
        vars.insert(
            "commissaire_install_libselinux_python".to_string(),
            join(&oscmd.install_libselinux_python()),
        );
        vars.insert(
            "commissaire_install_docker".to_string(),
            join(&oscmd.install_docker()),
        );
        vars.insert(
            "commissaire_install_flannel".to_string(),
            join(&oscmd.install_flannel()),
        );
        vars.insert(
            "commissaire_install_kube".to_string(),
            join(&oscmd.install_kube()),
        );
        vars.insert(
            "commissaire_docker_service".to_string(),
            oscmd.docker_service().to_string(),
        );
        vars.insert(
            "commissaire_flannel_service".to_string(),
            oscmd.flannel_service().to_string(),
        );
        vars.insert(
            "commissaire_kubelet_service".to_string(),
            oscmd.kubelet_service().to_string(),
        );
        vars.insert(
            "commissaire_kubeproxy_service".to_string(),
            oscmd.kube_proxy_service().to_string(),
        );

        tracing::info!(
            "[Transport] Bootstrapping {} ({})",
            host,
            oscmd.os_family()
        );

        let report = self
            .execute("bootstrap", host, key_path, Some(oscmd), &HashMap::new(), &vars)
            .await?;

        Ok(RunOutcome {
            status: report.status,
            facts: None,
        })
    }

    /// Gather and normalize facts for a host.
    ///
    /// The reduced variant of the bootstrap machine: no provisioning
    /// variables, a read-only fact-gathering run, facts returned on
    /// success.
    pub async fn get_info(
        &self,
        host: &str,
        key_path: &Path,
    ) -> Result<RunOutcome, TransportError> {
        tracing::info!("[Transport] Gathering facts for {}", host);

        let mut run_vars = HashMap::new();
        run_vars.insert("commissaire_targets".to_string(), host.to_string());

        let report = self
            .execute("get_info", host, key_path, None, &HashMap::new(), &run_vars)
            .await?;

        let facts = if report.status == 0 {
            Some(normalize_facts(host, &report.facts)?)
        } else {
            None
        };

        Ok(RunOutcome {
            status: report.status,
            facts,
        })
    }

    /// Deploy a specific version to a host.
    pub async fn deploy(
        &self,
        host: &str,
        key_path: &Path,
        oscmd: &dyn OsCmd,
        version: &str,
    ) -> Result<RunOutcome, TransportError> {
        let mut render_vars = HashMap::new();
        render_vars.insert("commissaire_targets".to_string(), host.to_string());
        render_vars.insert(
            "commissaire_deploy_command".to_string(),
            join(&oscmd.deploy(version)?),
        );
        render_vars.insert(
            "commissaire_restart_command".to_string(),
            join(&oscmd.restart()),
        );

        tracing::info!("[Transport] Deploying {} to {}", version, host);

        let report = self
            .execute("deploy", host, key_path, Some(oscmd), &render_vars, &HashMap::new())
            .await?;

        Ok(RunOutcome {
            status: report.status,
            facts: None,
        })
    }

    /// Restart a host.
    pub async fn restart(
        &self,
        host: &str,
        key_path: &Path,
        oscmd: &dyn OsCmd,
    ) -> Result<RunOutcome, TransportError> {
        let mut render_vars = HashMap::new();
        render_vars.insert("commissaire_targets".to_string(), host.to_string());
        render_vars.insert(
            "commissaire_restart_command".to_string(),
            join(&oscmd.restart()),
        );

        tracing::info!("[Transport] Restarting {}", host);

        let report = self
            .execute("restart", host, key_path, Some(oscmd), &render_vars, &HashMap::new())
            .await?;

        Ok(RunOutcome {
            status: report.status,
            facts: None,
        })
    }

    /// Upgrade a host's packages (or tree, on image-based hosts).
    pub async fn upgrade(
        &self,
        host: &str,
        key_path: &Path,
        oscmd: &dyn OsCmd,
    ) -> Result<RunOutcome, TransportError> {
        let mut render_vars = HashMap::new();
        render_vars.insert("commissaire_targets".to_string(), host.to_string());
        render_vars.insert(
            "commissaire_upgrade_command".to_string(),
            join(&oscmd.upgrade()),
        );

        tracing::info!("[Transport] Upgrading {}", host);

        let report = self
            .execute("upgrade", host, key_path, Some(oscmd), &render_vars, &HashMap::new())
            .await?;

        Ok(RunOutcome {
            status: report.status,
            facts: None,
        })
    }

    /// Materialize a runbook into a scratch directory and run it.
    async fn execute(
        &self,
        runbook: &str,
        host: &str,
        key_path: &Path,
        oscmd: Option<&dyn OsCmd>,
        render_vars: &HashMap<String, String>,
        run_vars: &HashMap<String, String>,
    ) -> Result<RunReport, TransportError> {
        let scratch = tempfile::tempdir()?;
        let runbook_path = self
            .runbooks
            .materialize(runbook, render_vars, scratch.path())?;

        let request = RunRequest {
            host,
            key_path,
            runbook: &runbook_path,
            oscmd,
            variables: run_vars,
            options: &self.options,
        };

        let report = self.runner.run(request, self.observer.as_ref()).await?;

        if report.status != 0 {
            tracing::warn!(
                "[Transport] Runbook {} failed on {} (status {})",
                runbook,
                host,
                report.status
            );
        }

        Ok(report)
    }
}

fn join(command: &[String]) -> String {
    command.join(" ")
}
