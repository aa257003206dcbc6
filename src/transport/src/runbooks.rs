//! Embedded runbook library.
//!
//! Runbooks are compiled into the binary so the transport is
//! self-contained wherever it is deployed. Static runbooks take their
//! variables at run time from the engine; templated ones carry per-OS
//! commands and are rendered with Tera before the engine sees them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::{Context, Tera};

use crate::error::TransportError;

/// One embedded runbook.
struct RunbookSpec {
    /// Name operations refer to it by
    name: &'static str,
    /// File name it is materialized under
    file: &'static str,
    /// Whether the source is a Tera template rendered before the run
    templated: bool,
    source: &'static str,
}

const RUNBOOKS: &[RunbookSpec] = &[
    RunbookSpec {
        name: "bootstrap",
        file: "bootstrap.yaml",
        templated: false,
        source: include_str!("../runbooks/bootstrap.yaml"),
    },
    RunbookSpec {
        name: "get_info",
        file: "get_info.yaml",
        templated: false,
        source: include_str!("../runbooks/get_info.yaml"),
    },
    RunbookSpec {
        name: "deploy",
        file: "deploy.yaml",
        templated: true,
        source: include_str!("../runbooks/deploy.yaml.j2"),
    },
    RunbookSpec {
        name: "restart",
        file: "restart.yaml",
        templated: true,
        source: include_str!("../runbooks/restart.yaml.j2"),
    },
    RunbookSpec {
        name: "upgrade",
        file: "upgrade.yaml",
        templated: true,
        source: include_str!("../runbooks/upgrade.yaml.j2"),
    },
];

/// Embedded runbook library with a Tera engine for the templated entries.
pub struct RunbookLibrary {
    tera: Tera,
}

impl RunbookLibrary {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        let mut template_count = 0;

        for spec in RUNBOOKS.iter().filter(|s| s.templated) {
            if let Err(e) = tera.add_raw_template(spec.name, spec.source) {
                tracing::warn!(
                    "[RunbookLibrary] Failed to add embedded template {}: {}",
                    spec.name,
                    e
                );
            } else {
                template_count += 1;
            }
        }

        tracing::debug!(
            "[RunbookLibrary] Loaded {} embedded runbook templates",
            template_count
        );

        Self { tera }
    }

    /// Write the named runbook into `dir` and return its path.
    ///
    /// Templated runbooks are rendered with `vars` first; static ones are
    /// written verbatim and take their variables from the engine at run
    /// time.
    pub fn materialize(
        &self,
        name: &str,
        vars: &HashMap<String, String>,
        dir: &Path,
    ) -> Result<PathBuf, TransportError> {
        let spec = RUNBOOKS
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| TransportError::Config(format!("Unknown runbook: {}", name)))?;

        let content = if spec.templated {
            let mut context = Context::new();
            for (key, value) in vars {
                context.insert(key, value);
            }
            self.tera.render(spec.name, &context).map_err(|e| {
                TransportError::Render(format!("Failed to render runbook {}: {}", spec.name, e))
            })?
        } else {
            spec.source.to_string()
        };

        let path = dir.join(spec.file);
        std::fs::write(&path, content)?;

        tracing::debug!(
            "[RunbookLibrary] Materialized runbook {} at {}",
            spec.name,
            path.display()
        );

        Ok(path)
    }
}

impl Default for RunbookLibrary {
    fn default() -> Self {
        Self::new()
    }
}
