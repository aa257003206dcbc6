//! Host bootstrap transport for cluster provisioning.
//!
//! This crate is the adapter between the cluster service and the external
//! automation engine that does the actual remote work (SSH, task
//! execution, fact gathering). It owns variable assembly, runbook
//! selection, fact normalization and result mapping; the engine itself
//! stays behind the [`RunbookRunner`] trait so callers and tests can
//! substitute their own.

pub mod config;
pub mod error;
pub mod facts;
pub mod observer;
pub mod oscmd;
pub mod runbooks;
pub mod runner;
pub mod store;
pub mod transport;

pub use config::TransportConfig;
pub use error::TransportError;
pub use facts::{normalize_facts, NormalizedFacts, RawFactPayload};
pub use observer::{ChannelObserver, LogForward, RunObserver, TaskOutcome, TaskStatus};
pub use oscmd::{get_oscmd, OsCmd, OsFamily};
pub use runbooks::RunbookLibrary;
pub use runner::{RunOptions, RunReport, RunRequest, RunbookRunner};
pub use store::{
    store_handler_vars, NetworkConfig, NetworkKind, NetworkSource, StoreBackendConfig,
    StoreConnection, StoreHandlerSource, StoreKind,
};
pub use transport::{RunOutcome, Transport};
