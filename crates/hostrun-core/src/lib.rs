//! hostrun-core: Remote command orchestration
//!
//! Prepares elevated commands, runs them host by host over a transport from
//! `hostrun-exec`, and renders the outcomes into a report.

pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod outcome;
pub mod report;
pub mod run;
pub mod session;
pub mod state;

pub use command::{PreparedCommand, parse_command_lines, prepare_commands, split_command_list};
pub use config::RunConfig;
pub use error::CoreError;
pub use host::{HostOrchestrator, HostOutcome};
pub use outcome::OutcomeRecord;
pub use report::{Report, ReportSink};
pub use run::{RunAggregator, RunSummary, Shutdown};
pub use session::SessionExecutor;
pub use state::HostState;

pub use hostrun_exec::Credential;
