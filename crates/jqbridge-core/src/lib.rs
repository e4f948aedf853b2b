//! jqbridge-core: the executable core of jqbridge.
//!
//! This crate provides:
//!
//! - **Expression builders**: pure mappings from typed operation descriptors
//!   to jq programs (filter text plus `--arg`/`--argjson` bindings)
//! - **Subprocess executor**: one spawn-write-drain-await lifecycle per call,
//!   with concurrent stream draining and an opt-in deadline
//! - **Error taxonomy**: validation failures (pre-spawn), interpreter
//!   failures (non-zero exit with stderr), unavailable binary, timeout
//! - **Filter operations**: query, path extraction, transform, conditional
//!   select, format, and validate on top of the executor
//!
//! All JSON processing is delegated to the external `jq` binary. This crate
//! never parses or evaluates filter expressions itself.

pub mod error;
pub mod expr;
pub mod filter;
pub mod invoke;

pub use error::{JqError, JqResult};
pub use expr::Program;
pub use filter::QueryOpts;
pub use invoke::{classify, JqExecutor, JqOutput, JqRequest, NO_MATCHES_SENTINEL, NULL_SENTINEL};
