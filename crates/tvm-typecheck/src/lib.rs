#![forbid(unsafe_code)]

use anyhow::anyhow;
use codespan_reporting::{diagnostic::Severity, term::termcolor::WriteColor};
use tvm_model::model::GlobalEnv;

pub mod checker;
pub mod function_checks;
pub mod hierarchy;
pub mod mapping_key;
pub mod options;
pub mod override_check;
pub mod version_gate;

pub use checker::{run_checker, AstNode, TvmTypeChecker};
pub use options::{CheckerOptions, TvmVersion};

/// Reports accumulated diagnostics and fails the compilation if any of them
/// is an error. Called by the driver after the whole tree has been walked;
/// the pass itself never exits early.
pub fn check_errors<W: WriteColor>(
    env: &GlobalEnv,
    error_writer: &mut W,
    msg: &str,
) -> anyhow::Result<()> {
    let errors = env.has_errors();
    env.report_diag(error_writer, Severity::Warning);
    if errors {
        Err(anyhow!(msg.to_string()))
    } else {
        Ok(())
    }
}
