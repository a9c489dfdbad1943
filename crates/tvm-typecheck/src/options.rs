use serde::{Deserialize, Serialize};
use std::fmt;

/// TVM revision code is generated for. Gates availability of some built-in
/// functions and language forms, see `version_gate`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    clap::ValueEnum,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TvmVersion {
    Ton,
    #[default]
    Ever,
    Gosh,
}

impl fmt::Display for TvmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TvmVersion::Ton => write!(f, "ton"),
            TvmVersion::Ever => write!(f, "ever"),
            TvmVersion::Gosh => write!(f, "gosh"),
        }
    }
}

#[derive(clap::Args, Debug, Clone, Default, Serialize, Deserialize)]
#[clap(next_help_heading = "Target Options")]
pub struct CheckerOptions {
    /// Target TVM version to generate code for
    #[clap(long = "tvm-version", value_enum, default_value_t = TvmVersion::Ever, global = true)]
    #[serde(default)]
    pub tvm_version: TvmVersion,
}

impl CheckerOptions {
    pub fn with_version(tvm_version: TvmVersion) -> Self {
        CheckerOptions { tvm_version }
    }
}
