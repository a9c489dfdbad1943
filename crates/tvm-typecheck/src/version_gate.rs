//! Version-gated feature availability. A static table maps each gated
//! feature to the TVM versions that support it; node shapes that reference
//! a gated feature are checked against the configured target version.
//! Unmatched shapes are no-ops, this validator never rejects unrelated code.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use tvm_model::ast::{BuiltinFun, CallExp, Callee, MemberAccessExp, PragmaDirective, Receiver};
use tvm_model::model::{GlobalEnv, Loc};

use crate::options::{CheckerOptions, TvmVersion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Feature {
    InitCodeHash,
    Code,
    StorageFee,
    Await,
    CopyleftPragma,
    GoshNamespace,
}

static SUPPORTED_VERSIONS: Lazy<BTreeMap<Feature, &'static [TvmVersion]>> = Lazy::new(|| {
    use Feature::*;
    use TvmVersion::*;
    BTreeMap::from([
        (InitCodeHash, &[Ever, Gosh][..]),
        (Code, &[Ever, Gosh][..]),
        (StorageFee, &[Ever, Gosh][..]),
        (Await, &[Ever, Gosh][..]),
        (CopyleftPragma, &[Ever, Gosh][..]),
        (GoshNamespace, &[Gosh][..]),
    ])
});

const NOT_SUPPORTED: &str =
    " is not supported by the TVM version. See \"--tvm-version\" command-line option.";

pub fn is_supported(feature: Feature, version: TvmVersion) -> bool {
    SUPPORTED_VERSIONS[&feature].contains(&version)
}

fn require_feature(
    env: &GlobalEnv,
    options: &CheckerOptions,
    loc: &Loc,
    feature: Feature,
    rendered: &str,
) {
    if !is_supported(feature, options.tvm_version) {
        env.error(loc, &format!("\"{}\"{}", rendered, NOT_SUPPORTED));
    }
}

pub fn check_call(env: &GlobalEnv, options: &CheckerOptions, call: &CallExp) {
    match call.callee {
        Callee::Builtin(BuiltinFun::TvmInitCodeHash) => {
            require_feature(env, options, &call.loc, Feature::InitCodeHash, "tvm.initCodeHash()")
        }
        Callee::Builtin(BuiltinFun::TvmCode) => {
            require_feature(env, options, &call.loc, Feature::Code, "tvm.code()")
        }
        Callee::Other => {}
    }

    if call.is_await {
        require_feature(env, options, &call.loc, Feature::Await, "*.await");
    }
}

pub fn check_member_access(env: &GlobalEnv, options: &CheckerOptions, access: &MemberAccessExp) {
    if let Receiver::Magic(name) = &access.receiver {
        if access.member.as_str() == "storageFee" {
            require_feature(env, options, &access.loc, Feature::StorageFee, "tx.storageFee");
        }
        // The whole gosh namespace is gated as one feature; the member name
        // only shapes the message.
        if name.as_str() == "gosh" {
            require_feature(
                env,
                options,
                &access.loc,
                Feature::GoshNamespace,
                &format!("gosh.{}", access.member),
            );
        }
    }
}

pub fn check_pragma(env: &GlobalEnv, options: &CheckerOptions, pragma: &PragmaDirective) {
    if pragma.literals.first().map(String::as_str) == Some("copyleft") {
        require_feature(
            env,
            options,
            &pragma.loc,
            Feature::CopyleftPragma,
            "pragma copyleft ...",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_table() {
        assert!(!is_supported(Feature::InitCodeHash, TvmVersion::Ton));
        assert!(is_supported(Feature::InitCodeHash, TvmVersion::Ever));
        assert!(is_supported(Feature::InitCodeHash, TvmVersion::Gosh));

        assert!(!is_supported(Feature::Await, TvmVersion::Ton));
        assert!(!is_supported(Feature::CopyleftPragma, TvmVersion::Ton));

        assert!(!is_supported(Feature::GoshNamespace, TvmVersion::Ton));
        assert!(!is_supported(Feature::GoshNamespace, TvmVersion::Ever));
        assert!(is_supported(Feature::GoshNamespace, TvmVersion::Gosh));
    }
}
