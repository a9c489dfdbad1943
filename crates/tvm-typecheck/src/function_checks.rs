//! Per-function legality: explicit functionID placement and the required
//! shapes of the reserved `onCodeUpgrade` and `afterSignatureCheck` hooks.

use tvm_model::model::{FunctionEnv, GlobalEnv, Visibility};
use tvm_model::ty::Type;

/// Hook run when a contract replaces its own code; dispatched outside the
/// normal public selector table.
pub const ON_CODE_UPGRADE: &str = "onCodeUpgrade";

/// Hook run on external messages between signature check and dispatch.
pub const AFTER_SIGNATURE_CHECK: &str = "afterSignatureCheck";

pub fn check_function(env: &GlobalEnv, fun: &FunctionEnv) {
    if let Some(id) = fun.function_id() {
        if id == 0 {
            env.error(
                &fun.get_loc(),
                "functionID can't be equal to zero because this value is reserved for receive function.",
            );
        }
        if !fun.is_public() && fun.get_name_str() != ON_CODE_UPGRADE {
            env.error(
                &fun.get_loc(),
                "Only public/external functions and function `onCodeUpgrade` can have functionID.",
            );
        }
        if fun.is_receive() || fun.is_fallback() || fun.is_on_tick_tock() || fun.is_on_bounce() {
            env.error(
                &fun.get_loc(),
                "functionID isn't supported for receive, fallback, onBounce and onTickTock functions.",
            );
        }
    }

    if fun.is_inline() && fun.is_public() {
        env.error(
            &fun.get_loc(),
            "Inline function should have private or internal visibility",
        );
    }

    if fun.get_name_str() == ON_CODE_UPGRADE {
        check_on_code_upgrade(env, fun);
    }
    if fun.get_name_str() == AFTER_SIGNATURE_CHECK {
        check_after_signature_check(env, fun);
    }
}

// The two shape violations are independent; a hook can be wrong in both
// ways at once.
fn check_on_code_upgrade(env: &GlobalEnv, fun: &FunctionEnv) {
    let expected = "\nfunction onCodeUpgrade(...) (internal|private) { /*...*/ }";
    if let Some(ret) = fun.get_returns().first() {
        env.error(
            &ret.loc,
            &format!(
                "Function mustn't return any parameters. Expected function signature:{}",
                expected
            ),
        );
    }
    if fun.is_public() {
        env.error(
            &fun.get_loc(),
            &format!("Bad function visibility. Expected function signature:{}", expected),
        );
    }
}

fn check_after_signature_check(env: &GlobalEnv, fun: &FunctionEnv) {
    let expected = "\nExpected follow format: \"function afterSignatureCheck(TvmSlice restOfMessageBody, TvmCell message) private inline returns (TvmSlice) { /*...*/ }\"";

    let params = fun.get_parameters();
    if params.len() != 2
        || params[0].ty != Type::TvmSlice
        || params[1].ty != Type::TvmCell
    {
        env.error(
            &fun.get_loc(),
            &format!("Unexpected function parameters.{}", expected),
        );
    }

    let returns = fun.get_returns();
    if returns.len() != 1 || returns[0].ty != Type::TvmSlice {
        env.error(&fun.get_loc(), &format!("Should return TvmSlice.{}", expected));
    }

    if fun.visibility() != Visibility::Private {
        env.error(
            &fun.get_loc(),
            &format!("Should be marked as private.{}", expected),
        );
    }
    if !fun.is_inline() {
        env.error(
            &fun.get_loc(),
            &format!("Should be marked as inline.{}", expected),
        );
    }
}
