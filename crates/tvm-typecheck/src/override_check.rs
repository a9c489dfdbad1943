//! Hierarchy-scoped override and overload legality. Runs once per contract,
//! walking the linearized inheritance chain from most-base to most-derived.
//!
//! The VM dispatches public entry points by a selector derived from the
//! function name alone, so two public functions sharing a name are ambiguous
//! at the VM boundary even though the source language would disambiguate
//! them by arity and types.

use std::collections::{BTreeMap, BTreeSet};

use tvm_model::model::{ContractEnv, FunId, FunctionEnv, GlobalEnv};

use crate::hierarchy::{base_to_derived, OverrideClosure};

pub fn check_override_and_overload(env: &GlobalEnv, contract: &ContractEnv) {
    let closure = OverrideClosure::new(env, contract);
    let mut fun_id_to_decl: BTreeMap<u32, FunId> = BTreeMap::new();
    let mut overridden_functions: BTreeSet<FunId> = BTreeSet::new();
    let mut functions: Vec<FunId> = vec![];

    for base_contract in base_to_derived(env, contract) {
        for fun in base_contract.get_functions() {
            if let Some(id) = fun.function_id() {
                match fun_id_to_decl.get(&id).copied() {
                    Some(first) => {
                        // A collision is fine when one declaration overrides
                        // the other; no role-based exemption applies here.
                        if first != fun.get_id()
                            && !closure.overrides(fun.get_id(), first)
                            && !closure.overrides(first, fun.get_id())
                        {
                            let first_env = env.get_function(first);
                            env.error_with_labels(
                                &fun.get_loc(),
                                "Two functions have the same functionID.",
                                vec![(
                                    first_env.get_loc(),
                                    "Declaration of the function with the same function ID: "
                                        .to_string(),
                                )],
                            );
                        }
                    }
                    None => {
                        fun_id_to_decl.insert(id, fun.get_id());
                    }
                }
            }

            if fun.is_constructor() || fun.is_receive() || fun.is_fallback() || fun.is_on_tick_tock()
            {
                continue;
            }

            if !fun.get_base_functions().is_empty() {
                overridden_functions.insert(fun.get_id());
                for base in fun.get_base_functions() {
                    overridden_functions.insert(*base);
                    let base_fun = env.get_function(*base);
                    check_override_consistency(env, &fun, &base_fun);
                }
            }
            functions.push(fun.get_id());
        }
    }

    check_public_overloads(env, &functions, &overridden_functions);
}

/// An override must agree with each of its base functions on dispatch id,
/// the responsible flag, and the internal/external message flags.
fn check_override_consistency(env: &GlobalEnv, fun: &FunctionEnv, base_fun: &FunctionEnv) {
    let base_label = || {
        vec![(
            base_fun.get_loc(),
            "Declaration of the base function: ".to_string(),
        )]
    };

    match (fun.function_id(), base_fun.function_id()) {
        (Some(_), None) | (None, Some(_)) => {
            env.error_with_labels(
                &fun.get_loc(),
                "Both override and base functions should have functionID if it is defined for one of them.",
                base_label(),
            );
        }
        (Some(id), Some(base_id)) if id != base_id => {
            env.error_with_labels(
                &fun.get_loc(),
                &format!("Override function should have functionID = {}.", base_id),
                base_label(),
            );
        }
        _ => {}
    }

    if fun.is_responsible() != base_fun.is_responsible() {
        env.error_with_labels(
            &fun.get_loc(),
            "Both override and base functions should be marked as responsible or not",
            base_label(),
        );
    }

    // internalMsg and externalMsg agreement are two independent checks, each
    // with its own diagnostic.
    if fun.is_internal_msg() != base_fun.is_internal_msg() {
        env.error_with_labels(
            &fun.get_loc(),
            "Both override and base functions should be marked as internalMsg or not",
            base_label(),
        );
    }
    if fun.is_external_msg() != base_fun.is_external_msg() {
        env.error_with_labels(
            &fun.get_loc(),
            "Both override and base functions should be marked as externalMsg or not",
            base_label(),
        );
    }
}

/// Reports every unordered pair of distinct same-named public functions
/// with no override relationship, exactly once per pair.
fn check_public_overloads(env: &GlobalEnv, functions: &[FunId], overridden: &BTreeSet<FunId>) {
    let mut used: BTreeSet<(FunId, FunId)> = BTreeSet::new();
    for f in functions {
        let f_env = env.get_function(*f);
        if !f_env.is_public() || overridden.contains(f) {
            continue;
        }
        for g in functions {
            if f == g {
                continue;
            }
            let g_env = env.get_function(*g);
            if !g_env.is_public() || overridden.contains(g) {
                continue;
            }
            if f_env.get_name() == g_env.get_name() && !used.contains(&(*f, *g)) {
                env.error_with_labels(
                    &f_env.get_loc(),
                    "Function overloading is not supported for public functions.",
                    vec![(
                        g_env.get_loc(),
                        "Another overloaded function is here:".to_string(),
                    )],
                );
                used.insert((*f, *g));
                used.insert((*g, *f));
            }
        }
    }
}
