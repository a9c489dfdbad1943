//! Hierarchy-walk helpers: base-to-derived iteration over a contract's
//! linearized inheritance chain, and the transitive closure of the override
//! relation between functions.

use std::collections::{BTreeMap, BTreeSet};

use tvm_model::model::{ContractEnv, FunId, GlobalEnv};

/// Iterates the contracts of `contract`'s linearized hierarchy from
/// most-base to most-derived. Processing in this order guarantees that a
/// dispatch id is registered at its first (most-base) declaration.
pub fn base_to_derived<'env>(
    env: &'env GlobalEnv,
    contract: &ContractEnv<'env>,
) -> impl Iterator<Item = ContractEnv<'env>> {
    contract
        .linearized_base_contracts()
        .iter()
        .rev()
        .map(move |id| env.get_contract(*id))
}

/// Transitive base-function reachability over the recorded override edges,
/// computed once per contract walk so collision checks stay linear in the
/// override-chain depth.
pub struct OverrideClosure {
    reachable: BTreeMap<FunId, BTreeSet<FunId>>,
}

impl OverrideClosure {
    pub fn new(env: &GlobalEnv, contract: &ContractEnv) -> Self {
        let mut reachable = BTreeMap::new();
        for base_contract in base_to_derived(env, contract) {
            for fun in base_contract.get_functions() {
                Self::collect(env, fun.get_id(), &mut reachable);
            }
        }
        OverrideClosure { reachable }
    }

    fn collect(env: &GlobalEnv, fun: FunId, reachable: &mut BTreeMap<FunId, BTreeSet<FunId>>) {
        if reachable.contains_key(&fun) {
            return;
        }
        // Placeholder guards against cycles in malformed override edges.
        reachable.insert(fun, BTreeSet::new());
        let mut bases = BTreeSet::new();
        for base in env.get_function(fun).get_base_functions() {
            bases.insert(*base);
            Self::collect(env, *base, reachable);
            bases.extend(reachable[base].iter().copied());
        }
        reachable.insert(fun, bases);
    }

    /// All base functions `fun` overrides, directly or transitively.
    pub fn all_base_functions(&self, fun: FunId) -> Option<&BTreeSet<FunId>> {
        self.reachable.get(&fun)
    }

    /// True if `base` is in the transitive override chain of `fun`.
    pub fn overrides(&self, fun: FunId, base: FunId) -> bool {
        self.reachable
            .get(&fun)
            .is_some_and(|bases| bases.contains(&base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvm_model::model::{ContractData, FunctionData};

    #[test]
    fn closure_is_transitive() {
        let mut env = GlobalEnv::new();
        let loc = env.unknown_loc();
        let a = env.add_contract(ContractData::new("A", loc, vec![]));
        let b = env.add_contract(ContractData::new("B", loc, vec![a]));
        let c = env.add_contract(ContractData::new("C", loc, vec![b, a]));

        let fa = env.add_function(a, FunctionData::new("f", loc));
        let fb = env.add_function(
            b,
            FunctionData {
                base_functions: vec![fa],
                ..FunctionData::new("f", loc)
            },
        );
        let fc = env.add_function(
            c,
            FunctionData {
                base_functions: vec![fb],
                ..FunctionData::new("f", loc)
            },
        );

        let contract = env.get_contract(c);
        let closure = OverrideClosure::new(&env, &contract);
        assert!(closure.overrides(fc, fb));
        assert!(closure.overrides(fc, fa));
        assert!(closure.overrides(fb, fa));
        assert!(!closure.overrides(fa, fc));
        assert_eq!(closure.all_base_functions(fc).unwrap().len(), 2);
    }

    #[test]
    fn base_to_derived_reverses_linearization() {
        let mut env = GlobalEnv::new();
        let loc = env.unknown_loc();
        let a = env.add_contract(ContractData::new("A", loc, vec![]));
        let b = env.add_contract(ContractData::new("B", loc, vec![a]));
        let contract = env.get_contract(b);
        let order: Vec<_> = base_to_derived(&env, &contract)
            .map(|c| c.get_id())
            .collect();
        assert_eq!(order, vec![a, b]);
    }
}
