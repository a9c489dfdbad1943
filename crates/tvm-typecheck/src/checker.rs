//! Node dispatcher for the legality pass. Routes each visited node to the
//! relevant validators; stateless except for the currently-open contract.
//! Every visit appends diagnostics and continues, nothing is pruned.

use log::debug;

use tvm_model::ast::{CallExp, Exp, IndexRangeExp, MappingNode, MemberAccessExp, PragmaDirective};
use tvm_model::model::{ContractEnv, ContractId, FunctionEnv, GlobalEnv, VariableData};
use tvm_model::ty::Type;

use crate::function_checks;
use crate::mapping_key;
use crate::options::CheckerOptions;
use crate::override_check;
use crate::version_gate;

/// The node kinds this pass visits. Closed on purpose: a new kind added to
/// the tree forces every dispatch site through the exhaustiveness check.
pub enum AstNode<'env> {
    Pragma(&'env PragmaDirective),
    Contract(ContractEnv<'env>),
    StateVariable(&'env VariableData),
    Mapping(&'env MappingNode),
    Function(FunctionEnv<'env>),
    Call(&'env CallExp),
    MemberAccess(&'env MemberAccessExp),
    IndexRange(&'env IndexRangeExp),
}

pub struct TvmTypeChecker<'env> {
    env: &'env GlobalEnv,
    options: &'env CheckerOptions,
    current_contract: Option<ContractId>,
}

impl<'env> TvmTypeChecker<'env> {
    pub fn new(env: &'env GlobalEnv, options: &'env CheckerOptions) -> Self {
        TvmTypeChecker {
            env,
            options,
            current_contract: None,
        }
    }

    pub fn visit(&mut self, node: AstNode<'env>) {
        match node {
            AstNode::Pragma(pragma) => {
                version_gate::check_pragma(self.env, self.options, pragma);
            }
            AstNode::Contract(contract) => {
                self.current_contract = Some(contract.get_id());
                // Override/overload checking is hierarchy-scoped and runs
                // once per contract, on open.
                override_check::check_override_and_overload(self.env, &contract);
            }
            AstNode::StateVariable(var) => {
                // Slices reference already-loaded cell data and cannot be
                // durably represented.
                if var.ty == Type::TvmSlice {
                    self.env
                        .error(&var.loc, "This type can't be used for state variables.");
                }
            }
            AstNode::Mapping(mapping) => {
                mapping_key::check_mapping_key(self.env, mapping);
            }
            AstNode::Function(fun) => {
                function_checks::check_function(self.env, &fun);
            }
            AstNode::Call(call) => {
                version_gate::check_call(self.env, self.options, call);
            }
            AstNode::MemberAccess(access) => {
                version_gate::check_member_access(self.env, self.options, access);
            }
            AstNode::IndexRange(range) => {
                if !range.base_ty.is_byte_array_or_string() {
                    self.env
                        .error(&range.loc, "Index range access is available only for bytes.");
                }
            }
        }
    }

    pub fn current_contract(&self) -> Option<ContractId> {
        self.current_contract
    }

    fn close_contract(&mut self) {
        self.current_contract = None;
    }
}

/// Walks the whole program depth-first in deterministic order: pragmas
/// first, then contracts in declaration order; within a contract, the
/// hierarchy check, then state variables, mapping occurrences, and each
/// declared function with its body expressions.
pub fn run_checker(env: &GlobalEnv, options: &CheckerOptions) {
    let mut checker = TvmTypeChecker::new(env, options);

    for pragma in env.pragmas() {
        checker.visit(AstNode::Pragma(pragma));
    }

    for contract in env.get_contracts() {
        debug!("TVM legality check of contract {}", contract.get_name());
        checker.visit(AstNode::Contract(contract.clone()));

        for var in contract.state_variables() {
            checker.visit(AstNode::StateVariable(var));
        }
        for mapping in contract.mappings() {
            checker.visit(AstNode::Mapping(mapping));
        }
        for fun in contract.get_functions() {
            checker.visit(AstNode::Function(fun.clone()));
            for exp in fun.body() {
                match exp {
                    Exp::Call(call) => checker.visit(AstNode::Call(call)),
                    Exp::MemberAccess(access) => checker.visit(AstNode::MemberAccess(access)),
                    Exp::IndexRange(range) => checker.visit(AstNode::IndexRange(range)),
                }
            }
        }

        checker.close_contract();
    }
}
