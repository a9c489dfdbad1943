//! Body-level AST nodes surfaced to the legality checker. Expressions are
//! already resolved by the upstream type checker; only the shapes this pass
//! inspects are represented, everything else is collapsed into the `Other`
//! variants.

use crate::model::Loc;
use crate::symbol::Symbol;
use crate::ty::Type;

/// A `pragma ...;` directive, tokenized into its literals.
#[derive(Debug, Clone)]
pub struct PragmaDirective {
    pub loc: Loc,
    pub literals: Vec<String>,
}

/// A mapping type occurrence, e.g. the declared type of a state variable.
/// `loc` points at the key type.
#[derive(Debug, Clone)]
pub struct MappingNode {
    pub loc: Loc,
    pub key_ty: Type,
    pub value_ty: Type,
}

#[derive(Debug, Clone)]
pub enum Exp {
    Call(CallExp),
    MemberAccess(MemberAccessExp),
    IndexRange(IndexRangeExp),
}

/// Built-in functions whose availability depends on the TVM version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFun {
    TvmInitCodeHash,
    TvmCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    Builtin(BuiltinFun),
    Other,
}

#[derive(Debug, Clone)]
pub struct CallExp {
    pub loc: Loc,
    pub callee: Callee,
    pub is_await: bool,
}

/// Receiver shape of a member access. `Magic` carries the name of the
/// global magic identifier (`tvm`, `tx`, `msg`, `gosh`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    Magic(Symbol),
    Other,
}

#[derive(Debug, Clone)]
pub struct MemberAccessExp {
    pub loc: Loc,
    pub receiver: Receiver,
    pub member: Symbol,
}

/// An `a[l:r]` sub-range index expression with the resolved type of `a`.
#[derive(Debug, Clone)]
pub struct IndexRangeExp {
    pub loc: Loc,
    pub base_ty: Type,
}
