//! Read-only program model consumed by the legality checker. The model is
//! populated once from the already type-checked AST; the checker only
//! queries it and appends diagnostics.

use codespan::{FileId, Files, Span};
use codespan_reporting::{
    diagnostic::{Diagnostic, Label, Severity},
    term,
    term::termcolor::WriteColor,
};
use std::cell::RefCell;

use crate::ast::{Exp, MappingNode, PragmaDirective};
use crate::symbol::Symbol;
use crate::ty::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContractId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StructId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnumId(usize);

/// A location in a source file managed by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loc {
    file_id: FileId,
    span: Span,
}

impl Loc {
    pub fn new(file_id: FileId, span: Span) -> Self {
        Loc { file_id, span }
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Visibility {
    External,
    Public,
    Internal,
    Private,
}

impl Visibility {
    /// Public and external functions are both reachable from outside the
    /// contract and share the VM entry-point dispatch path.
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::External | Visibility::Public)
    }
}

/// A named, typed parameter or return value.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: Symbol,
    pub ty: Type,
    pub loc: Loc,
}

impl Parameter {
    pub fn new(name: &str, ty: Type, loc: Loc) -> Self {
        Parameter {
            name: Symbol::new(name),
            ty,
            loc,
        }
    }
}

/// A state variable declaration.
#[derive(Debug, Clone)]
pub struct VariableData {
    pub name: Symbol,
    pub ty: Type,
    pub loc: Loc,
}

impl VariableData {
    pub fn new(name: &str, ty: Type, loc: Loc) -> Self {
        VariableData {
            name: Symbol::new(name),
            ty,
            loc,
        }
    }
}

/// Signature and body view of a function, immutable once added to the
/// environment. Override edges (`base_functions`) are recorded by the
/// upstream override resolver, not recomputed here.
#[derive(Debug, Clone)]
pub struct FunctionData {
    pub name: Symbol,
    pub loc: Loc,
    pub visibility: Visibility,
    pub params: Vec<Parameter>,
    pub returns: Vec<Parameter>,
    /// Explicit dispatch id from a `functionID(...)` header, if any.
    pub function_id: Option<u32>,
    pub is_constructor: bool,
    pub is_receive: bool,
    pub is_fallback: bool,
    pub is_on_tick_tock: bool,
    pub is_on_bounce: bool,
    pub is_responsible: bool,
    pub is_internal_msg: bool,
    pub is_external_msg: bool,
    pub is_inline: bool,
    /// Directly overridden functions in base contracts.
    pub base_functions: Vec<FunId>,
    /// Body expressions in source order, restricted to the shapes the
    /// checker inspects.
    pub body: Vec<Exp>,
}

impl FunctionData {
    pub fn new(name: &str, loc: Loc) -> Self {
        FunctionData {
            name: Symbol::new(name),
            loc,
            visibility: Visibility::Internal,
            params: vec![],
            returns: vec![],
            function_id: None,
            is_constructor: false,
            is_receive: false,
            is_fallback: false,
            is_on_tick_tock: false,
            is_on_bounce: false,
            is_responsible: false,
            is_internal_msg: false,
            is_external_msg: false,
            is_inline: false,
            base_functions: vec![],
            body: vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldData {
    pub name: Symbol,
    pub ty: Type,
    pub loc: Loc,
}

impl FieldData {
    pub fn new(name: &str, ty: Type, loc: Loc) -> Self {
        FieldData {
            name: Symbol::new(name),
            ty,
            loc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StructData {
    pub name: Symbol,
    pub loc: Loc,
    pub fields: Vec<FieldData>,
}

impl StructData {
    pub fn new(name: &str, loc: Loc, fields: Vec<FieldData>) -> Self {
        StructData {
            name: Symbol::new(name),
            loc,
            fields,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnumData {
    pub name: Symbol,
    pub loc: Loc,
    pub variants: Vec<Symbol>,
}

impl EnumData {
    pub fn new(name: &str, loc: Loc, variants: &[&str]) -> Self {
        EnumData {
            name: Symbol::new(name),
            loc,
            variants: variants.iter().map(|v| Symbol::new(*v)).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContractData {
    pub name: Symbol,
    pub loc: Loc,
    /// Directly declared functions, in declaration order.
    pub functions: Vec<FunId>,
    pub state_variables: Vec<VariableData>,
    /// Mapping type occurrences declared in this contract.
    pub mappings: Vec<MappingNode>,
    /// Linearized inheritance chain, most-derived first, starting with the
    /// contract itself. Each contract appears exactly once.
    pub linearized_base_contracts: Vec<ContractId>,
}

impl ContractData {
    /// `bases` is the linearization of the parents, most-derived first and
    /// excluding the new contract; the environment prepends the contract
    /// itself on registration.
    pub fn new(name: &str, loc: Loc, bases: Vec<ContractId>) -> Self {
        ContractData {
            name: Symbol::new(name),
            loc,
            functions: vec![],
            state_variables: vec![],
            mappings: vec![],
            linearized_base_contracts: bases,
        }
    }
}

/// Global environment owning all program entities, source files, and the
/// accumulated diagnostics.
#[derive(Debug)]
pub struct GlobalEnv {
    source_files: Files<String>,
    unknown_loc: Loc,
    pragmas: Vec<PragmaDirective>,
    contracts: Vec<ContractData>,
    funs: Vec<FunctionData>,
    structs: Vec<StructData>,
    enums: Vec<EnumData>,
    diags: RefCell<Vec<Diagnostic<FileId>>>,
}

impl GlobalEnv {
    pub fn new() -> Self {
        let mut source_files = Files::new();
        let file_id = source_files.add("<unknown>", String::new());
        GlobalEnv {
            source_files,
            unknown_loc: Loc::new(file_id, Span::initial()),
            pragmas: vec![],
            contracts: vec![],
            funs: vec![],
            structs: vec![],
            enums: vec![],
            diags: RefCell::new(vec![]),
        }
    }

    pub fn add_source(&mut self, file_name: &str, source: &str) -> FileId {
        self.source_files.add(file_name, source.to_string())
    }

    pub fn unknown_loc(&self) -> Loc {
        self.unknown_loc
    }

    // ------------------------------------------------------------------
    // Model construction

    pub fn add_pragma(&mut self, pragma: PragmaDirective) {
        self.pragmas.push(pragma);
    }

    pub fn add_struct(&mut self, data: StructData) -> StructId {
        let id = StructId(self.structs.len());
        self.structs.push(data);
        id
    }

    pub fn add_enum(&mut self, data: EnumData) -> EnumId {
        let id = EnumId(self.enums.len());
        self.enums.push(data);
        id
    }

    pub fn add_contract(&mut self, mut data: ContractData) -> ContractId {
        let id = ContractId(self.contracts.len());
        data.linearized_base_contracts.insert(0, id);
        self.contracts.push(data);
        id
    }

    pub fn add_function(&mut self, contract_id: ContractId, data: FunctionData) -> FunId {
        let id = FunId(self.funs.len());
        self.funs.push(data);
        self.contracts[contract_id.0].functions.push(id);
        id
    }

    // ------------------------------------------------------------------
    // Queries

    pub fn pragmas(&self) -> &[PragmaDirective] {
        &self.pragmas
    }

    pub fn get_contracts(&self) -> impl Iterator<Item = ContractEnv<'_>> {
        (0..self.contracts.len()).map(move |idx| self.get_contract(ContractId(idx)))
    }

    pub fn get_contract(&self, id: ContractId) -> ContractEnv<'_> {
        ContractEnv {
            env: self,
            id,
            data: &self.contracts[id.0],
        }
    }

    pub fn get_function(&self, id: FunId) -> FunctionEnv<'_> {
        FunctionEnv {
            env: self,
            id,
            data: &self.funs[id.0],
        }
    }

    pub fn get_struct(&self, id: StructId) -> StructEnv<'_> {
        StructEnv {
            env: self,
            id,
            data: &self.structs[id.0],
        }
    }

    pub fn get_enum(&self, id: EnumId) -> EnumEnv<'_> {
        EnumEnv {
            env: self,
            id,
            data: &self.enums[id.0],
        }
    }

    // ------------------------------------------------------------------
    // Diagnostics

    /// Adds a diagnostic of the given severity. This never interrupts
    /// processing; the caller decides at the end of a run whether the
    /// accumulated errors are fatal.
    pub fn diag(&self, severity: Severity, loc: &Loc, msg: &str) {
        self.diag_with_labels(severity, loc, msg, vec![])
    }

    /// Adds a diagnostic with secondary labels.
    pub fn diag_with_labels(
        &self,
        severity: Severity,
        loc: &Loc,
        msg: &str,
        labels: Vec<(Loc, String)>,
    ) {
        let mut all_labels = vec![Label::primary(loc.file_id, loc.span)];
        all_labels.extend(
            labels
                .into_iter()
                .map(|(loc, msg)| Label::secondary(loc.file_id, loc.span).with_message(msg)),
        );
        let diag = Diagnostic::new(severity)
            .with_message(msg)
            .with_labels(all_labels);
        self.diags.borrow_mut().push(diag);
    }

    pub fn error(&self, loc: &Loc, msg: &str) {
        self.diag(Severity::Error, loc, msg)
    }

    pub fn error_with_labels(&self, loc: &Loc, msg: &str, labels: Vec<(Loc, String)>) {
        self.diag_with_labels(Severity::Error, loc, msg, labels)
    }

    pub fn diag_count(&self, min_severity: Severity) -> usize {
        self.diags
            .borrow()
            .iter()
            .filter(|d| d.severity >= min_severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.diag_count(Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Writes accumulated diagnostics of at least `severity` to the given
    /// writer.
    pub fn report_diag<W: WriteColor>(&self, writer: &mut W, severity: Severity) {
        for diag in self
            .diags
            .borrow()
            .iter()
            .filter(|d| d.severity >= severity)
        {
            term::emit(writer, &term::Config::default(), &self.source_files, diag)
                .expect("emit must not fail");
        }
    }
}

impl Default for GlobalEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed view of a contract.
#[derive(Clone)]
pub struct ContractEnv<'env> {
    pub env: &'env GlobalEnv,
    id: ContractId,
    data: &'env ContractData,
}

impl<'env> ContractEnv<'env> {
    pub fn get_id(&self) -> ContractId {
        self.id
    }

    pub fn get_name(&self) -> Symbol {
        self.data.name.clone()
    }

    pub fn get_loc(&self) -> Loc {
        self.data.loc
    }

    /// Directly declared functions, in declaration order.
    pub fn get_functions(&self) -> impl Iterator<Item = FunctionEnv<'env>> + '_ {
        let env = self.env;
        self.data.functions.iter().map(move |id| env.get_function(*id))
    }

    pub fn state_variables(&self) -> &'env [VariableData] {
        &self.data.state_variables
    }

    pub fn mappings(&self) -> &'env [MappingNode] {
        &self.data.mappings
    }

    /// Linearized inheritance chain, most-derived first, self included.
    pub fn linearized_base_contracts(&self) -> &'env [ContractId] {
        &self.data.linearized_base_contracts
    }
}

/// Borrowed view of a function.
#[derive(Clone)]
pub struct FunctionEnv<'env> {
    pub env: &'env GlobalEnv,
    id: FunId,
    data: &'env FunctionData,
}

impl<'env> FunctionEnv<'env> {
    pub fn get_id(&self) -> FunId {
        self.id
    }

    pub fn get_name(&self) -> Symbol {
        self.data.name.clone()
    }

    pub fn get_name_str(&self) -> &'env str {
        self.data.name.as_str()
    }

    pub fn get_loc(&self) -> Loc {
        self.data.loc
    }

    pub fn visibility(&self) -> Visibility {
        self.data.visibility
    }

    pub fn is_public(&self) -> bool {
        self.data.visibility.is_public()
    }

    pub fn get_parameters(&self) -> &'env [Parameter] {
        &self.data.params
    }

    pub fn get_returns(&self) -> &'env [Parameter] {
        &self.data.returns
    }

    pub fn function_id(&self) -> Option<u32> {
        self.data.function_id
    }

    pub fn get_base_functions(&self) -> &'env [FunId] {
        &self.data.base_functions
    }

    pub fn body(&self) -> &'env [Exp] {
        &self.data.body
    }

    pub fn is_constructor(&self) -> bool {
        self.data.is_constructor
    }

    pub fn is_receive(&self) -> bool {
        self.data.is_receive
    }

    pub fn is_fallback(&self) -> bool {
        self.data.is_fallback
    }

    pub fn is_on_tick_tock(&self) -> bool {
        self.data.is_on_tick_tock
    }

    pub fn is_on_bounce(&self) -> bool {
        self.data.is_on_bounce
    }

    pub fn is_responsible(&self) -> bool {
        self.data.is_responsible
    }

    pub fn is_internal_msg(&self) -> bool {
        self.data.is_internal_msg
    }

    pub fn is_external_msg(&self) -> bool {
        self.data.is_external_msg
    }

    pub fn is_inline(&self) -> bool {
        self.data.is_inline
    }
}

/// Borrowed view of a struct definition.
#[derive(Clone)]
pub struct StructEnv<'env> {
    pub env: &'env GlobalEnv,
    id: StructId,
    data: &'env StructData,
}

impl<'env> StructEnv<'env> {
    pub fn get_id(&self) -> StructId {
        self.id
    }

    pub fn get_name(&self) -> Symbol {
        self.data.name.clone()
    }

    pub fn get_loc(&self) -> Loc {
        self.data.loc
    }

    pub fn fields(&self) -> &'env [FieldData] {
        &self.data.fields
    }
}

/// Borrowed view of an enum definition.
#[derive(Clone)]
pub struct EnumEnv<'env> {
    pub env: &'env GlobalEnv,
    id: EnumId,
    data: &'env EnumData,
}

impl<'env> EnumEnv<'env> {
    pub fn get_id(&self) -> EnumId {
        self.id
    }

    pub fn get_name(&self) -> Symbol {
        self.data.name.clone()
    }

    pub fn variant_count(&self) -> usize {
        self.data.variants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::term::termcolor::Buffer;

    #[test]
    fn diagnostics_accumulate_without_halting() {
        let mut env = GlobalEnv::new();
        let file_id = env.add_source("test.sol", "contract C {}\n");
        let loc = Loc::new(file_id, Span::new(0, 8));

        env.error(&loc, "first problem");
        env.error_with_labels(
            &loc,
            "second problem",
            vec![(loc, "related declaration".to_string())],
        );
        assert_eq!(env.error_count(), 2);
        assert!(env.has_errors());

        let mut buffer = Buffer::no_color();
        env.report_diag(&mut buffer, Severity::Error);
        let out = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(out.contains("first problem"));
        assert!(out.contains("second problem"));
        assert!(out.contains("related declaration"));
    }

    #[test]
    fn contract_linearization_includes_self_first() {
        let mut env = GlobalEnv::new();
        let loc = env.unknown_loc();
        let a = env.add_contract(ContractData::new("A", loc, vec![]));
        let b = env.add_contract(ContractData::new("B", loc, vec![a]));
        assert_eq!(env.get_contract(a).linearized_base_contracts(), &[a]);
        assert_eq!(env.get_contract(b).linearized_base_contracts(), &[b, a]);
    }
}
