/*!
The minimal typed surface a caller hands the translator: signatures, fields,
facts, predicates, assertions, and commands (spec §6's "AST/SymbolTable
interface"). Parsing a textual model into these types is out of scope;
callers (or tests) construct them directly, mirroring how the bare SAT
engine is driven by direct clause construction rather than a file format.
*/

use serde::{Deserialize, Serialize};

/// A relational multiplicity constraint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Multiplicity {
    Lone,
    One,
    Some,
    Set,
}

/// One column of a field's type, beyond the declaring signature: the
/// multiplicity that column is constrained to, and the signature it ranges over.
#[derive(Clone, Debug)]
pub struct TypeColumn {
    pub multiplicity: Multiplicity,
    pub signature: String,
}

/// A field declaration: `name: <columns> -> ... -> <columns>`.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub name: String,
    pub columns: Vec<TypeColumn>,
    pub is_variable: bool,
}

/// A signature declaration.
#[derive(Clone, Debug)]
pub struct SigDecl {
    pub name: String,
    pub multiplicity: Option<Multiplicity>,
    pub is_abstract: bool,
    /// `extends` parent, if any.
    pub parent: Option<String>,
    /// `in A + B` subset parents, if any (mutually exclusive with `parent`).
    pub subset_parents: Vec<String>,
    pub fields: Vec<FieldDecl>,
}

/// A relation-valued expression.
#[derive(Clone, Debug)]
pub enum Expr {
    SigRef(String),
    FieldRef(String),
    /// A reference to a quantified or comprehension-bound variable.
    VarRef(String),
    Union(Box<Expr>, Box<Expr>),
    Intersection(Box<Expr>, Box<Expr>),
    Difference(Box<Expr>, Box<Expr>),
    Override(Box<Expr>, Box<Expr>),
    Join(Box<Expr>, Box<Expr>),
    Product(Box<Expr>, Box<Expr>),
    Transpose(Box<Expr>),
    Closure(Box<Expr>),
    ReflexiveClosure(Box<Expr>),
    /// `r'`: the value of a (necessarily variable) relation at the next state.
    Prime(Box<Expr>),
    /// `{ decls | F }`, materializing a new relation.
    Comprehension {
        decls: Vec<(String, String)>,
        body: Box<Formula>,
    },
}

/// An integer-valued expression.
#[derive(Clone, Debug)]
pub enum IntExpr {
    Literal(i64),
    Cardinality(Box<Expr>),
    Plus(Box<IntExpr>, Box<IntExpr>),
    Minus(Box<IntExpr>, Box<IntExpr>),
    Mul(Box<IntExpr>, Box<IntExpr>),
    Div(Box<IntExpr>, Box<IntExpr>),
    Rem(Box<IntExpr>, Box<IntExpr>),
    Shl(Box<IntExpr>, Box<IntExpr>),
    Shr(Box<IntExpr>, Box<IntExpr>),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IntCmpOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuantifierKind {
    All,
    Some,
    No,
    One,
    Lone,
}

/// A boolean-valued formula, including the nine LTL temporal operators.
#[derive(Clone, Debug)]
pub enum Formula {
    True,
    False,
    Equals(Expr, Expr),
    Subset(Expr, Expr),
    Empty(Expr),
    NonEmpty(Expr),
    IntCompare(IntCmpOp, IntExpr, IntExpr),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
    Quantifier {
        kind: QuantifierKind,
        /// `(bound variable name, range signature)` pairs.
        decls: Vec<(String, String)>,
        body: Box<Formula>,
    },
    PredicateCall(String, Vec<Expr>),
    Always(Box<Formula>),
    Eventually(Box<Formula>),
    Until(Box<Formula>, Box<Formula>),
    Releases(Box<Formula>, Box<Formula>),
    Before(Box<Formula>),
    Historically(Box<Formula>),
    Once(Box<Formula>),
    Since(Box<Formula>, Box<Formula>),
    Triggered(Box<Formula>, Box<Formula>),
}

#[derive(Clone, Debug)]
pub struct PredicateDecl {
    pub name: String,
    /// `(parameter name, range signature)` pairs.
    pub params: Vec<(String, String)>,
    pub body: Formula,
}

#[derive(Clone, Debug)]
pub struct AssertionDecl {
    pub name: String,
    pub body: Formula,
}

#[derive(Clone, Debug)]
pub struct FactDecl {
    pub body: Formula,
}

/// One entry of a command's type scope map: `exactly? count Signature`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeScope {
    pub is_exactly: bool,
    pub count: usize,
    pub signature_name: String,
}

/// A command's scope, reproduced as the solver's configuration input (spec §6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommandScope {
    pub default_scope: Option<usize>,
    pub type_scopes: Vec<TypeScope>,
    pub steps: Option<usize>,
    pub expect: Option<u8>,
    pub int_bits: usize,
}

impl Default for CommandScope {
    fn default() -> Self {
        CommandScope {
            default_scope: Some(3),
            type_scopes: Vec::new(),
            steps: Some(10),
            expect: None,
            int_bits: 4,
        }
    }
}

/// What a command asks the solver to do.
#[derive(Clone, Debug)]
pub enum CommandTarget {
    /// `run <predicate>`; `None` runs with no body beyond the model's facts.
    Run(Option<String>),
    /// `check <assertion>`.
    Check(String),
}

#[derive(Clone, Debug)]
pub struct Command {
    pub name: String,
    pub target: CommandTarget,
    pub scope: CommandScope,
}

/// Everything the translator needs from semantic analysis of one model.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    pub signatures: Vec<SigDecl>,
    pub facts: Vec<FactDecl>,
    pub predicates: Vec<PredicateDecl>,
    pub assertions: Vec<AssertionDecl>,
    pub commands: Vec<Command>,
}

impl SymbolTable {
    pub fn signature(&self, name: &str) -> Option<&SigDecl> {
        self.signatures.iter().find(|s| s.name == name)
    }

    pub fn predicate(&self, name: &str) -> Option<&PredicateDecl> {
        self.predicates.iter().find(|p| p.name == name)
    }

    pub fn assertion(&self, name: &str) -> Option<&AssertionDecl> {
        self.assertions.iter().find(|a| a.name == name)
    }
}
