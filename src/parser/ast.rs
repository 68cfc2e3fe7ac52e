//! Abstract Syntax Tree definitions for Hanami.
//!
//! Every node serializes to a `node_type`-tagged record so that the tree
//! can cross the pipeline boundary as JSON and be fed back into the
//! semantic analyzer unchanged. Enumerated fields (operators, visibility,
//! io channel/direction) serialize as their canonical keyword strings.

use serde::{Deserialize, Serialize};

/// The root of the AST - a complete program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type")]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A brace-delimited statement sequence used as a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type")]
pub struct Block {
    pub statements: Vec<Stmt>,
}

/// One visibility-labeled member section of a species declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type")]
pub struct VisibilityBlock {
    pub visibility: Visibility,
    pub statements: Vec<Stmt>,
}

/// Member visibility inside a species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Open,
    Hidden,
    Guarded,
}

impl Visibility {
    pub fn keyword(&self) -> &'static str {
        match self {
            Visibility::Open => "open",
            Visibility::Hidden => "hidden",
            Visibility::Guarded => "guarded",
        }
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub type_name: String,
    pub param_name: String,
}

/// One arm of a branch statement; the final `else` arm has no condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchArm {
    #[serde(default)]
    pub condition: Option<Expr>,
    pub body: Block,
}

/// Which stream a channel statement talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IoChannel {
    #[serde(rename = "bloom")]
    Write,
    #[serde(rename = "water")]
    Read,
}

/// Which way the chained stream operator points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IoDirection {
    #[serde(rename = "<<")]
    Out,
    #[serde(rename = ">>")]
    In,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all_fields = "camelCase")]
pub enum Stmt {
    /// `style <path>` import directive
    ImportDirective { path: String },

    /// `garden Name` namespace declaration
    NamespaceDecl { name: String },

    /// `species Name { open: ... hidden: ... }` record declaration
    RecordDecl {
        name: String,
        sections: Vec<VisibilityBlock>,
    },

    /// Free-standing block statement
    Block { statements: Vec<Stmt> },

    /// `type name = init;` variable declaration
    VarDecl {
        type_name: String,
        var_name: String,
        #[serde(default)]
        initializer: Option<Expr>,
    },

    /// `grow name(params) -> type { ... }` function declaration
    FunctionDecl {
        name: String,
        return_type: String,
        parameters: Vec<Parameter>,
        body: Block,
    },

    /// `blossom value?;`
    Return {
        #[serde(default)]
        value: Option<Expr>,
    },

    /// Expression in statement position
    ExprStmt { expression: Expr },

    /// `branch (c) { } else branch (c) { } else { }` as a flat arm list
    Branch { arms: Vec<BranchArm> },

    /// `bloom << e << e;` / `water >> v;`
    Io {
        channel: IoChannel,
        direction: IoDirection,
        expressions: Vec<Expr>,
    },

    /// `while (condition) { ... }`
    While { condition: Expr, body: Block },

    /// `for (init; condition; increment) { ... }`
    For {
        #[serde(default)]
        init: Option<Box<Stmt>>,
        #[serde(default)]
        condition: Option<Expr>,
        #[serde(default)]
        increment: Option<Expr>,
        body: Block,
    },
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all_fields = "camelCase")]
pub enum Expr {
    Identifier {
        name: String,
    },

    /// Integer literal; the value keeps its source spelling
    NumberLiteral {
        value: String,
    },

    FloatLiteral {
        value: String,
    },

    DoubleLiteral {
        value: String,
    },

    StringLiteral {
        value: String,
    },

    BooleanLiteral {
        value: bool,
    },

    BinaryOp {
        #[serde(rename = "operator")]
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    FunctionCall {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },

    /// `object.member` - the member is always a plain identifier
    MemberAccess {
        object: Box<Expr>,
        member: String,
    },

    /// Assignment is an expression; the left side is constrained to an
    /// assignable target (`Identifier` or `MemberAccess`) at parse time
    Assignment {
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Whether this expression may appear on the left of `=` or as a
    /// `water >>` read target
    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::Identifier { .. } | Expr::MemberAccess { .. })
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_serialize_with_node_type_tags() {
        let expr = Expr::BinaryOp {
            op: BinaryOp::Add,
            left: Box::new(Expr::NumberLiteral {
                value: "1".to_string(),
            }),
            right: Box::new(Expr::Identifier {
                name: "x".to_string(),
            }),
        };

        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["node_type"], "BinaryOp");
        assert_eq!(json["operator"], "+");
        assert_eq!(json["left"]["node_type"], "NumberLiteral");
        assert_eq!(json["right"]["name"], "x");
    }

    #[test]
    fn absent_optionals_serialize_as_null() {
        let stmt = Stmt::VarDecl {
            type_name: "int".to_string(),
            var_name: "x".to_string(),
            initializer: None,
        };

        let json = serde_json::to_value(&stmt).unwrap();
        assert_eq!(json["node_type"], "VarDecl");
        assert_eq!(json["typeName"], "int");
        assert!(json["initializer"].is_null());
    }

    #[test]
    fn enumerated_fields_use_keyword_strings() {
        let stmt = Stmt::Io {
            channel: IoChannel::Write,
            direction: IoDirection::Out,
            expressions: vec![Expr::StringLiteral {
                value: "hi".to_string(),
            }],
        };

        let json = serde_json::to_value(&stmt).unwrap();
        assert_eq!(json["channel"], "bloom");
        assert_eq!(json["direction"], "<<");

        let section = VisibilityBlock {
            visibility: Visibility::Guarded,
            statements: vec![],
        };
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["visibility"], "guarded");
    }

    #[test]
    fn program_round_trips_through_json() {
        let program = Program {
            statements: vec![
                Stmt::NamespaceDecl {
                    name: "Meadow".to_string(),
                },
                Stmt::FunctionDecl {
                    name: "main".to_string(),
                    return_type: "int".to_string(),
                    parameters: vec![],
                    body: Block {
                        statements: vec![Stmt::Return {
                            value: Some(Expr::NumberLiteral {
                                value: "0".to_string(),
                            }),
                        }],
                    },
                },
            ],
        };

        let json = serde_json::to_string(&program).unwrap();
        let back: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(program, back);
    }
}
