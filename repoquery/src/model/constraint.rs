// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Constraints (the WHERE clause) and the operands they compare

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{write_list, SelectorName};

/// A boolean criteria over the rows produced by the query's sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    And {
        left: Box<Constraint>,
        right: Box<Constraint>,
    },
    Or {
        left: Box<Constraint>,
        right: Box<Constraint>,
    },
    Not {
        constraint: Box<Constraint>,
    },
    Comparison {
        operand: DynamicOperand,
        operator: Operator,
        value: StaticOperand,
    },
    Between {
        operand: DynamicOperand,
        lower_bound: StaticOperand,
        upper_bound: StaticOperand,
        #[serde(default = "inclusive")]
        include_lower: bool,
        #[serde(default = "inclusive")]
        include_upper: bool,
    },
    /// `operand IN (values...)`
    SetCriteria {
        operand: DynamicOperand,
        values: Vec<StaticOperand>,
    },
    PropertyExistence {
        selector: SelectorName,
        property: String,
    },
    /// `CONTAINS(selector[.property], 'expression')`
    FullTextSearch {
        selector: SelectorName,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property: Option<String>,
        expression: String,
    },
    SameNode {
        selector: SelectorName,
        path: String,
    },
    ChildNode {
        selector: SelectorName,
        parent_path: String,
    },
    DescendantNode {
        selector: SelectorName,
        ancestor_path: String,
    },
}

fn inclusive() -> bool {
    true
}

impl Constraint {
    pub fn and(left: Constraint, right: Constraint) -> Self {
        Constraint::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Constraint, right: Constraint) -> Self {
        Constraint::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(constraint: Constraint) -> Self {
        Constraint::Not {
            constraint: Box::new(constraint),
        }
    }

    pub fn comparison(operand: DynamicOperand, operator: Operator, value: StaticOperand) -> Self {
        Constraint::Comparison {
            operand,
            operator,
            value,
        }
    }

    pub fn full_text_search(
        selector: impl Into<SelectorName>,
        property: Option<&str>,
        expression: impl Into<String>,
    ) -> Self {
        Constraint::FullTextSearch {
            selector: selector.into(),
            property: property.map(str::to_string),
            expression: expression.into(),
        }
    }

    /// Splits top-level AND conjunctions into the constraints that must all hold
    ///
    /// Given `(C1 AND C2) AND (C3 OR C4)` this yields `[C1, C2, (C3 OR C4)]`.
    /// Sibling order is preserved; any non-AND constraint is kept whole.
    pub fn conjuncts(&self) -> Vec<&Constraint> {
        let mut conjuncts = Vec::new();
        self.collect_conjuncts(&mut conjuncts);
        conjuncts
    }

    fn collect_conjuncts<'a>(&'a self, conjuncts: &mut Vec<&'a Constraint>) {
        match self {
            Constraint::And { left, right } => {
                left.collect_conjuncts(conjuncts);
                right.collect_conjuncts(conjuncts);
            }
            other => conjuncts.push(other),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::And { left, right } => write!(f, "({} AND {})", left, right),
            Constraint::Or { left, right } => write!(f, "({} OR {})", left, right),
            Constraint::Not { constraint } => write!(f, "NOT({})", constraint),
            Constraint::Comparison {
                operand,
                operator,
                value,
            } => write!(f, "{} {} {}", operand, operator, value),
            Constraint::Between {
                operand,
                lower_bound,
                upper_bound,
                include_lower,
                include_upper,
            } => {
                write!(f, "{} BETWEEN {}", operand, lower_bound)?;
                if !include_lower {
                    f.write_str(" EXCLUSIVE")?;
                }
                write!(f, " AND {}", upper_bound)?;
                if !include_upper {
                    f.write_str(" EXCLUSIVE")?;
                }
                Ok(())
            }
            Constraint::SetCriteria { operand, values } => {
                write!(f, "{} IN (", operand)?;
                write_list(f, values)?;
                f.write_str(")")
            }
            Constraint::PropertyExistence { selector, property } => {
                write!(f, "{}.{} IS NOT NULL", selector, property)
            }
            Constraint::FullTextSearch {
                selector,
                property,
                expression,
            } => match property {
                Some(property) => write!(f, "CONTAINS({}.{},'{}')", selector, property, expression),
                None => write!(f, "CONTAINS({},'{}')", selector, expression),
            },
            Constraint::SameNode { selector, path } => {
                write!(f, "ISSAMENODE({},'{}')", selector, path)
            }
            Constraint::ChildNode {
                selector,
                parent_path,
            } => write!(f, "ISCHILDNODE({},'{}')", selector, parent_path),
            Constraint::DescendantNode {
                selector,
                ancestor_path,
            } => write!(f, "ISDESCENDANTNODE({},'{}')", selector, ancestor_path),
        }
    }
}

/// A value computed from the row being evaluated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DynamicOperand {
    PropertyValue {
        selector: SelectorName,
        property: String,
    },
    Length {
        selector: SelectorName,
        property: String,
    },
    NodeName {
        selector: SelectorName,
    },
    NodeLocalName {
        selector: SelectorName,
    },
    NodeDepth {
        selector: SelectorName,
    },
    NodePath {
        selector: SelectorName,
    },
    FullTextSearchScore {
        selector: SelectorName,
    },
    ReferenceValue {
        selector: SelectorName,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property: Option<String>,
    },
    LowerCase {
        operand: Box<DynamicOperand>,
    },
    UpperCase {
        operand: Box<DynamicOperand>,
    },
    Arithmetic {
        left: Box<DynamicOperand>,
        operator: ArithmeticOperator,
        right: Box<DynamicOperand>,
    },
}

impl DynamicOperand {
    pub fn property_value(selector: impl Into<SelectorName>, property: impl Into<String>) -> Self {
        DynamicOperand::PropertyValue {
            selector: selector.into(),
            property: property.into(),
        }
    }

    pub fn node_path(selector: impl Into<SelectorName>) -> Self {
        DynamicOperand::NodePath {
            selector: selector.into(),
        }
    }

    pub fn node_depth(selector: impl Into<SelectorName>) -> Self {
        DynamicOperand::NodeDepth {
            selector: selector.into(),
        }
    }

    pub fn full_text_search_score(selector: impl Into<SelectorName>) -> Self {
        DynamicOperand::FullTextSearchScore {
            selector: selector.into(),
        }
    }
}

impl fmt::Display for DynamicOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicOperand::PropertyValue { selector, property } => {
                write!(f, "{}.{}", selector, property)
            }
            DynamicOperand::Length { selector, property } => {
                write!(f, "LENGTH({}.{})", selector, property)
            }
            DynamicOperand::NodeName { selector } => write!(f, "NAME({})", selector),
            DynamicOperand::NodeLocalName { selector } => write!(f, "LOCALNAME({})", selector),
            DynamicOperand::NodeDepth { selector } => write!(f, "DEPTH({})", selector),
            DynamicOperand::NodePath { selector } => write!(f, "PATH({})", selector),
            DynamicOperand::FullTextSearchScore { selector } => write!(f, "SCORE({})", selector),
            DynamicOperand::ReferenceValue {
                selector,
                property: Some(property),
            } => write!(f, "REFERENCE({}.{})", selector, property),
            DynamicOperand::ReferenceValue {
                selector,
                property: None,
            } => write!(f, "REFERENCE({})", selector),
            DynamicOperand::LowerCase { operand } => write!(f, "LOWER({})", operand),
            DynamicOperand::UpperCase { operand } => write!(f, "UPPER({})", operand),
            DynamicOperand::Arithmetic {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    EqualTo,
    NotEqualTo,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Like,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::EqualTo => "=",
            Operator::NotEqualTo => "!=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqualTo => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqualTo => ">=",
            Operator::Like => "LIKE",
        };
        f.write_str(symbol)
    }
}

/// A value fixed before evaluation starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StaticOperand {
    Literal { value: Literal },
    BindVariable { name: String },
}

impl StaticOperand {
    pub fn literal(value: impl Into<Literal>) -> Self {
        StaticOperand::Literal {
            value: value.into(),
        }
    }

    pub fn bind_variable(name: impl Into<String>) -> Self {
        StaticOperand::BindVariable { name: name.into() }
    }
}

impl fmt::Display for StaticOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaticOperand::Literal { value } => write!(f, "{}", value),
            StaticOperand::BindVariable { name } => write!(f, "${}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Boolean(bool),
    Long(i64),
    Double(f64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(value) => write!(f, "{}", value),
            Literal::Long(value) => write!(f, "{}", value),
            Literal::Double(value) => write!(f, "{}", value),
            Literal::String(value) => write!(f, "'{}'", value.replace('\'', "''")),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Long(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Long(i64::from(value))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Double(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}
