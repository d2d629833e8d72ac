// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query commands: simple queries and set queries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::{write_list, Constraint, DynamicOperand, SelectorName, Source};
use crate::error::Result;

/// A complete, plannable query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryCommand {
    Query(Query),
    SetQuery(SetQuery),
}

impl QueryCommand {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn orderings(&self) -> &[Ordering] {
        match self {
            QueryCommand::Query(query) => &query.orderings,
            QueryCommand::SetQuery(query) => &query.orderings,
        }
    }

    pub fn limits(&self) -> &Limit {
        match self {
            QueryCommand::Query(query) => &query.limits,
            QueryCommand::SetQuery(query) => &query.limits,
        }
    }
}

impl From<Query> for QueryCommand {
    fn from(query: Query) -> Self {
        QueryCommand::Query(query)
    }
}

impl From<SetQuery> for QueryCommand {
    fn from(query: SetQuery) -> Self {
        QueryCommand::SetQuery(query)
    }
}

impl fmt::Display for QueryCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryCommand::Query(query) => write!(f, "{}", query),
            QueryCommand::SetQuery(query) => write!(f, "{}", query),
        }
    }
}

/// `SELECT [DISTINCT] columns FROM source [WHERE constraint] [ORDER BY ...] [LIMIT ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
    /// Requested columns; empty means every column of every source
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub orderings: Vec<Ordering>,
    #[serde(default)]
    pub limits: Limit,
}

impl Query {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            constraint: None,
            columns: Vec::new(),
            distinct: false,
            orderings: Vec::new(),
            limits: Limit::default(),
        }
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    pub fn with_limits(mut self, limits: Limit) -> Self {
        self.limits = limits;
        self
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        if self.columns.is_empty() {
            f.write_str("*")?;
        } else {
            write_list(f, &self.columns)?;
        }
        write!(f, " FROM {}", self.source)?;
        if let Some(constraint) = &self.constraint {
            write!(f, " WHERE {}", constraint)?;
        }
        write_orderings_and_limits(f, &self.orderings, &self.limits)
    }
}

/// Two queries combined with UNION, INTERSECT or EXCEPT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetQuery {
    pub left: Box<QueryCommand>,
    pub right: Box<QueryCommand>,
    pub operation: SetOperation,
    /// Keep duplicate rows (`UNION ALL` and friends)
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub orderings: Vec<Ordering>,
    #[serde(default)]
    pub limits: Limit,
}

impl SetQuery {
    pub fn new(
        left: impl Into<QueryCommand>,
        operation: SetOperation,
        right: impl Into<QueryCommand>,
    ) -> Self {
        Self {
            left: Box::new(left.into()),
            right: Box::new(right.into()),
            operation,
            all: false,
            orderings: Vec::new(),
            limits: Limit::default(),
        }
    }

    pub fn all(mut self) -> Self {
        self.all = true;
        self
    }

    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    pub fn with_limits(mut self, limits: Limit) -> Self {
        self.limits = limits;
        self
    }
}

impl fmt::Display for SetQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.left, self.operation)?;
        if self.all {
            f.write_str(" ALL")?;
        }
        write!(f, " ({})", self.right)?;
        write_orderings_and_limits(f, &self.orderings, &self.limits)
    }
}

fn write_orderings_and_limits(
    f: &mut fmt::Formatter<'_>,
    orderings: &[Ordering],
    limits: &Limit,
) -> fmt::Result {
    if !orderings.is_empty() {
        f.write_str(" ORDER BY ")?;
        write_list(f, orderings)?;
    }
    if !limits.is_empty() {
        write!(f, " {}", limits)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOperation {
    Union,
    Intersect,
    Except,
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            SetOperation::Union => "UNION",
            SetOperation::Intersect => "INTERSECT",
            SetOperation::Except => "EXCEPT",
        };
        f.write_str(symbol)
    }
}

/// A projected column: `selector.property AS column_name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub selector: SelectorName,
    pub property: String,
    pub column_name: String,
}

impl Column {
    /// Property name that requests every column of the selector
    pub const ALL_PROPERTIES: &'static str = "*";

    pub fn new(selector: impl Into<SelectorName>, property: impl Into<String>) -> Self {
        let property = property.into();
        Self {
            selector: selector.into(),
            column_name: property.clone(),
            property,
        }
    }

    pub fn aliased(
        selector: impl Into<SelectorName>,
        property: impl Into<String>,
        column_name: impl Into<String>,
    ) -> Self {
        Self {
            selector: selector.into(),
            property: property.into(),
            column_name: column_name.into(),
        }
    }

    /// `selector.*`
    pub fn all_of(selector: impl Into<SelectorName>) -> Self {
        Self::new(selector, Self::ALL_PROPERTIES)
    }

    pub fn is_all_properties(&self) -> bool {
        self.property == Self::ALL_PROPERTIES
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.selector, self.property)?;
        if self.column_name != self.property {
            write!(f, " AS {}", self.column_name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    pub operand: DynamicOperand,
    #[serde(default)]
    pub order: Order,
}

impl Ordering {
    pub fn ascending(operand: DynamicOperand) -> Self {
        Self {
            operand,
            order: Order::Ascending,
        }
    }

    pub fn descending(operand: DynamicOperand) -> Self {
        Self {
            operand,
            order: Order::Descending,
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order {
            Order::Ascending => write!(f, "{} ASC", self.operand),
            Order::Descending => write!(f, "{} DESC", self.operand),
        }
    }
}

/// Row cap and offset of a query
///
/// `row_limit` is the maximum number of rows to return (`None` means no
/// cap); `offset` is the number of leading rows to skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Limit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

impl Limit {
    pub fn rows(row_limit: usize) -> Self {
        Self {
            row_limit: Some(row_limit),
            offset: 0,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn offset(offset: usize) -> Self {
        Self {
            row_limit: None,
            offset,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.row_limit.is_none()
    }

    pub fn is_offset(&self) -> bool {
        self.offset != 0
    }

    /// Neither a row cap nor an offset is in effect
    pub fn is_empty(&self) -> bool {
        self.is_unlimited() && !self.is_offset()
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        if let Some(rows) = self.row_limit {
            write!(f, "LIMIT {}", rows)?;
            wrote = true;
        }
        if self.is_offset() {
            if wrote {
                f.write_str(" ")?;
            }
            write!(f, "OFFSET {}", self.offset)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_emptiness() {
        assert!(Limit::default().is_empty());
        assert!(!Limit::rows(10).is_empty());
        assert!(!Limit::offset(5).is_empty());
        assert!(Limit::offset(0).is_empty());
    }

    #[test]
    fn test_query_display() {
        let query = Query::new(Source::aliased("nt:unstructured", "t1"))
            .with_columns(vec![Column::new("t1", "title")])
            .distinct()
            .order_by(Ordering::descending(DynamicOperand::property_value("t1", "title")))
            .with_limits(Limit::rows(10).with_offset(20));

        assert_eq!(
            query.to_string(),
            "SELECT DISTINCT t1.title FROM nt:unstructured AS t1 ORDER BY t1.title DESC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_query_from_json() {
        let json = r#"{
            "type": "query",
            "source": { "type": "selector", "name": "nt:base", "alias": "b" },
            "constraint": {
                "type": "comparison",
                "operand": { "type": "property_value", "selector": "b", "property": "jcr:title" },
                "operator": "like",
                "value": { "type": "literal", "value": "%draft%" }
            },
            "limits": { "row_limit": 5 }
        }"#;

        let command = QueryCommand::from_json_str(json).expect("valid query json");
        let QueryCommand::Query(query) = command else {
            panic!("expected a simple query");
        };
        assert_eq!(query.limits, Limit::rows(5));
        assert!(query.columns.is_empty());
        assert_eq!(
            query.constraint.map(|c| c.to_string()),
            Some("b.jcr:title LIKE '%draft%'".to_string())
        );
    }
}
