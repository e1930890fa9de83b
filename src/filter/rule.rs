use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::property::{ColumnKind, Property, column, parse_float, value_number, value_text};

/// A comparison a rule applies between a column value and the rule value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")] Eq,
    #[serde(rename = ">")] Gt,
    #[serde(rename = ">=")] Ge,
    #[serde(rename = "<")] Lt,
    #[serde(rename = "<=")] Le,
    #[serde(rename = "contains")] Contains,
    #[serde(rename = "starts with", alias = "starts-with")] StartsWith,
    #[serde(rename = "ends with", alias = "ends-with")] EndsWith,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Contains => "contains",
            Self::StartsWith => "starts with",
            Self::EndsWith => "ends with",
        }
    }

    /// The column kind this operator is defined for.
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Eq | Self::Gt | Self::Ge | Self::Lt | Self::Le => ColumnKind::Numeric,
            Self::Contains | Self::StartsWith | Self::EndsWith => ColumnKind::Text,
        }
    }

    /// Operators offered for a column kind.
    pub fn for_kind(kind: ColumnKind) -> &'static [Operator] {
        match kind {
            ColumnKind::Numeric => &[Self::Eq, Self::Gt, Self::Ge, Self::Lt, Self::Le],
            ColumnKind::Text => &[Self::Contains, Self::StartsWith, Self::EndsWith],
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.symbol()) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    #[error("expected `column:operator:value`, got {0:?}")]
    Shape(String),
    #[error("unknown operator {0:?}")]
    Operator(String),
    #[error("unknown combine mode {0:?} (expected `and` or `or`)")]
    Combine(String),
}

impl FromStr for Operator {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "=" | "==" | "eq" => Self::Eq,
            ">" | "gt" => Self::Gt,
            ">=" | "ge" => Self::Ge,
            "<" | "lt" => Self::Lt,
            "<=" | "le" => Self::Le,
            "contains" => Self::Contains,
            "starts with" | "starts-with" | "starts_with" => Self::StartsWith,
            "ends with" | "ends-with" | "ends_with" => Self::EndsWith,
            other => return Err(RuleParseError::Operator(other.to_string())),
        })
    }
}

/// One column predicate, e.g. `total_area > 100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    pub column: String,
    pub operator: Operator,
    pub value: String,
}

impl FilterRule {
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self { column: column.into(), operator, value: value.into() }
    }

    /// A rule is evaluated only if its value is non-blank, its column is in
    /// the catalog, and its operator matches the column's kind.
    pub fn is_valid(&self) -> bool {
        !self.value.trim().is_empty()
            && column(&self.column).is_some_and(|col| col.kind == self.operator.kind())
    }

    /// Evaluate against one record. Missing values read as `0` or `""`.
    pub fn eval(&self, property: &Property) -> bool {
        let raw = property.attr(&self.column);
        let value = self.value.trim();

        match self.operator.kind() {
            ColumnKind::Numeric => {
                let lhs = raw.and_then(value_number).filter(|v| !v.is_nan()).unwrap_or(0.0);
                let rhs = parse_float(value).unwrap_or(0.0);
                match self.operator {
                    Operator::Eq => lhs == rhs,
                    Operator::Gt => lhs > rhs,
                    Operator::Ge => lhs >= rhs,
                    Operator::Lt => lhs < rhs,
                    Operator::Le => lhs <= rhs,
                    _ => false,
                }
            }
            ColumnKind::Text => {
                let lhs = raw.and_then(value_text).unwrap_or_default().to_lowercase();
                let rhs = value.to_lowercase();
                match self.operator {
                    Operator::Contains => lhs.contains(&rhs),
                    Operator::StartsWith => lhs.starts_with(&rhs),
                    Operator::EndsWith => lhs.ends_with(&rhs),
                    _ => false,
                }
            }
        }
    }
}

impl FromStr for FilterRule {
    type Err = RuleParseError;

    /// Parse `column:operator:value`; the value may itself contain colons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(column), Some(op), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(RuleParseError::Shape(s.to_string()));
        };
        if column.trim().is_empty() {
            return Err(RuleParseError::Shape(s.to_string()));
        }
        Ok(Self::new(column.trim(), op.parse()?, value))
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}

/// How rule results combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineOp {
    #[default]
    And,
    Or,
}

impl FromStr for CombineOp {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            other => Err(RuleParseError::Combine(other.to_string())),
        }
    }
}

/// The active rule list and its combine mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<FilterRule>,
    #[serde(default)]
    pub combine: CombineOp,
}

impl RuleSet {
    pub fn new(rules: Vec<FilterRule>, combine: CombineOp) -> Self { Self { rules, combine } }

    #[inline] pub fn push(&mut self, rule: FilterRule) { self.rules.push(rule) }
    #[inline] pub fn clear(&mut self) { self.rules.clear() }
    #[inline] pub fn len(&self) -> usize { self.rules.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.rules.is_empty() }

    /// Remove the rule at `idx`, if any.
    pub fn remove(&mut self, idx: usize) -> Option<FilterRule> {
        (idx < self.rules.len()).then(|| self.rules.remove(idx))
    }

    /// Rules that take part in evaluation.
    pub fn effective(&self) -> impl Iterator<Item = &FilterRule> {
        self.rules.iter().filter(|rule| rule.is_valid())
    }

    /// True if no rule would be evaluated.
    pub fn is_inert(&self) -> bool { self.effective().next().is_none() }

    /// AND: every effective rule holds; OR: at least one does.
    /// With no effective rules every record matches.
    pub fn matches(&self, property: &Property) -> bool {
        if self.is_inert() { return true }
        match self.combine {
            CombineOp::And => self.effective().all(|rule| rule.eval(property)),
            CombineOp::Or => self.effective().any(|rule| rule.eval(property)),
        }
    }
}
