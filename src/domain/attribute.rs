//! Tri-state attribute slots
//!
//! Every declared attribute of a node lives in an [`AttributeSlot`]. A slot is
//! in one of three states:
//!
//! - `Default`: the document says nothing; the effective value is the schema
//!   default (which may be absent).
//! - `Set`: the document carries an explicit value, even when it equals the
//!   default.
//! - `Unset`: the document explicitly cancelled the default. There is no
//!   effective value, and the state survives a round trip.

use crate::errors::{MuleConfigError, Result};
use crate::schema::{AttrType, AttributeSpec, NodeKind};
use serde::Serialize;
use std::fmt;

/// Typed value of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Bool(bool),
    Integer(i64),
    /// Enumeration literal, kept in its document spelling.
    Enum(String),
    /// Ordered list of names (transformer chains).
    Names(Vec<String>),
}

impl AttributeValue {
    pub fn text<S: Into<String>>(value: S) -> Self {
        AttributeValue::Text(value.into())
    }

    pub fn literal<S: Into<String>>(value: S) -> Self {
        AttributeValue::Enum(value.into())
    }

    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeValue::Names(names.into_iter().map(Into::into).collect())
    }

    /// Parse a document literal according to the attribute's declared type.
    pub fn parse(owner: NodeKind, spec: &AttributeSpec, literal: &str) -> Result<Self> {
        match spec.ty {
            AttrType::Text => Ok(AttributeValue::Text(literal.to_string())),
            AttrType::Bool => match literal.trim() {
                v if v.eq_ignore_ascii_case("true") => Ok(AttributeValue::Bool(true)),
                v if v.eq_ignore_ascii_case("false") => Ok(AttributeValue::Bool(false)),
                _ => Err(MuleConfigError::invalid_value(owner, spec.name, literal, spec.ty.describe())),
            },
            AttrType::Integer => literal
                .trim()
                .parse::<i64>()
                .map(AttributeValue::Integer)
                .map_err(|_| MuleConfigError::invalid_value(owner, spec.name, literal, spec.ty.describe())),
            AttrType::Enum(domain) => {
                if domain.contains(&literal) {
                    Ok(AttributeValue::Enum(literal.to_string()))
                } else {
                    Err(MuleConfigError::invalid_enum(owner, spec.name, literal))
                }
            }
            AttrType::Names => Ok(AttributeValue::Names(
                literal.split_whitespace().map(str::to_string).collect(),
            )),
        }
    }

    /// Store a document literal without interpreting it. Enumerated attributes
    /// keep the literal as an enum value so the validator can report it against
    /// the domain; everything else is kept as text.
    pub fn raw(spec: &AttributeSpec, literal: &str) -> Self {
        match spec.ty {
            AttrType::Enum(_) => AttributeValue::Enum(literal.to_string()),
            _ => AttributeValue::Text(literal.to_string()),
        }
    }

    /// Document spelling of the value.
    pub fn to_literal(&self) -> String {
        match self {
            AttributeValue::Text(value) | AttributeValue::Enum(value) => value.clone(),
            AttributeValue::Bool(value) => value.to_string(),
            AttributeValue::Integer(value) => value.to_string(),
            AttributeValue::Names(names) => names.join(" "),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(value) | AttributeValue::Enum(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_names(&self) -> Option<&[String]> {
        match self {
            AttributeValue::Names(names) => Some(names),
            _ => None,
        }
    }

    /// Check that the value fits the attribute's declared type and domain.
    pub fn conform(&self, owner: NodeKind, spec: &AttributeSpec) -> Result<()> {
        let fits = match (spec.ty, self) {
            (AttrType::Text, AttributeValue::Text(_)) => true,
            (AttrType::Bool, AttributeValue::Bool(_)) => true,
            (AttrType::Integer, AttributeValue::Integer(_)) => true,
            (AttrType::Enum(domain), AttributeValue::Enum(literal)) => {
                if domain.contains(&literal.as_str()) {
                    true
                } else {
                    return Err(MuleConfigError::invalid_enum(owner, spec.name, literal.as_str()));
                }
            }
            (AttrType::Names, AttributeValue::Names(names)) => names
                .iter()
                .all(|name| !name.is_empty() && !name.chars().any(char::is_whitespace)),
            _ => false,
        };

        if fits {
            Ok(())
        } else {
            Err(MuleConfigError::invalid_value(owner, spec.name, self.to_literal(), spec.ty.describe()))
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_literal())
    }
}

/// State of an attribute slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    Default,
    Set,
    Unset,
}

/// One declared attribute of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSlot {
    owner: NodeKind,
    spec: &'static AttributeSpec,
    state: SlotState,
    value: Option<AttributeValue>,
    schema_default: Option<AttributeValue>,
}

impl AttributeSlot {
    /// Create a slot in the `Default` state.
    pub fn new(owner: NodeKind, spec: &'static AttributeSpec) -> Self {
        let schema_default =
            spec.default.and_then(|literal| AttributeValue::parse(owner, spec, literal).ok());
        Self { owner, spec, state: SlotState::Default, value: None, schema_default }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn spec(&self) -> &'static AttributeSpec {
        self.spec
    }

    pub fn owner(&self) -> NodeKind {
        self.owner
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn is_set(&self) -> bool {
        self.state == SlotState::Set
    }

    pub fn is_unset(&self) -> bool {
        self.state == SlotState::Unset
    }

    /// Effective value: the explicit value when set, nothing when unset,
    /// otherwise the schema default.
    pub fn effective(&self) -> Option<&AttributeValue> {
        match self.state {
            SlotState::Set => self.value.as_ref(),
            SlotState::Unset => None,
            SlotState::Default => self.schema_default.as_ref(),
        }
    }

    /// Alias of [`AttributeSlot::effective`].
    pub fn get(&self) -> Option<&AttributeValue> {
        self.effective()
    }

    /// Explicit value, ignoring defaults.
    pub fn value(&self) -> Option<&AttributeValue> {
        match self.state {
            SlotState::Set => self.value.as_ref(),
            _ => None,
        }
    }

    pub fn schema_default(&self) -> Option<&AttributeValue> {
        self.schema_default.as_ref()
    }

    /// Store a value after checking it against the declared type and domain.
    /// On failure the slot keeps its previous state.
    pub fn set(&mut self, value: AttributeValue) -> Result<()> {
        value.conform(self.owner, self.spec)?;
        self.set_unchecked(value);
        Ok(())
    }

    /// Parse a document literal and store it.
    pub fn set_literal(&mut self, literal: &str) -> Result<()> {
        let value = AttributeValue::parse(self.owner, self.spec, literal)?;
        self.set_unchecked(value);
        Ok(())
    }

    /// Store a value without any checks.
    pub fn set_unchecked(&mut self, value: AttributeValue) {
        self.value = Some(value);
        self.state = SlotState::Set;
    }

    /// Explicitly cancel the value and the default.
    pub fn unset(&mut self) {
        self.value = None;
        self.state = SlotState::Unset;
    }

    /// Return to the `Default` state.
    pub fn reset(&mut self) {
        self.value = None;
        self.state = SlotState::Default;
    }
}
