//! Attribute-tree persistence for station state.
//!
//! Stations save into a small named-field tree rather than a fixed binary
//! layout so that saves stay readable across schema additions. Getters
//! return type defaults for missing or mistyped fields, which makes loads
//! of older saves total.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single persisted attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// Boolean flag.
    Bool(bool),
    /// 32-bit integer.
    I32(i32),
    /// 64-bit integer.
    I64(i64),
    /// 32-bit float.
    F32(f32),
    /// UTF-8 string.
    Str(String),
}

/// Ordered map of named attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttrTree(BTreeMap<String, AttrValue>);

impl AttrTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a boolean.
    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.0.insert(key.to_string(), AttrValue::Bool(value));
    }

    /// Store a 32-bit integer.
    pub fn set_i32(&mut self, key: &str, value: i32) {
        self.0.insert(key.to_string(), AttrValue::I32(value));
    }

    /// Store a 64-bit integer.
    pub fn set_i64(&mut self, key: &str, value: i64) {
        self.0.insert(key.to_string(), AttrValue::I64(value));
    }

    /// Store a 32-bit float.
    pub fn set_f32(&mut self, key: &str, value: f32) {
        self.0.insert(key.to_string(), AttrValue::F32(value));
    }

    /// Store a string.
    pub fn set_str(&mut self, key: &str, value: &str) {
        self.0
            .insert(key.to_string(), AttrValue::Str(value.to_string()));
    }

    /// Read a boolean, defaulting to `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(AttrValue::Bool(true)))
    }

    /// Read a 32-bit integer, defaulting to `0`.
    pub fn get_i32(&self, key: &str) -> i32 {
        match self.0.get(key) {
            Some(AttrValue::I32(v)) => *v,
            _ => 0,
        }
    }

    /// Read a 64-bit integer, defaulting to `0`.
    pub fn get_i64(&self, key: &str) -> i64 {
        match self.0.get(key) {
            Some(AttrValue::I64(v)) => *v,
            _ => 0,
        }
    }

    /// Read a 32-bit float, defaulting to `0.0`.
    pub fn get_f32(&self, key: &str) -> f32 {
        match self.0.get(key) {
            Some(AttrValue::F32(v)) => *v,
            _ => 0.0,
        }
    }

    /// Read a string, `None` when absent or mistyped.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(AttrValue::Str(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}
