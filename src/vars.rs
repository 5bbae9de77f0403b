//! Project: winpath
//! Module: vars
//!
//! Named variables available to [WinPath::expand_vars_with](crate::WinPath::expand_vars_with).
//! Names follow Windows environment semantics and compare without regard to
//! ASCII case.

use super::Error;
use serde::Deserialize;
use std::fmt::Display;
use std::hash::Hash;
use std::{collections::HashMap, str::FromStr};

/// Characters that would be mistaken for expansion syntax inside a name.
const SIGILS: [char; 3] = ['%', '$', '='];

#[derive(Debug, Eq, Clone)]
pub struct Key(String);

impl Key {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verifies the given key is a valid representation by using the
    /// [FromStr] trait.
    pub fn validate(&self) -> Option<Error> {
        Self::from_str(&self.0).err()
    }
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word_count = s.split_whitespace().count();
        if word_count == 0 {
            return Err(Error::KeyEmpty);
        }
        if word_count > 1 {
            return Err(Error::KeyContainsWhitespace(s.to_string()));
        }
        if s.contains('\n') == true {
            return Err(Error::KeyContainsNewline(s.to_string()));
        }
        if s.contains(&SIGILS[..]) == true {
            return Err(Error::KeyContainsSigil(s.to_string()));
        }
        Ok(Self(s.trim().to_string()))
    }
}

impl Hash for Key {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_uppercase());
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
pub struct Value(String);

impl Value {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single `key=value` definition.
#[derive(Debug, PartialEq, Clone)]
pub struct Var {
    key: Key,
    value: Value,
}

impl Var {
    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Splits the struct into its underlying components: a key and a value.
    pub fn split(self) -> (Key, Value) {
        (self.key, self.value)
    }
}

impl FromStr for Var {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((k, v)) => Ok(Self {
                key: Key::from_str(k)?,
                value: Value::from(v),
            }),
            None => Err(Error::VarParseMissingEq),
        }
    }
}

#[derive(Debug, PartialEq, Default)]
pub struct VarMap {
    inner: HashMap<Key, Value>,
}

impl VarMap {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    pub fn insert(&mut self, var: Var) -> Option<Value> {
        let (key, value) = var.split();
        self.inner.insert(key, value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.inner.get(&Key(name.trim().to_string()))
    }

    /// Inserts existing entries into the current map, overwriting entries
    /// if they already existed.
    pub fn merge(&mut self, vars: VarMap) {
        vars.inner.into_iter().for_each(|(key, value)| {
            self.insert(Var { key, value });
        });
    }

    /// Resolves `name` from the process environment first, then from this
    /// map.
    pub fn lookup(&self, name: &str) -> Option<String> {
        // the environment rejects names that could never have been set
        if name.is_empty() || name.contains(&['=', '\0'][..]) {
            return None;
        }
        match std::env::var(name) {
            Ok(v) => Some(v),
            Err(_) => self.get(name).map(|v| v.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<&Vec<Var>> for VarMap {
    fn from(value: &Vec<Var>) -> Self {
        let mut vars = VarMap::new();
        value.iter().for_each(|var| {
            vars.insert(var.clone());
        });
        vars
    }
}

impl From<HashMap<Key, Value>> for VarMap {
    fn from(value: HashMap<Key, Value>) -> Self {
        Self { inner: value }
    }
}

use serde::de;
use std::fmt;

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Key, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct KeyVisitor;

        impl<'de> de::Visitor<'de> for KeyVisitor {
            type Value = Key;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a variable name")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match Key::from_str(v) {
                    Ok(v) => Ok(v),
                    Err(e) => Err(de::Error::custom(e)),
                }
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}
