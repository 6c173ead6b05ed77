//! The decoded ITF value model.

use std::collections::BTreeMap;

/// One decoded ITF value.
///
/// Records and explicit `#map` constructs share the `Map` representation;
/// plain arrays, `#tup` and `#set` share `List`. A decoded `Expr` never holds
/// a null.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Bool(bool),
    Str(String),
    Num(f64),
    /// A `#bigint` value.
    Int(i64),
    List(Vec<Expr>),
    Map(BTreeMap<String, Expr>),
}

impl Expr {
    /// Returns a human-readable kind name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Bool(_) => "Bool",
            Expr::Str(_) => "Str",
            Expr::Num(_) => "Num",
            Expr::Int(_) => "Int",
            Expr::List(_) => "List",
            Expr::Map(_) => "Map",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Expr::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Expr::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Expr::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Expr]> {
        match self {
            Expr::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Expr>> {
        match self {
            Expr::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Looks up a field or map entry by its (canonical) key.
    ///
    /// Returns `None` when `self` is not a `Map` or the key is absent.
    pub fn get(&self, key: &str) -> Option<&Expr> {
        self.as_map().and_then(|fields| fields.get(key))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Bool(b)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Str(s.to_string())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Str(s)
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::Num(n)
    }
}

impl From<i64> for Expr {
    fn from(i: i64) -> Self {
        Expr::Int(i)
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self {
        Expr::List(items)
    }
}

impl From<BTreeMap<String, Expr>> for Expr {
    fn from(fields: BTreeMap<String, Expr>) -> Self {
        Expr::Map(fields)
    }
}
