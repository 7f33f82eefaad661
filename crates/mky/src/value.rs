//! Runtime values.
//!
//! Immediate values (numbers, booleans, the sentinels) are stored inline;
//! aggregates live behind shared handles so aliases observe mutation, and
//! closures keep their defining environment alive through the same
//! mechanism. The environment chain only ever points outward, so handle
//! cycles cannot arise from scoping alone.

use std::cell::{Cell, RefCell};
use std::fmt::{self, Write as _};
use std::rc::Rc;

use indexmap::IndexMap;
use strum::{Display, IntoStaticStr};

use crate::{
    ast::{BlockStatement, Expression, Identifier},
    builtins::Builtin,
    env::Scope,
    hash::{boolean_digest, fnv1a_64, number_digest},
    settings,
    token::TokenData,
};

/// Type tags, rendered uppercase in error messages and used for prototype
/// lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum Kind {
    #[strum(serialize = "INTEGER")]
    Integer,
    #[strum(serialize = "BOOLEAN")]
    Boolean,
    #[strum(serialize = "NULL")]
    Null,
    #[strum(serialize = "BREAK")]
    Break,
    #[strum(serialize = "STRING")]
    Str,
    #[strum(serialize = "ARRAY")]
    Array,
    #[strum(serialize = "HASH")]
    Hash,
    #[strum(serialize = "FUNCTION")]
    Function,
    #[strum(serialize = "BUILTIN")]
    Builtin,
    #[strum(serialize = "MODULE")]
    Module,
    #[strum(serialize = "RETURN")]
    Return,
    #[strum(serialize = "ERROR")]
    Error,
    #[strum(serialize = "QUOTE")]
    Quote,
    #[strum(serialize = "MACRO")]
    Macro,
}

/// Key identity for hash pairs: the value's kind plus a 64-bit digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: Kind,
    pub digest: u64,
}

/// One stored hash entry. The original key value is kept so `keys` can
/// return it and inspection can print it.
#[derive(Debug, Clone)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

/// Hash storage preserves insertion order for printing and `keys`/`values`.
pub type HashStorage = IndexMap<HashKey, HashPair, ahash::RandomState>;

/// Immutable string content with its lazily computed digest.
///
/// The cache is written at most once; string content never changes after
/// construction, so the cached digest stays coherent.
#[derive(Debug)]
pub struct StrValue {
    text: String,
    digest: Cell<Option<u64>>,
}

impl StrValue {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            digest: Cell::new(None),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// FNV-1a digest of the UTF-8 bytes, computed on first use.
    #[must_use]
    pub fn digest(&self) -> u64 {
        if let Some(digest) = self.digest.get() {
            return digest;
        }
        let digest = fnv1a_64(self.text.as_bytes());
        self.digest.set(Some(digest));
        digest
    }
}

/// A user function closed over its defining environment.
#[derive(Debug)]
pub struct FunctionValue {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Scope,
}

/// A macro closure; only ever applied during the expansion pre-pass.
#[derive(Debug)]
pub struct MacroValue {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Scope,
}

/// A namespace produced by `import` or a `module` expression.
#[derive(Debug)]
pub struct ModuleValue {
    pub body: BlockStatement,
    pub env: Scope,
}

/// A runtime error with the location of the token that produced it.
///
/// `fatal` errors always abort; plain errors abort only while the
/// `fatalErrors` flag is set and otherwise travel as ordinary values.
#[derive(Debug)]
pub struct ErrorValue {
    pub message: String,
    pub data: TokenData,
    pub fatal: bool,
}

#[derive(Debug, Clone)]
pub enum Value {
    Integer(f64),
    Boolean(bool),
    Null,
    /// Control-flow sentinel consumed by the loop builtins.
    Break,
    Str(Rc<StrValue>),
    Array(Rc<RefCell<Vec<Value>>>),
    Hash(Rc<RefCell<HashStorage>>),
    Function(Rc<FunctionValue>),
    Builtin(Builtin),
    Module(Rc<ModuleValue>),
    /// Transient wrapper that unwinds through blocks; user code never sees it.
    Return(Box<Value>),
    Error(Rc<ErrorValue>),
    /// An AST fragment reified as a value by `quote`.
    Quote(Rc<Expression>),
    Macro(Rc<MacroValue>),
}

impl Value {
    #[must_use]
    pub fn string(text: impl Into<String>) -> Self {
        Self::Str(Rc::new(StrValue::new(text)))
    }

    #[must_use]
    pub fn array(elements: Vec<Self>) -> Self {
        Self::Array(Rc::new(RefCell::new(elements)))
    }

    #[must_use]
    pub fn hash(storage: HashStorage) -> Self {
        Self::Hash(Rc::new(RefCell::new(storage)))
    }

    #[must_use]
    pub fn empty_hash_storage() -> HashStorage {
        HashStorage::with_hasher(ahash::RandomState::new())
    }

    /// A plain error: aborts evaluation only in fatal mode.
    #[must_use]
    pub fn error(data: TokenData, message: impl Into<String>) -> Self {
        Self::Error(Rc::new(ErrorValue {
            message: message.into(),
            data,
            fatal: false,
        }))
    }

    /// An error that aborts evaluation regardless of mode.
    #[must_use]
    pub fn fatal_error(data: TokenData, message: impl Into<String>) -> Self {
        Self::Error(Rc::new(ErrorValue {
            message: message.into(),
            data,
            fatal: true,
        }))
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Integer(_) => Kind::Integer,
            Self::Boolean(_) => Kind::Boolean,
            Self::Null => Kind::Null,
            Self::Break => Kind::Break,
            Self::Str(_) => Kind::Str,
            Self::Array(_) => Kind::Array,
            Self::Hash(_) => Kind::Hash,
            Self::Function(_) => Kind::Function,
            Self::Builtin(_) => Kind::Builtin,
            Self::Module(_) => Kind::Module,
            Self::Return(_) => Kind::Return,
            Self::Error(_) => Kind::Error,
            Self::Quote(_) => Kind::Quote,
            Self::Macro(_) => Kind::Macro,
        }
    }

    /// `false` and `null` are false, zero is false, everything else true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(value) => *value,
            Self::Null => false,
            Self::Integer(value) => *value != 0.0,
            _ => true,
        }
    }

    /// Whether this value must stop the enclosing fold right now.
    #[must_use]
    pub fn is_aborting(&self) -> bool {
        match self {
            Self::Error(error) => error.fatal || settings::fatal_errors(),
            _ => false,
        }
    }

    /// Key identity for hashable values; `None` for everything else.
    #[must_use]
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Self::Integer(value) => Some(HashKey {
                kind: Kind::Integer,
                digest: number_digest(*value),
            }),
            Self::Boolean(value) => Some(HashKey {
                kind: Kind::Boolean,
                digest: boolean_digest(*value),
            }),
            Self::Str(text) => Some(HashKey {
                kind: Kind::Str,
                digest: text.digest(),
            }),
            _ => None,
        }
    }

    /// The user-facing rendering of this value.
    #[must_use]
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => f.write_str(&format_float(*value)),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Null => f.write_str("null"),
            Self::Break => f.write_str("break"),
            Self::Str(text) => f.write_str(text.as_str()),
            Self::Array(elements) => {
                f.write_char('[')?;
                for (index, element) in elements.borrow().iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_char(']')
            }
            Self::Hash(storage) => {
                f.write_char('{')?;
                for (index, pair) in storage.borrow().values().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                f.write_char('}')
            }
            Self::Function(function) => {
                f.write_str("fn(")?;
                for (index, parameter) in function.parameters.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{parameter}")?;
                }
                write!(f, ") {}", function.body)
            }
            Self::Builtin(_) => f.write_str("builtin function"),
            Self::Module(_) => f.write_str("module"),
            Self::Return(inner) => write!(f, "{inner}"),
            Self::Error(error) => write!(f, "ERROR: {}", error.message),
            Self::Quote(node) => write!(f, "QUOTE({node})"),
            Self::Macro(value) => {
                f.write_str("macro(")?;
                for (index, parameter) in value.parameters.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{parameter}")?;
                }
                write!(f, ") {}", value.body)
            }
        }
    }
}

/// Equality used by the generic `==`/`!=` fall-through.
///
/// A boolean operand compares by truthiness (`1 == true`, `0 == false`);
/// same-kind immediates compare by value and aggregates by identity.
/// Mismatched kinds are unequal rather than an error.
#[must_use]
pub fn value_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(_), _) | (_, Value::Boolean(_)) => left.is_truthy() == right.is_truthy(),
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Null, Value::Null) => true,
        (Value::Str(a), Value::Str(b)) => a.as_str() == b.as_str(),
        (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
        (Value::Hash(a), Value::Hash(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Module(a), Value::Module(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// Formats a number the way the language displays it: no trailing zeros,
/// no decimal point for whole values.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let mut buffer = ryu::Buffer::new();
        buffer.format(value).to_owned()
    }
}
