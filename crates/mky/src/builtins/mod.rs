//! Host-implemented functions.
//!
//! Every builtin is one variant of `BuiltinFunction`; a `Builtin` value
//! couples the variant with its calling convention (arity, var-args,
//! prototype and eager flags). Identifier lookup consults `lookup` before
//! the environment, so these names shadow user bindings.

mod cast;
mod check;
mod collection;
mod control;
mod io;
mod time;

use strum::Display;

use crate::{
    env::Scope,
    eval::Evaluator,
    token::Token,
    value::Value,
};

/// Identity of a builtin. The display form is the surface name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BuiltinFunction {
    #[strum(serialize = "__len")]
    Len,
    #[strum(serialize = "__keys")]
    Keys,
    #[strum(serialize = "__set")]
    Set,
    #[strum(serialize = "__loop")]
    Loop,
    #[strum(serialize = "__while")]
    While,
    #[strum(serialize = "range")]
    Range,
    #[strum(serialize = "push")]
    Push,
    #[strum(serialize = "append")]
    Append,
    #[strum(serialize = "typeof")]
    Typeof,
    #[strum(serialize = "panic!")]
    Panic,
    #[strum(serialize = "null?")]
    IsNull,
    #[strum(serialize = "error?")]
    IsError,
    #[strum(serialize = "bool!")]
    ToBool,
    #[strum(serialize = "string")]
    AsString,
    #[strum(serialize = "number!")]
    ToNumber,
    #[strum(serialize = "write")]
    Write,
    #[strum(serialize = "writeLine")]
    WriteLine,
    #[strum(serialize = "take")]
    Take,
    #[strum(serialize = "takeLine")]
    TakeLine,
    #[strum(serialize = "__time")]
    Time,
    #[strum(serialize = "__format")]
    Format,
    #[strum(serialize = "import")]
    Import,

    // Prototype methods, reachable only through the per-kind registry.
    #[strum(serialize = "double")]
    IntDouble,
    #[strum(serialize = "length")]
    StrLength,
    #[strum(serialize = "length")]
    ArrayLength,
    #[strum(serialize = "push")]
    ArrayPush,
    #[strum(serialize = "pop")]
    ArrayPop,
    #[strum(serialize = "length")]
    HashLength,
    #[strum(serialize = "keys")]
    HashKeys,
    #[strum(serialize = "values")]
    HashValues,
}

/// A callable host function plus its declared calling convention.
///
/// `arity`/`var_args` describe the surface; enforcement happens inside
/// each body (an `args.len()` check or the argument parser), which is
/// what turns a surplus argument into a `wrong number of arguments`
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    pub function: BuiltinFunction,
    /// Number of declared slots.
    pub arity: u8,
    pub var_args: bool,
    /// Prototype methods find their receiver as `this` in the call env.
    pub prototype: bool,
    /// Eager prototype methods run on `.name` access without call syntax.
    pub eager: bool,
}

impl Builtin {
    #[must_use]
    pub(crate) const fn function(function: BuiltinFunction, arity: u8, var_args: bool) -> Self {
        Self {
            function,
            arity,
            var_args,
            prototype: false,
            eager: false,
        }
    }

    #[must_use]
    pub(crate) const fn method(function: BuiltinFunction, arity: u8, var_args: bool, eager: bool) -> Self {
        Self {
            function,
            arity,
            var_args,
            prototype: true,
            eager,
        }
    }

    /// Invokes the builtin. `env` is the caller's environment; for
    /// prototype methods it has been extended with the `this` binding.
    pub(crate) fn call(self, ev: &mut Evaluator, token: &Token, env: &Scope, args: Vec<Value>) -> Value {
        use BuiltinFunction as B;
        match self.function {
            B::Len => collection::len(token, &args),
            B::Keys => collection::keys(token, &args),
            B::Set => collection::set(token, &args),
            B::Range => collection::range(token, &args),
            B::Push => collection::push(token, &args),
            B::Append => collection::append(token, &args),
            B::Loop => control::loop_builtin(ev, token, env, &args),
            B::While => control::while_builtin(ev, token, env, &args),
            B::Panic => control::panic_builtin(token, &args),
            B::IsNull => check::is_null(token, &args),
            B::IsError => check::is_error(token, &args),
            B::Typeof => cast::type_of(token, &args),
            B::ToBool => cast::to_bool(token, &args),
            B::AsString => cast::as_string(token, &args),
            B::ToNumber => cast::to_number(token, &args),
            B::Write => io::write(ev, &args),
            B::WriteLine => io::write_line(ev, &args),
            B::Take => io::take(ev, token, &args),
            B::TakeLine => io::take_line(ev, token, &args),
            B::Time => time::time(),
            B::Format => io::format(token, &args),
            B::Import => ev.import_module(token, env, &args),

            B::IntDouble => crate::prototypes::int_double(token, env),
            B::StrLength => crate::prototypes::str_length(token, env),
            B::ArrayLength => crate::prototypes::array_length(token, env),
            B::ArrayPush => crate::prototypes::array_push(token, env, &args),
            B::ArrayPop => crate::prototypes::array_pop(token, env, &args),
            B::HashLength => crate::prototypes::hash_length(token, env),
            B::HashKeys => crate::prototypes::hash_keys(token, env),
            B::HashValues => crate::prototypes::hash_values(token, env),
        }
    }
}

/// Resolves a global builtin by its surface name.
///
/// Prototype methods are deliberately absent: they are only reachable
/// through the per-kind registry.
#[must_use]
pub fn lookup(name: &str) -> Option<Builtin> {
    use BuiltinFunction as B;
    let builtin = match name {
        "__len" => Builtin::function(B::Len, 1, false),
        "__keys" => Builtin::function(B::Keys, 1, false),
        "__set" => Builtin::function(B::Set, 3, false),
        "__loop" => Builtin::function(B::Loop, 1, false),
        "__while" => Builtin::function(B::While, 2, false),
        "range" => Builtin::function(B::Range, 3, false),
        "push" => Builtin::function(B::Push, 1, true),
        "append" => Builtin::function(B::Append, 1, true),
        "typeof" => Builtin::function(B::Typeof, 1, false),
        "panic!" => Builtin::function(B::Panic, 1, false),
        "null?" => Builtin::function(B::IsNull, 1, false),
        "error?" => Builtin::function(B::IsError, 1, false),
        "bool!" => Builtin::function(B::ToBool, 1, false),
        "string" => Builtin::function(B::AsString, 1, false),
        "number!" => Builtin::function(B::ToNumber, 1, false),
        "write" => Builtin::function(B::Write, 0, true),
        "writeLine" => Builtin::function(B::WriteLine, 0, true),
        "take" => Builtin::function(B::Take, 1, false),
        "takeLine" => Builtin::function(B::TakeLine, 1, false),
        "__time" => Builtin::function(B::Time, 0, false),
        "__format" => Builtin::function(B::Format, 1, true),
        "import" => Builtin::function(B::Import, 1, false),
        _ => return None,
    };
    Some(builtin)
}

/// Shared error constructor for argument-count mismatches.
pub(crate) fn wrong_number_of_arguments(token: &Token, got: usize, expected: &str) -> Value {
    Value::error(
        token.data.clone(),
        format!("wrong number of arguments. got={got}, expected={expected}"),
    )
}

/// Receiver lookup for prototype methods.
pub(crate) fn this_value(token: &Token, env: &Scope) -> Result<Value, Value> {
    env.get("this")
        .ok_or_else(|| Value::error(token.data.clone(), "prototype method called without a receiver"))
}
