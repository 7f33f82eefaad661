#![doc = include_str!("../../../README.md")]

mod args;
mod ast;
mod builtins;
mod diagnostics;
mod env;
mod eval;
mod hash;
mod infix;
mod io;
mod lexer;
mod linker;
pub mod macros;
pub mod modify;
mod parser;
mod prototypes;
mod quote;
mod repl;
mod run;
pub mod settings;
mod token;
mod value;

pub use crate::{
    args::{ArgError, ArgParser, ArgSlot, ParsedArgs},
    ast::{BlockStatement, Expression, Identifier, Node, Program, Statement},
    builtins::{Builtin, BuiltinFunction},
    diagnostics::{ParseError, Severity, render_all},
    env::Scope,
    eval::Evaluator,
    io::{
        CollectStringOutput, EmptyInput, FsLoader, InputReader, MapLoader, NullOutput, OutputWriter, QueueInput,
        SourceLoader, StdInput, StdOutput,
    },
    lexer::Lexer,
    linker::{Linker, SOURCE_EXT},
    parser::{Parser, parse_source},
    prototypes::lookup as prototype_lookup,
    repl::{PROMPT, ReplOutcome, ReplSession},
    run::{Interpreter, render_runtime_error},
    token::{Token, TokenData, TokenKind, lookup_ident},
    value::{
        ErrorValue, FunctionValue, HashKey, HashPair, HashStorage, Kind, MacroValue, ModuleValue, StrValue, Value,
        format_float, value_eq,
    },
};
