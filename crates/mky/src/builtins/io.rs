//! Program I/O: `write`, `writeLine`, `take`, `takeLine`, `__format`.

use crate::{
    builtins::wrong_number_of_arguments,
    eval::Evaluator,
    token::Token,
    value::Value,
};

fn join_inspected(args: &[Value]) -> String {
    args.iter().map(Value::inspect).collect::<Vec<_>>().join(" ")
}

pub(super) fn write(ev: &mut Evaluator, args: &[Value]) -> Value {
    let joined = join_inspected(args);
    ev.out().write_str(&joined);
    Value::Null
}

pub(super) fn write_line(ev: &mut Evaluator, args: &[Value]) -> Value {
    let joined = join_inspected(args);
    ev.out().write_line(&joined);
    Value::Null
}

/// Reads one input line, printing an optional prompt inline first.
pub(super) fn take(ev: &mut Evaluator, token: &Token, args: &[Value]) -> Value {
    if args.len() > 1 {
        return wrong_number_of_arguments(token, args.len(), "0/1");
    }
    if let Some(prompt) = args.first() {
        let text = format!("{}> ", prompt.inspect());
        ev.out().write_str(&text);
    }
    let line = ev.input().read_line();
    Value::string(line)
}

/// Like `take`, but the prompt gets its own line.
pub(super) fn take_line(ev: &mut Evaluator, token: &Token, args: &[Value]) -> Value {
    if args.len() > 1 {
        return wrong_number_of_arguments(token, args.len(), "0/1");
    }
    if let Some(prompt) = args.first() {
        let text = format!("{}> ", prompt.inspect());
        ev.out().write_line(&text);
    }
    let line = ev.input().read_line();
    Value::string(line)
}

/// `__format(template, …)` substitutes each `{}` with the next argument's
/// rendering; unmatched placeholders render empty, extras are ignored.
pub(super) fn format(token: &Token, args: &[Value]) -> Value {
    let Some(Value::Str(template)) = args.first() else {
        let got = args.first().map_or_else(|| "nothing".to_owned(), |value| value.kind().to_string());
        return Value::error(token.data.clone(), format!("argument to `__format` not supported. got {got}"));
    };

    let mut out = String::new();
    let mut values = args[1..].iter();
    let mut rest = template.as_str();
    while let Some(position) = rest.find("{}") {
        out.push_str(&rest[..position]);
        if let Some(value) = values.next() {
            out.push_str(&value.inspect());
        }
        rest = &rest[position + 2..];
    }
    out.push_str(rest);
    Value::string(out)
}
