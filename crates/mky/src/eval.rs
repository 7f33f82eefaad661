//! The tree-walking evaluator.
//!
//! `Evaluator` owns the host collaborators (output writer, input reader,
//! linker) and walks AST nodes against a `Scope`. Errors are values: a
//! plain error aborts folds only while `fatalErrors` is on, a fatal error
//! always does, and the `Return`/`Break` sentinels unwind until a function
//! application or loop builtin consumes them.

use std::rc::Rc;

use crate::{
    ast::{BlockStatement, Expression, Identifier, Program, Statement},
    builtins,
    diagnostics::{self, Severity},
    env::Scope,
    infix,
    io::{EmptyInput, FsLoader, InputReader, OutputWriter, SourceLoader, StdInput, StdOutput},
    linker::Linker,
    macros, modify,
    parser::parse_source,
    prototypes, quote,
    token::{Token, TokenKind},
    value::{HashPair, ModuleValue, Value, format_float},
};

pub struct Evaluator {
    out: Box<dyn OutputWriter>,
    input: Box<dyn InputReader>,
    linker: Linker,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// An evaluator wired to stdout, stdin and the real filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(Box::new(StdOutput), Box::new(StdInput), Box::new(FsLoader))
    }

    /// An evaluator with custom host collaborators; tests pair a
    /// collecting writer with queued input and an in-memory loader.
    #[must_use]
    pub fn with_parts(out: Box<dyn OutputWriter>, input: Box<dyn InputReader>, loader: Box<dyn SourceLoader>) -> Self {
        Self {
            out,
            input,
            linker: Linker::new(loader),
        }
    }

    /// Quiet evaluator for expansion-time work and unit tests.
    #[must_use]
    pub fn silent() -> Self {
        Self::with_parts(
            Box::new(crate::io::NullOutput),
            Box::new(EmptyInput),
            Box::new(FsLoader),
        )
    }

    pub fn out(&mut self) -> &mut dyn OutputWriter {
        self.out.as_mut()
    }

    pub fn input(&mut self) -> &mut dyn InputReader {
        self.input.as_mut()
    }

    pub fn linker(&self) -> &Linker {
        &self.linker
    }

    pub fn linker_mut(&mut self) -> &mut Linker {
        &mut self.linker
    }

    /// Runs a parsed program through the include pre-pass, both macro
    /// passes, and evaluation. Returns the rewritten program alongside the
    /// final value so module bodies can keep their AST.
    pub(crate) fn run_parsed(&mut self, program: Program, env: &Scope) -> (Program, Value) {
        let program = match self.process_includes(program, env) {
            Ok(program) => program,
            Err(error) => return (Program::default(), error),
        };

        let mut program = program;
        macros::define_macros(&mut program, env);
        let program = match macros::expand_macros(self, program, env) {
            Ok(program) => program,
            Err(error) => return (Program::default(), error),
        };

        let value = self.eval_program(&program, env);
        (program, value)
    }

    /// Rewrites every `include("path")` call to a `null` literal after
    /// linking the named file into `env`. Runs before macro expansion so
    /// included macro definitions are visible to it.
    fn process_includes(&mut self, program: Program, env: &Scope) -> Result<Program, Value> {
        let mut failure: Option<Value> = None;

        let program = modify::modify_program(program, &mut |node| {
            if failure.is_some() {
                return node;
            }
            let Expression::Call {
                token,
                function,
                arguments,
            } = &node
            else {
                return node;
            };
            let Expression::Identifier(name) = function.as_ref() else {
                return node;
            };
            if name.value != "include" || arguments.len() != 1 {
                return node;
            }
            let Expression::Str { value: spec, .. } = &arguments[0] else {
                return node;
            };

            if let Err(error) = self.link_file(token, spec, env) {
                failure = Some(error);
                return node;
            }
            Expression::Null { token: token.clone() }
        });

        match failure {
            Some(error) => Err(error),
            None => Ok(program),
        }
    }

    /// Resolves, parses and evaluates a linked file into `env`.
    ///
    /// Re-entering a file already being linked is a circular dependency
    /// and yields an empty program, so each side keeps whatever the other
    /// had established before the re-entry.
    pub(crate) fn link_file(&mut self, token: &Token, spec: &str, env: &Scope) -> Result<Program, Value> {
        let path = self.linker.resolve(spec);
        if self.linker.is_linking(&path) {
            eprintln!("warning: circular include of {} skipped", path.display());
            return Ok(Program::default());
        }

        let source = match self.linker.load(&path) {
            Ok(source) => source,
            Err(error) => {
                return Err(Value::fatal_error(
                    token.data.clone(),
                    format!("Failed to compile file {}: {error}", path.display()),
                ));
            }
        };

        let filename = path.to_string_lossy().into_owned();
        let (program, errors) = parse_source(&source, &filename);
        if errors.iter().any(|error| error.severity == Severity::Error) {
            eprint!("{}", diagnostics::render_all(&errors, &source));
            return Err(Value::fatal_error(
                token.data.clone(),
                format!("Failed to compile file {}", path.display()),
            ));
        }

        let saved_dir = self.linker.begin(path);
        let (program, value) = self.run_parsed(program, env);
        self.linker.finish(saved_dir);

        if value.is_aborting() {
            return Err(value);
        }
        Ok(program)
    }

    /// The `import` builtin: links into a fresh enclosed environment and
    /// wraps it as a module value.
    pub(crate) fn import_module(&mut self, token: &Token, env: &Scope, args: &[Value]) -> Value {
        let Some(Value::Str(spec)) = args.first() else {
            let got = args.first().map_or_else(|| "nothing".to_owned(), |value| value.kind().to_string());
            return Value::error(token.data.clone(), format!("argument to `import` not supported. got {got}"));
        };

        let module_env = env.enclose();
        match self.link_file(token, spec.as_str(), &module_env) {
            Ok(program) => Value::Module(Rc::new(ModuleValue {
                body: BlockStatement {
                    token: token.clone(),
                    statements: program.statements,
                },
                env: module_env,
            })),
            Err(error) => error,
        }
    }

    /// Folds top-level statements, unwrapping a `return` and stopping on
    /// aborting errors.
    pub fn eval_program(&mut self, program: &Program, env: &Scope) -> Value {
        let mut result = Value::Null;
        for statement in &program.statements {
            result = self.eval_statement(statement, env);
            match result {
                Value::Return(inner) => return *inner,
                ref value if value.is_aborting() => return result,
                _ => {}
            }
        }
        result
    }

    /// Folds a block without unwrapping `return`; the enclosing function
    /// application does that. `break` short-circuits here too so it can
    /// travel up to a loop builtin.
    pub(crate) fn eval_block(&mut self, block: &BlockStatement, env: &Scope) -> Value {
        let mut result = Value::Null;
        for statement in &block.statements {
            result = self.eval_statement(statement, env);
            match result {
                Value::Return(_) | Value::Break => return result,
                ref value if value.is_aborting() => return result,
                _ => {}
            }
        }
        result
    }

    fn eval_statement(&mut self, statement: &Statement, env: &Scope) -> Value {
        match statement {
            Statement::Let { name, value, .. } => {
                let value = self.eval_expression(value, env);
                if value.is_aborting() {
                    return value;
                }
                env.store(name.value.clone(), value);
                Value::Null
            }
            Statement::Return { value, .. } => {
                let inner = match value {
                    Some(value) => {
                        let inner = self.eval_expression(value, env);
                        if inner.is_aborting() {
                            return inner;
                        }
                        inner
                    }
                    None => Value::Null,
                };
                Value::Return(Box::new(inner))
            }
            Statement::Expression { expression, .. } => self.eval_expression(expression, env),
            Statement::Print { expression, .. } => {
                let value = self.eval_expression(expression, env);
                if value.is_aborting() {
                    return value;
                }
                let line = value.inspect();
                self.out().write_line(&line);
                value
            }
            Statement::Block(block) => self.eval_block(block, env),
        }
    }

    pub fn eval_expression(&mut self, expression: &Expression, env: &Scope) -> Value {
        match expression {
            Expression::Identifier(identifier) => Self::eval_identifier(identifier, env),
            Expression::Integer { value, .. } => Value::Integer(*value),
            Expression::Str { value, .. } => Value::string(value.clone()),
            Expression::Boolean { value, .. } => Value::Boolean(*value),
            Expression::Null { .. } => Value::Null,
            Expression::Break { .. } => Value::Break,
            Expression::Prefix { token, operator, right } => {
                let right = self.eval_expression(right, env);
                if right.is_aborting() {
                    return right;
                }
                Self::eval_prefix(token, *operator, &right)
            }
            Expression::Infix {
                token,
                operator,
                left,
                right,
            } => self.eval_infix(token, *operator, left, right, env),
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                let condition = self.eval_expression(condition, env);
                if condition.is_aborting() {
                    return condition;
                }
                if condition.is_truthy() {
                    self.eval_block(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_block(alternative, env)
                } else {
                    Value::Null
                }
            }
            Expression::Function { parameters, body, .. } => Value::Function(Rc::new(crate::value::FunctionValue {
                parameters: parameters.clone(),
                body: body.clone(),
                env: env.clone(),
            })),
            Expression::MacroLit { parameters, body, .. } => Value::Macro(Rc::new(crate::value::MacroValue {
                parameters: parameters.clone(),
                body: body.clone(),
                env: env.clone(),
            })),
            Expression::Call {
                token,
                function,
                arguments,
            } => self.eval_call(token, function, arguments, env),
            Expression::Array { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    let value = self.eval_expression(element, env);
                    if value.is_aborting() {
                        return value;
                    }
                    values.push(value);
                }
                Value::array(values)
            }
            Expression::HashLiteral { token, pairs } => self.eval_hash_literal(token, pairs, env),
            Expression::Index {
                token,
                left,
                start,
                end,
                has_range,
            } => self.eval_index(token, left, start.as_deref(), end.as_deref(), *has_range, env),
            Expression::Module { body, .. } => {
                let module_env = env.enclose();
                let result = self.eval_block(body, &module_env);
                if result.is_aborting() {
                    return result;
                }
                Value::Module(Rc::new(ModuleValue {
                    body: body.clone(),
                    env: module_env,
                }))
            }
        }
    }

    /// Identifier lookup goes through the builtin table first, then the
    /// environment chain.
    fn eval_identifier(identifier: &Identifier, env: &Scope) -> Value {
        if let Some(builtin) = builtins::lookup(&identifier.value) {
            return Value::Builtin(builtin);
        }
        match env.get(&identifier.value) {
            Some(value) => value,
            None => Value::fatal_error(
                identifier.token.data.clone(),
                format!("identifier not found: {}", identifier.value),
            ),
        }
    }

    fn eval_prefix(token: &Token, operator: TokenKind, right: &Value) -> Value {
        match operator {
            TokenKind::Bang => Value::Boolean(!right.is_truthy()),
            TokenKind::Minus => match right {
                Value::Integer(value) => Value::Integer(-value),
                other => Value::error(token.data.clone(), format!("unknown operation: -{}", other.kind())),
            },
            TokenKind::Plus => match right {
                Value::Integer(value) => Value::Integer(*value),
                other => Value::error(token.data.clone(), format!("unknown operation: +{}", other.kind())),
            },
            other => Value::error(
                token.data.clone(),
                format!("unknown operation: {}{}", other, right.kind()),
            ),
        }
    }

    fn eval_infix(
        &mut self,
        token: &Token,
        operator: TokenKind,
        left: &Expression,
        right: &Expression,
        env: &Scope,
    ) -> Value {
        match operator {
            TokenKind::Assign => self.eval_assignment(token, left, right, env),
            TokenKind::Dot => self.eval_dot(token, left, right, env),
            // Gates short-circuit; xor necessarily evaluates both sides.
            TokenKind::And => {
                let left = self.eval_expression(left, env);
                if left.is_aborting() {
                    return left;
                }
                if !left.is_truthy() {
                    return Value::Boolean(false);
                }
                let right = self.eval_expression(right, env);
                if right.is_aborting() {
                    return right;
                }
                Value::Boolean(right.is_truthy())
            }
            TokenKind::Or => {
                let left = self.eval_expression(left, env);
                if left.is_aborting() {
                    return left;
                }
                if left.is_truthy() {
                    return Value::Boolean(true);
                }
                let right = self.eval_expression(right, env);
                if right.is_aborting() {
                    return right;
                }
                Value::Boolean(right.is_truthy())
            }
            TokenKind::Xor => {
                let left = self.eval_expression(left, env);
                if left.is_aborting() {
                    return left;
                }
                let right = self.eval_expression(right, env);
                if right.is_aborting() {
                    return right;
                }
                Value::Boolean(left.is_truthy() != right.is_truthy())
            }
            _ => {
                let left = self.eval_expression(left, env);
                if left.is_aborting() {
                    return left;
                }
                let right = self.eval_expression(right, env);
                if right.is_aborting() {
                    return right;
                }
                infix::eval_operator(token, operator, &left, &right)
            }
        }
    }

    /// Assignment to an existing name or an indexed slot. `let` is the
    /// only way to introduce a binding, so a miss here is an error.
    fn eval_assignment(&mut self, token: &Token, left: &Expression, right: &Expression, env: &Scope) -> Value {
        match left {
            Expression::Identifier(name) => {
                let value = self.eval_expression(right, env);
                if value.is_aborting() {
                    return value;
                }
                if env.replace(&name.value, value.clone()) {
                    value
                } else {
                    Value::fatal_error(
                        name.token.data.clone(),
                        format!("identifier not found: {}", name.value),
                    )
                }
            }
            Expression::Index {
                token: index_token,
                left: target,
                start,
                has_range,
                ..
            } => {
                if *has_range || start.is_none() {
                    return Value::error(token.data.clone(), "invalid assignment target");
                }
                let target = self.eval_expression(target, env);
                if target.is_aborting() {
                    return target;
                }
                let key = self.eval_expression(start.as_ref().expect("checked above"), env);
                if key.is_aborting() {
                    return key;
                }
                let value = self.eval_expression(right, env);
                if value.is_aborting() {
                    return value;
                }
                Self::assign_index(index_token, &target, &key, value)
            }
            _ => Value::error(token.data.clone(), "invalid assignment target"),
        }
    }

    fn assign_index(token: &Token, target: &Value, key: &Value, value: Value) -> Value {
        match (target, key) {
            (Value::Array(elements), Value::Integer(index)) => {
                let mut elements = elements.borrow_mut();
                let length = elements.len() as i64;
                let mut position = index.trunc() as i64;
                if position < 0 {
                    position += length;
                }
                if position < 0 || position >= length {
                    return Value::error(token.data.clone(), format!("index out of range: {}", format_float(*index)));
                }
                elements[position as usize] = value.clone();
                value
            }
            (Value::Array(_), other) => {
                Value::error(token.data.clone(), format!("unusable as index: {}", other.kind()))
            }
            (Value::Hash(storage), key) => {
                let Some(hash_key) = key.hash_key() else {
                    return Value::error(token.data.clone(), format!("unusable as hash key: {}", key.kind()));
                };
                storage.borrow_mut().insert(
                    hash_key,
                    HashPair {
                        key: key.clone(),
                        value: value.clone(),
                    },
                );
                value
            }
            (other, _) => Value::error(
                token.data.clone(),
                format!("index operator not supported: {}", other.kind()),
            ),
        }
    }

    /// `.` in value position: module member, eager prototype property, or
    /// string-keyed hash member.
    fn eval_dot(&mut self, token: &Token, left: &Expression, right: &Expression, env: &Scope) -> Value {
        let receiver = self.eval_expression(left, env);
        if receiver.is_aborting() {
            return receiver;
        }
        let Expression::Identifier(name) = right else {
            return Value::error(token.data.clone(), "expected identifier after `.`");
        };

        if let Value::Module(module) = &receiver {
            return match module.env.get(&name.value) {
                Some(member) => member,
                None => Value::fatal_error(
                    name.token.data.clone(),
                    format!("identifier not found: {}", name.value),
                ),
            };
        }

        if let Some(method) = prototypes::lookup(receiver.kind(), &name.value) {
            if method.eager {
                let bound = env.enclose();
                bound.store("this", receiver);
                return self.apply_function(token, Value::Builtin(method), Vec::new(), &bound);
            }
            return Value::Builtin(method);
        }

        if let Value::Hash(storage) = &receiver {
            let key = Value::string(name.value.clone());
            let hash_key = key.hash_key().expect("strings are hashable");
            return storage
                .borrow()
                .get(&hash_key)
                .map_or(Value::Null, |pair| pair.value.clone());
        }

        Value::error(
            token.data.clone(),
            format!("unknown operation: {}.{}", receiver.kind(), name.value),
        )
    }

    fn eval_call(&mut self, token: &Token, function: &Expression, arguments: &[Expression], env: &Scope) -> Value {
        // quote/unquote are call-site special forms, not functions.
        if let Expression::Identifier(identifier) = function {
            if identifier.value == "quote" {
                return quote::eval_quote(self, token, arguments, env);
            }
            if identifier.value == "unquote" {
                return quote::eval_unquote(self, token, arguments, env);
            }
        }

        // Method-style calls bind the receiver before applying.
        if let Expression::Infix {
            operator: TokenKind::Dot,
            left,
            right,
            ..
        } = function
        {
            return self.eval_method_call(token, left, right, arguments, env);
        }

        let callee = self.eval_expression(function, env);
        if callee.is_aborting() {
            return callee;
        }
        let args = match self.eval_expressions(arguments, env) {
            Ok(args) => args,
            Err(error) => return error,
        };
        self.apply_function(token, callee, args, env)
    }

    fn eval_method_call(
        &mut self,
        call_token: &Token,
        left: &Expression,
        right: &Expression,
        arguments: &[Expression],
        env: &Scope,
    ) -> Value {
        let receiver = self.eval_expression(left, env);
        if receiver.is_aborting() {
            return receiver;
        }
        let Expression::Identifier(name) = right else {
            return Value::error(call_token.data.clone(), "expected identifier after `.`");
        };

        if let Value::Module(module) = &receiver {
            let Some(member) = module.env.get(&name.value) else {
                return Value::fatal_error(
                    name.token.data.clone(),
                    format!("identifier not found: {}", name.value),
                );
            };
            let args = match self.eval_expressions(arguments, env) {
                Ok(args) => args,
                Err(error) => return error,
            };
            return self.apply_function(call_token, member, args, env);
        }

        if let Some(method) = prototypes::lookup(receiver.kind(), &name.value) {
            let args = match self.eval_expressions(arguments, env) {
                Ok(args) => args,
                Err(error) => return error,
            };
            let bound = env.enclose();
            bound.store("this", receiver);
            return self.apply_function(call_token, Value::Builtin(method), args, &bound);
        }

        if let Value::Hash(storage) = &receiver {
            let key = Value::string(name.value.clone());
            let hash_key = key.hash_key().expect("strings are hashable");
            let member = storage
                .borrow()
                .get(&hash_key)
                .map_or(Value::Null, |pair| pair.value.clone());
            let args = match self.eval_expressions(arguments, env) {
                Ok(args) => args,
                Err(error) => return error,
            };
            return self.apply_function(call_token, member, args, env);
        }

        Value::error(
            call_token.data.clone(),
            format!("unknown operation: {}.{}", receiver.kind(), name.value),
        )
    }

    /// Evaluates arguments left to right, stopping at the first aborting
    /// error.
    fn eval_expressions(&mut self, expressions: &[Expression], env: &Scope) -> Result<Vec<Value>, Value> {
        let mut values = Vec::with_capacity(expressions.len());
        for expression in expressions {
            let value = self.eval_expression(expression, env);
            if value.is_aborting() {
                return Err(value);
            }
            values.push(value);
        }
        Ok(values)
    }

    /// Applies a callable. User functions pad missing arguments with
    /// `null` and ignore extras. Builtins receive the evaluated arguments
    /// untouched; each body validates its own count so a surplus argument
    /// surfaces as a `wrong number of arguments` error instead of being
    /// dropped here.
    pub fn apply_function(&mut self, token: &Token, callee: Value, args: Vec<Value>, env: &Scope) -> Value {
        match callee {
            Value::Function(function) => {
                let fenv = function.env.enclose();
                for (index, parameter) in function.parameters.iter().enumerate() {
                    let value = args.get(index).cloned().unwrap_or(Value::Null);
                    fenv.store(parameter.value.clone(), value);
                }
                match self.eval_block(&function.body, &fenv) {
                    Value::Return(inner) => *inner,
                    other => other,
                }
            }
            Value::Builtin(builtin) => builtin.call(self, token, env, args),
            other => Value::error(token.data.clone(), format!("not a function: {}", other.kind())),
        }
    }

    fn eval_hash_literal(&mut self, token: &Token, pairs: &[(Expression, Expression)], env: &Scope) -> Value {
        let mut storage = Value::empty_hash_storage();
        for (key_expression, value_expression) in pairs {
            let key = self.eval_expression(key_expression, env);
            if key.is_aborting() {
                return key;
            }
            let Some(hash_key) = key.hash_key() else {
                return Value::error(token.data.clone(), format!("unusable as hash key: {}", key.kind()));
            };
            let value = self.eval_expression(value_expression, env);
            if value.is_aborting() {
                return value;
            }
            storage.insert(hash_key, HashPair { key, value });
        }
        Value::hash(storage)
    }

    fn eval_index(
        &mut self,
        token: &Token,
        left: &Expression,
        start: Option<&Expression>,
        end: Option<&Expression>,
        has_range: bool,
        env: &Scope,
    ) -> Value {
        let target = self.eval_expression(left, env);
        if target.is_aborting() {
            return target;
        }

        if has_range {
            let start = match start {
                Some(expression) => {
                    let value = self.eval_expression(expression, env);
                    if value.is_aborting() {
                        return value;
                    }
                    value
                }
                None => Value::Null,
            };
            let end = match end {
                Some(expression) => {
                    let value = self.eval_expression(expression, env);
                    if value.is_aborting() {
                        return value;
                    }
                    value
                }
                None => Value::Null,
            };
            return Self::eval_range_index(token, &target, &start, &end);
        }

        let Some(index_expression) = start else {
            return Value::error(token.data.clone(), "missing index expression");
        };
        let index = self.eval_expression(index_expression, env);
        if index.is_aborting() {
            return index;
        }
        Self::eval_single_index(token, &target, &index)
    }

    fn eval_single_index(token: &Token, target: &Value, index: &Value) -> Value {
        match target {
            Value::Array(elements) => {
                let Value::Integer(raw) = index else {
                    return Value::error(token.data.clone(), format!("unusable as index: {}", index.kind()));
                };
                let elements = elements.borrow();
                let length = elements.len() as i64;
                let position = normalize_index(*raw, length);
                if position < 0 || position >= length {
                    return Value::error(token.data.clone(), format!("index out of range: {}", format_float(*raw)));
                }
                elements[position as usize].clone()
            }
            Value::Str(text) => {
                let Value::Integer(raw) = index else {
                    return Value::error(token.data.clone(), format!("unusable as index: {}", index.kind()));
                };
                let characters: Vec<char> = text.as_str().chars().collect();
                let length = characters.len() as i64;
                let position = normalize_index(*raw, length);
                if position < 0 || position >= length {
                    return Value::error(token.data.clone(), format!("index out of range: {}", format_float(*raw)));
                }
                Value::string(characters[position as usize].to_string())
            }
            Value::Hash(storage) => {
                let Some(hash_key) = index.hash_key() else {
                    return Value::error(token.data.clone(), format!("unusable as hash key: {}", index.kind()));
                };
                storage
                    .borrow()
                    .get(&hash_key)
                    .map_or(Value::Null, |pair| pair.value.clone())
            }
            other => Value::error(
                token.data.clone(),
                format!("index operator not supported: {}", other.kind()),
            ),
        }
    }

    /// `[start:end]` over arrays and strings. Missing endpoints default to
    /// the container bounds, negatives count from the back, and the final
    /// window must satisfy `0 <= start <= end <= len`.
    fn eval_range_index(token: &Token, target: &Value, start: &Value, end: &Value) -> Value {
        let length = match target {
            Value::Array(elements) => elements.borrow().len() as i64,
            Value::Str(text) => text.as_str().chars().count() as i64,
            other => {
                return Value::error(
                    token.data.clone(),
                    format!("index operator not supported: {}", other.kind()),
                );
            }
        };

        let start_position = match start {
            Value::Null => 0,
            Value::Integer(raw) => normalize_index(*raw, length),
            other => return Value::error(token.data.clone(), format!("unusable as index: {}", other.kind())),
        };
        let end_position = match end {
            Value::Null => length,
            Value::Integer(raw) => normalize_index(*raw, length),
            other => return Value::error(token.data.clone(), format!("unusable as index: {}", other.kind())),
        };

        if start_position < 0 || start_position > length || end_position < 0 || end_position > length {
            return Value::error(token.data.clone(), "index out of range");
        }
        if start_position > end_position {
            return Value::error(token.data.clone(), "startIndex larger than endIndex");
        }

        let (start_position, end_position) = (start_position as usize, end_position as usize);
        match target {
            Value::Array(elements) => Value::array(elements.borrow()[start_position..end_position].to_vec()),
            Value::Str(text) => {
                let slice: String = text
                    .as_str()
                    .chars()
                    .skip(start_position)
                    .take(end_position - start_position)
                    .collect();
                Value::string(slice)
            }
            _ => unreachable!("length computed above restricts the kind"),
        }
    }
}

/// Negative indices count from the back.
fn normalize_index(raw: f64, length: i64) -> i64 {
    let mut position = raw.trunc() as i64;
    if position < 0 {
        position += length;
    }
    position
}
