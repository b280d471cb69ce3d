//! Tree‑walking evaluator.
//!
//! Statements run in order against a *current environment*, starting from the
//! global scope (pre‑seeded with `clock`).  Output of `print` is collected
//! rather than written, and the first runtime error stops the run while
//! keeping whatever was printed before it.
//!
//! `return` is not an error: statement execution yields a [`Flow`], and only
//! the call boundary in [`Interpreter::call_function`] consumes a
//! `Flow::Return`.  Loops and blocks just hand it upward.

use std::collections::HashMap;
use std::mem;
use std::rc::Rc;
use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use log::{debug, info};

use crate::ast::{Expr, ExprId, FunctionDecl, LiteralValue, Stmt};
use crate::environment::{self, EnvRef, Environment};
use crate::error::RuntimeError;
use crate::resolver::Locals;
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenType};
use crate::value::{
    Callable, InstanceRef, LoxClass, LoxFunction, LoxInstance, NativeFunction, Value, INITIALIZER,
};

/// Default limit on nested user‑function and class calls.
pub const DEFAULT_MAX_DEPTH: usize = 4096;

/// How a statement finished.
#[derive(Debug)]
enum Flow {
    Normal,
    Return(Value),
}

type Exec = Result<Flow, RuntimeError>;

/// Convenient alias for evaluation results.
pub type EvalResult<T> = Result<T, RuntimeError>;

pub struct Interpreter {
    globals: EnvRef,
    environment: EnvRef,
    locals: Locals,
    output: Vec<String>,
    depth: usize,
    max_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates a new Interpreter and defines native functions such as `clock`.
    pub fn new() -> Self {
        info!("Initializing Interpreter");

        let globals: EnvRef = Environment::new().into_ref();

        debug!("Defining native function 'clock'");

        globals.borrow_mut().define(
            "clock",
            Value::Callable(Callable::Native(Rc::new(NativeFunction {
                name: "clock".to_string(),
                arity: 0,
                func: clock,
            }))),
        );

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output: Vec::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the call‑depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Record the resolver's binding distances.  Tables from several
    /// resolve passes accumulate.
    pub fn resolve(&mut self, locals: Locals) {
        debug!("Recording {} resolved locals", locals.len());

        self.locals.extend(locals);
    }

    /// Run a program.  Returns the lines printed by this call and the runtime
    /// error that stopped it, if any.
    pub fn interpret(&mut self, statements: &[Stmt]) -> (Vec<String>, Option<RuntimeError>) {
        debug!("Interpreting {} statements", statements.len());

        let mut failure: Option<RuntimeError> = None;

        for stmt in statements {
            if let Err(err) = self.execute(stmt) {
                debug!("Runtime error: {}", err);
                failure = Some(err);
                break;
            }
        }

        if failure.is_none() {
            info!("Interpretation completed successfully");
        }

        (mem::take(&mut self.output), failure)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────

    fn execute(&mut self, stmt: &Stmt) -> Exec {
        ensure_sufficient_stack(|| self.execute_stmt(stmt))
    }

    fn execute_stmt(&mut self, stmt: &Stmt) -> Exec {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value: Value = self.evaluate(expr)?;
                let line: String = value.to_string();
                debug!("Printed value: {}", line);
                self.output.push(line);
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value: Value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let scope = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, scope.into_ref())
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Function(decl) => {
                debug!("Defining function '{}'", decl.name.lexeme);

                let function = LoxFunction::new(Rc::clone(decl), Rc::clone(&self.environment), false);
                self.environment.borrow_mut().define(
                    &decl.name.lexeme,
                    Value::Callable(Callable::Function(Rc::new(function))),
                );
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value: Value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                self.execute_class(name, superclass.as_ref(), methods)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Run `statements` in `scope`, restoring the previous scope afterwards
    /// whether they finish, return, or fail.
    fn execute_block(&mut self, statements: &[Stmt], scope: EnvRef) -> Exec {
        let previous: EnvRef = mem::replace(&mut self.environment, scope);

        let mut result: Exec = Ok(Flow::Normal);
        for stmt in statements {
            match self.execute(stmt) {
                Ok(Flow::Normal) => {}
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> EvalResult<()> {
        debug!("Defining class '{}'", name.lexeme);

        let superclass: Option<Rc<LoxClass>> = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Callable(Callable::Class(class)) => Some(class),
                _ => {
                    let at: &Token = match expr {
                        Expr::Variable { name, .. } => name,
                        _ => name,
                    };
                    return Err(RuntimeError::new(at, "Superclass must be a class."));
                }
            },
            None => None,
        };

        // Defined before the methods are built so they can refer to the class.
        self.environment.borrow_mut().define(&name.lexeme, Value::Nil);

        let previous: Option<EnvRef> = superclass.as_ref().map(|class| {
            let mut scope = Environment::with_enclosing(Rc::clone(&self.environment));
            scope.define("super", Value::Callable(Callable::Class(Rc::clone(class))));
            mem::replace(&mut self.environment, scope.into_ref())
        });

        let methods: HashMap<String, Rc<LoxFunction>> = methods
            .iter()
            .map(|decl| {
                let function = LoxFunction::new(
                    Rc::clone(decl),
                    Rc::clone(&self.environment),
                    decl.name.lexeme == INITIALIZER,
                );
                (decl.name.lexeme.clone(), Rc::new(function))
            })
            .collect();

        let class = LoxClass {
            name: name.lexeme.clone(),
            superclass,
            methods,
        };

        if let Some(previous) = previous {
            self.environment = previous;
        }

        self.environment
            .borrow_mut()
            .assign(name, Value::Callable(Callable::Class(Rc::new(class))))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.evaluate_expr(expr))
    }

    fn evaluate_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left: Value = self.evaluate(left)?;

                let decided: bool = if operator.token_type == TokenType::OR {
                    left.is_truthy()
                } else {
                    !left.is_truthy()
                };

                if decided {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value: Value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => {
                        environment::assign_at(&self.environment, distance, name, value.clone())?
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee: Value = self.evaluate(callee)?;

                let mut args: Vec<Value> = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.evaluate(arg)?);
                }

                self.call_value(callee, paren, args)
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => LoxInstance::get(&instance, name),
                _ => Err(RuntimeError::new(name, "Only instances have properties.")),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let instance: InstanceRef = match self.evaluate(object)? {
                    Value::Instance(instance) => instance,
                    _ => return Err(RuntimeError::new(name, "Only instances have fields.")),
                };

                let value: Value = self.evaluate(value)?;
                instance.borrow_mut().set(name, value.clone());
                Ok(value)
            }

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> EvalResult<Value> {
        let right: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::new(operator, "Operand must be a number.")),
            },
            TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),
            _ => Err(RuntimeError::new(operator, "Invalid unary operator.")),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> EvalResult<Value> {
        let left: Value = self.evaluate(left)?;
        let right: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::PLUS => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                _ => Err(RuntimeError::new(
                    operator,
                    "Operands must be two numbers or two strings.",
                )),
            },

            TokenType::MINUS => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Number(a - b))
            }

            TokenType::STAR => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Number(a * b))
            }

            // IEEE‑754: dividing by zero yields an infinity or NaN.
            TokenType::SLASH => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Number(a / b))
            }

            TokenType::GREATER => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a > b))
            }

            TokenType::GREATER_EQUAL => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a >= b))
            }

            TokenType::LESS => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a < b))
            }

            TokenType::LESS_EQUAL => {
                let (a, b) = number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a <= b))
            }

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(left == right)),

            TokenType::BANG_EQUAL => Ok(Value::Bool(left != right)),

            _ => Err(RuntimeError::new(operator, "Invalid binary operator.")),
        }
    }

    /// `super.method` starts the lookup above the class that *defines* the
    /// running method, then binds the result to the current `this`.
    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> EvalResult<Value> {
        let undefined_property =
            || RuntimeError::new(method, format!("Undefined property '{}'.", method.lexeme));

        let distance: usize = *self.locals.get(&id).ok_or_else(undefined_property)?;

        let superclass: Rc<LoxClass> = match environment::get_at(&self.environment, distance, keyword)? {
            Value::Callable(Callable::Class(class)) => class,
            _ => return Err(RuntimeError::new(keyword, "Superclass must be a class.")),
        };

        // `this` lives in the scope just inside the one binding `super`.
        let this: Option<Value> = distance
            .checked_sub(1)
            .and_then(|d| environment::ancestor(&self.environment, d))
            .and_then(|scope| {
                let this = scope.borrow().lookup("this");
                this
            });

        let instance: InstanceRef = match this {
            Some(Value::Instance(instance)) => instance,
            _ => return Err(RuntimeError::new(keyword, "Can't use 'super' outside of a method.")),
        };

        let found: Rc<LoxFunction> = superclass
            .find_method(&method.lexeme)
            .ok_or_else(undefined_property)?;

        Ok(Value::Callable(Callable::Function(Rc::new(found.bind(instance)))))
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> EvalResult<Value> {
        match self.locals.get(&id) {
            Some(&distance) => environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Calls
    // ─────────────────────────────────────────────────────────────────────────

    fn call_value(&mut self, callee: Value, paren: &Token, args: Vec<Value>) -> EvalResult<Value> {
        let callable: Callable = match callee {
            Value::Callable(callable) => callable,
            _ => {
                return Err(RuntimeError::new(
                    paren,
                    "Can only call functions and classes.",
                ))
            }
        };

        if args.len() != callable.arity() {
            return Err(RuntimeError::new(
                paren,
                format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    args.len()
                ),
            ));
        }

        match callable {
            Callable::Native(native) => {
                debug!("Calling native function '{}'", native.name);
                (native.func)(&args).map_err(|message| RuntimeError::new(paren, message))
            }

            Callable::Function(function) => self.call_function(&function, args, paren),

            Callable::Class(class) => {
                debug!("Instantiating class '{}'", class.name);

                let instance: InstanceRef = LoxInstance::new(Rc::clone(&class));

                if let Some(initializer) = class.find_method(INITIALIZER) {
                    let bound: LoxFunction = initializer.bind(Rc::clone(&instance));
                    self.call_function(&bound, args, paren)?;
                }

                Ok(Value::Instance(instance))
            }
        }
    }

    /// Invoke a user function: fresh scope over the closure, parameters bound,
    /// body run as a block.  This is the only place a `Flow::Return` stops.
    fn call_function(
        &mut self,
        function: &LoxFunction,
        args: Vec<Value>,
        paren: &Token,
    ) -> EvalResult<Value> {
        let decl: &FunctionDecl = &function.declaration;

        if self.depth >= self.max_depth {
            return Err(RuntimeError::new(paren, "Stack overflow."));
        }

        debug!("Calling user-defined function '{}'", decl.name.lexeme);

        let mut scope = Environment::with_enclosing(Rc::clone(&function.closure));
        for (param, arg) in decl.params.iter().zip(args) {
            scope.define(&param.lexeme, arg);
        }

        self.depth += 1;
        let result: Exec = self.execute_block(&decl.body, scope.into_ref());
        self.depth -= 1;

        let flow: Flow = result?;

        if function.is_initializer {
            // `init` always yields the instance, whatever it returned.
            let this: Option<Value> = function.closure.borrow().lookup("this");
            return Ok(this.unwrap_or(Value::Nil));
        }

        Ok(match flow {
            Flow::Return(value) => value,
            Flow::Normal => Value::Nil,
        })
    }
}

/// Seconds since the Unix epoch.
fn clock(_args: &[Value]) -> Result<Value, String> {
    let timestamp: f64 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e: SystemTimeError| format!("Clock error: {}", e))?
        .as_secs_f64();

    Ok(Value::Number(timestamp))
}

fn number_operands(operator: &Token, left: &Value, right: &Value) -> EvalResult<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError::new(operator, "Operands must be numbers.")),
    }
}
