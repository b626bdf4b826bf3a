use crate::ast::{self, Expression, Node, Operator, Statement};
use crate::builtins::BUILTINS;
use crate::environment::Environment;
use crate::object::{EvalError, FunctionObject, HashKey, HashValue, Object, Result};
use std::convert::TryFrom;

pub fn eval(node: Node, env: &mut Environment) -> Result<Object> {
    match node {
        Node::Program(program) => eval_program(program, env),
        Node::Statement(statement) => eval_statement(statement, env),
        Node::Expression(expression) => eval_expression(expression, env),
    }
}

fn eval_program(program: ast::Program, env: &mut Environment) -> Result<Object> {
    let mut result = Object::Null;

    for stmt in program.statements {
        result = eval_statement(stmt, env)?;
        if result.is_return_value() {
            return Ok(result.unwrap_return());
        }
    }

    Ok(result)
}

fn eval_statement(statement: Statement, env: &mut Environment) -> Result<Object> {
    match statement {
        Statement::Let(stmt) => {
            let value = eval_expression(stmt.value, env)?;
            env.set(&stmt.name.value, value);
            Ok(Object::Null)
        }
        Statement::Return(stmt) => {
            let value = eval_expression(stmt.return_value, env)?;
            Ok(Object::ReturnValue(Box::new(value)))
        }
        Statement::Expr(stmt) => eval_expression(stmt.expression, env),
        Statement::Block(block) => eval_block(block, env),
    }
}

// A ReturnValue stays wrapped here; only eval_program and the call boundary
// in apply_function unwrap it. That is what lets `return` skip out of nested
// blocks up to the enclosing call.
fn eval_block(block: ast::BlockStatement, env: &mut Environment) -> Result<Object> {
    let mut result = Object::Null;

    for stmt in block.statements {
        result = eval_statement(stmt, env)?;
        if result.is_return_value() {
            return Ok(result);
        }
    }

    Ok(result)
}

fn eval_expression(expression: Expression, env: &mut Environment) -> Result<Object> {
    match expression {
        Expression::IntegerLiteral(n) => Ok(n.into()),
        Expression::Boolean(b) => Ok(b.0.into()),
        Expression::String(s) => Ok(s.into()),
        Expression::Identifier(id) => env
            .get(&id.value)
            .or_else(|| BUILTINS.get(&id.value).map(|b| Object::Builtin(*b)))
            .ok_or(EvalError::IdentifierNotFound { id: id.value }),
        Expression::Prefix(prefix) => {
            let right = eval_expression(*prefix.right, env)?;
            eval_prefix_expression(prefix.operator, right)
        }
        Expression::Infix(infix) => {
            // Right operand evaluates first.
            let right = eval_expression(*infix.right, env)?;
            let left = eval_expression(*infix.left, env)?;
            eval_infix_expression(infix.operator, left, right)
        }
        Expression::If(expr) => eval_if_expression(expr, env),
        Expression::Function(func) => Ok(Object::Function(FunctionObject {
            parameters: func.parameters,
            body: func.body,
            env: env.clone(),
        })),
        Expression::Call(call) => {
            let function = eval_expression(*call.function, env)?;
            let arguments = eval_expressions(call.arguments, env)?;
            apply_function(function, arguments)
        }
        Expression::Array(array) => Ok(eval_expressions(array.elements, env)?.into()),
        Expression::Index(expr) => {
            let left = eval_expression(*expr.left, env)?;
            let index = eval_expression(*expr.index, env)?;
            eval_index_expression(left, index)
        }
        Expression::Hash(hash) => eval_hash_literal(hash, env),
    }
}

fn eval_prefix_expression(operator: Operator, right: Object) -> Result<Object> {
    match operator {
        Operator::Bang => Ok(Object::Boolean(!right.truth_value())),
        Operator::Minus => match right {
            Object::Integer(n) => Ok(Object::Integer(-n)),
            obj => Err(EvalError::UnknownPrefixOperator {
                operator,
                operand: obj.type_name(),
            }),
        },
        _ => Err(EvalError::UnknownPrefixOperator {
            operator,
            operand: right.type_name(),
        }),
    }
}

fn eval_infix_expression(operator: Operator, left: Object, right: Object) -> Result<Object> {
    match (left, right) {
        (Object::Integer(x), Object::Integer(y)) => eval_integer_infix_expression(operator, x, y),
        (Object::String(x), Object::String(y)) => eval_string_infix_expression(operator, x, y),
        (left, right) => {
            let same_type = left.type_name() == right.type_name();
            match operator {
                Operator::Eq if same_type => Ok(Object::Boolean(left == right)),
                Operator::NotEq if same_type => Ok(Object::Boolean(left != right)),
                _ => Err(EvalError::binary_op_error(
                    left.type_name(),
                    operator,
                    right.type_name(),
                )),
            }
        }
    }
}

fn eval_integer_infix_expression(operator: Operator, left: i64, right: i64) -> Result<Object> {
    Ok(match operator {
        Operator::Plus => Object::Integer(left + right),
        Operator::Minus => Object::Integer(left - right),
        Operator::Asterisk => Object::Integer(left * right),
        Operator::Slash => {
            if right == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Object::Integer(left / right)
        }
        Operator::LT => Object::Boolean(left < right),
        Operator::GT => Object::Boolean(left > right),
        Operator::Eq => Object::Boolean(left == right),
        Operator::NotEq => Object::Boolean(left != right),
        Operator::Bang => {
            return Err(EvalError::UnknownInfixOperator {
                left: "INTEGER",
                operator,
                right: "INTEGER",
            })
        }
    })
}

fn eval_string_infix_expression(operator: Operator, left: String, right: String) -> Result<Object> {
    match operator {
        Operator::Plus => Ok(Object::String(left + &right)),
        Operator::Eq => Ok(Object::Boolean(left == right)),
        Operator::NotEq => Ok(Object::Boolean(left != right)),
        _ => Err(EvalError::UnknownInfixOperator {
            left: "STRING",
            operator,
            right: "STRING",
        }),
    }
}

fn eval_if_expression(expr: ast::IfExpression, env: &mut Environment) -> Result<Object> {
    let condition = eval_expression(*expr.condition, env)?;

    if condition.truth_value() {
        eval_block(expr.consequence, env)
    } else if let Some(alternative) = expr.alternative {
        eval_block(alternative, env)
    } else {
        Ok(Object::Null)
    }
}

fn eval_expressions(expressions: Vec<Expression>, env: &mut Environment) -> Result<Vec<Object>> {
    expressions
        .into_iter()
        .map(|expr| eval_expression(expr, env))
        .collect()
}

fn apply_function(function: Object, arguments: Vec<Object>) -> Result<Object> {
    match function {
        Object::Function(func) => {
            if arguments.len() != func.parameters.len() {
                return Err(EvalError::IncorrectArity {
                    got: arguments.len(),
                    want: func.parameters.len(),
                });
            }

            let mut call_env = Environment::with_enclosed(&func.env);
            for (parameter, argument) in func.parameters.iter().zip(arguments) {
                call_env.set(&parameter.value, argument);
            }

            Ok(eval_block(func.body, &mut call_env)?.unwrap_return())
        }
        Object::Builtin(builtin) => builtin(arguments),
        obj => Err(EvalError::NotAFunction {
            type_name: obj.type_name(),
        }),
    }
}

fn eval_index_expression(left: Object, index: Object) -> Result<Object> {
    match (left, index) {
        (Object::Array(elements), Object::Integer(i)) => {
            if i < 0 {
                return Ok(Object::Null);
            }
            Ok(elements.into_iter().nth(i as usize).unwrap_or(Object::Null))
        }
        (Object::Hash(hash), key) => {
            let key = HashKey::try_from(key)?;
            Ok(hash.values.get(&key).cloned().unwrap_or(Object::Null))
        }
        (obj, _) => Err(EvalError::NotIndexable {
            type_name: obj.type_name(),
        }),
    }
}

fn eval_hash_literal(hash: ast::HashLiteral, env: &mut Environment) -> Result<Object> {
    let mut values = HashValue::default();

    for (key_expr, value_expr) in hash.pairs {
        let key = HashKey::try_from(eval_expression(key_expr, env)?)?;
        let value = eval_expression(value_expr, env)?;
        values.values.insert(key, value);
    }

    Ok(values.into())
}
