use crate::object::{EvalError, Object, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;

pub type Builtin = fn(Vec<Object>) -> Result<Object>;

fn expect_arity(args: &[Object], want: usize) -> Result<()> {
    if args.len() == want {
        Ok(())
    } else {
        Err(EvalError::IncorrectArity {
            got: args.len(),
            want,
        })
    }
}

fn len(args: Vec<Object>) -> Result<Object> {
    expect_arity(&args, 1)?;

    match args.into_iter().next().unwrap() {
        Object::String(s) => Ok(Object::Integer(s.len() as i64)),
        Object::Array(a) => Ok(Object::Integer(a.len() as i64)),
        obj => Err(EvalError::UnsupportedArgType {
            fn_name: "len",
            type_name: obj.type_name(),
        }),
    }
}

fn first(args: Vec<Object>) -> Result<Object> {
    expect_arity(&args, 1)?;

    match args.into_iter().next().unwrap() {
        Object::Array(a) => Ok(a.into_iter().next().unwrap_or_default()),
        obj => Err(EvalError::UnsupportedArgType {
            fn_name: "first",
            type_name: obj.type_name(),
        }),
    }
}

fn last(args: Vec<Object>) -> Result<Object> {
    expect_arity(&args, 1)?;

    match args.into_iter().next().unwrap() {
        Object::Array(a) => Ok(a.into_iter().last().unwrap_or_default()),
        obj => Err(EvalError::UnsupportedArgType {
            fn_name: "last",
            type_name: obj.type_name(),
        }),
    }
}

fn rest(args: Vec<Object>) -> Result<Object> {
    expect_arity(&args, 1)?;

    match args.into_iter().next().unwrap() {
        Object::Array(a) => {
            if a.is_empty() {
                Ok(Object::Null)
            } else {
                Ok(Object::Array(a[1..].to_vec()))
            }
        }
        obj => Err(EvalError::UnsupportedArgType {
            fn_name: "rest",
            type_name: obj.type_name(),
        }),
    }
}

// Non-mutating; returns a new array with the element appended.
fn push(args: Vec<Object>) -> Result<Object> {
    expect_arity(&args, 2)?;

    let mut args = args.into_iter();
    match args.next().unwrap() {
        Object::Array(mut a) => {
            a.push(args.next().unwrap());
            Ok(a.into())
        }
        obj => Err(EvalError::UnsupportedArgType {
            fn_name: "push",
            type_name: obj.type_name(),
        }),
    }
}

fn puts(args: Vec<Object>) -> Result<Object> {
    for arg in args.iter() {
        println!("{}", arg);
    }
    Ok(Object::Null)
}

// Bare fn pointers rather than Object values: a function Object carries an
// Environment handle, which is not Sync and so cannot live in a static.
lazy_static! {
    pub static ref BUILTINS: HashMap<String, Builtin> = vec![
        ("len".to_owned(), len as Builtin),
        ("first".to_owned(), first as Builtin),
        ("last".to_owned(), last as Builtin),
        ("rest".to_owned(), rest as Builtin),
        ("push".to_owned(), push as Builtin),
        ("puts".to_owned(), puts as Builtin),
    ]
    .into_iter()
    .collect();
}
