use mpexpr_rs::context::EvalContext;
use mpexpr_rs::engine::{eval, eval_string};
use mpexpr_rs::error::ExprError;
use mpexpr_rs::types::ArgKind;
use mpexpr_rs::value::Value;
use std::cell::Cell;
use std::rc::Rc;

mod test_helpers;
use test_helpers::{CountingHook, ev};

fn hooked(vars: &[(&str, &str)]) -> (EvalContext, Rc<CountingHook>) {
    let hook = Rc::new(CountingHook::with_vars(vars));
    let mut ctx = EvalContext::new();
    ctx.set_substitution_hook(hook.clone());
    (ctx, hook)
}

#[test]
fn test_basic_logical_operations() {
    assert_eq!(ev("1 && 1"), Value::from(1));
    assert_eq!(ev("1 && 0"), Value::from(0));
    assert_eq!(ev("0 || 0"), Value::from(0));
    assert_eq!(ev("0 || 7"), Value::from(1));
    assert_eq!(ev("(5 > 3) && (2 < 4)"), Value::from(1));
    assert_eq!(ev("(5 < 3) || (2 > 4)"), Value::from(0));
    assert_eq!(ev("0.25 && 3"), Value::from(1));
    assert_eq!(ev("0.0 || 0.0"), Value::from(0));
    assert_eq!(ev("!0.0"), Value::from(1));
    assert_eq!(ev("!!5"), Value::from(1));
}

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(ev("1 || 0 && 0"), Value::from(1));
    assert_eq!(ev("0 && 0 || 1"), Value::from(1));
    assert_eq!(ev("1 | 2 && 0"), Value::from(0));
}

#[test]
fn test_ternary_right_associativity() {
    assert_eq!(ev("1 ? 2 : 3 ? 4 : 5"), Value::from(2));
    assert_eq!(ev("0 ? 2 : 0 ? 4 : 5"), Value::from(5));
    assert_eq!(ev("1 ? 0 ? 6 : 7 : 8"), Value::from(7));
    assert_eq!(ev("1 + 1 ? 2 * 3 : 4"), Value::from(6));
    assert_eq!(ev("0 || 0 ? 10 : 20"), Value::from(20));
    assert_eq!(ev("(0 ? 1 : 2) * 3"), Value::from(6));
}

#[test]
fn test_ternary_branches_keep_kind() {
    assert_eq!(ev("1 ? {yes} : {no}"), Value::from("yes"));
    assert_eq!(ev("0 ? {yes} : 2.5"), Value::Rational(mpexpr_rs::BigRational::new(
        mpexpr_rs::BigInt::from_i64(5),
        mpexpr_rs::BigInt::from_i64(2),
    ).unwrap()));
}

#[test]
fn test_short_circuit_suppresses_substitution() {
    let (ctx, hook) = hooked(&[("x", "1")]);

    assert_eq!(eval("0 && $undefined", &ctx).unwrap(), Value::from(0));
    assert_eq!(eval("1 || [$undefined]", &ctx).unwrap(), Value::from(1));
    assert_eq!(eval("1 ? 5 : $undefined", &ctx).unwrap(), Value::from(5));
    assert_eq!(eval("0 ? $undefined : 6", &ctx).unwrap(), Value::from(6));
    assert_eq!(eval("0 && (1 ? $a : [$b])", &ctx).unwrap(), Value::from(0));
    assert_eq!(hook.calls.get(), 0);

    assert_eq!(eval("$x && $x", &ctx).unwrap(), Value::from(1));
    assert_eq!(hook.calls.get(), 2);

    assert_eq!(
        eval("1 && $undefined", &ctx).unwrap_err(),
        ExprError::Substitution("can't read \"undefined\": no such variable".to_string())
    );
}

#[test]
fn test_short_circuit_suppresses_function_calls() {
    let count = Rc::new(Cell::new(0));
    let mut ctx = EvalContext::new();
    let counter = count.clone();
    ctx.register_math_function("tick", &[], move |_, _| {
        counter.set(counter.get() + 1);
        Ok(Value::from(1))
    })
    .unwrap();

    assert_eq!(eval("0 && tick()", &ctx).unwrap(), Value::from(0));
    assert_eq!(eval("1 || tick()", &ctx).unwrap(), Value::from(1));
    assert_eq!(eval("0 ? tick() : 0 ? tick() : 3", &ctx).unwrap(), Value::from(3));
    assert_eq!(count.get(), 0, "skipped operands must not call functions");

    assert_eq!(eval("tick() && tick()", &ctx).unwrap(), Value::from(1));
    assert_eq!(count.get(), 2);
}

#[test]
fn test_skipped_operands_are_still_checked() {
    let ctx = EvalContext::new();
    assert!(matches!(eval("0 && (1 + ", &ctx), Err(ExprError::Syntax { .. })));
    assert!(matches!(
        eval("1 || nothing(2)", &ctx),
        Err(ExprError::UnknownFunction { .. })
    ));
    assert_eq!(eval("0 && gcd(1)", &ctx).unwrap_err(), ExprError::TooFewArguments);
    // Operators are not applied, so their operand errors do not surface.
    assert_eq!(eval("0 && {a} * 2", &ctx).unwrap(), Value::from(0));
    assert_eq!(eval("1 || 1 / 0", &ctx).unwrap(), Value::from(1));
}

#[test]
fn test_string_conditions() {
    let ctx = EvalContext::new();
    assert_eq!(
        eval("{abc} || 1", &ctx).unwrap_err(),
        ExprError::IllegalOperand {
            op: "||".to_string(),
            kind: "non-numeric string"
        }
    );
    assert_eq!(
        eval("1 && {abc}", &ctx).unwrap_err(),
        ExprError::IllegalOperand {
            op: "&&".to_string(),
            kind: "non-numeric string"
        }
    );
    assert!(matches!(eval("{abc} ? 1 : 2", &ctx), Err(ExprError::IllegalOperand { .. })));
    // Tolerated when nothing is evaluated.
    assert_eq!(eval("0 && ({abc} || 1)", &ctx).unwrap(), Value::from(0));
}

#[test]
fn test_nested_evaluation_through_hook() {
    let (mut ctx, hook) = hooked(&[("n", "10")]);
    ctx.set_precision(3).unwrap();
    ctx.register_math_function("half", &[ArgKind::Double], |args, _| {
        let q = args[0].to_rational().unwrap_or_default();
        Ok(Value::Rational(q.checked_div(&mpexpr_rs::BigRational::from_i64(2))?))
    })
    .unwrap();
    assert_eq!(eval_string("[half($n)] + 1", &ctx).unwrap(), "6.0");
    assert_eq!(eval_string("[[$n * 2] + 1] * 2", &ctx).unwrap(), "42");
    assert_eq!(hook.calls.get(), 5);
}
