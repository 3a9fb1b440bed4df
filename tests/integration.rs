use mpexpr_rs::context::{EvalContext, Settings};
use mpexpr_rs::engine::{eval, eval_bool, eval_int, eval_rational, eval_string};
use mpexpr_rs::error::ExprError;
use mpexpr_rs::types::ArgKind;
use mpexpr_rs::value::Value;
use mpexpr_rs::{BigInt, BigRational};

mod test_helpers;
use test_helpers::{create_context, ev, ev_str, init_tracing};

#[test]
fn test_documented_scenarios() {
    init_tracing();
    assert_eq!(ev("2 + 3 * 4"), Value::from(14));
    assert_eq!(ev("10 / 3"), Value::from(3));
    assert_eq!(ev("-10 / 3"), Value::from(-4));
    assert_eq!(ev("fact(5)"), Value::from(120));
    assert_eq!(ev("gcd(12,18)"), Value::from(6));

    let ctx = create_context(5);
    assert_eq!(eval_string("1/3.0", &ctx).unwrap(), ".33333");
    assert_eq!(
        eval_rational("1/3.0", &ctx).unwrap(),
        BigRational::new(BigInt::one(), BigInt::from_i64(3)).unwrap()
    );
}

#[test]
fn test_division_sign_law_examples() {
    assert_eq!(ev("-7 % 3"), Value::from(2));
    assert_eq!(ev("7 % -3"), Value::from(-2));
    assert_eq!(ev("-7 / 3"), Value::from(-3));
    assert_eq!(ev("7 / -3"), Value::from(-3));
    assert_eq!(ev("-7 / -3"), Value::from(2));
    assert_eq!(ev("-7 % -3"), Value::from(-1));
}

#[test]
fn test_primality_known_values() {
    assert_eq!(ev("prime(97, 5)"), Value::from(1));
    assert_eq!(ev("prime(100, 5)"), Value::from(0));
    assert_eq!(ev("prime(561, 5)"), Value::from(0));
    assert_eq!(ev("prime(2147483647, 10)"), Value::from(1));
}

#[test]
fn test_big_integer_expressions() {
    assert_eq!(ev_str("2 << 99", 17), "1267650600228229401496703205376");
    assert_eq!(ev_str("0xffffffffffffffffffff + 1", 17), "1208925819614629174706176");
    assert_eq!(ev_str("fib(100)", 17), "354224848179261915075");
    assert_eq!(ev_str("comb(100, 50)", 17), "100891344545564193334812497256");
    assert_eq!(ev("pmod(2, 1000, 1000007)"), Value::from(783922));
    assert_eq!(ev("pmod(3, 200, 1000)"), Value::from(1));
    assert_eq!(ev("(1 << 200) / (1 << 198)"), Value::from(4));
    assert_eq!(ev("0b1010 + 017 + 0x1F"), Value::from(10 + 15 + 31));
}

#[test]
fn test_rendering_huge_values() {
    let ctx = create_context(17);
    let literal = format!("1{}", "0".repeat(140_000));
    assert_eq!(eval_string(&literal, &ctx).unwrap(), literal);

    let text = eval_string("1e200000", &ctx).unwrap();
    assert_eq!(text.len(), 200_003);
    assert!(text.starts_with('1'));
    assert!(text.ends_with("0.0"));

    let text = eval_string(&format!("{} * 7 + 3", literal), &ctx).unwrap();
    assert_eq!(text.len(), 140_001);
    assert!(text.starts_with("70000"));
    assert!(text.ends_with("00003"));
}

#[test]
fn test_rational_rendering() {
    assert_eq!(ev_str("2 / 3.", 5), ".66667");
    assert_eq!(ev_str("-1 / 2.", 17), "-.5");
    assert_eq!(ev_str("1.5 * 4", 17), "6.0");
    assert_eq!(ev_str("1e3 + .25", 17), "1000.25");
    assert_eq!(ev_str("1.5e-3", 17), ".0015");
    assert_eq!(ev_str("1 / 8.", 2), ".12");
    assert_eq!(ev_str("round(2.5) + round(3.5)", 17), "6");
}

#[test]
fn test_precision_changes_results() {
    let mut ctx = EvalContext::new();
    ctx.set_precision(3).unwrap();
    assert_eq!(eval_string("1 / 7.", &ctx).unwrap(), ".143");
    ctx.set_precision_str("10").unwrap();
    assert_eq!(eval_string("1 / 7.", &ctx).unwrap(), ".1428571429");
    assert!(matches!(ctx.set_precision_str("ten"), Err(ExprError::InvalidPrecision(_))));
    assert!(matches!(ctx.set_precision_str("12abc"), Err(ExprError::InvalidPrecision(_))));
    assert!(matches!(ctx.set_precision_str("10001"), Err(ExprError::InvalidPrecision(_))));
    assert_eq!(ctx.precision(), 10);
}

#[test]
fn test_settings_from_json() {
    let settings: Settings =
        serde_json::from_str(r#"{ "precision": 4, "max_factorial": 100 }"#).unwrap();
    let ctx = EvalContext::with_settings(settings).unwrap();
    assert_eq!(eval_string("2 / 3.", &ctx).unwrap(), ".6667");
    assert_eq!(eval_string("fact(100) > 0", &ctx).unwrap(), "1");
    assert_eq!(
        eval("fact(101)", &ctx).unwrap_err(),
        ExprError::math("Very large factorial")
    );

    let bad: Settings = serde_json::from_str(r#"{ "precision": 20000 }"#).unwrap();
    assert!(EvalContext::with_settings(bad).is_err());
}

#[test]
fn test_value_kind_entry_points() {
    let ctx = EvalContext::new();
    assert_eq!(eval_int("22 / 7.", &ctx).unwrap(), BigInt::from_i64(3));
    assert_eq!(eval_int("-22 / 7.", &ctx).unwrap(), BigInt::from_i64(-3));
    assert_eq!(eval_rational("3", &ctx).unwrap(), BigRational::from_i64(3));
    assert!(eval_bool("1 < 2", &ctx).unwrap());
    assert!(!eval_bool("0.0", &ctx).unwrap());
    assert_eq!(eval_int("{abc}", &ctx).unwrap_err(), ExprError::NonNumericResult);
    assert_eq!(
        eval_rational("\"abc\"", &ctx).unwrap_err().to_string(),
        "expression didn't have numeric value"
    );
}

#[test]
fn test_string_operands() {
    assert_eq!(ev("{abc}"), Value::from("abc"));
    assert_eq!(ev("\"12\" + 1"), Value::from(13));
    assert_eq!(ev("{ 1.5} * 2"), Value::Rational(BigRational::from_i64(3)));
    assert_eq!(ev("{1.5 }"), Value::from("1.5 "));
    assert_eq!(ev("{apple} < {banana}"), Value::from(1));
    assert_eq!(ev("{b} > {abc}"), Value::from(1));
    assert_eq!(ev("\"x\" == {x}"), Value::from(1));
}

#[test]
fn test_error_messages() {
    let ctx = EvalContext::new();
    let message = |expr: &str| eval(expr, &ctx).unwrap_err().to_string();
    assert_eq!(message("1 +"), "syntax error in expression \"1 +\"");
    assert_eq!(message("(1 + 2"), "unmatched parentheses in expression \"(1 + 2\"");
    assert_eq!(message("1.5 & 1"), "can't use floating-point value as operand of \"&\"");
    assert_eq!(message("{a} * 2"), "can't use non-numeric string as operand of \"*\"");
    assert_eq!(message("1 : 2"), "can't have : operator without ? first");
    assert_eq!(message("foo(1)"), "unknown math function \"foo\"");
    assert_eq!(message("gcd(1, 2, 3)"), "too many arguments for math function");
    assert_eq!(message("gcd(1)"), "too few arguments for math function");
    assert_eq!(message("pi(1)"), "syntax error in expression \"pi(1)\"");
    assert_eq!(message("sqrt({a})"), "argument to math function didn't have numeric value");
    assert_eq!(message("5 / 0"), "divide by zero");
    assert_eq!(message("fact(-3)"), "Negative argument for factorial");
    assert_eq!(message("sqrt(-1)"), "Square root of negative number");
    assert_eq!(message("1.0e2000000"), "Exponent too large");
}

#[test]
fn test_error_codes_are_stable() {
    let ctx = EvalContext::new();
    let code = |expr: &str| eval(expr, &ctx).unwrap_err().error_code();
    assert_eq!(code("1 +"), 1);
    assert_eq!(code("(1"), 2);
    assert_eq!(code("1.5 % 2"), 3);
    assert_eq!(code("nope(1)"), 6);
    assert_eq!(code("1 / 0"), 10);
    assert_eq!(code("fact(-1)"), 11);
}

#[test]
fn test_registered_functions() {
    let mut ctx = EvalContext::new();
    ctx.register_math_function("avg", &[ArgKind::Double, ArgKind::Double], |args, _| {
        let a = args[0].to_rational().unwrap_or_default();
        let b = args[1].to_rational().unwrap_or_default();
        Ok(Value::Rational((&a + &b).checked_div(&BigRational::from_i64(2))?))
    })
    .unwrap();
    ctx.set_precision(4).unwrap();
    assert_eq!(eval_string("avg(1, 2)", &ctx).unwrap(), "1.5");
    assert_eq!(eval_string("avg(avg(0, 1), 1)", &ctx).unwrap(), ".75");

    // Builtins may be replaced.
    ctx.register_math_function("fact", &[ArgKind::Int], |_, _| Ok(Value::from(-1)))
        .unwrap();
    assert_eq!(eval("fact(5)", &ctx).unwrap(), Value::from(-1));

    assert!(ctx.unregister_math_function("avg").unwrap());
    assert!(matches!(
        eval("avg(1, 2)", &ctx),
        Err(ExprError::UnknownFunction { .. })
    ));
    assert_eq!(
        ctx.register_math_function("too_many", &[ArgKind::Int; 6], |_, _| Ok(Value::default()))
            .unwrap_err(),
        ExprError::CapacityExceeded("math function arguments")
    );
}

#[test]
fn test_context_clone_is_independent() {
    let mut a = create_context(5);
    let b = a.clone();
    a.set_precision(2).unwrap();
    assert_eq!(eval_string("1 / 3.", &a).unwrap(), ".33");
    assert_eq!(eval_string("1 / 3.", &b).unwrap(), ".33333");
}
