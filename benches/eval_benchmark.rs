use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mpexpr_rs::context::{EvalContext, SubstitutionHook};
use mpexpr_rs::engine::{eval, eval_string};
use std::rc::Rc;

struct Params;

impl SubstitutionHook for Params {
    fn variable(&self, name: &str, _index: Option<&str>) -> Result<String, String> {
        match name {
            "a" => Ok("12".to_string()),
            "b" => Ok("3.75".to_string()),
            "c" => Ok("123456789012345678901234567890".to_string()),
            _ => Err(format!("can't read \"{}\": no such variable", name)),
        }
    }

    fn command(&self, script: &str, ctx: &EvalContext) -> Result<String, String> {
        eval_string(script, ctx).map_err(|e| e.to_string())
    }
}

fn create_bench_context(precision: u32) -> EvalContext {
    let mut ctx = EvalContext::new();
    ctx.set_precision(precision).unwrap();
    ctx.set_substitution_hook(Rc::new(Params));
    ctx
}

fn get_bench_expressions() -> Vec<(&'static str, &'static str)> {
    vec![
        ("integer", "(1 + 2) * 3 - 4 / 2 + (17 % 5) << 3"),
        ("rational", "1/3.0 + 2/7.0 * (5.5 - 0.25) / 1.125"),
        ("logical", "$a > 10 && $b < 4 || $c == 0 ? $a * 2 : $b / 2"),
        ("big_integer", "$c * $c + fact(50) / fib(80)"),
        ("number_theory", "pmod(3, 1000, 1000000007) + gcd(fact(40), fib(90))"),
        ("transcendental", "sin($b) * cos($b) + exp(1.5) - log(10.0)"),
        ("nested", "[$a * [$a + 1]] + [$b * 2]"),
    ]
}

fn bench_expressions(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");
    let ctx = create_bench_context(17);
    for (name, expr) in get_bench_expressions() {
        group.bench_function(name, |b| b.iter(|| eval(black_box(expr), &ctx)));
    }
    group.finish();
}

fn bench_precision(c: &mut Criterion) {
    let mut group = c.benchmark_group("precision");
    group.sample_size(20);
    for precision in [10u32, 50, 200] {
        let ctx = create_bench_context(precision);
        group.bench_function(format!("pi_{}", precision), |b| {
            b.iter(|| eval_string(black_box("pi()"), &ctx))
        });
        group.bench_function(format!("sqrt_{}", precision), |b| {
            b.iter(|| eval_string(black_box("sqrt(2.0)"), &ctx))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_expressions, bench_precision);
criterion_main!(benches);
