use mpexpr_rs::context::{EvalContext, SubstitutionHook};
use mpexpr_rs::engine::{eval, eval_string};
use mpexpr_rs::value::Value;
use std::cell::Cell;
use std::collections::HashMap;

/// Installs a tracing subscriber that writes through the test harness.
/// Set `RUST_LOG=mpexpr_rs=trace` to see evaluator dispatch.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Context with the built-in functions and the given precision.
#[allow(dead_code)]
pub fn create_context(precision: u32) -> EvalContext {
    let mut ctx = EvalContext::new();
    ctx.set_precision(precision).expect("precision in range");
    ctx
}

/// Evaluates with a default context.
#[allow(dead_code)]
pub fn ev(expr: &str) -> Value {
    eval(expr, &EvalContext::new()).unwrap_or_else(|e| panic!("{}: {}", expr, e))
}

/// Evaluates and renders with the given precision.
#[allow(dead_code)]
pub fn ev_str(expr: &str, precision: u32) -> String {
    eval_string(expr, &create_context(precision)).unwrap_or_else(|e| panic!("{}: {}", expr, e))
}

/// Variable table hook that counts every call it receives.
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingHook {
    pub vars: HashMap<String, String>,
    pub calls: Cell<usize>,
}

#[allow(dead_code)]
impl CountingHook {
    pub fn with_vars(vars: &[(&str, &str)]) -> Self {
        CountingHook {
            vars: vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            calls: Cell::new(0),
        }
    }
}

impl SubstitutionHook for CountingHook {
    fn variable(&self, name: &str, index: Option<&str>) -> Result<String, String> {
        self.calls.set(self.calls.get() + 1);
        let key = match index {
            Some(i) => format!("{}({})", name, i),
            None => name.to_string(),
        };
        self.vars
            .get(&key)
            .cloned()
            .ok_or_else(|| format!("can't read \"{}\": no such variable", key))
    }

    fn command(&self, script: &str, ctx: &EvalContext) -> Result<String, String> {
        self.calls.set(self.calls.get() + 1);
        eval_string(script, ctx).map_err(|e| e.to_string())
    }
}
