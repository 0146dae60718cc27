#![allow(clippy::result_large_err)]

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use rhai::{Dynamic, Engine, Scope, FLOAT};

/// Plant attributes visible to applicability expressions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionInputs {
    pub power_kw: f64,
    pub has_heritage_constraints: bool,
}

/// Evaluator for `condizione_applicazione` using a locked-down Rhai configuration.
///
/// Expressions see `potenza` (kW) and `vincoli_paesaggistici` (bool), plus the
/// English aliases `power` and `heritage`.
pub struct ConditionEngine {
    engine: Engine,
}

impl Default for ConditionEngine {
    fn default() -> Self {
        let mut engine = Engine::new_raw();
        engine.set_max_operations(10_000);
        engine.set_max_call_levels(16);
        engine.set_max_expr_depths(32, 32);
        engine.set_max_string_size(1_024);
        engine.on_print(|_| {});
        engine.on_debug(|_, _, _| {});
        ConditionEngine { engine }
    }
}

impl ConditionEngine {
    /// Evaluate `expr`; an empty expression always applies.
    pub fn evaluate(&self, expr: &str, inputs: ConditionInputs) -> Result<bool, AppError> {
        if expr.trim().is_empty() {
            return Ok(true);
        }

        let mut scope = Scope::new();
        let power = inputs.power_kw as FLOAT;
        scope.push_constant("potenza", power);
        scope.push_constant("power", power);
        scope.push_constant("vincoli_paesaggistici", inputs.has_heritage_constraints);
        scope.push_constant("heritage", inputs.has_heritage_constraints);

        let result = self
            .engine
            .eval_expression_with_scope::<Dynamic>(&mut scope, expr)
            .map_err(|err| {
                AppError::new(
                    ErrorCategory::ValidationError,
                    format!("condition '{}' failed: {}", expr, err),
                )
                .with_code("FLT-COND-001")
            })?;

        result.as_bool().map_err(|type_name| {
            AppError::new(
                ErrorCategory::ValidationError,
                format!("condition '{}' evaluated to {} instead of bool", expr, type_name),
            )
            .with_code("FLT-COND-002")
        })
    }
}
