use crate::cli::Args;
use std::env;

/// Execution contexts that influence how logging is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionContext {
    /// A person at a terminal reading text output.
    Interactive,
    /// Scripts and pipelines consuming `--json` output or running unattended.
    Automation,
}

impl ExecutionContext {
    /// Returns `true` when console sinks should stay off unless configured.
    pub fn disables_console(self) -> bool {
        matches!(self, ExecutionContext::Automation)
    }
}

/// Derive the active execution context from the parsed CLI plus overrides.
pub fn detect_context(args: &Args) -> ExecutionContext {
    if args.json || automation_override_enabled() {
        ExecutionContext::Automation
    } else {
        ExecutionContext::Interactive
    }
}

fn automation_override_enabled() -> bool {
    env::var("PLANTFLOW_AUTOMATION")
        .map(|value| value.trim() == "1")
        .unwrap_or(false)
}
