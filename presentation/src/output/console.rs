//! Console output formatter for triage results
//!
//! Every value derived from step results goes through the PII redactor
//! before it is rendered, in both text and JSON form.

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use triage_domain::{
    BatchReport, CircuitState, ExecutionPlan, PlanOutcome, Redactor, STEP_COMPLIANCE, STEP_FRAUD,
    STEP_INSIGHTS, STEP_KB, STEP_SUMMARY, SystemStatus,
};

/// Formats triage results for console display
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFormatter {
    redactor: Option<Redactor>,
}

impl ConsoleFormatter {
    pub fn new(redact: bool) -> Self {
        Self {
            redactor: redact.then(Redactor::new),
        }
    }

    fn scrub(&self, value: Value) -> Value {
        match &self.redactor {
            Some(redactor) => redactor.redact(value),
            None => value,
        }
    }

    fn scrub_text(&self, text: &str) -> String {
        match &self.redactor {
            Some(redactor) => redactor.redact_text(text),
            None => text.to_string(),
        }
    }

    /// Format any serializable result as pretty JSON
    pub fn format_json<T: Serialize>(&self, result: &T) -> String {
        serde_json::to_value(result)
            .map(|value| self.scrub(value))
            .and_then(|value| serde_json::to_string_pretty(&value))
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Format one run
    pub fn format_outcome(&self, outcome: &PlanOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Triage Result"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Run:".cyan().bold(), outcome.run_id));
        output.push_str(&format!("{} {}\n", "Plan:".cyan().bold(), outcome.plan));

        if outcome.success {
            output.push_str(&format!("{} {}\n", "Status:".cyan().bold(), "SUCCESS".green().bold()));
        } else {
            output.push_str(&format!("{} {}\n", "Status:".cyan().bold(), "FAILED".red().bold()));
            if let Some(step) = &outcome.failed_step {
                output.push_str(&format!("{} {}\n", "Failed step:".cyan().bold(), step.red()));
            }
            if let Some(error) = &outcome.error {
                output.push_str(&format!("{} {}\n", "Error:".cyan().bold(), self.scrub_text(error)));
            }
        }

        for (step, value) in outcome.results.iter() {
            output.push_str(&Self::section_header(step));
            let value = self.scrub(value.clone());
            for line in Self::step_summary(step, &value) {
                output.push_str(&format!("  {}\n", line));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Key lines for the built-in steps; pretty JSON for anything else
    fn step_summary(step: &str, value: &Value) -> Vec<String> {
        let text = |pointer: &str| {
            value
                .pointer(pointer)
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| "-".to_string())
        };

        match step {
            STEP_FRAUD => {
                let mut lines = vec![
                    format!("Risk score: {}", text("/assessment/risk_score")),
                    format!("Decision:   {}", text("/decision/decision")),
                    format!("Action:     {} ({})", text("/proposal/action"), text("/proposal/message")),
                ];
                if let Some(reasons) = value.pointer("/assessment/reasons").and_then(Value::as_array) {
                    for reason in reasons.iter().filter_map(Value::as_str) {
                        lines.push(format!("  * {}", reason));
                    }
                }
                lines
            }
            STEP_COMPLIANCE => {
                let mut lines = vec![
                    format!("Compliant: {}", text("/compliant")),
                    format!("Action:    {} ({})", text("/action/action"), text("/action/message")),
                ];
                if value.get("adjusted_from").is_some_and(|v| !v.is_null()) {
                    lines.push(format!("Adjusted from: {}", text("/adjusted_from")));
                }
                lines
            }
            STEP_KB => {
                let mut lines: Vec<String> = value
                    .get("rules")
                    .and_then(Value::as_array)
                    .map(|rules| {
                        rules
                            .iter()
                            .filter_map(|r| r.get("title").and_then(Value::as_str))
                            .map(|title| format!("* {}", title))
                            .collect()
                    })
                    .unwrap_or_default();
                if value.get("fallback").and_then(Value::as_bool) == Some(true) {
                    lines.push("(no matching rules; fallback guidance)".dimmed().to_string());
                }
                lines
            }
            STEP_INSIGHTS => vec![
                format!(
                    "Recent spend: {} transaction(s), total {}, average {}",
                    text("/summary/count"),
                    text("/summary/total"),
                    text("/summary/average")
                ),
                format!("Category: {}", text("/transaction_category")),
            ],
            STEP_SUMMARY => {
                let mut lines = vec![
                    format!("Risk level: {}", text("/risk_level")),
                    format!("Customer:   {}", text("/customer_message")),
                ];
                if value.get("action_required").and_then(Value::as_bool) == Some(true) {
                    lines.push("Action required".yellow().bold().to_string());
                }
                lines.extend(
                    value
                        .get("internal_notes")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .lines()
                        .map(|line| line.dimmed().to_string()),
                );
                lines
            }
            _ => serde_json::to_string_pretty(value)
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Format the plan a query derives to
    pub fn format_plan(query: &str, plan: &ExecutionPlan) -> String {
        let mut output = format!("{} {}\n", "Query:".cyan().bold(), query);
        if plan.is_empty() {
            output.push_str(&format!("{} {}\n", "Plan:".cyan().bold(), "(empty)".dimmed()));
        } else {
            output.push_str(&format!("{}\n", "Plan:".cyan().bold()));
            for (i, step) in plan.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, step));
            }
        }
        output
    }

    /// Format a batch report: one line per request, then totals
    pub fn format_batch(&self, report: &BatchReport) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Batch Assessment"));
        output.push('\n');

        for (i, outcome) in report.outcomes.iter().enumerate() {
            let mark = if outcome.success {
                "v".green()
            } else {
                "x".red()
            };
            let detail = match (&outcome.failed_step, &outcome.error) {
                (_, Some(error)) => self.scrub_text(error),
                _ => outcome
                    .result(STEP_FRAUD)
                    .and_then(|fraud| fraud.pointer("/decision/decision"))
                    .and_then(Value::as_str)
                    .map(|decision| format!("decision: {}", decision))
                    .unwrap_or_else(|| format!("{} step(s)", outcome.results.len())),
            };
            output.push_str(&format!(
                "{:>3}. {} [{}] {}\n",
                i + 1,
                mark,
                outcome.plan,
                detail
            ));
        }

        output.push_str(&format!(
            "\n{} {}   {} {}   {} {}\n",
            "Processed:".cyan().bold(),
            report.processed,
            "Successful:".green().bold(),
            report.successful,
            "Failed:".red().bold(),
            report.failed
        ));
        output.push_str(&Self::footer());
        output
    }

    /// Format breaker status
    pub fn format_status(status: &SystemStatus) -> String {
        let mut output = String::new();
        let label = if status.operational {
            status.label().green().bold()
        } else {
            status.label().red().bold()
        };
        output.push_str(&format!("{} {}\n\n", "System:".cyan().bold(), label));

        for (name, breaker) in &status.breakers {
            let state = match breaker.state {
                CircuitState::Closed => breaker.state.as_str().green(),
                CircuitState::HalfOpen => breaker.state.as_str().yellow(),
                CircuitState::Open => breaker.state.as_str().red(),
            };
            output.push_str(&format!(
                "  {:<14} {:<10} failures: {}\n",
                name, state, breaker.failure_count
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", format!("── {} ──", title).yellow().bold())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
