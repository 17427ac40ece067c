use std::collections::HashMap;
use std::fmt;

use crate::data::data_registry::DataRegistry;
use crate::data::dungeon::DungeonRecord;
use crate::data::record::Keyed;
use crate::estimator::{drop_locations, DropScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Check both tables for records that can never take part in a calculation.
pub fn validate_registry(registry: &DataRegistry) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_table(&mut report, "dungeons", registry.dungeons(), |dungeon| {
        match dungeon.tickets {
            Some(tickets) if tickets.is_finite() && tickets > 0.0 => None,
            Some(tickets) if tickets.is_finite() => Some(format!("tickets must be > 0, got {tickets}")),
            _ => Some("tickets missing or not a number".to_string()),
        }
    });
    validate_table(&mut report, "ultras", registry.ultras(), |ultra| {
        match ultra.finite_tickets() {
            Some(_) => None,
            None => Some("tickets missing or not a number".to_string()),
        }
    });

    for (index, ultra) in registry.ultras().iter().enumerate() {
        let context = format!("ultras[{index}] '{}'", ultra.display_key());
        if ultra.finite_tickets() == Some(0.0) {
            report.push(
                ValidationSeverity::Info,
                context.clone(),
                "tickets is 0; this ultra can never drop",
            );
        }
        if let DropScope::Restricted(tokens) = DropScope::of(ultra) {
            let eligibility = drop_locations(ultra, registry.dungeons());
            if eligibility.dungeons.is_empty() {
                report.push(
                    ValidationSeverity::Warning,
                    context,
                    format!("drops_in matches no known dungeon ({})", tokens.join(", ")),
                );
                continue;
            }
            for token in tokens.iter().filter(|token| !token_matches(token, registry.dungeons())) {
                report.push(
                    ValidationSeverity::Warning,
                    context.clone(),
                    format!("drops_in entry '{token}' matches no dungeon"),
                );
            }
        }
    }

    report
}

fn token_matches(token: &str, dungeons: &[DungeonRecord]) -> bool {
    let scope = DropScope::Restricted(vec![token.to_string()]);
    dungeons.iter().any(|dungeon| scope.includes(dungeon))
}

fn validate_table<R: Keyed>(
    report: &mut ValidationReport,
    table: &str,
    records: &[R],
    tickets_problem: impl Fn(&R) -> Option<String>,
) {
    let mut seen_keys: HashMap<String, usize> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        let display = record.display_key();
        let context = format!("{table}[{index}]");
        if display.is_empty() {
            report.push(ValidationSeverity::Error, context, "record has neither name nor id");
            continue;
        }
        let context = format!("{context} '{display}'");

        if let Some(problem) = tickets_problem(record) {
            report.push(ValidationSeverity::Error, context.clone(), problem);
        }

        let match_key = record.match_key();
        if match_key.is_empty() {
            report.push(
                ValidationSeverity::Warning,
                context,
                "display key normalizes to an empty match key",
            );
            continue;
        }
        if let Some(first) = seen_keys.get(&match_key) {
            report.push(
                ValidationSeverity::Warning,
                context,
                format!("match key '{match_key}' duplicates {table}[{first}]"),
            );
        } else {
            seen_keys.insert(match_key, index);
        }
    }
}
