//! Text projections of session state for the terminal client
//!
//! Everything here is a pure function of [`Session`], [`SessionUpdate`] or
//! [`ModelStatusDisplay`]; nothing mutates state.

use std::fmt::Write as _;

use crate::session::{Session, SessionStatus};
use crate::types::events::SessionUpdate;
use crate::types::identifiers::AgentId;
use crate::types::model_status::{ModelHealth, ModelInfo, ModelStatusDisplay};

/// Shown in an agent panel that has no lines yet
pub const EMPTY_LOG_PLACEHOLDER: &str = "Waiting...";

/// Status line, e.g. `Status: Optimization Complete`
#[must_use]
pub fn status_line(status: &SessionStatus) -> String {
    format!("Status: {status}")
}

/// Label of the submit action for the current state
#[must_use]
pub fn submit_label(session: &Session) -> &'static str {
    if session.is_in_flight() {
        "Optimizing..."
    } else if session.result().is_empty() {
        "Optimize Prompt"
    } else {
        "Refine Again"
    }
}

/// One line describing an update, or `None` for updates with no text
#[must_use]
pub fn update_line(update: &SessionUpdate) -> Option<String> {
    match update {
        SessionUpdate::Started { request, .. } => Some(if request.starting_prompt.is_some() {
            "── Refining previous result ──".to_string()
        } else {
            "── Optimizing ──".to_string()
        }),
        SessionUpdate::Log { agent, message } => Some(format!("[{agent}] {message}")),
        SessionUpdate::Result { .. } => None,
        SessionUpdate::Failed { message } => Some(format!("!! {message}")),
        SessionUpdate::Completed => Some("── Optimization Complete ──".to_string()),
        SessionUpdate::Reset => Some("── Reset ──".to_string()),
    }
}

fn health_marker(model: &ModelInfo) -> &'static str {
    match model.health() {
        ModelHealth::Active => "✓",
        ModelHealth::Error => "✗",
        ModelHealth::Unknown => "?",
    }
}

/// Model status bar
#[must_use]
pub fn model_status_bar(display: &ModelStatusDisplay) -> String {
    let ModelStatusDisplay::Loaded(report) = display else {
        return "Checking models...".to_string();
    };

    let models = &report.models;
    let mut bar = [
        ("Manager", &models.manager),
        ("Agent A", &models.agent_a),
        ("Agent B", &models.agent_b),
    ]
    .iter()
    .map(|(role, model)| format!("{role}: {} {}", model.name, health_marker(model)))
    .collect::<Vec<_>>()
    .join("  ");

    if report.has_key_errors() {
        bar.push_str("  * Errors detected. Check console/logs.");
    }
    bar
}

/// Full session view: agent panels, result and status
#[must_use]
pub fn session_view(session: &Session) -> String {
    let mut out = String::new();

    for agent in AgentId::ALL {
        let _ = writeln!(out, "== {} ==", agent.role());
        let lines = session.logs().get(agent);
        if lines.is_empty() {
            let _ = writeln!(out, "{EMPTY_LOG_PLACEHOLDER}");
        }
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        out.push('\n');
    }

    let _ = writeln!(out, "== Optimized Result ==");
    if session.result().is_empty() {
        let _ = writeln!(out, "Optimized prompt will appear here...");
    } else {
        let _ = writeln!(out, "{}", session.result());
    }
    out.push('\n');

    let _ = write!(out, "{}", status_line(session.status()));
    if let Some(elapsed) = session.elapsed() {
        let tenths = elapsed.num_milliseconds() / 100;
        let _ = write!(out, " ({}.{}s)", tenths / 10, tenths % 10);
    }
    if session.dropped_lines() > 0 {
        let _ = write!(out, " [{} malformed line(s) skipped]", session.dropped_lines());
    }
    out.push('\n');
    out
}
