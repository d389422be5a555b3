// src/export.rs
//
// Read-only projection of a group's shortlist into the plain-text
// report handed out at the end of the session. Layout is fixed; the
// embedding UI decides what to do with the string (save, print, copy).

use chrono::{DateTime, Utc};

use crate::models::core::{Group, Idea, Participant, Rating};

pub const REPORT_TITLE: &str = "TALLER RPA - RESULTADOS";

/// High benefit at low effort earns the recommendation marker.
pub fn is_quick_win(idea: &Idea) -> bool {
    idea.benefit == Rating::High && idea.effort == Rating::Low
}

/// Suggested filename for the saved report.
pub fn export_filename(group_name: &str) -> String {
    let name = group_name.trim();
    let name = if name.is_empty() { "Equipo" } else { name };
    format!("Resultados_RPA_{name}.txt")
}

/// Render the report. `ideas` is the group's board; only selected
/// cards appear, numbered in the order given. An empty shortlist
/// renders the header with an empty section, which is not an error.
pub fn summary_report(
    group: &Group,
    members: &[&Participant],
    ideas: &[&Idea],
    date: DateTime<Utc>,
) -> String {
    let participants = members
        .iter()
        .map(|m| m.display_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    out.push_str(REPORT_TITLE);
    out.push('\n');
    out.push_str(&format!("Equipo: {}\n", group.name));
    out.push_str(&format!("Participantes: {participants}\n"));
    out.push_str(&format!("Fecha: {}\n\n", date.format("%d/%m/%Y")));
    out.push_str("TAREAS SELECCIONADAS:\n");
    out.push_str("------------------------\n");

    for (idx, idea) in ideas.iter().filter(|i| i.selected).enumerate() {
        out.push_str(&format!(
            "{}. {} (Propuesto por: {})\n",
            idx + 1,
            idea.text,
            idea.author_name
        ));
        out.push_str(&format!(
            "   Beneficio: {} | Esfuerzo: {}\n",
            idea.benefit, idea.effort
        ));
        if is_quick_win(idea) {
            out.push_str("   [!] QUICK WIN RECOMENDADO\n");
        }
        out.push('\n');
    }

    out
}
