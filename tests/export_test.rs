// tests/export_test.rs
//
// The report is a pure projection: fixed layout, selected cards only,
// quick-win marker exactly when benefit is high and effort is low.

use std::sync::Arc;

use chrono::TimeZone;
use huddle_backend::{
    CommandMsg, Group, Idea, MemoryStore, Participant, Phase, Rating, ScoreAxis, export,
};

mod common;
use common::{add_ideas, profile_and_group, start_member, wait_until};

fn sample_group() -> Group {
    Group {
        id: "g1".into(),
        name: "Finanzas".into(),
        current_phase: Phase::WrapUp,
        phase_start_time: 0,
    }
}

fn sample_idea(id: &str, text: &str, benefit: Rating, effort: Rating, selected: bool) -> Idea {
    Idea {
        id: id.into(),
        group_id: "g1".into(),
        author_name: "Ana".into(),
        author_id: "member-ana".into(),
        text: text.into(),
        selected,
        benefit,
        effort,
        color: "#FDE68A".into(),
        rotation: -2,
        created_at: 0,
    }
}

fn sample_members() -> Vec<Participant> {
    vec![
        Participant {
            id: "member-ana".into(),
            display_name: "Ana".into(),
            group_id: Some("g1".into()),
        },
        Participant {
            id: "member-luis".into(),
            display_name: "Luis".into(),
            group_id: Some("g1".into()),
        },
    ]
}

#[test]
fn report_layout_is_fixed() {
    let group = sample_group();
    let members = sample_members();
    let member_refs: Vec<&Participant> = members.iter().collect();
    let ideas = vec![
        sample_idea("i1", "Automatizar facturas", Rating::High, Rating::Low, true),
        sample_idea("i2", "Revisar contratos", Rating::Medium, Rating::Medium, true),
        sample_idea("i3", "Idea descartada", Rating::High, Rating::Low, false),
    ];
    let idea_refs: Vec<&Idea> = ideas.iter().collect();
    let date = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap();

    let report = export::summary_report(&group, &member_refs, &idea_refs, date);

    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "TALLER RPA - RESULTADOS");
    assert_eq!(lines[1], "Equipo: Finanzas");
    assert_eq!(lines[2], "Participantes: Ana, Luis");
    assert_eq!(lines[3], "Fecha: 09/03/2024");
    assert_eq!(lines[4], "");
    assert_eq!(lines[5], "TAREAS SELECCIONADAS:");
    assert_eq!(lines[6], "------------------------");
    assert_eq!(lines[7], "1. Automatizar facturas (Propuesto por: Ana)");
    assert_eq!(lines[8], "   Beneficio: Alto | Esfuerzo: Bajo");
    assert_eq!(lines[9], "   [!] QUICK WIN RECOMENDADO");

    // the unselected card never shows up
    assert!(!report.contains("Idea descartada"));
    // the second entry is numbered after the first
    assert!(report.contains("2. Revisar contratos (Propuesto por: Ana)"));
}

#[test]
fn quick_win_marker_requires_high_benefit_and_low_effort() {
    let quick = sample_idea("i1", "a", Rating::High, Rating::Low, true);
    let medium = sample_idea("i2", "b", Rating::Medium, Rating::Medium, true);
    let high_high = sample_idea("i3", "c", Rating::High, Rating::High, true);
    let low_low = sample_idea("i4", "d", Rating::Low, Rating::Low, true);

    assert!(export::is_quick_win(&quick));
    assert!(!export::is_quick_win(&medium));
    assert!(!export::is_quick_win(&high_high));
    assert!(!export::is_quick_win(&low_low));

    let group = sample_group();
    let report = export::summary_report(
        &group,
        &[],
        &[&medium],
        chrono::Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap(),
    );
    assert!(!report.contains("QUICK WIN RECOMENDADO"));
}

#[test]
fn empty_shortlist_renders_an_empty_section() {
    let group = sample_group();
    let report = export::summary_report(
        &group,
        &[],
        &[],
        chrono::Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap(),
    );

    assert!(report.contains("TAREAS SELECCIONADAS:\n------------------------\n"));
    assert!(report.ends_with("------------------------\n"));
}

#[test]
fn export_filename_falls_back_to_equipo() {
    assert_eq!(
        export::export_filename("Finanzas"),
        "Resultados_RPA_Finanzas.txt"
    );
    assert_eq!(export::export_filename("  "), "Resultados_RPA_Equipo.txt");
}

#[tokio::test]
async fn summary_through_a_live_session() {
    let store = Arc::new(MemoryStore::new());
    let (system, _event_rx) = start_member(&store, "member-ana");

    let group_id = profile_and_group(&system, "Ana", "Finanzas").await;
    add_ideas(&system, &group_id, 2).await;

    // shortlist the card titled "idea 0"; "idea 1" stays off the report
    let picked = system
        .view()
        .group_ideas(&group_id)
        .into_iter()
        .find(|i| i.text == "idea 0")
        .expect("card exists")
        .id
        .clone();

    system.send(CommandMsg::ToggleSelect {
        idea_id: picked.clone(),
    });
    system.send(CommandMsg::SetScore {
        idea_id: picked.clone(),
        axis: ScoreAxis::Benefit,
        value: Rating::High,
    });
    system.send(CommandMsg::SetScore {
        idea_id: picked.clone(),
        axis: ScoreAxis::Effort,
        value: Rating::Low,
    });
    assert!(
        wait_until(|| {
            system
                .view()
                .idea(&picked)
                .is_some_and(|i| i.selected && i.benefit == Rating::High && i.effort == Rating::Low)
        })
        .await
    );

    let report = system.summary().expect("member of a group");
    assert!(report.starts_with("TALLER RPA - RESULTADOS"));
    assert!(report.contains("Equipo: Finanzas"));
    assert!(report.contains("Participantes: Ana"));
    assert!(report.contains("[!] QUICK WIN RECOMENDADO"));
    // the unselected card stays out of the report
    assert!(!report.contains("idea 1"));

    system.shutdown().await;
}
