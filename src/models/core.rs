// src/models/core.rs
//
// Core entity types - the shared workshop documents

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// BASIC ENTITY TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// One person in the workshop, keyed by their opaque session identity.
/// Never deleted; only its owner writes display_name / group_id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// A workshop team. current_phase / phase_start_time only move through
/// the advance-phase operation; any member may trigger it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub current_phase: Phase,
    /// Unix millis; shared anchor for every member's countdown.
    pub phase_start_time: i64,
}

/// An idea card. group_id is immutable after creation; everything else
/// follows last-write-wins per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: String,
    pub group_id: String,
    pub author_name: String,
    pub author_id: String,
    pub text: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub benefit: Rating,
    #[serde(default)]
    pub effort: Rating,
    pub color: String,
    pub rotation: i8,
    pub created_at: i64,
}

/// A group listing row for the lobby: the group plus how many
/// participants currently point at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupListing {
    pub group: Group,
    pub member_count: usize,
}

// ═══════════════════════════════════════════════════════════════════════════
// PHASES
// ═══════════════════════════════════════════════════════════════════════════

/// The five fixed workshop stages. Stored on the wire as the bare
/// index 0..4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Phase {
    Kickoff,
    Ideation,
    Selection,
    Prioritization,
    WrapUp,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Kickoff,
        Phase::Ideation,
        Phase::Selection,
        Phase::Prioritization,
        Phase::WrapUp,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Display title as shown to the room.
    pub fn title(self) -> &'static str {
        match self {
            Phase::Kickoff => "Arranque",
            Phase::Ideation => "Lluvia de ideas",
            Phase::Selection => "Selección",
            Phase::Prioritization => "Priorización",
            Phase::WrapUp => "Puesta en común",
        }
    }

    pub fn brief(self) -> &'static str {
        match self {
            Phase::Kickoff => "Preparación",
            Phase::Ideation => "Individual",
            Phase::Selection => "En equipo",
            Phase::Prioritization => "Relámpago",
            Phase::WrapUp => "Resultados",
        }
    }

    /// Nominal duration used by the countdown display. Expiry never
    /// advances the phase by itself.
    pub fn duration_secs(self) -> u64 {
        match self {
            Phase::Kickoff => 120,
            Phase::Ideation => 300,
            Phase::Selection => 300,
            Phase::Prioritization => 180,
            Phase::WrapUp => 300,
        }
    }

    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Kickoff => Some(Phase::Ideation),
            Phase::Ideation => Some(Phase::Selection),
            Phase::Selection => Some(Phase::Prioritization),
            Phase::Prioritization => Some(Phase::WrapUp),
            Phase::WrapUp => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> u8 {
        phase as u8
    }
}

impl TryFrom<u8> for Phase {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Phase::Kickoff),
            1 => Ok(Phase::Ideation),
            2 => Ok(Phase::Selection),
            3 => Ok(Phase::Prioritization),
            4 => Ok(Phase::WrapUp),
            other => Err(format!("phase index out of range: {other}")),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// RATINGS
// ═══════════════════════════════════════════════════════════════════════════

/// Ordinal benefit/effort score. Wire strings match the workshop
/// vocabulary used in the exported report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "Alto")]
    High,
    #[default]
    #[serde(rename = "Medio")]
    Medium,
    #[serde(rename = "Bajo")]
    Low,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::High => "Alto",
            Rating::Medium => "Medio",
            Rating::Low => "Bajo",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alto" | "high" => Ok(Rating::High),
            "medio" | "medium" => Ok(Rating::Medium),
            "bajo" | "low" => Ok(Rating::Low),
            other => Err(format!("unknown rating: {other}")),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CARD PRESENTATION
// ═══════════════════════════════════════════════════════════════════════════

/// Post-it palette. One entry is drawn uniformly when a card is created,
/// stored on the record, and never recomputed afterwards.
pub const POSTIT_COLORS: [&str; 5] = [
    "#FDE68A", // yellow
    "#FBCFE8", // pink
    "#BFDBFE", // blue
    "#BBF7D0", // green
    "#E9D5FF", // purple
];

/// Card tilt in degrees; same draw-once rule as the palette.
pub const POSTIT_ROTATIONS: [i8; 5] = [-2, 1, -1, 2, 0];
