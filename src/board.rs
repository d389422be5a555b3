// src/board.rs
//
// Idea board. Cards are appended during ideation, shortlisted during
// selection and scored during prioritization; every mutation is one
// atomic single-field (or single-document) write, so concurrent edits
// by different members interleave per field, last write wins.

use anyhow::Result;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use serde_json::{Value, json};

use crate::Outcome;
use crate::config::DeletePolicy;
use crate::models::commands::ScoreAxis;
use crate::models::core::{POSTIT_COLORS, POSTIT_ROTATIONS, Rating};
use crate::store::{Collection, DocStore};
use crate::view::LiveView;

/// At most this many cards may be shortlisted per group.
pub const SELECTION_LIMIT: usize = 3;

/// Append a card to the caller's group. Color and tilt are drawn once
/// here and stored with the record; nothing ever recomputes them.
pub async fn add_idea(
    store: &dyn DocStore,
    view: &LiveView,
    identity: &str,
    text: &str,
) -> Result<Outcome> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Outcome::Rejected("idea text must not be empty"));
    }
    let Some(author) = view.participant(identity) else {
        return Ok(Outcome::Rejected("create a profile before adding ideas"));
    };
    let Some(group_id) = author.group_id.clone() else {
        return Ok(Outcome::Rejected("join a group before adding ideas"));
    };

    let mut rng = ChaCha8Rng::from_os_rng();
    let color = POSTIT_COLORS[rng.next_u32() as usize % POSTIT_COLORS.len()];
    let rotation = POSTIT_ROTATIONS[rng.next_u32() as usize % POSTIT_ROTATIONS.len()];

    let record = json!({
        "group_id": group_id,
        "author_name": author.display_name,
        "author_id": author.id,
        "text": text,
        "selected": false,
        "benefit": Rating::Medium,
        "effort": Rating::Medium,
        "color": color,
        "rotation": rotation,
        "created_at": chrono::Utc::now().timestamp_millis(),
    });
    store
        .create_with_generated_id(Collection::Ideas, record)
        .await?;
    Ok(Outcome::Applied)
}

/// Delete a card. Under the default `Anyone` policy this is the
/// workshop's deliberately open door: any participant may clean up the
/// board. `AuthorOnly` gates it on authorship instead. Deleting an
/// absent card is a no-op either way.
pub async fn remove_idea(
    store: &dyn DocStore,
    view: &LiveView,
    policy: DeletePolicy,
    identity: &str,
    idea_id: &str,
) -> Result<Outcome> {
    if policy == DeletePolicy::AuthorOnly {
        if let Some(idea) = view.idea(idea_id) {
            if idea.author_id != identity {
                return Ok(Outcome::Rejected("only the author may remove this idea"));
            }
        }
    }

    store.delete(Collection::Ideas, idea_id).await?;
    Ok(Outcome::Applied)
}

/// Flip the shortlist flag. This is the sole gate on the selection
/// limit: selecting a fourth card is refused as a no-op, deselecting
/// is never blocked.
pub async fn toggle_select(
    store: &dyn DocStore,
    view: &LiveView,
    idea_id: &str,
) -> Result<Outcome> {
    let Some(idea) = view.idea(idea_id) else {
        return Ok(Outcome::Rejected("unknown idea"));
    };
    if !idea.selected && view.selected_count(&idea.group_id) >= SELECTION_LIMIT {
        return Ok(Outcome::Rejected("the shortlist already has three ideas"));
    }

    store
        .update_fields(
            Collection::Ideas,
            idea_id,
            json!({ "selected": !idea.selected }),
        )
        .await?;
    Ok(Outcome::Applied)
}

/// Overwrite one scoring axis. Writes exactly one field, so two
/// members scoring different axes at the same moment both land.
pub async fn set_score(
    store: &dyn DocStore,
    idea_id: &str,
    axis: ScoreAxis,
    value: Rating,
) -> Result<Outcome> {
    let mut fields = serde_json::Map::new();
    fields.insert(axis.field().to_string(), serde_json::to_value(value)?);
    store
        .update_fields(Collection::Ideas, idea_id, Value::Object(fields))
        .await?;
    Ok(Outcome::Applied)
}
