// src/sessions.rs
//
// Session/profile manager. Maps the opaque device identity to a
// display name and an optional group membership. All effects are
// single-document writes to the participants collection; the identity
// that owns the session is the only writer of its own record.

use anyhow::Result;
use serde_json::json;

use crate::Outcome;
use crate::models::core::Participant;
use crate::store::{Collection, DocStore};
use crate::view::LiveView;

/// Create the caller's profile, or rename it if one already exists.
/// Renaming preserves group membership, which is what makes the upsert
/// idempotent under retransmission.
pub async fn save_profile(
    store: &dyn DocStore,
    view: &LiveView,
    identity: &str,
    name: &str,
) -> Result<Outcome> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(Outcome::Rejected("display name must not be empty"));
    }

    if view.participant(identity).is_some() {
        store
            .update_fields(
                Collection::Participants,
                identity,
                json!({ "display_name": name }),
            )
            .await?;
    } else {
        let participant = Participant {
            id: identity.to_string(),
            display_name: name.to_string(),
            group_id: None,
        };
        store
            .create_or_replace(
                Collection::Participants,
                identity,
                serde_json::to_value(&participant)?,
            )
            .await?;
    }
    Ok(Outcome::Applied)
}

/// Point the caller at a group. The group id is taken on trust - no
/// existence check here; a missing profile document makes the store
/// reject the write and the caller logs it, nothing more.
pub async fn join_group(store: &dyn DocStore, identity: &str, group_id: &str) -> Result<Outcome> {
    store
        .update_fields(
            Collection::Participants,
            identity,
            json!({ "group_id": group_id }),
        )
        .await?;
    Ok(Outcome::Applied)
}

pub async fn leave_group(store: &dyn DocStore, identity: &str) -> Result<Outcome> {
    store
        .update_fields(
            Collection::Participants,
            identity,
            json!({ "group_id": null }),
        )
        .await?;
    Ok(Outcome::Applied)
}
