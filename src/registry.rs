// src/registry.rs
//
// Group registry. Creation writes the group document and then joins
// the creator; listing is a pure projection of the live view (see
// LiveView::listings), so there is no read operation here.

use anyhow::Result;
use serde_json::json;

use crate::Outcome;
use crate::store::{Collection, DocStore};
use crate::view::LiveView;

/// Create a group at Kickoff with the shared clock anchored to now,
/// then join the creating participant to it. The two writes are not
/// transactional: a crash in between leaves an orphaned group, which
/// is accepted - groups are cheap and stay visible in the listing.
pub async fn create_group(
    store: &dyn DocStore,
    view: &LiveView,
    identity: &str,
    name: &str,
) -> Result<Outcome> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(Outcome::Rejected("group name must not be empty"));
    }
    if view.participant(identity).is_none() {
        return Ok(Outcome::Rejected("create a profile before creating a group"));
    }

    let record = json!({
        "name": name,
        "current_phase": 0,
        "phase_start_time": chrono::Utc::now().timestamp_millis(),
    });
    let group_id = store
        .create_with_generated_id(Collection::Groups, record)
        .await?;

    tracing::info!("👥 [REGISTRY] created group '{}' ({}…)", name, &group_id[..16]);

    store
        .update_fields(
            Collection::Participants,
            identity,
            json!({ "group_id": group_id }),
        )
        .await?;
    Ok(Outcome::Applied)
}
