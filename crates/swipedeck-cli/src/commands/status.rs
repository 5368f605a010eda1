use swipedeck_core::engine::{SwipeStatus, UndoState};
use swipedeck_core::util::format_timestamp;
use swipedeck_core::TargetKind;

use crate::commands::common::{open_actor_service, Invocation};
use crate::error::CliError;

pub async fn run_status(
    invocation: &Invocation,
    target_kind: TargetKind,
    as_json: bool,
) -> Result<(), CliError> {
    let service = open_actor_service(invocation).await?;
    let status = service.status(target_kind).await?;
    let undo = service.undo_state().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    for line in format_status_lines(
        target_kind,
        service.config().exclusion_window_hours,
        &status,
        &undo,
    ) {
        println!("{line}");
    }
    Ok(())
}

pub fn format_status_lines(
    target_kind: TargetKind,
    window_hours: u32,
    status: &SwipeStatus,
    undo: &UndoState,
) -> Vec<String> {
    let undo_line = match undo {
        UndoState::Idle => "Undo: nothing to undo".to_string(),
        UndoState::Armed(token) => format!(
            "Undo: pass on {} at {}",
            token.target_id,
            format_timestamp(token.occurred_at)
        ),
    };
    vec![
        format!("Kind: {target_kind} (window {window_hours}h)"),
        format!("Recent likes: {}", status.recent_likes),
        format!("Recent passes: {}", status.recent_passes),
        format!("Recent views: {}", status.recent_views),
        format!("Expired: {}", status.expired),
        undo_line,
    ]
}
