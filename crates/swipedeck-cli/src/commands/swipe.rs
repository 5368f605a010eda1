use swipedeck_core::{SwipeAction, TargetKind};

use crate::commands::common::{open_actor_service, parse_target_id, Invocation};
use crate::error::CliError;

pub async fn run_swipe(
    invocation: &Invocation,
    target: &str,
    target_kind: TargetKind,
    action: SwipeAction,
    category_hint: Option<&str>,
) -> Result<(), CliError> {
    let target_id = parse_target_id(target)?;
    let service = open_actor_service(invocation).await?;
    let event = service
        .record_swipe(&target_id, target_kind, action, category_hint)
        .await?;

    println!("{} {} {}", event.action, event.target_kind, event.target_id);
    if event.action == SwipeAction::Pass {
        println!("Run `swipedeck undo` to bring it back.");
    }
    Ok(())
}
