use swipedeck_core::TargetKind;

use crate::commands::common::{open_actor_service, Invocation};
use crate::error::CliError;

pub async fn run_purge(invocation: &Invocation, target_kind: TargetKind) -> Result<(), CliError> {
    let service = open_actor_service(invocation).await?;
    let removed = service.purge_expired(target_kind).await?;
    println!("Purged {removed} expired {target_kind} swipe(s)");
    Ok(())
}
