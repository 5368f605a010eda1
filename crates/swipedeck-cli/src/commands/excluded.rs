use swipedeck_core::TargetKind;

use crate::commands::common::{format_exclusion_lines, open_actor_service, Invocation};
use crate::error::CliError;

pub async fn run_excluded(
    invocation: &Invocation,
    target_kind: TargetKind,
    as_json: bool,
) -> Result<(), CliError> {
    let service = open_actor_service(invocation).await?;
    let exclusions = service.exclusion_set(target_kind).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&exclusions)?);
        return Ok(());
    }

    if exclusions.is_empty() {
        println!("Nothing excluded.");
        return Ok(());
    }

    for line in format_exclusion_lines(&exclusions) {
        println!("{line}");
    }
    Ok(())
}
