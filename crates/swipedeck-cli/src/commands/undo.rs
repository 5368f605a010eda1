use crate::commands::common::{open_actor_service, Invocation};
use crate::error::CliError;

pub async fn run_undo(invocation: &Invocation) -> Result<(), CliError> {
    let service = open_actor_service(invocation).await?;
    let token = service.undo().await?;

    match token.category_hint.as_deref() {
        Some(hint) => println!(
            "Restored {} {} to the {hint} deck",
            token.target_kind, token.target_id
        ),
        None => println!("Restored {} {}", token.target_kind, token.target_id),
    }
    Ok(())
}
