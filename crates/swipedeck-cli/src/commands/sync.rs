use crate::commands::common::{open_service, Invocation};
use crate::error::CliError;

pub async fn run_sync(invocation: &Invocation) -> Result<(), CliError> {
    let service = open_service(invocation).await?;
    if !service.is_sync_enabled().await {
        return Err(CliError::SyncNotConfigured);
    }

    service.sync().await?;
    println!("Sync completed");
    Ok(())
}
