use swipedeck_core::models::Entity;
use swipedeck_core::util::now_millis;
use swipedeck_core::TargetKind;

use crate::cli::EntityCommands;
use crate::commands::common::{format_relative_time, open_service, parse_target_id, Invocation};
use crate::error::CliError;

pub async fn run_entity(invocation: &Invocation, command: EntityCommands) -> Result<(), CliError> {
    let service = open_service(invocation).await?;

    match command {
        EntityCommands::Add { kind, id } => {
            let kind = TargetKind::from(kind);
            let entity = match id.as_deref() {
                Some(raw) => Entity::with_id(parse_target_id(raw)?, kind, now_millis()),
                None => Entity::new(kind),
            };
            service.add_entity(&entity).await?;
            println!("{}", entity.id);
        }
        EntityCommands::Touch { id, kind } => {
            let target_id = parse_target_id(&id)?;
            service.touch_entity(&target_id, kind.into()).await?;
            println!("Touched {target_id}");
        }
        EntityCommands::Remove { id, kind } => {
            let target_id = parse_target_id(&id)?;
            service.remove_entity(&target_id, kind.into()).await?;
            println!("Removed {target_id}");
        }
        EntityCommands::List { kind, limit } => {
            let entities = service.list_entities(kind.into(), limit).await?;
            if entities.is_empty() {
                println!("No entities.");
            }
            for line in format_entity_lines(&entities, now_millis()) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

pub fn format_entity_lines(entities: &[Entity], now_ms: i64) -> Vec<String> {
    entities
        .iter()
        .map(|entity| {
            let stamp = entity.stamp();
            let changed = if stamp.updated_at.is_some() {
                "updated"
            } else {
                "created"
            };
            format!(
                "{}  {} {}",
                entity.id,
                changed,
                format_relative_time(stamp.last_modified(), now_ms)
            )
        })
        .collect()
}
