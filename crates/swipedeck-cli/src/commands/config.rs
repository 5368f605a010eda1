use swipedeck_core::util::normalize_text_option;
use swipedeck_core::ActorId;

use crate::cli::{ConfigCommands, UndoScopeArg};
use crate::config_profiles::{normalize_profile_name, CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            actor,
            window_hours,
            undo_scope,
            no_activate,
        } => {
            let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = apply_config_init(
                &mut config,
                profile.as_deref().or(global_profile),
                actor,
                window_hours,
                undo_scope,
                no_activate,
            )?;
            let path = config.save().map_err(CliError::Config)?;
            println!("Saved profile '{profile_name}' to {}", path.display());
            Ok(())
        }
    }
}

/// Merge `config init` options into `config`, returning the profile name.
pub fn apply_config_init(
    config: &mut CliProfilesConfig,
    profile_name: Option<&str>,
    actor: Option<String>,
    window_hours: Option<u32>,
    undo_scope: Option<UndoScopeArg>,
    no_activate: bool,
) -> Result<String, CliError> {
    let profile_name = config.resolve_profile_name(profile_name);
    let existing = config.profile(&profile_name).cloned().unwrap_or_default();

    let actor_id = match normalize_text_option(actor) {
        Some(raw) => Some(ActorId::new(raw)?.as_str().to_string()),
        None => existing.actor_id,
    };
    let updated = CliProfile {
        actor_id,
        exclusion_window_hours: window_hours.or(existing.exclusion_window_hours),
        undo_invalidation: undo_scope.map(Into::into).or(existing.undo_invalidation),
    };
    updated.engine_config().validate()?;

    *config.profile_mut_or_default(&profile_name) = updated;
    if !no_activate || normalize_profile_name(config.active_profile.as_deref()).is_none() {
        config.active_profile = Some(profile_name.clone());
    }
    Ok(profile_name)
}
