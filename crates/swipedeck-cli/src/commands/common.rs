use std::env;
use std::path::{Path, PathBuf};

use serde::Serialize;
use swipedeck_core::config::EngineConfig;
use swipedeck_core::db::SyncConfig;
use swipedeck_core::deck::{Deck, DeckCard};
use swipedeck_core::engine::ExclusionSet;
use swipedeck_core::services::SwipeService;
use swipedeck_core::util::normalize_text_option;
use swipedeck_core::{ActorId, TargetId};

use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

/// Global options shared by every command
#[derive(Debug, Clone)]
pub struct Invocation {
    pub db_path: PathBuf,
    pub profile: Option<String>,
    pub actor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeckCardItem {
    pub target_id: String,
    pub target_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_hint: Option<String>,
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("SWIPEDECK_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("swipedeck")
        .join("swipedeck.db")
}

/// Actor precedence: `--actor`, then `SWIPEDECK_ACTOR`, then the profile.
pub fn resolve_actor(
    explicit: Option<&str>,
    env_actor: Option<String>,
    profile_actor: Option<String>,
) -> Result<Option<ActorId>, CliError> {
    let raw = normalize_text_option(explicit.map(str::to_string))
        .or_else(|| normalize_text_option(env_actor))
        .or_else(|| normalize_text_option(profile_actor));
    raw.map(ActorId::new).transpose().map_err(CliError::from)
}

fn load_profile_settings(
    invocation: &Invocation,
) -> Result<(Option<ActorId>, EngineConfig), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(invocation.profile.as_deref());
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();

    let actor = resolve_actor(
        invocation.actor.as_deref(),
        env::var("SWIPEDECK_ACTOR").ok(),
        profile.actor_id.clone(),
    )?;
    Ok((actor, profile.engine_config()))
}

/// Open the service, refusing to continue without an actor.
pub async fn open_actor_service(invocation: &Invocation) -> Result<SwipeService, CliError> {
    let (actor, config) = load_profile_settings(invocation)?;
    if actor.is_none() {
        return Err(CliError::NoActor);
    }
    open_service_with(&invocation.db_path, actor, config).await
}

/// Open the service for catalog maintenance, which needs no actor.
pub async fn open_service(invocation: &Invocation) -> Result<SwipeService, CliError> {
    let (actor, config) = load_profile_settings(invocation)?;
    open_service_with(&invocation.db_path, actor, config).await
}

async fn open_service_with(
    path: &Path,
    actor: Option<ActorId>,
    config: EngineConfig,
) -> Result<SwipeService, CliError> {
    tracing::debug!(path = %path.display(), actor = ?actor, "Opening swipe database");
    Ok(SwipeService::open_path(path.to_path_buf(), SyncConfig::from_env(), actor, config).await?)
}

pub fn parse_target_id(raw: &str) -> Result<TargetId, CliError> {
    raw.parse::<TargetId>()
        .map_err(|_| CliError::InvalidTargetId(raw.trim().to_string()))
}

pub fn card_to_item(card: &DeckCard) -> DeckCardItem {
    DeckCardItem {
        target_id: card.target_id.to_string(),
        target_kind: card.target_kind.to_string(),
        category_hint: card.category_hint.clone(),
    }
}

pub fn format_deck_lines(deck: &Deck) -> Vec<String> {
    deck.cards()
        .enumerate()
        .map(|(position, card)| match &card.category_hint {
            Some(hint) => format!("{:>3}. {}  [{hint}]", position + 1, card.target_id),
            None => format!("{:>3}. {}", position + 1, card.target_id),
        })
        .collect()
}

pub fn format_exclusion_lines(exclusions: &ExclusionSet) -> Vec<String> {
    exclusions.iter().map(ToString::to_string).collect()
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else {
        format!("{}d ago", diff / day)
    }
}
