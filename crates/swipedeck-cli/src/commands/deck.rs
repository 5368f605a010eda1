use swipedeck_core::TargetKind;

use crate::commands::common::{
    card_to_item, format_deck_lines, open_actor_service, DeckCardItem, Invocation,
};
use crate::error::CliError;

pub async fn run_deck(
    invocation: &Invocation,
    target_kind: TargetKind,
    limit: usize,
    as_json: bool,
) -> Result<(), CliError> {
    let service = open_actor_service(invocation).await?;
    let deck = service.deck(target_kind, limit).await?;

    if as_json {
        let json_items = deck.cards().map(card_to_item).collect::<Vec<DeckCardItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if deck.is_empty() {
        println!("No {target_kind} candidates left.");
        return Ok(());
    }

    for line in format_deck_lines(&deck) {
        println!("{line}");
    }
    Ok(())
}
