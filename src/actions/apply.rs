//! Validity and effects of the built-in action kinds.
//!
//! Both entry points are called only by the pipeline: validity before the
//! before phase (and again after it, since substitution may have changed
//! the kind), the effect exactly once per processed action. Effects go
//! through the same public `Game` surface content uses; there is no back
//! door to the zones.

use crate::cards::CardId;
use crate::core::{GameError, PlayerId, Result};
use crate::game::{Checkpoint, Game};
use crate::handlers::ActionPhase;
use crate::zones::MigrationTransaction;

use super::fatetell::apply_fatetell;
use super::{Action, ActionKind, TurnStage};

/// Whether the action may run. `false` cancels it; only structural problems
/// (an unregistered custom kind) are errors.
pub(crate) fn validate(game: &Game, action: &Action) -> Result<bool> {
    let ok = match &action.kind {
        ActionKind::Turn | ActionKind::Stage(_) | ActionKind::Fatetell(_) => {
            action.target().is_some()
        }
        ActionKind::Draw { count } => action.target().is_some() && *count > 0,
        ActionKind::Drop => match action.target() {
            Some(target) => action
                .cards
                .iter()
                .all(|&card| owned_by(game, card, target)),
            None => false,
        },
        ActionKind::Equip => match (action.target(), action.cards.first()) {
            (Some(target), Some(&card)) => {
                action.cards.len() == 1
                    && game.cards().get(card).equip_kind().is_some()
                    && game
                        .zones()
                        .is_in_zone(card, game.player(target).zones().hand)
            }
            _ => false,
        },
        ActionKind::Damage { amount } => {
            *amount > 0
                && action
                    .target()
                    .map_or(false, |t| game.player(t).is_alive())
        }
        ActionKind::Heal { amount } => {
            *amount > 0
                && action.target().map_or(false, |t| {
                    let p = game.player(t);
                    p.life < p.max_life
                })
        }
        ActionKind::Custom(id) => {
            let def = game
                .registry()
                .action(*id)
                .ok_or(GameError::UnknownAction(*id))?;
            def.validate.map_or(true, |f| f(game, action))
        }
    };
    Ok(ok)
}

fn owned_by(game: &Game, card: CardId, player: PlayerId) -> bool {
    game.zones()
        .zone_of(card)
        .map_or(false, |z| game.zones().zone(z).owner.player() == Some(player))
}

/// Run the action's effect. The returned bool becomes `action.succeeded`.
pub(crate) fn apply(game: &mut Game, action: &mut Action) -> Result<bool> {
    let kind = action.kind.clone();
    match kind {
        ActionKind::Turn => apply_turn(game, action),
        ActionKind::Stage(stage) => apply_stage(game, action, stage),
        ActionKind::Draw { count } => apply_draw(game, action, count),
        ActionKind::Drop => apply_drop(game, action),
        ActionKind::Equip => apply_equip(game, action),
        ActionKind::Damage { amount } => apply_damage(game, action, amount),
        ActionKind::Heal { amount } => apply_heal(game, action, amount),
        ActionKind::Fatetell(_) => apply_fatetell(game, action),
        ActionKind::Custom(id) => {
            let apply = game
                .registry()
                .action(id)
                .ok_or(GameError::UnknownAction(id))?
                .apply;
            apply(game, action)
        }
    }
}

fn apply_turn(game: &mut Game, action: &mut Action) -> Result<bool> {
    let Some(player) = action.target() else {
        return Ok(false);
    };

    game.begin_turn(player);
    for stage in TurnStage::ALL {
        if game.is_finished() {
            break;
        }
        game.process_action(Action::stage(player, stage))?;
        game.checkpoint(Checkpoint::StageEnd(player, stage));
    }
    Ok(true)
}

fn apply_stage(game: &mut Game, action: &mut Action, stage: TurnStage) -> Result<bool> {
    let Some(player) = action.target() else {
        return Ok(false);
    };

    match stage {
        TurnStage::Draw => {
            let count = game.options().draw_per_turn;
            if count > 0 {
                game.process_action(Action::draw(player, count))?;
            }
            Ok(true)
        }
        TurnStage::Action => {
            loop {
                if game.is_finished() {
                    break;
                }
                let Some(mut play) = game.mode_next_play(player)? else {
                    break;
                };
                game.dispatch_observe(ActionPhase::Stage, &mut play)?;
                if play.cancelled {
                    continue;
                }
                game.process_action(play)?;
            }
            Ok(true)
        }
        TurnStage::Drop => {
            let hand = game.player(player).zones().hand;
            let limit = game.options().hand_limit.cap(game.player(player).life);
            let excess = game.zones().zone(hand).len().saturating_sub(limit);
            if excess == 0 {
                return Ok(true);
            }
            let cards = game.choose_cards_or_random(player, hand, excess, "drop to hand limit");
            game.process_action(Action::drop_cards(player, &cards))?;
            Ok(true)
        }
    }
}

fn apply_draw(game: &mut Game, action: &mut Action, count: usize) -> Result<bool> {
    let Some(player) = action.target() else {
        return Ok(false);
    };

    let hand = game.player(player).zones().hand;
    let draw_pile = game.shared_zones().draw_pile;

    let mut remaining = count;
    let mut drawn = 0;
    while remaining > 0 {
        if game.zones().zone(draw_pile).is_empty() {
            game.refill_draw_pile()?;
        }
        let available = game.zones().zone(draw_pile).len();
        if available == 0 {
            break;
        }
        let take = remaining.min(available);
        let cards = game.zones().top_cards(draw_pile, take);
        game.migrate_cards(&cards, hand)?;
        drawn += take;
        remaining -= take;
    }

    log::debug!("{player} draws {drawn} of {count} cards");
    Ok(drawn > 0)
}

fn apply_drop(game: &mut Game, action: &mut Action) -> Result<bool> {
    let Some(player) = action.target() else {
        return Ok(false);
    };
    if action.cards.is_empty() {
        return Ok(true);
    }

    let cards: Vec<CardId> = action.cards.to_vec();
    let dropped = game.shared_zones().dropped;
    game.migrate_cards(&cards, dropped)?;
    log::debug!("{player} drops {} cards", cards.len());
    Ok(true)
}

fn apply_equip(game: &mut Game, action: &mut Action) -> Result<bool> {
    let Some(player) = action.target() else {
        return Ok(false);
    };
    let Some(&card) = action.cards.first() else {
        return Ok(false);
    };
    let Some(slot) = game.cards().get(card).equip_kind() else {
        return Ok(false);
    };

    let equips = game.player(player).zones().equips;
    let displaced = game
        .zones()
        .cards(equips)
        .iter()
        .copied()
        .find(|&worn| game.cards().get(worn).equip_kind() == Some(slot));

    // One transaction: the displaced piece and the new one move together or
    // not at all.
    let mut trans = MigrationTransaction::new();
    if let Some(old) = displaced {
        trans.migrate(game.zones(), &[old], game.shared_zones().dropped);
    }
    trans.migrate(game.zones(), &[card], equips);
    game.commit_migration(trans)?;

    Ok(true)
}

fn apply_damage(game: &mut Game, action: &mut Action, amount: u32) -> Result<bool> {
    let Some(target) = action.target() else {
        return Ok(false);
    };

    let player = game.player_mut(target);
    player.life -= amount as i32;
    let life = player.life;
    log::debug!("{target} takes {amount} damage, life now {life}");
    Ok(true)
}

fn apply_heal(game: &mut Game, action: &mut Action, amount: u32) -> Result<bool> {
    let Some(target) = action.target() else {
        return Ok(false);
    };

    let player = game.player_mut(target);
    player.life = (player.life + amount as i32).min(player.max_life);
    let life = player.life;
    log::debug!("{target} heals {amount}, life now {life}");
    Ok(true)
}
