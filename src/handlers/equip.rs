//! Equipment skill transfer.
//!
//! Wearing an equipment card grants the skill printed on it; losing the card
//! revokes it. Watching migrations (instead of hooking the equip action)
//! means theft, forced discards, and any other way a card leaves an equips
//! zone all keep skills consistent for free.

use crate::core::Result;
use crate::game::Game;
use crate::zones::{MigrationEvent, ZoneKind};

use super::{EventHandler, EventKind};

/// Infrastructure handler pre-registered by every [`super::ContentRegistry`].
pub struct EquipSkillTransfer;

impl EventHandler for EquipSkillTransfer {
    fn name(&self) -> &'static str {
        "EquipSkillTransfer"
    }

    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::CardMigration]
    }

    fn on_migration(&self, game: &mut Game, _kind: EventKind, event: &MigrationEvent) -> Result<()> {
        for (card, from, to) in event.card_moves() {
            let Some(skill) = game.cards().get(card).equip_skill else {
                continue;
            };

            let unwearer = {
                let zone = game.zones().zone(from);
                if zone.kind == ZoneKind::Equips {
                    zone.owner.player()
                } else {
                    None
                }
            };
            let wearer = {
                let zone = game.zones().zone(to);
                if zone.kind == ZoneKind::Equips {
                    zone.owner.player()
                } else {
                    None
                }
            };

            if let Some(player) = unwearer {
                log::debug!("{player} takes off {card}, losing {skill}");
                game.player_mut(player).revoke_skill(skill);
            }
            if let Some(player) = wearer {
                log::debug!("{player} wears {card}, gaining {skill}");
                game.player_mut(player).grant_skill(skill);
            }
        }
        Ok(())
    }
}
