//! Content registration.
//!
//! Everything a game-content package plugs into the engine goes through a
//! [`ContentRegistry`] built before `Game::new`: skill tags, event handlers,
//! and custom action kinds. Registration order is meaningful: it is the tie
//! break for handler ordering and the stable identity behind skill and
//! action IDs. There is deliberately no global registry; two games built
//! from different registries never observe each other.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::core::Result;
use crate::game::Game;

use super::equip::EquipSkillTransfer;
use super::EventHandler;

/// Skill tag identifier. Skill *behavior* lives in content handlers and
/// custom actions; the engine only tracks which players carry which tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillId(pub u16);

impl SkillId {
    /// Create a new skill ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Skill#{}", self.0)
    }
}

/// Coarse skill classification, used by content to filter (e.g. "strip all
/// equipment skills").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    /// Innate to a character.
    Character,
    /// Granted by a worn equipment card.
    Equipment,
    /// Player invokes it deliberately.
    Active,
    /// Always on.
    Passive,
}

/// A registered skill.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillSpec {
    pub id: SkillId,
    pub name: String,
    pub categories: Vec<SkillCategory>,
}

/// Identifier for a content-registered action kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomActionId(pub u16);

impl CustomActionId {
    /// Create a new custom action ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for CustomActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CustomAction#{}", self.0)
    }
}

/// Validity predicate for a custom action. Checked by the pipeline before
/// the before phase and again after it; `false` cancels the action.
pub type ValidateFn = fn(&Game, &Action) -> bool;

/// Effect of a custom action. Runs at most once per processed action; the
/// returned bool becomes `action.succeeded`.
pub type ApplyFn = fn(&mut Game, &mut Action) -> Result<bool>;

/// A registered custom action kind.
#[derive(Clone)]
pub struct CustomActionDef {
    pub id: CustomActionId,
    pub name: &'static str,
    pub validate: Option<ValidateFn>,
    pub apply: ApplyFn,
}

impl std::fmt::Debug for CustomActionDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomActionDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// Everything content plugs in, gathered before the game starts.
///
/// A fresh registry already carries the engine's own infrastructure
/// handlers (equipment skill transfer); content registers on top.
pub struct ContentRegistry {
    skills: Vec<SkillSpec>,
    handlers: Vec<Arc<dyn EventHandler>>,
    actions: Vec<CustomActionDef>,
}

impl Default for ContentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRegistry {
    /// A registry with the engine's infrastructure handlers pre-registered.
    #[must_use]
    pub fn new() -> Self {
        let mut reg = Self {
            skills: Vec::new(),
            handlers: Vec::new(),
            actions: Vec::new(),
        };
        reg.register_handler(Arc::new(EquipSkillTransfer));
        reg
    }

    /// Register a skill tag. IDs are handed out sequentially.
    pub fn register_skill(
        &mut self,
        name: impl Into<String>,
        categories: &[SkillCategory],
    ) -> SkillId {
        let id = SkillId::new(self.skills.len() as u16);
        self.skills.push(SkillSpec {
            id,
            name: name.into(),
            categories: categories.to_vec(),
        });
        id
    }

    /// Register an event handler. Names must be unique; ordering references
    /// and substitution marks key on them.
    pub fn register_handler(&mut self, handler: Arc<dyn EventHandler>) {
        assert!(
            self.handlers.iter().all(|h| h.name() != handler.name()),
            "handler {:?} registered twice",
            handler.name()
        );
        self.handlers.push(handler);
    }

    /// Register a custom action kind.
    pub fn register_action(
        &mut self,
        name: &'static str,
        validate: Option<ValidateFn>,
        apply: ApplyFn,
    ) -> CustomActionId {
        let id = CustomActionId::new(self.actions.len() as u16);
        self.actions.push(CustomActionDef {
            id,
            name,
            validate,
            apply,
        });
        id
    }

    /// Look up a skill. Panics on an ID from another registry.
    #[must_use]
    pub fn skill(&self, id: SkillId) -> &SkillSpec {
        &self.skills[id.raw() as usize]
    }

    /// All registered skills.
    #[must_use]
    pub fn skills(&self) -> &[SkillSpec] {
        &self.skills
    }

    /// Look up a custom action kind, if registered.
    #[must_use]
    pub fn action(&self, id: CustomActionId) -> Option<&CustomActionDef> {
        self.actions.get(id.raw() as usize)
    }

    /// The registered handlers, in registration order.
    #[must_use]
    pub fn handlers(&self) -> &[Arc<dyn EventHandler>] {
        &self.handlers
    }
}

impl std::fmt::Debug for ContentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRegistry")
            .field("skills", &self.skills.len())
            .field("handlers", &self.handlers.len())
            .field("actions", &self.actions.len())
            .finish()
    }
}
