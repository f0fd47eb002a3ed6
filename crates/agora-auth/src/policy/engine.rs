//! Table-driven role-hierarchy policy for moderation actions.
//!
//! | Action                                    | Min level | Moderator may target | Admin may target admin |
//! |-------------------------------------------|-----------|----------------------|------------------------|
//! | timeout, remove-timeout, list-timed-out   | moderator | normal only          | no                     |
//! | deactivate                                | moderator | normal only          | no                     |
//! | activate                                  | moderator | normal only          | yes                    |
//! | ban, unban                                | admin     | n/a                  | no                     |
//! | delete-comment                            | moderator | anyone               | yes                    |
//! | delete-post                               | admin     | n/a                  | yes                    |

use tracing::debug;

use agora_core::result::AppResult;
use agora_entity::user::RoleLevel;

use super::action::ModerationAction;
use super::decision::{Decision, DenyReason};

/// One row of the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rule {
    /// Lowest actor level allowed to attempt the action.
    min_level: RoleLevel,
    /// Highest target level a moderator may act on, if capped.
    moderator_target_cap: Option<RoleLevel>,
    /// Whether an admin is barred from acting on another admin.
    admin_peer_protected: bool,
}

const fn rule_for(action: ModerationAction) -> Rule {
    use ModerationAction::*;

    match action {
        Timeout | RemoveTimeout | ListTimedOut | Deactivate => Rule {
            min_level: RoleLevel::Moderator,
            moderator_target_cap: Some(RoleLevel::Normal),
            admin_peer_protected: true,
        },
        Activate => Rule {
            min_level: RoleLevel::Moderator,
            moderator_target_cap: Some(RoleLevel::Normal),
            admin_peer_protected: false,
        },
        Ban | Unban => Rule {
            min_level: RoleLevel::Admin,
            moderator_target_cap: None,
            admin_peer_protected: true,
        },
        DeleteComment => Rule {
            min_level: RoleLevel::Moderator,
            moderator_target_cap: None,
            admin_peer_protected: false,
        },
        DeletePost => Rule {
            min_level: RoleLevel::Admin,
            moderator_target_cap: None,
            admin_peer_protected: false,
        },
    }
}

/// Pure decision function over (actor level, target level, action).
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyEngine;

impl PolicyEngine {
    /// Creates the policy engine.
    pub fn new() -> Self {
        Self
    }

    /// Decide whether `actor` may perform `action` on a user at `target`.
    pub fn decide(&self, actor: RoleLevel, target: RoleLevel, action: ModerationAction) -> Decision {
        let rule = rule_for(action);

        let decision = if actor < rule.min_level {
            Decision::deny(DenyReason::InsufficientPermissions)
        } else if actor == RoleLevel::Moderator
            && rule.moderator_target_cap.is_some_and(|cap| target > cap)
        {
            if target == RoleLevel::Moderator {
                Decision::deny(DenyReason::ModeratorCannotActOnPeer)
            } else {
                Decision::deny(DenyReason::ModeratorCannotActOnAdmin)
            }
        } else if actor == RoleLevel::Admin && rule.admin_peer_protected && target == RoleLevel::Admin
        {
            Decision::deny(DenyReason::AdminCannotActOnAdmin)
        } else {
            Decision::allow()
        };

        debug!(
            actor = actor.level(),
            target = target.level(),
            action = %action,
            allow = decision.allow,
            "Policy decision"
        );
        decision
    }

    /// Decide an action that has no target user, checking only the minimum level.
    pub fn decide_untargeted(&self, actor: RoleLevel, action: ModerationAction) -> Decision {
        if actor < rule_for(action).min_level {
            Decision::deny(DenyReason::InsufficientPermissions)
        } else {
            Decision::allow()
        }
    }

    /// [`decide`](Self::decide) as a `Forbidden` error on denial.
    pub fn require(
        &self,
        actor: RoleLevel,
        target: RoleLevel,
        action: ModerationAction,
    ) -> AppResult<()> {
        self.decide(actor, target, action).into_result()
    }

    /// [`decide_untargeted`](Self::decide_untargeted) as a `Forbidden` error on denial.
    pub fn require_untargeted(&self, actor: RoleLevel, action: ModerationAction) -> AppResult<()> {
        self.decide_untargeted(actor, action).into_result()
    }
}
