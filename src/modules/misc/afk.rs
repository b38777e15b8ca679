use poise::serenity_prelude::{Role, RoleId, UserId};
use std::collections::HashMap;

pub const AFK_PREFIX: &str = "[AFK]";

/// Discord's nickname length limit.
pub const NICKNAME_LIMIT: usize = 32;

pub fn is_afk(name: &str) -> bool {
    name.get(..AFK_PREFIX.len())
        .is_some_and(|start| start.eq_ignore_ascii_case(AFK_PREFIX))
}

/// Nickname to set when marking `name` as AFK.
pub fn afk_nickname(name: &str) -> String {
    format!("{AFK_PREFIX} {name}")
        .chars()
        .take(NICKNAME_LIMIT)
        .collect()
}

/// Nickname to restore once an AFK member is back. An empty string clears the
/// nickname entirely.
pub fn strip_afk(name: &str) -> String {
    match name.get(..AFK_PREFIX.len()) {
        Some(start) if start.eq_ignore_ascii_case(AFK_PREFIX) => {
            name[AFK_PREFIX.len()..].trim_start().to_string()
        }
        _ => name.to_string(),
    }
}

/// Position of the highest of `member_roles` in the guild hierarchy, 0 for @everyone.
pub fn top_role_position(roles: &HashMap<RoleId, Role>, member_roles: &[RoleId]) -> u16 {
    member_roles
        .iter()
        .filter_map(|id| roles.get(id))
        .map(|role| role.position)
        .max()
        .unwrap_or(0)
}

/// Whether a bot holding `bot_roles` may change the nickname of `member`.
/// Guild owners are untouchable, everyone else must sit strictly below the bot.
pub fn can_edit_nickname(
    roles: &HashMap<RoleId, Role>,
    owner_id: UserId,
    bot_roles: &[RoleId],
    member: UserId,
    member_roles: &[RoleId],
) -> bool {
    owner_id != member
        && top_role_position(roles, bot_roles) > top_role_position(roles, member_roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_afk() {
        assert!(is_afk("[AFK] Steve"));
        assert!(is_afk("[afk]Steve"));
        assert!(!is_afk("Steve [AFK]"));
        assert!(!is_afk("[AF"));
        assert!(!is_afk(""));
    }

    #[test]
    fn test_is_afk_multibyte() {
        // The prefix length falls inside the multi-byte character.
        assert!(!is_afk("[AF🌲K]"));
    }

    #[test]
    fn test_afk_nickname() {
        assert_eq!(afk_nickname("Steve"), "[AFK] Steve");
    }

    #[test]
    fn test_afk_nickname_truncated() {
        let name = "a".repeat(32);
        let nickname = afk_nickname(&name);

        assert_eq!(nickname.chars().count(), NICKNAME_LIMIT);
        assert!(nickname.starts_with("[AFK] aaaa"));
    }

    #[test]
    fn test_strip_afk() {
        assert_eq!(strip_afk("[AFK] Steve"), "Steve");
        assert_eq!(strip_afk("[afk]Steve"), "Steve");
        assert_eq!(strip_afk("[AFK]"), "");
        assert_eq!(strip_afk("Steve"), "Steve");
    }

    #[test]
    fn test_top_role_position_unknown_roles() {
        assert_eq!(top_role_position(&HashMap::new(), &[RoleId::new(1)]), 0);
        assert_eq!(top_role_position(&HashMap::new(), &[]), 0);
    }

    #[test]
    fn test_owner_nickname_is_not_editable() {
        let owner = UserId::new(1);
        assert!(!can_edit_nickname(&HashMap::new(), owner, &[], owner, &[]));
    }

    #[test]
    fn test_equal_rank_is_not_editable() {
        // Nobody has a known role, so bot and member both sit at position 0.
        let roles = HashMap::new();
        assert!(!can_edit_nickname(
            &roles,
            UserId::new(1),
            &[RoleId::new(10)],
            UserId::new(2),
            &[RoleId::new(11)],
        ));
    }

    #[test]
    fn test_afk_roundtrip() {
        assert_eq!(strip_afk(&afk_nickname("Alex")), "Alex");
    }
}
