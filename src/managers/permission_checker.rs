use poise::serenity_prelude::{GuildId, Http, Permissions, RoleId};
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Permissions the bot needs to post panels and toggle roles
pub fn get_required_permissions() -> Vec<(&'static str, &'static str, Permissions)> {
    vec![
        ("VIEW_CHANNEL", "See channels", Permissions::VIEW_CHANNEL),
        ("SEND_MESSAGES", "Post role panels", Permissions::SEND_MESSAGES),
        ("EMBED_LINKS", "Send the panel embed", Permissions::EMBED_LINKS),
        ("MANAGE_ROLES", "Add and remove panel roles", Permissions::MANAGE_ROLES),
    ]
}

/// Result of a permission check for a single guild
#[derive(Debug)]
pub struct GuildPermissionCheck {
    pub guild_id: GuildId,
    pub guild_name: String,
    /// Names of required permissions the bot lacks
    pub missing_permissions: Vec<&'static str>,
    pub bot_role_position: Option<u16>,
    /// Panel roles at or above the bot's highest role
    pub roles_above_bot: Vec<(String, u16)>,
}

impl GuildPermissionCheck {
    pub fn is_ok(&self) -> bool {
        self.missing_permissions.is_empty() && self.roles_above_bot.is_empty()
    }
}

/// Names of required permissions not contained in `granted`
pub fn missing_permissions(granted: Permissions) -> Vec<&'static str> {
    if granted.contains(Permissions::ADMINISTRATOR) {
        return Vec::new();
    }
    get_required_permissions()
        .into_iter()
        .filter(|(_, _, permission)| !granted.contains(*permission))
        .map(|(name, _, _)| name)
        .collect()
}

/// Roles from `targets` the bot can't assign because they sit at or above its highest role.
/// `roles` maps role ID to (name, position).
pub fn roles_at_or_above(
    bot_position: Option<u16>,
    roles: &HashMap<RoleId, (String, u16)>,
    targets: &[RoleId],
) -> Vec<(String, u16)> {
    let mut blocked: Vec<(String, u16)> = targets
        .iter()
        .filter_map(|id| roles.get(id))
        .filter(|(_, pos)| bot_position.map_or(true, |bot_pos| *pos >= bot_pos))
        .cloned()
        .collect();
    blocked.sort_by(|a, b| b.1.cmp(&a.1));
    blocked.dedup();
    blocked
}

/// Check bot permissions and role hierarchy for one guild
pub async fn check_guild_permissions(
    http: &Http,
    guild_id: GuildId,
    panel_roles: &[RoleId],
) -> Result<GuildPermissionCheck, String> {
    let guild = guild_id
        .to_partial_guild(http)
        .await
        .map_err(|e| format!("Failed to fetch guild {}: {}", guild_id, e))?;

    let bot_user = http
        .get_current_user()
        .await
        .map_err(|e| format!("Failed to get bot user: {}", e))?;

    let bot_member = guild
        .member(http, bot_user.id)
        .await
        .map_err(|e| format!("Failed to get bot member in guild {}: {}", guild_id, e))?;

    #[allow(deprecated)]
    let bot_permissions = guild.member_permissions(&bot_member);

    let bot_role_position = bot_member
        .roles
        .iter()
        .filter_map(|id| guild.roles.get(id))
        .map(|role| role.position)
        .max();

    let roles: HashMap<RoleId, (String, u16)> = guild
        .roles
        .iter()
        .map(|(id, role)| (*id, (role.name.clone(), role.position)))
        .collect();

    Ok(GuildPermissionCheck {
        guild_id,
        guild_name: guild.name.clone(),
        missing_permissions: missing_permissions(bot_permissions),
        bot_role_position,
        roles_above_bot: roles_at_or_above(bot_role_position, &roles, panel_roles),
    })
}

/// Log permission check results with appropriate log levels
pub fn log_permission_check_result(check: &GuildPermissionCheck) {
    if check.is_ok() {
        info!(
            "Guild '{}' ({}): permissions and role hierarchy OK",
            check.guild_name, check.guild_id
        );
        return;
    }

    error!(
        "Guild '{}' ({}): ISSUES DETECTED - role toggles may fail!",
        check.guild_name, check.guild_id
    );
    if !check.missing_permissions.is_empty() {
        error!("  Missing permissions: {}", check.missing_permissions.join(", "));
        error!("  Fix: Go to Discord Server Settings > Roles > Bot's role > enable missing permissions");
    }
    if !check.roles_above_bot.is_empty() {
        warn!(
            "  Panel roles the bot CANNOT manage (bot position {}):",
            check.bot_role_position.unwrap_or(0)
        );
        for (role_name, pos) in &check.roles_above_bot {
            warn!("    - '{}' (position {})", role_name, pos);
        }
        warn!("  Fix: Go to Discord Server Settings > Roles > drag bot's role higher");
    }
}

/// Check every guild and log the results.
/// `panel_roles` lists, per guild, the roles used by stored panels.
/// Returns true if all checks passed.
pub async fn run_startup_permission_check(
    http: &Http,
    guild_ids: &[GuildId],
    panel_roles: &HashMap<GuildId, Vec<RoleId>>,
) -> bool {
    let mut all_ok = true;

    for guild_id in guild_ids {
        let targets = panel_roles
            .get(guild_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        match check_guild_permissions(http, *guild_id, targets).await {
            Ok(check) => {
                log_permission_check_result(&check);
                all_ok &= check.is_ok();
            }
            Err(e) => {
                error!("Failed to check permissions for guild {}: {}", guild_id, e);
                all_ok = false;
            }
        }
    }

    if !all_ok {
        warn!("Permission issues detected in one or more guilds!");
    }
    all_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_permissions() {
        assert!(missing_permissions(Permissions::ADMINISTRATOR).is_empty());
        assert_eq!(
            missing_permissions(
                Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES | Permissions::EMBED_LINKS
            ),
            vec!["MANAGE_ROLES"]
        );
        assert_eq!(missing_permissions(Permissions::empty()).len(), 4);
    }

    #[test]
    fn test_roles_at_or_above() {
        let mut roles = HashMap::new();
        roles.insert(RoleId::new(1), ("Guest".to_string(), 2));
        roles.insert(RoleId::new(2), ("Candidate".to_string(), 5));
        roles.insert(RoleId::new(3), ("Owner".to_string(), 9));

        let blocked = roles_at_or_above(Some(5), &roles, &[RoleId::new(1), RoleId::new(2)]);
        assert_eq!(blocked, vec![("Candidate".to_string(), 5)]);

        assert!(roles_at_or_above(Some(6), &roles, &[RoleId::new(1), RoleId::new(2)]).is_empty());

        // A bot without roles can't assign anything
        assert_eq!(roles_at_or_above(None, &roles, &[RoleId::new(1)]).len(), 1);
    }
}
