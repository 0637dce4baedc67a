use poise::serenity_prelude::{Member, PartialGuild, Permissions, RoleId, UserId};
use std::collections::HashMap;

/// Whether a member may post role panels: Manage Roles or Administrator
pub fn can_manage_roles(permissions: Permissions) -> bool {
    permissions.intersects(Permissions::MANAGE_ROLES | Permissions::ADMINISTRATOR)
}

/// Server-wide permissions of a member, ignoring channel overwrites.
/// The owner and Administrator holders get everything; everyone else gets
/// @everyone plus the union of their roles.
pub fn guild_permissions(
    owner_id: UserId,
    user_id: UserId,
    everyone: Permissions,
    member_roles: &[RoleId],
    role_permissions: &HashMap<RoleId, Permissions>,
) -> Permissions {
    if user_id == owner_id {
        return Permissions::all();
    }

    let permissions = member_roles
        .iter()
        .filter_map(|id| role_permissions.get(id))
        .fold(everyone, |acc, perms| acc | *perms);

    if permissions.contains(Permissions::ADMINISTRATOR) {
        Permissions::all()
    } else {
        permissions
    }
}

/// Server-wide permissions of `member` in `guild`
pub fn member_guild_permissions(guild: &PartialGuild, member: &Member) -> Permissions {
    let role_permissions: HashMap<RoleId, Permissions> = guild
        .roles
        .iter()
        .map(|(id, role)| (*id, role.permissions))
        .collect();
    let everyone = role_permissions
        .get(&guild.id.everyone_role())
        .copied()
        .unwrap_or_else(Permissions::empty);

    guild_permissions(
        guild.owner_id,
        member.user.id,
        everyone,
        &member.roles,
        &role_permissions,
    )
}
