// ABOUTME: User credential record shared by the API surface and the database

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tracked player: Bungie identity, active character and OAuth refresh state.
///
/// Serialized in camelCase to match the `/notify` payload; stored in snake_case columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserCredential {
    pub bungie_username: String,
    pub bungie_membership_id: String,
    pub destiny_id: String,
    pub destiny_character_id: String,
    pub refresh_token: String,
    /// `YYYY-MM-DDTHH:MM:SSZ`
    pub refresh_expiration: String,
    #[serde(default)]
    pub discord_id: Option<String>,
    #[serde(default)]
    pub discord_channel_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_from_notify_payload() {
        let json = serde_json::json!({
            "bungieUsername": "guardian",
            "bungieMembershipId": "1234",
            "destinyId": "4611686018",
            "destinyCharacterId": "2305843009",
            "refreshToken": "refresh",
            "refreshExpiration": "2026-01-01T00:00:00Z",
            "discordId": "99",
        });

        let user: UserCredential = serde_json::from_value(json).unwrap();

        assert_eq!(user.bungie_username, "guardian");
        assert_eq!(user.destiny_character_id, "2305843009");
        assert_eq!(user.discord_id.as_deref(), Some("99"));
        assert_eq!(user.discord_channel_id, None);
    }
}
