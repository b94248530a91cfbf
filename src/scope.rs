//! Channel scoping: the capability set a player is granted on their
//! guild's pub/sub group.
//!
//! `scope_for` is the single place capabilities are computed. Both the
//! credential issuer and the relay dispatcher go through it, so any
//! future capability (read-only observers, moderator rights) is added
//! here and nowhere else.

use serde::{Deserialize, Serialize};

/// Opaque stable player identifier. Immutable for the gateway's purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Parses a raw identifier, trimming surrounding whitespace.
    /// Returns `None` for empty/whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Guild identifier; doubles as the pub/sub group name. All members of
/// a guild share exactly one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(String);

impl GuildId {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single pub/sub capability on one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    JoinGroup(GuildId),
    SendToGroup(GuildId),
}

impl Capability {
    /// Role string presented to the transport, e.g. `chat.joinGroup.Falcons`.
    pub fn role(&self) -> String {
        match self {
            Capability::JoinGroup(g) => format!("chat.joinGroup.{}", g.as_str()),
            Capability::SendToGroup(g) => format!("chat.sendToGroup.{}", g.as_str()),
        }
    }
}

/// The full capability grant for one player on one group.
///
/// Invariant: every capability references `group` and nothing else.
/// Only constructible through [`scope_for`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelScope {
    pub subject: PlayerId,
    pub group: GuildId,
    capabilities: Vec<Capability>,
}

impl ChannelScope {
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Role strings in the order join, send.
    pub fn roles(&self) -> Vec<String> {
        self.capabilities.iter().map(Capability::role).collect()
    }
}

/// Computes the minimal capability set for a player on their resolved
/// guild: exactly join + send on that one group, never broader.
pub fn scope_for(player: &PlayerId, guild: &GuildId) -> ChannelScope {
    ChannelScope {
        subject: player.clone(),
        group: guild.clone(),
        capabilities: vec![
            Capability::JoinGroup(guild.clone()),
            Capability::SendToGroup(guild.clone()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn falcons() -> GuildId {
        GuildId::parse("Falcons").unwrap()
    }

    #[test]
    fn scope_is_exactly_join_and_send_on_one_group() {
        let alice = PlayerId::parse("alice").unwrap();
        let scope = scope_for(&alice, &falcons());

        assert_eq!(scope.subject, alice);
        assert_eq!(scope.group, falcons());
        assert_eq!(
            scope.capabilities(),
            &[
                Capability::JoinGroup(falcons()),
                Capability::SendToGroup(falcons()),
            ]
        );
        // Never a superset: two capabilities, both on the resolved guild.
        assert_eq!(scope.capabilities().len(), 2);
        for cap in scope.capabilities() {
            match cap {
                Capability::JoinGroup(g) | Capability::SendToGroup(g) => {
                    assert_eq!(g, &falcons())
                }
            }
        }
    }

    #[test]
    fn roles_render_as_transport_strings() {
        let scope = scope_for(&PlayerId::parse("alice").unwrap(), &falcons());
        assert_eq!(
            scope.roles(),
            vec!["chat.joinGroup.Falcons", "chat.sendToGroup.Falcons"]
        );
    }

    #[test]
    fn identifiers_are_trimmed_and_non_empty() {
        assert_eq!(PlayerId::parse("  alice  ").unwrap().as_str(), "alice");
        assert!(PlayerId::parse("   ").is_none());
        assert!(PlayerId::parse("").is_none());
        assert_eq!(GuildId::parse(" Falcons ").unwrap().as_str(), "Falcons");
        assert!(GuildId::parse("").is_none());
    }
}
