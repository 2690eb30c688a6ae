//! Dialog entities and their classification.

use std::fmt;

use grammers_client::types::peer::Peer;
use grammers_tl_types as tl;

/// Shape of the peer behind a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Person,
    BasicGroup,
    Channel { megagroup: bool },
}

impl EntityKind {
    /// Direct-message peers go through the DM phase, everything else is left.
    pub fn is_direct(&self) -> bool {
        matches!(self, EntityKind::Person)
    }

    /// Label used in progress output for groups and channels.
    pub fn leave_kind(&self) -> Option<LeaveKind> {
        match self {
            EntityKind::Person => None,
            EntityKind::BasicGroup => Some(LeaveKind::Group),
            EntityKind::Channel { megagroup: true } => Some(LeaveKind::Supergroup),
            EntityKind::Channel { megagroup: false } => Some(LeaveKind::Channel),
        }
    }
}

/// What kind of conversation a leave operation targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveKind {
    Group,
    Supergroup,
    Channel,
}

impl LeaveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveKind::Group => "Group",
            LeaveKind::Supergroup => "Supergroup",
            LeaveKind::Channel => "Channel",
        }
    }

    /// Only broadcast channels count as channels in the totals; supergroups
    /// are tallied with groups.
    pub fn counts_as_channel(&self) -> bool {
        matches!(self, LeaveKind::Channel)
    }
}

impl fmt::Display for LeaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conversation returned by dialog listing.
#[derive(Debug, Clone)]
pub struct Dialog<P> {
    pub peer: P,
    pub name: String,
    pub kind: EntityKind,
}

impl<P> Dialog<P> {
    pub fn new(peer: P, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            peer,
            name: name.into(),
            kind,
        }
    }
}

/// Classify a grammers peer.
///
/// grammers reports supergroups as `Peer::Group` wrapping a channel
/// constructor, so both group representations are inspected.
pub fn classify_peer(peer: &Peer) -> EntityKind {
    match peer {
        Peer::User(_) => EntityKind::Person,
        Peer::Channel(channel) => EntityKind::Channel {
            megagroup: channel.raw.megagroup,
        },
        Peer::Group(group) => match &group.raw {
            tl::enums::Chat::Channel(c) => EntityKind::Channel {
                megagroup: c.megagroup,
            },
            tl::enums::Chat::ChannelForbidden(c) => EntityKind::Channel {
                megagroup: c.megagroup,
            },
            _ => EntityKind::BasicGroup,
        },
    }
}

/// Display name for a peer: full name for people, title for chats.
pub fn peer_name(peer: &Peer) -> String {
    match peer {
        Peer::User(u) => u.full_name(),
        Peer::Group(g) => g.title().unwrap_or("Unknown").to_string(),
        Peer::Channel(c) => c.title().to_string(),
    }
}

/// Build a dialog entry from a grammers peer.
pub fn dialog_from_peer(peer: Peer) -> Dialog<Peer> {
    let name = peer_name(&peer);
    let kind = classify_peer(&peer);
    Dialog::new(peer, name, kind)
}
