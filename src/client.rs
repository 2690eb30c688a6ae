//! Operations the cleanup needs from a Telegram session.
//!
//! [`SessionClient`] is the seam between the batch logic and grammers. The
//! production implementation lives on [`TelegramClient`]; tests substitute a
//! recording double.

use grammers_client::types::peer::Peer;
use grammers_client::InvocationError;
use grammers_tl_types as tl;
use tracing::debug;

use crate::entity::{classify_peer, dialog_from_peer, Dialog, EntityKind};
use crate::error::{Error, Result};
use crate::session::TelegramClient;

/// RPC errors meaning the account is no longer in the chat.
const ALREADY_LEFT: &[&str] = &["USER_NOT_PARTICIPANT", "CHANNEL_PRIVATE", "CHAT_ID_INVALID"];

/// Telegram primitives used by the eraser and the leaver.
#[allow(async_fn_in_trait)]
pub trait SessionClient {
    type Peer;

    /// Every dialog of the logged-in account, in server order.
    async fn list_dialogs(&self) -> Result<Vec<Dialog<Self::Peer>>>;

    /// Delete the whole history with a peer (`max_id = 0`, not just cleared).
    async fn delete_history(&self, peer: &Self::Peer, revoke: bool) -> Result<()>;

    /// Remove the dialog entry itself.
    async fn delete_dialog(&self, peer: &Self::Peer, revoke: bool) -> Result<()>;

    async fn send_message(&self, peer: &Self::Peer, text: &str) -> Result<()>;

    /// Ids of the most recent messages, newest first, at most `limit`.
    async fn recent_message_ids(&self, peer: &Self::Peer, limit: usize) -> Result<Vec<i32>>;

    /// Delete messages for everyone.
    async fn delete_messages(&self, peer: &Self::Peer, ids: &[i32]) -> Result<()>;

    async fn leave_channel(&self, peer: &Self::Peer) -> Result<()>;

    /// Close the connection. Called once at the end of every run.
    async fn disconnect(&mut self);
}

/// Convert a Peer to InputPeer for API calls.
pub fn peer_to_input(peer: &Peer) -> tl::enums::InputPeer {
    match peer {
        Peer::User(user) => {
            let (user_id, access_hash) = match &user.raw {
                tl::enums::User::User(u) => (u.id, u.access_hash.unwrap_or(0)),
                tl::enums::User::Empty(u) => (u.id, 0),
            };
            tl::enums::InputPeer::User(tl::types::InputPeerUser {
                user_id,
                access_hash,
            })
        }
        Peer::Channel(channel) => tl::enums::InputPeer::Channel(tl::types::InputPeerChannel {
            channel_id: channel.raw.id,
            access_hash: channel.raw.access_hash.unwrap_or(0),
        }),
        Peer::Group(group) => chat_to_input(&group.raw),
    }
}

/// InputPeer for a raw chat; supergroups arrive here as channel constructors.
fn chat_to_input(chat: &tl::enums::Chat) -> tl::enums::InputPeer {
    match chat {
        tl::enums::Chat::Chat(c) => {
            tl::enums::InputPeer::Chat(tl::types::InputPeerChat { chat_id: c.id })
        }
        tl::enums::Chat::Forbidden(c) => {
            tl::enums::InputPeer::Chat(tl::types::InputPeerChat { chat_id: c.id })
        }
        tl::enums::Chat::Channel(c) => tl::enums::InputPeer::Channel(tl::types::InputPeerChannel {
            channel_id: c.id,
            access_hash: c.access_hash.unwrap_or(0),
        }),
        tl::enums::Chat::ChannelForbidden(c) => {
            tl::enums::InputPeer::Channel(tl::types::InputPeerChannel {
                channel_id: c.id,
                access_hash: c.access_hash,
            })
        }
        tl::enums::Chat::Empty(_) => tl::enums::InputPeer::Empty,
    }
}

/// InputChannel for broadcast channels and supergroups.
fn input_channel(peer: &Peer) -> Option<tl::enums::InputChannel> {
    as_input_channel(peer_to_input(peer))
}

fn as_input_channel(input: tl::enums::InputPeer) -> Option<tl::enums::InputChannel> {
    match input {
        tl::enums::InputPeer::Channel(c) => {
            Some(tl::enums::InputChannel::Channel(tl::types::InputChannel {
                channel_id: c.channel_id,
                access_hash: c.access_hash,
            }))
        }
        _ => None,
    }
}

fn is_already_left(err: &InvocationError) -> bool {
    ALREADY_LEFT.iter().any(|name| err.is(name))
}

impl TelegramClient {
    async fn leave_input_channel(&self, peer: &Peer) -> Result<()> {
        let channel = input_channel(peer)
            .ok_or_else(|| Error::InvalidArgument("peer is not a channel".to_string()))?;

        match self
            .invoke(&tl::functions::channels::LeaveChannel { channel })
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_already_left(&err) => {
                debug!("Channel already left: {}", err);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn leave_basic_group(&self, peer: &Peer, revoke: bool) -> Result<()> {
        let chat_id = match peer_to_input(peer) {
            tl::enums::InputPeer::Chat(c) => c.chat_id,
            _ => return Err(Error::InvalidArgument("peer is not a basic group".to_string())),
        };

        let request = tl::functions::messages::DeleteChatUser {
            revoke_history: revoke,
            chat_id,
            user_id: tl::enums::InputUser::UserSelf,
        };

        match self.invoke(&request).await {
            Ok(_) => Ok(()),
            Err(err) if is_already_left(&err) => {
                debug!(chat_id, "Basic group already left: {}", err);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl SessionClient for TelegramClient {
    type Peer = Peer;

    async fn list_dialogs(&self) -> Result<Vec<Dialog<Peer>>> {
        let mut result = Vec::new();
        let mut dialogs = self.iter_dialogs();

        while let Some(dialog) = dialogs.next().await? {
            result.push(dialog_from_peer(dialog.peer.clone()));
        }

        Ok(result)
    }

    async fn delete_history(&self, peer: &Peer, revoke: bool) -> Result<()> {
        let input = peer_to_input(peer);

        // The server deletes in chunks and reports how much is left.
        loop {
            let request = tl::functions::messages::DeleteHistory {
                just_clear: false,
                revoke,
                peer: input.clone(),
                max_id: 0,
                min_date: None,
                max_date: None,
            };

            let affected: tl::types::messages::AffectedHistory =
                self.invoke(&request).await?.into();
            if affected.offset <= 0 {
                return Ok(());
            }
        }
    }

    async fn delete_dialog(&self, peer: &Peer, revoke: bool) -> Result<()> {
        match classify_peer(peer) {
            EntityKind::Person => self.delete_history(peer, revoke).await,
            EntityKind::BasicGroup => {
                self.leave_basic_group(peer, revoke).await?;
                self.delete_history(peer, revoke).await
            }
            EntityKind::Channel { .. } => self.leave_input_channel(peer).await,
        }
    }

    async fn send_message(&self, peer: &Peer, text: &str) -> Result<()> {
        self.client.send_message(peer, text).await?;
        Ok(())
    }

    async fn recent_message_ids(&self, peer: &Peer, limit: usize) -> Result<Vec<i32>> {
        let mut ids = Vec::with_capacity(limit);
        let mut iter = self.iter_messages(peer);

        while ids.len() < limit {
            match iter.next().await? {
                Some(msg) => ids.push(msg.id()),
                None => break,
            }
        }

        Ok(ids)
    }

    async fn delete_messages(&self, peer: &Peer, ids: &[i32]) -> Result<()> {
        self.client.delete_messages(peer, ids).await?;
        Ok(())
    }

    async fn leave_channel(&self, peer: &Peer) -> Result<()> {
        self.leave_input_channel(peer).await
    }

    async fn disconnect(&mut self) {
        TelegramClient::disconnect(self).await
    }
}
