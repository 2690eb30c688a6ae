//! Recording `SessionClient` used by the cleanup tests.
//!
//! Peers are plain `u32` ids. Every operation yields a few times so that
//! concurrently launched operations really overlap, and records a logical
//! start/finish tick for ordering checks.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tg_cleanup::{Dialog, Error, Result, SessionClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    DeleteHistory,
    DeleteDialog,
    SendMessage,
    RecentMessages,
    DeleteMessages,
    LeaveChannel,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub op: Op,
    pub peer: u32,
    pub revoke: Option<bool>,
    pub started: usize,
    pub finished: usize,
}

#[derive(Default)]
struct State {
    clock: usize,
    calls: Vec<Call>,
    active: HashMap<u32, usize>,
    max_active_peers: usize,
    failures: HashSet<(Op, u32)>,
    sent: Vec<(u32, String)>,
    deleted_ids: HashMap<u32, Vec<i32>>,
    disconnects: usize,
}

pub struct MockClient {
    dialogs: Vec<Dialog<u32>>,
    listing_fails: bool,
    state: Mutex<State>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::with_dialogs(Vec::new())
    }

    pub fn with_dialogs(dialogs: Vec<Dialog<u32>>) -> Self {
        Self {
            dialogs,
            listing_fails: false,
            state: Mutex::new(State::default()),
        }
    }

    /// Make `op` fail for `peer`.
    pub fn fail_on(self, op: Op, peer: u32) -> Self {
        self.state.lock().unwrap().failures.insert((op, peer));
        self
    }

    /// Make `list_dialogs` fail.
    pub fn fail_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    pub fn disconnects(&self) -> usize {
        self.state.lock().unwrap().disconnects
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_for(&self, peer: u32) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.peer == peer).collect()
    }

    pub fn ops_for(&self, peer: u32) -> Vec<Op> {
        self.calls_for(peer).into_iter().map(|c| c.op).collect()
    }

    /// Most peers that had operations running at the same time.
    pub fn max_active_peers(&self) -> usize {
        self.state.lock().unwrap().max_active_peers
    }

    pub fn sent(&self) -> Vec<(u32, String)> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn deleted_ids(&self, peer: u32) -> Vec<i32> {
        self.state
            .lock()
            .unwrap()
            .deleted_ids
            .get(&peer)
            .cloned()
            .unwrap_or_default()
    }

    /// First start tick over the given peers.
    pub fn first_start(&self, peers: &[u32]) -> usize {
        self.calls()
            .iter()
            .filter(|c| peers.contains(&c.peer))
            .map(|c| c.started)
            .min()
            .expect("no calls for peers")
    }

    /// Last finish tick over the given peers.
    pub fn last_finish(&self, peers: &[u32]) -> usize {
        self.calls()
            .iter()
            .filter(|c| peers.contains(&c.peer))
            .map(|c| c.finished)
            .max()
            .expect("no calls for peers")
    }

    async fn record(&self, op: Op, peer: u32, revoke: Option<bool>) -> Result<()> {
        let started = {
            let mut state = self.state.lock().unwrap();
            state.clock += 1;
            *state.active.entry(peer).or_default() += 1;
            state.max_active_peers = state.max_active_peers.max(state.active.len());
            state.clock
        };

        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let finished = state.clock;
        if let Some(count) = state.active.get_mut(&peer) {
            *count -= 1;
            if *count == 0 {
                state.active.remove(&peer);
            }
        }
        state.calls.push(Call {
            op,
            peer,
            revoke,
            started,
            finished,
        });

        if state.failures.contains(&(op, peer)) {
            Err(Error::TelegramError(format!("{:?} failed for peer {}", op, peer)))
        } else {
            Ok(())
        }
    }
}

impl SessionClient for MockClient {
    type Peer = u32;

    async fn list_dialogs(&self) -> Result<Vec<Dialog<u32>>> {
        if self.listing_fails {
            return Err(Error::TelegramError("dialog listing failed".to_string()));
        }
        Ok(self.dialogs.clone())
    }

    async fn delete_history(&self, peer: &u32, revoke: bool) -> Result<()> {
        self.record(Op::DeleteHistory, *peer, Some(revoke)).await
    }

    async fn delete_dialog(&self, peer: &u32, revoke: bool) -> Result<()> {
        self.record(Op::DeleteDialog, *peer, Some(revoke)).await
    }

    async fn send_message(&self, peer: &u32, text: &str) -> Result<()> {
        self.record(Op::SendMessage, *peer, None).await?;
        self.state
            .lock()
            .unwrap()
            .sent
            .push((*peer, text.to_string()));
        Ok(())
    }

    async fn recent_message_ids(&self, peer: &u32, limit: usize) -> Result<Vec<i32>> {
        self.record(Op::RecentMessages, *peer, None).await?;
        let base = *peer as i32 * 1000;
        Ok((1..=3).map(|n| base + n).take(limit).collect())
    }

    async fn delete_messages(&self, peer: &u32, ids: &[i32]) -> Result<()> {
        self.record(Op::DeleteMessages, *peer, Some(true)).await?;
        self.state
            .lock()
            .unwrap()
            .deleted_ids
            .entry(*peer)
            .or_default()
            .extend_from_slice(ids);
        Ok(())
    }

    async fn leave_channel(&self, peer: &u32) -> Result<()> {
        self.record(Op::LeaveChannel, *peer, None).await
    }

    async fn disconnect(&mut self) {
        self.state.lock().unwrap().disconnects += 1;
    }
}
