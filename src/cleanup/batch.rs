//! Batch orchestration.
//!
//! Dialogs are split into direct messages and groups/channels. Each class is
//! processed in fixed-size batches: every item of a batch runs concurrently,
//! the batch is awaited as a whole, and a pause follows before the next one.
//! All direct messages are finished before any group is touched.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::client::SessionClient;
use crate::config::{Config, BATCH_PAUSE_MS, DM_BATCH_SIZE, GROUP_BATCH_SIZE};
use crate::entity::Dialog;

use super::{dm, group};

/// Batch sizes and the pause between batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettings {
    pub dm_batch_size: usize,
    pub group_batch_size: usize,
    pub pause: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            dm_batch_size: DM_BATCH_SIZE,
            group_batch_size: GROUP_BATCH_SIZE,
            pause: Duration::from_millis(BATCH_PAUSE_MS),
        }
    }
}

impl From<&Config> for BatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            dm_batch_size: config.dm_batch_size,
            group_batch_size: config.group_batch_size,
            pause: config.batch_pause,
        }
    }
}

/// Aggregated outcome of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupTotals {
    pub dm_count: usize,
    pub group_count: usize,
    pub channel_count: usize,
    pub dm_failed: usize,
    pub group_failed: usize,
}

impl CleanupTotals {
    pub fn failed(&self) -> usize {
        self.dm_failed + self.group_failed
    }
}

/// Split dialogs into (direct messages, groups and channels), keeping order.
pub fn partition<P>(dialogs: Vec<Dialog<P>>) -> (Vec<Dialog<P>>, Vec<Dialog<P>>) {
    dialogs.into_iter().partition(|d| d.kind.is_direct())
}

/// Run `task` over `items` in batches of `batch_size`.
///
/// `task` receives the item with its 1-based position and the item count.
/// Results come back in item order. There is no pause after the last batch.
pub async fn run_batches<'a, T, F, Fut>(
    items: &'a [T],
    batch_size: usize,
    pause: Duration,
    mut task: F,
) -> Vec<Fut::Output>
where
    F: FnMut(&'a T, usize, usize) -> Fut,
    Fut: Future,
{
    let total = items.len();
    let batch_size = batch_size.max(1);
    let mut results = Vec::with_capacity(total);

    for (batch_no, chunk) in items.chunks(batch_size).enumerate() {
        let offset = batch_no * batch_size;
        let futures: Vec<Fut> = chunk
            .iter()
            .enumerate()
            .map(|(i, item)| task(item, offset + i + 1, total))
            .collect();

        results.extend(join_all(futures).await);
        debug!(batch = batch_no + 1, size = chunk.len(), "Batch complete");

        if offset + chunk.len() < total {
            sleep(pause).await;
        }
    }

    results
}

/// Erase every direct message, then leave every group and channel.
pub async fn run<C: SessionClient>(
    client: &C,
    dialogs: Vec<Dialog<C::Peer>>,
    settings: &BatchSettings,
) -> CleanupTotals {
    println!("\n🔍 Analyzing your dialogs...");
    let (dms, groups) = partition(dialogs);
    println!(
        "\n📊 Found {} DMs, {} groups/channels to process",
        dms.len(),
        groups.len()
    );

    let mut totals = CleanupTotals::default();

    if !dms.is_empty() {
        println!("\n🚀 PHASE 1: CLEANING DIRECT MESSAGES");
        let results = run_batches(&dms, settings.dm_batch_size, settings.pause, |d, i, n| {
            dm::erase(client, d, i, n)
        })
        .await;

        totals.dm_count = results.iter().filter(|ok| **ok).count();
        totals.dm_failed = results.len() - totals.dm_count;
        info!(
            deleted = totals.dm_count,
            failed = totals.dm_failed,
            "Direct message phase finished"
        );
    }

    if !groups.is_empty() {
        println!("\n🚀 PHASE 2: LEAVING GROUPS AND CHANNELS");
        let results = run_batches(
            &groups,
            settings.group_batch_size,
            settings.pause,
            |d, i, n| group::leave(client, d, i, n),
        )
        .await;

        for (ok, kind) in results {
            if !ok {
                totals.group_failed += 1;
            } else if kind.counts_as_channel() {
                totals.channel_count += 1;
            } else {
                totals.group_count += 1;
            }
        }
        info!(
            groups = totals.group_count,
            channels = totals.channel_count,
            failed = totals.group_failed,
            "Group and channel phase finished"
        );
    }

    totals
}
