//! Direct-message eraser.

use std::time::Instant;

use tracing::warn;

use crate::client::SessionClient;
use crate::entity::Dialog;
use crate::error::Result;

/// Text sent after deletion to trigger bots that honour a delete command.
pub const CONFIRM_COMMAND: &str = "/delete";
/// How many recent messages the follow-up pass removes.
pub const CONFIRM_FETCH_LIMIT: usize = 100;

/// Delete the whole history with one person, for both sides.
///
/// Returns `true` when both the history deletion and the dialog deletion
/// succeed. The follow-up `/delete` pass never affects the result.
pub async fn erase<C: SessionClient>(
    client: &C,
    dialog: &Dialog<C::Peer>,
    index: usize,
    total: usize,
) -> bool {
    println!("[{}/{}] ⏳ Processing DM with: {}", index, total, dialog.name);
    let start = Instant::now();

    let (history, entry) = futures::join!(
        client.delete_history(&dialog.peer, true),
        client.delete_dialog(&dialog.peer, true),
    );

    match history.and(entry) {
        Ok(()) => {
            let _ = confirm_deletion(client, &dialog.peer).await;

            let elapsed = start.elapsed();
            println!(
                "[{}/{}] ✅ Deleted DM with {} in {:.2}s",
                index,
                total,
                dialog.name,
                elapsed.as_secs_f64()
            );
            true
        }
        Err(err) => {
            let elapsed = start.elapsed();
            println!(
                "[{}/{}] ❌ Failed to delete DM with {}: {} ({:.2}s)",
                index,
                total,
                dialog.name,
                err,
                elapsed.as_secs_f64()
            );
            warn!(
                index,
                total,
                name = %dialog.name,
                elapsed_s = elapsed.as_secs_f64(),
                "DM deletion failed: {}",
                err
            );
            false
        }
    }
}

async fn confirm_deletion<C: SessionClient>(client: &C, peer: &C::Peer) -> Result<()> {
    client.send_message(peer, CONFIRM_COMMAND).await?;

    let ids = client.recent_message_ids(peer, CONFIRM_FETCH_LIMIT).await?;
    if !ids.is_empty() {
        client.delete_messages(peer, &ids).await?;
    }

    Ok(())
}
