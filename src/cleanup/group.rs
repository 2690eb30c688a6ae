//! Group and channel leaver.

use std::time::Instant;

use tracing::warn;

use crate::client::SessionClient;
use crate::entity::{Dialog, EntityKind, LeaveKind};
use crate::error::{Error, Result};

/// Leave a basic group, supergroup or channel and drop its dialog.
///
/// Errors are printed and logged; the caller only sees the outcome and the
/// kind of chat that was targeted.
pub async fn leave<C: SessionClient>(
    client: &C,
    dialog: &Dialog<C::Peer>,
    index: usize,
    total: usize,
) -> (bool, LeaveKind) {
    let kind = dialog.kind.leave_kind().unwrap_or(LeaveKind::Group);

    println!("[{}/{}] ⏳ Leaving {}: {}", index, total, kind, dialog.name);
    let start = Instant::now();

    match leave_dialog(client, dialog).await {
        Ok(()) => {
            println!(
                "[{}/{}] ✅ Left {}: {} in {:.2}s",
                index,
                total,
                kind,
                dialog.name,
                start.elapsed().as_secs_f64()
            );
            (true, kind)
        }
        Err(err) => {
            let elapsed = start.elapsed();
            println!(
                "[{}/{}] ❌ Failed to leave {} {}: {} ({:.2}s)",
                index,
                total,
                kind,
                dialog.name,
                err,
                elapsed.as_secs_f64()
            );
            warn!(
                index,
                total,
                kind = kind.as_str(),
                name = %dialog.name,
                elapsed_s = elapsed.as_secs_f64(),
                "Leaving failed: {}",
                err
            );
            (false, kind)
        }
    }
}

async fn leave_dialog<C: SessionClient>(client: &C, dialog: &Dialog<C::Peer>) -> Result<()> {
    match dialog.kind {
        // Basic groups have no separate leave request.
        EntityKind::BasicGroup => client.delete_dialog(&dialog.peer, false).await,
        EntityKind::Channel { .. } => {
            client.leave_channel(&dialog.peer).await?;
            client.delete_dialog(&dialog.peer, false).await
        }
        EntityKind::Person => Err(Error::InvalidArgument(format!(
            "{} is a direct message, not a group",
            dialog.name
        ))),
    }
}
