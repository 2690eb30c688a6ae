//! Tests for the group and channel leaver

use tg_cleanup::cleanup::leave;
use tg_cleanup::{Dialog, EntityKind, LeaveKind};

use super::mock::{MockClient, Op};

#[tokio::test]
async fn test_basic_group_only_deletes_dialog() {
    let client = MockClient::new();
    let dialog = Dialog::new(10, "Family", EntityKind::BasicGroup);

    assert_eq!(leave(&client, &dialog, 1, 1).await, (true, LeaveKind::Group));
    assert_eq!(client.ops_for(10), vec![Op::DeleteDialog]);
}

#[tokio::test]
async fn test_channel_leaves_then_deletes_dialog() {
    let client = MockClient::new();
    let dialog = Dialog::new(11, "News", EntityKind::Channel { megagroup: false });

    assert_eq!(leave(&client, &dialog, 1, 1).await, (true, LeaveKind::Channel));

    let calls = client.calls_for(11);
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].op, Op::LeaveChannel);
    assert_eq!(calls[1].op, Op::DeleteDialog);
    assert!(calls[0].finished < calls[1].started);
}

#[tokio::test]
async fn test_megagroup_is_reported_as_supergroup() {
    let client = MockClient::new();
    let dialog = Dialog::new(12, "Rust devs", EntityKind::Channel { megagroup: true });

    assert_eq!(
        leave(&client, &dialog, 1, 1).await,
        (true, LeaveKind::Supergroup)
    );
    assert_eq!(client.ops_for(12), vec![Op::LeaveChannel, Op::DeleteDialog]);
}

#[tokio::test]
async fn test_leave_failure_keeps_kind() {
    let client = MockClient::new().fail_on(Op::LeaveChannel, 13);
    let dialog = Dialog::new(13, "Broken", EntityKind::Channel { megagroup: false });

    assert_eq!(leave(&client, &dialog, 1, 1).await, (false, LeaveKind::Channel));
    // No dialog deletion after a failed leave.
    assert_eq!(client.ops_for(13), vec![Op::LeaveChannel]);
}

#[tokio::test]
async fn test_basic_group_failure() {
    let client = MockClient::new().fail_on(Op::DeleteDialog, 14);
    let dialog = Dialog::new(14, "Old group", EntityKind::BasicGroup);

    assert_eq!(leave(&client, &dialog, 1, 1).await, (false, LeaveKind::Group));
}

#[tokio::test]
async fn test_person_is_rejected_without_calls() {
    let client = MockClient::new();
    let dialog = Dialog::new(15, "Alice", EntityKind::Person);

    assert_eq!(leave(&client, &dialog, 1, 1).await, (false, LeaveKind::Group));
    assert!(client.calls().is_empty());
}
