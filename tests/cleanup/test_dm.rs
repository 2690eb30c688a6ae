//! Tests for the direct-message eraser

use tg_cleanup::cleanup::dm::{CONFIRM_COMMAND, CONFIRM_FETCH_LIMIT};
use tg_cleanup::cleanup::erase;
use tg_cleanup::{Dialog, EntityKind};

use super::mock::{MockClient, Op};

fn person(id: u32) -> Dialog<u32> {
    Dialog::new(id, format!("User {}", id), EntityKind::Person)
}

#[tokio::test]
async fn test_erase_deletes_history_and_dialog_with_revoke() {
    let client = MockClient::new();

    assert!(erase(&client, &person(1), 1, 1).await);

    let calls = client.calls_for(1);
    let history = calls.iter().find(|c| c.op == Op::DeleteHistory).unwrap();
    let dialog = calls.iter().find(|c| c.op == Op::DeleteDialog).unwrap();
    assert_eq!(history.revoke, Some(true));
    assert_eq!(dialog.revoke, Some(true));

    // Both required deletions run at the same time.
    assert!(history.started < dialog.finished);
    assert!(dialog.started < history.finished);
}

#[tokio::test]
async fn test_erase_runs_confirmation_pass() {
    let client = MockClient::new();

    assert!(erase(&client, &person(4), 1, 1).await);

    assert_eq!(
        client.ops_for(4)[2..],
        [Op::SendMessage, Op::RecentMessages, Op::DeleteMessages]
    );
    assert_eq!(client.sent(), vec![(4, CONFIRM_COMMAND.to_string())]);
    assert_eq!(client.deleted_ids(4), vec![4001, 4002, 4003]);
    assert_eq!(CONFIRM_FETCH_LIMIT, 100);
}

#[tokio::test]
async fn test_erase_history_failure_returns_false() {
    let client = MockClient::new().fail_on(Op::DeleteHistory, 2);

    assert!(!erase(&client, &person(2), 1, 1).await);

    // The dialog deletion still ran to completion, the follow-up did not.
    let ops = client.ops_for(2);
    assert!(ops.contains(&Op::DeleteDialog));
    assert!(!ops.contains(&Op::SendMessage));
}

#[tokio::test]
async fn test_erase_dialog_failure_returns_false() {
    let client = MockClient::new().fail_on(Op::DeleteDialog, 3);

    assert!(!erase(&client, &person(3), 2, 5).await);
    assert!(client.sent().is_empty());
}

#[tokio::test]
async fn test_erase_ignores_confirmation_failures() {
    let client = MockClient::new().fail_on(Op::SendMessage, 5);
    assert!(erase(&client, &person(5), 1, 1).await);
    assert!(!client.ops_for(5).contains(&Op::RecentMessages));

    let client = MockClient::new().fail_on(Op::DeleteMessages, 6);
    assert!(erase(&client, &person(6), 1, 1).await);
}
