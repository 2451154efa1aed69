//! Registry behaviour driven through the server actor, one line at a time.

mod common;

use common::{FIXED_WIRE_TIME, TestClient, spawn_actor};

#[tokio::test]
async fn test_created_channels_are_listed_in_order() {
    // テスト項目: 異なる名前で CREATE すると、応答は全チャンネルの一覧になる
    // given (前提条件):
    let handle = spawn_actor();
    let alice = TestClient::connect(&handle, "10.0.0.1:4000").await;

    // when (操作):
    alice.send("CREATE lobby").await;
    alice.send("CREATE dev").await;

    // then (期待する結果):
    assert_eq!(
        alice.lines(),
        vec![
            format!("{FIXED_WIRE_TIME},lobby,null;"),
            format!("{FIXED_WIRE_TIME},dev,null;{FIXED_WIRE_TIME},lobby,null;"),
        ]
    );
}

#[tokio::test]
async fn test_duplicate_create_answers_false_without_change() {
    // テスト項目: 既存名での CREATE は FALSE になり、チャンネルは増えない
    // given (前提条件):
    let handle = spawn_actor();
    let alice = TestClient::connect(&handle, "10.0.0.1:4000").await;
    let bob = TestClient::connect(&handle, "10.0.0.2:4000").await;
    alice.send("CREATE lobby").await;
    alice.send("JOIN lobby").await;

    // when (操作):
    bob.send("CREATE lobby").await;

    // then (期待する結果):
    assert_eq!(bob.lines(), vec!["FALSE".to_string()]);
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.channels.len(), 1);
    assert_eq!(
        snapshot.channel("lobby").unwrap().members,
        vec!["10.0.0.1:4000".to_string()]
    );
}

#[tokio::test]
async fn test_join_and_leave_are_reflected_in_member_listing() {
    // テスト項目: JOIN / LEAVE が LIST_USR に反映される
    // given (前提条件):
    let handle = spawn_actor();
    let alice = TestClient::connect(&handle, "10.0.0.1:4000").await;
    let bob = TestClient::connect(&handle, "10.0.0.2:4000").await;
    alice.send("CREATE lobby").await;

    // when (操作):
    alice.send("JOIN lobby").await;
    bob.send("JOIN lobby").await;
    bob.send("LIST_USR lobby").await;
    alice.send("LEAVE lobby").await;
    bob.send("LIST_USR lobby").await;

    // then (期待する結果):
    assert_eq!(
        bob.lines(),
        vec![
            "10.0.0.1:4000;10.0.0.2:4000;".to_string(),
            "10.0.0.2:4000;".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_identical_messages_are_both_kept() {
    // テスト項目: 同一内容のメッセージを 2 回送ると 2 件とも記録される
    // given (前提条件):
    let handle = spawn_actor();
    let alice = TestClient::connect(&handle, "10.0.0.1:4000").await;
    alice.send("CREATE lobby").await;

    // when (操作):
    alice.send("MSG lobby;;hello;;Zm9v").await;
    alice.send("MSG lobby;;hello;;Zm9v").await;
    alice.send("LIST_MSG lobby").await;

    // then (期待する結果):
    let entry = format!("{FIXED_WIRE_TIME},10.0.0.1:4000,hello,Zm9v;");
    assert_eq!(alice.lines().last().unwrap(), &entry.repeat(2));
}

#[tokio::test]
async fn test_empty_listings_are_silent() {
    // テスト項目: 空の一覧は応答を返さない
    // given (前提条件):
    let handle = spawn_actor();
    let alice = TestClient::connect(&handle, "10.0.0.1:4000").await;

    // when (操作):
    alice.send("LIST_CHN").await;
    alice.send("CREATE lobby").await;
    alice.send("LIST_MSG lobby").await;
    alice.send("LIST_USR lobby").await;

    // then (期待する結果):
    assert_eq!(alice.lines(), vec![format!("{FIXED_WIRE_TIME},lobby,null;")]);
}

#[tokio::test]
async fn test_unknown_channel_is_reported() {
    // テスト項目: 存在しないチャンネルへの操作はエラー行になる
    // given (前提条件):
    let handle = spawn_actor();
    let alice = TestClient::connect(&handle, "10.0.0.1:4000").await;

    // when (操作):
    alice.send("JOIN nowhere").await;
    alice.send("MSG nowhere;;hi;;Zm9v").await;

    // then (期待する結果):
    assert_eq!(
        alice.lines(),
        vec![
            "ERROR unknown channel: nowhere".to_string(),
            "ERROR unknown channel: nowhere".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_offline_removes_membership() {
    // テスト項目: 切断したクライアントは全チャンネルのメンバーから外れ、以後のコマンドは拒否される
    // given (前提条件):
    let handle = spawn_actor();
    let alice = TestClient::connect(&handle, "10.0.0.1:4000").await;
    let bob = TestClient::connect(&handle, "10.0.0.2:4000").await;
    alice.send("CREATE lobby").await;
    alice.send("CREATE dev").await;
    alice.send("JOIN lobby").await;
    alice.send("JOIN dev").await;
    bob.send("JOIN lobby").await;

    // when (操作):
    alice.disconnect().await;
    alice.send("JOIN lobby").await;
    alice.send("MSG lobby;;late;;Zm9v").await;

    // then (期待する結果):
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.clients, vec!["10.0.0.2:4000".to_string()]);
    assert!(snapshot.channel("dev").unwrap().members.is_empty());
    assert_eq!(
        snapshot.channel("lobby").unwrap().members,
        vec!["10.0.0.2:4000".to_string()]
    );
    assert!(snapshot.channel("lobby").unwrap().messages.is_empty());
    let lines = alice.lines();
    assert_eq!(
        &lines[lines.len() - 2..],
        &[
            "ERROR unknown client: 10.0.0.1:4000".to_string(),
            "ERROR unknown client: 10.0.0.1:4000".to_string(),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_senders_keep_their_own_order() {
    // テスト項目: 複数クライアントが同時に JOIN / MSG / LEAVE しても、
    //             各クライアントの操作は送信順に適用される
    // given (前提条件):
    let handle = spawn_actor();
    let owner = TestClient::connect(&handle, "10.0.0.100:4000").await;
    owner.send("CREATE lobby").await;

    let mut clients = Vec::new();
    for i in 0..8 {
        clients.push(TestClient::connect(&handle, &format!("10.0.0.{i}:4000")).await);
    }

    // when (操作):
    let mut tasks = Vec::new();
    for (i, client) in clients.into_iter().enumerate() {
        tasks.push(tokio::spawn(async move {
            let mut lines = vec!["JOIN lobby".to_string()];
            for n in 0..10 {
                lines.push(format!("MSG lobby;;msg{n};;Zm9v"));
                if n == 4 {
                    lines.push("LEAVE lobby".to_string());
                    lines.push("JOIN lobby".to_string());
                }
            }
            if i % 2 == 1 {
                lines.push("LEAVE lobby".to_string());
            }
            for line in &lines {
                client.session.handle_line(line).await.unwrap();
            }
            client
        }));
    }
    let mut clients = Vec::new();
    for task in tasks {
        clients.push(task.await.unwrap());
    }

    // then (期待する結果):
    let snapshot = handle.snapshot().await.unwrap();
    let lobby = snapshot.channel("lobby").unwrap();
    assert_eq!(lobby.messages.len(), 80);
    for i in 0..8 {
        let sender = format!("10.0.0.{i}:4000");
        let contents: Vec<&str> = lobby
            .messages
            .iter()
            .filter(|m| m.sender == sender)
            .map(|m| m.content.as_str())
            .collect();
        let expected: Vec<String> = (0..10).map(|n| format!("msg{n}")).collect();
        assert_eq!(contents, expected, "messages of {sender} out of order");
    }
    let expected_members: Vec<String> = (0..8)
        .filter(|i| i % 2 == 0)
        .map(|i| format!("10.0.0.{i}:4000"))
        .collect();
    assert_eq!(lobby.members, expected_members);
    assert!(clients.iter().all(|c| c.lines().is_empty()));
}

#[tokio::test]
async fn test_malformed_lines_never_reach_the_registry() {
    // テスト項目: 不正な行は FALSE / ERROR で応答され、状態は変わらない
    // given (前提条件):
    let handle = spawn_actor();
    let alice = TestClient::connect(&handle, "10.0.0.1:4000").await;

    // when (操作):
    alice.send("CREATE;;lobby").await;
    alice.send("CREATE").await;
    alice.send("MSG lobby;;hello;;").await;

    // then (期待する結果):
    assert_eq!(
        alice.lines(),
        vec![
            "FALSE".to_string(),
            "ERROR empty arg".to_string(),
            "ERROR empty arg".to_string(),
        ]
    );
    assert!(handle.snapshot().await.unwrap().channels.is_empty());
}
