use serde_json::{json, Value};

use metals_dap::dap::codec::{DapReader, DapWriter};
use metals_dap::RunDebugAdapter;

type ClientReader = DapReader<tokio::io::ReadHalf<tokio::io::DuplexStream>>;
type ClientWriter = DapWriter<tokio::io::WriteHalf<tokio::io::DuplexStream>>;

fn start_adapter() -> (ClientReader, ClientWriter, tokio::task::JoinHandle<Result<(), metals_dap::DapError>>) {
    let (client, server_stream) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server_stream);
    let server_task =
        tokio::spawn(async move { RunDebugAdapter::new().serve(server_read, server_write).await });

    let (client_read, client_write) = tokio::io::split(client);
    (DapReader::new(client_read), DapWriter::new(client_write), server_task)
}

async fn send_request(writer: &mut ClientWriter, seq: u64, command: &str, arguments: Value) {
    let msg = json!({
        "seq": seq,
        "type": "request",
        "command": command,
        "arguments": arguments,
    });
    writer.write_value(&msg).await.unwrap();
}

async fn read_next(reader: &mut ClientReader) -> Value {
    reader.read_value().await.unwrap().unwrap()
}

#[tokio::test]
async fn run_session_transcript() {
    let (mut reader, mut writer, server_task) = start_adapter();

    send_request(&mut writer, 1, "initialize", json!({"adapterID": "scala"})).await;
    let init = read_next(&mut reader).await;
    assert_eq!(init["type"], "response");
    assert_eq!(init["seq"], 1);
    assert_eq!(init["request_seq"], 1);
    assert_eq!(init["command"], "initialize");
    assert_eq!(init["success"], true);
    assert_eq!(init["body"], json!({}));

    send_request(&mut writer, 2, "launch", json!({"noDebug": true})).await;
    let launch = read_next(&mut reader).await;
    assert_eq!(launch["type"], "response");
    assert_eq!(launch["seq"], 2);
    assert_eq!(launch["request_seq"], 2);
    assert!(launch.get("body").is_none());

    let exited = read_next(&mut reader).await;
    assert_eq!(
        exited,
        json!({"seq": 3, "type": "event", "event": "exited", "body": {"exitCode": 0}})
    );
    let terminated = read_next(&mut reader).await;
    assert_eq!(
        terminated,
        json!({"seq": 4, "type": "event", "event": "terminated", "body": {"restart": false}})
    );

    send_request(&mut writer, 3, "disconnect", json!({"restart": false})).await;
    let disconnect = read_next(&mut reader).await;
    assert_eq!(disconnect["seq"], 5);
    assert_eq!(disconnect["request_seq"], 3);
    assert_eq!(disconnect["command"], "disconnect");

    server_task.await.unwrap().unwrap();
    assert_eq!(reader.read_value().await.unwrap(), None);
}

#[tokio::test]
async fn unknown_requests_get_no_reply() {
    let (mut reader, mut writer, server_task) = start_adapter();

    send_request(&mut writer, 1, "threads", json!({})).await;
    writer
        .write_value(&json!({"seq": 2, "type": "response", "request_seq": 9, "command": "runInTerminal", "success": true}))
        .await
        .unwrap();
    send_request(&mut writer, 3, "terminate", json!({})).await;

    // The first thing the client sees is the `terminate` response.
    let terminate = read_next(&mut reader).await;
    assert_eq!(terminate["command"], "terminate");
    assert_eq!(terminate["request_seq"], 3);
    assert_eq!(terminate["seq"], 1);

    // Closing both halves of the client stream is a clean EOF for the adapter.
    drop(writer);
    drop(reader);
    server_task.await.unwrap().unwrap();
}

#[tokio::test]
async fn malformed_disconnect_does_not_end_the_session() {
    let (mut reader, mut writer, server_task) = start_adapter();

    writer
        .write_value(&json!({"type": "request", "command": "disconnect"}))
        .await
        .unwrap();
    send_request(&mut writer, 2, "initialize", json!({})).await;

    let init = read_next(&mut reader).await;
    assert_eq!(init["command"], "initialize");
    assert_eq!(init["request_seq"], 2);
    assert_eq!(init["seq"], 1);

    send_request(&mut writer, 3, "disconnect", json!({})).await;
    let disconnect = read_next(&mut reader).await;
    assert_eq!(disconnect["request_seq"], 3);
    assert_eq!(disconnect["seq"], 2);

    server_task.await.unwrap().unwrap();
}

#[tokio::test]
async fn garbage_framing_ends_the_session_with_an_error() {
    let (_reader, writer, server_task) = start_adapter();
    let mut inner = writer.into_inner();
    tokio::io::AsyncWriteExt::write_all(&mut inner, b"Content-Type: text/plain\r\n\r\n")
        .await
        .unwrap();

    let err = server_task.await.unwrap().unwrap_err();
    assert!(err.to_string().contains("missing Content-Length"), "{err}");
}
