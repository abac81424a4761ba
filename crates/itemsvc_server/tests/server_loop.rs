use itemsvc_core::{ItemRepository, SqliteItemRepository};
use itemsvc_server::{ConnectionOutcome, Router, Server};
use std::net::SocketAddr;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

async fn bind(repo: SqliteItemRepository) -> Server<SqliteItemRepository> {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    Server::bind(addr, Router::new(repo), 4096).await.unwrap()
}

async fn bind_file(path: &Path) -> Server<SqliteItemRepository> {
    bind(SqliteItemRepository::open(path).unwrap()).await
}

async fn exchange(addr: SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn serves_one_request_per_connection() {
    let server = bind(SqliteItemRepository::open_in_memory().unwrap()).await;
    let addr = server.local_addr().unwrap();

    let (outcome, reply) = tokio::join!(
        server.serve_next(),
        exchange(addr, "POST /items HTTP/1.1\r\nHost: localhost\r\n\r\nNotebook")
    );

    assert_eq!(outcome, ConnectionOutcome::Served);
    assert!(reply.starts_with("HTTP/1.1 201 Created\r\n"));
    assert!(reply.ends_with("\r\n\r\nCreated item with ID 1\n"));

    let stored = server.router().repository().list_items().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Notebook");
}

#[tokio::test]
async fn clean_disconnect_is_skipped_and_loop_keeps_serving() {
    let server = bind(SqliteItemRepository::open_in_memory().unwrap()).await;
    let addr = server.local_addr().unwrap();

    let (outcome, ()) = tokio::join!(server.serve_next(), async {
        drop(TcpStream::connect(addr).await.unwrap());
    });
    assert_eq!(outcome, ConnectionOutcome::ClientClosed);

    let (outcome, reply) = tokio::join!(
        server.serve_next(),
        exchange(addr, "GET /items HTTP/1.1\r\n\r\n")
    );
    assert_eq!(outcome, ConnectionOutcome::Served);
    assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"));
}

#[tokio::test]
async fn bad_request_does_not_stop_the_loop() {
    let server = bind(SqliteItemRepository::open_in_memory().unwrap()).await;
    let addr = server.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let client = async move {
        let bad = exchange(addr, "GET /items/notanumber HTTP/1.1\r\n\r\n").await;
        let created = exchange(addr, "POST /items HTTP/1.1\r\n\r\nLamp").await;
        let listed = exchange(addr, "GET /items HTTP/1.1\r\n\r\n").await;
        stop.send(()).unwrap();
        (bad, created, listed)
    };
    let ((), (bad, created, listed)) = tokio::join!(
        server.run_until(async {
            let _ = stopped.await;
        }),
        client
    );

    assert!(bad.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(created.starts_with("HTTP/1.1 201 Created\r\n"));
    assert!(listed.ends_with("\r\n\r\n1: Lamp\n"));
}

#[tokio::test]
async fn items_persist_across_server_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.sqlite3");

    let server = bind_file(&path).await;
    let addr = server.local_addr().unwrap();
    let (_, created) = tokio::join!(
        server.serve_next(),
        exchange(addr, "POST /items HTTP/1.1\r\n\r\nNotebook")
    );
    assert!(created.contains("ID 1"));
    drop(server);

    let server = bind_file(&path).await;
    let addr = server.local_addr().unwrap();
    let (_, listed) = tokio::join!(
        server.serve_next(),
        exchange(addr, "GET /items HTTP/1.1\r\n\r\n")
    );
    assert!(listed.ends_with("\r\n\r\n1: Notebook\n"));
}
