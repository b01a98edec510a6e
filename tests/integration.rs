//! End-to-end tests for the request driver
//!
//! Each test starts an in-process TCP server on an ephemeral port and runs
//! the driver against it:
//! 1. Stub servers from `driver::stub` for echo and silent replies
//! 2. Hand-rolled servers for size limits, ordering, and stalls
//! 3. Scenario files written to a temp directory

use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use driver::catalog::{Catalog, RequestDescriptor, Scenario};
use driver::common::config::{ReadMode, Settings};
use driver::stub::{self, StubMode};
use driver::wire::codec;
use driver::{Driver, Error};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

const CASE_ONE_LINE: &str = "{\"method\": \"insert\", \"bucket\": \"users\", \"data\": {\"username\": \"hatim\", \"age\": 18}, \"ttl\": 20}";

/// Start a stub server in the background and return its address
async fn spawn_stub(mode: StubMode) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(stub::serve(listener, mode));
    addr
}

/// Start a server that answers every request with `reply` and then closes
async fn spawn_fixed_reply(reply: Vec<u8>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (mut socket, _) = listener.accept().await.unwrap();
            let reply = reply.clone();
            tokio::spawn(async move {
                let (reader, mut writer) = socket.split();
                let mut reader = BufReader::new(reader);
                let mut line = String::new();
                reader.read_line(&mut line).await.unwrap();
                writer.write_all(&reply).await.unwrap();
                writer.shutdown().await.unwrap();
                stub::drain(&mut reader).await.unwrap();
            });
        }
    });
    addr
}

fn driver_for(addr: SocketAddr) -> Driver {
    Driver::new(Settings::for_target(addr.ip().to_string(), addr.port()))
}

fn single_case(descriptor: RequestDescriptor) -> Catalog {
    Catalog::new(vec![descriptor])
}

#[tokio::test]
async fn test_echo_case_one() {
    let addr = spawn_stub(StubMode::Echo).await;
    let driver = driver_for(addr);
    let catalog = Catalog::reference();

    let response = driver.send_request(catalog.get(1).unwrap()).await.unwrap();
    assert_eq!(response, format!("{}\n", CASE_ONE_LINE));

    let mut out = Vec::new();
    let single = single_case(catalog.get(1).unwrap().clone());
    driver.run_all_to(&single, &mut out).await.unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!(
            "Test case 1: sending {line}\nResponse: {line}\n\n",
            line = CASE_ONE_LINE
        )
    );
}

#[tokio::test]
async fn test_echo_full_catalog() {
    let addr = spawn_stub(StubMode::Echo).await;
    let driver = driver_for(addr);
    let catalog = Catalog::reference();

    let mut out = Vec::new();
    let summary = driver.run_all_to(&catalog, &mut out).await.unwrap();
    assert_eq!(summary.cases_run, 7);

    let text = String::from_utf8(out).unwrap();
    let blocks: Vec<_> = text.split_terminator("\n\n").collect();
    assert_eq!(blocks.len(), 7);

    for ((position, descriptor), block) in catalog.cases().zip(blocks) {
        let body = codec::encode_body(descriptor, driver.settings().separators).unwrap();
        let line = String::from_utf8(body).unwrap();
        assert_eq!(
            block,
            format!("Test case {}: sending {}\nResponse: {}", position, line, line)
        );
    }
}

#[tokio::test]
async fn test_silent_server_yields_empty_responses() {
    let addr = spawn_stub(StubMode::Silent).await;
    let driver = driver_for(addr);

    let response = driver
        .send_request(&RequestDescriptor::get_all())
        .await
        .unwrap();
    assert_eq!(response, "");

    let mut out = Vec::new();
    let summary = driver.run_all_to(&Catalog::reference(), &mut out).await.unwrap();
    assert_eq!(summary.cases_run, 7);

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("Response: \n\n").count(), 7);
    assert!(text.contains("Test case 2: sending "));
}

#[tokio::test]
async fn test_refused_connection_aborts_on_first_case() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let driver = driver_for(addr);
    let mut out = Vec::new();
    let err = driver
        .run_all_to(&Catalog::reference(), &mut out)
        .await
        .unwrap_err();

    assert!(err.is_connect(), "unexpected error: {err}");
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("Test case 1: sending {}\n", CASE_ONE_LINE)
    );
}

#[tokio::test]
async fn test_ok_server_response_is_trimmed() {
    let addr = spawn_stub(StubMode::Ok).await;
    let driver = driver_for(addr);

    let mut out = Vec::new();
    driver
        .run_all_to(&single_case(RequestDescriptor::get_all_buckets()), &mut out)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Test case 1: sending {\"method\": \"get_all_buckets\"}\nResponse: {\"status\": \"OK\"}\n\n"
    );
}

#[tokio::test]
async fn test_response_of_exactly_limit_is_kept() {
    let addr = spawn_fixed_reply(vec![b'a'; 4096]).await;
    let mut settings = Settings::for_target(addr.ip().to_string(), addr.port());
    settings.read_mode = ReadMode::Line;
    let driver = Driver::new(settings);

    let response = driver.send_request(&RequestDescriptor::get_all()).await.unwrap();
    assert_eq!(response.len(), 4096);
}

#[tokio::test]
async fn test_response_over_limit_is_truncated() {
    let addr = spawn_fixed_reply(vec![b'a'; 4097]).await;
    let mut settings = Settings::for_target(addr.ip().to_string(), addr.port());
    settings.read_mode = ReadMode::Line;
    let driver = Driver::new(settings);

    let response = driver.send_request(&RequestDescriptor::get_all()).await.unwrap();
    assert_eq!(response.len(), 4096);
}

#[derive(Debug, PartialEq)]
enum Event {
    Accepted(usize),
    Request(RequestDescriptor),
    Closed(usize),
}

#[tokio::test]
async fn test_cases_run_in_order_one_connection_at_a_time() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let events = Arc::new(Mutex::new(Vec::new()));

    // Serves connections one after another: connection N+1 is not accepted
    // until connection N reaches EOF, so a driver that opened the next
    // connection early would stall and hit the timeout below.
    let log = events.clone();
    tokio::spawn(async move {
        for n in 1.. {
            let (mut socket, _) = listener.accept().await.unwrap();
            log.lock().unwrap().push(Event::Accepted(n));

            let (reader, mut writer) = socket.split();
            let mut reader = BufReader::new(reader);
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            assert!(line.ends_with('\n'));
            let descriptor: RequestDescriptor = serde_json::from_str(line.trim_end()).unwrap();
            log.lock().unwrap().push(Event::Request(descriptor));

            writer.write_all(b"{\"status\": \"OK\"}\n").await.unwrap();
            stub::drain(&mut reader).await.unwrap();
            log.lock().unwrap().push(Event::Closed(n));
        }
    });

    let catalog = Catalog::reference();
    let driver = driver_for(addr);
    let mut out = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), driver.run_all_to(&catalog, &mut out))
        .await
        .expect("driver stalled")
        .unwrap();

    // The last Closed event is pushed after the driver's final shutdown
    for _ in 0..100 {
        if events.lock().unwrap().len() == catalog.len() * 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let expected: Vec<_> = catalog
        .cases()
        .flat_map(|(n, descriptor)| {
            [
                Event::Accepted(n),
                Event::Request(descriptor.clone()),
                Event::Closed(n),
            ]
        })
        .collect();
    assert_eq!(*events.lock().unwrap(), expected);
}

#[tokio::test]
async fn test_read_timeout_is_opt_in_and_propagates() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let (reader, _writer) = socket.split();
        let mut reader = BufReader::new(reader);
        stub::drain(&mut reader).await.unwrap();
    });

    let mut settings = Settings::for_target(addr.ip().to_string(), addr.port());
    settings.read_timeout = Some(Duration::from_millis(200));
    let driver = Driver::new(settings);

    let mut out = Vec::new();
    let err = driver
        .run_all_to(&Catalog::reference(), &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { phase: "Read", .. }));

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 1);
}

#[tokio::test]
async fn test_scenario_file_runs_against_echo_stub() {
    let addr = spawn_stub(StubMode::Echo).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"
name: missing method
description: cases without a method go out untouched
target:
  port: {port}
cases:
  - bucket: users
  - method: get_bucket
    bucket: users
"#,
        port = addr.port()
    )
    .unwrap();
    drop(file);

    let scenario = Scenario::load(&path).unwrap();
    let catalog = scenario.catalog().unwrap();
    let settings = Settings::resolve(&Default::default(), &[&scenario.target_override()]);
    assert_eq!(settings.port, addr.port());

    let mut out = Vec::new();
    Driver::new(settings).run_all_to(&catalog, &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with(
        "Test case 1: sending {\"bucket\": \"users\"}\nResponse: {\"bucket\": \"users\"}\n\n"
    ));
    assert!(text.contains("Test case 2: sending {\"method\": \"get_bucket\", \"bucket\": \"users\"}"));
}

#[test]
fn test_missing_scenario_file_is_reported() {
    let err = Scenario::load(std::path::Path::new("/nonexistent/scenario.yaml")).unwrap_err();
    assert!(matches!(err, Error::FileRead { .. }));
}
