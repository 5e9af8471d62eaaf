// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::DateTime;
use common::{coordinates::Coordinates, fix::Fix};
use futures::{SinkExt, StreamExt};
use gpsd_proto::{Mode, Tpv};
use mock_provider::{MockLocationProvider, ProviderError, gpsd::GpsdProvider};
use std::{net::SocketAddr, time::Duration};
use tokio::{net::TcpStream, time::timeout};
use tokio_util::codec::{Framed, LinesCodec};

const TIMEOUT_MS: u64 = 500;

type Client = Framed<TcpStream, LinesCodec>;

fn get_fix() -> Fix {
    Fix::new(
        Coordinates::new(52.026649, 11.282535).unwrap(),
        284.5,
        30.0,
        DateTime::from_timestamp_millis(1_735_689_600_123).unwrap(),
    )
}

async fn registered_provider() -> (GpsdProvider, SocketAddr) {
    let mut provider = GpsdProvider::new("127.0.0.1:0");
    provider
        .add_test_provider()
        .await
        .expect("Failed to register gpsd provider");
    provider
        .set_enabled(true)
        .await
        .expect("Failed to enable gpsd provider");
    let addr = provider.local_addr().expect("No local address");
    (provider, addr)
}

async fn connect(addr: SocketAddr) -> Client {
    let stream = timeout(Duration::from_millis(TIMEOUT_MS), TcpStream::connect(addr))
        .await
        .expect("Connection timed out")
        .expect("Failed to connect to gpsd provider");
    Framed::new(stream, LinesCodec::new())
}

async fn read_line(client: &mut Client) -> String {
    timeout(Duration::from_millis(TIMEOUT_MS), client.next())
        .await
        .expect("No line received in time")
        .expect("Connection closed")
        .expect("Failed to read line")
}

async fn read_json(client: &mut Client) -> serde_json::Value {
    let line = read_line(client).await;
    serde_json::from_str(&line).unwrap_or_else(|e| panic!("Invalid json {line}. Error: {e}"))
}

async fn watch(client: &mut Client) {
    client
        .send(gpsd_proto::ENABLE_WATCH_CMD.trim_end())
        .await
        .unwrap();
    assert_eq!(read_json(client).await["class"], "DEVICES");
    let watch = read_json(client).await;
    assert_eq!(watch["class"], "WATCH");
    assert_eq!(watch["enable"], true);
}

#[tokio::test]
#[test_log::test]
async fn lifecycle_errors() {
    let mut provider = GpsdProvider::new("127.0.0.1:0");
    assert!(matches!(
        provider.remove_test_provider().await,
        Err(ProviderError::NotRegistered)
    ));
    assert!(matches!(
        provider.set_location(&get_fix()).await,
        Err(ProviderError::NotRegistered)
    ));
    assert!(matches!(
        provider.set_enabled(true).await,
        Err(ProviderError::NotRegistered)
    ));

    provider.add_test_provider().await.unwrap();
    assert!(matches!(
        provider.add_test_provider().await,
        Err(ProviderError::AlreadyRegistered)
    ));
    assert!(matches!(
        provider.set_location(&get_fix()).await,
        Err(ProviderError::Disabled)
    ));

    provider.set_enabled(true).await.unwrap();
    assert!(provider.set_location(&get_fix()).await.is_ok());

    provider.remove_test_provider().await.unwrap();
    assert!(provider.local_addr().is_none());
    assert!(!provider.is_enabled());
}

#[tokio::test]
#[test_log::test]
async fn report_invalid_address_as_io_error() {
    let mut provider = GpsdProvider::new("not-an-address");
    assert!(matches!(
        provider.add_test_provider().await,
        Err(ProviderError::Io(_))
    ));
}

#[test]
fn map_io_permission_denied() {
    let err = ProviderError::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
    assert!(err.is_permission_denied());
    let err = ProviderError::from(std::io::Error::from(std::io::ErrorKind::AddrInUse));
    assert!(matches!(err, ProviderError::Io(_)));
}

#[tokio::test]
#[test_log::test]
async fn greet_client_with_version() {
    let (_provider, addr) = registered_provider().await;
    let mut client = connect(addr).await;

    let version = read_json(&mut client).await;
    assert_eq!(version["class"], "VERSION");
    assert_eq!(version["proto_major"], 3);
}

#[tokio::test]
#[test_log::test]
async fn stream_tpv_to_watching_client() {
    let (mut provider, addr) = registered_provider().await;
    let mut client = connect(addr).await;
    read_json(&mut client).await;
    watch(&mut client).await;

    provider.set_location(&get_fix()).await.unwrap();

    let line = read_line(&mut client).await;
    let tpv: Tpv = serde_json::from_str(&line)
        .unwrap_or_else(|e| panic!("TPV not parseable by gpsd client {line}. Error: {e}"));
    assert!(matches!(tpv.mode, Mode::Fix3d));
    assert_eq!(tpv.lat, Some(52.026649));
    assert_eq!(tpv.lon, Some(11.282535));
    assert_eq!(tpv.speed, Some(30.0));
    assert_eq!(tpv.track, Some(284.5));
    assert_eq!(tpv.time.as_deref(), Some("2025-01-01T00:00:00.123Z"));
    assert_eq!(tpv.device.as_deref(), Some("mock"));
}

#[tokio::test]
#[test_log::test]
async fn keep_reports_from_client_without_watch() {
    let (mut provider, addr) = registered_provider().await;
    let mut client = connect(addr).await;
    read_json(&mut client).await;

    provider.set_location(&get_fix()).await.unwrap();
    client.send("?VERSION;").await.unwrap();

    assert_eq!(read_json(&mut client).await["class"], "VERSION");
}

#[tokio::test]
#[test_log::test]
async fn stop_reports_after_watch_disable() {
    let (mut provider, addr) = registered_provider().await;
    let mut client = connect(addr).await;
    read_json(&mut client).await;
    watch(&mut client).await;

    client.send(r#"?WATCH={"enable":false};"#).await.unwrap();
    let watch = read_json(&mut client).await;
    assert_eq!(watch["class"], "WATCH");
    assert_eq!(watch["enable"], false);

    provider.set_location(&get_fix()).await.unwrap();
    client.send("?VERSION;").await.unwrap();
    assert_eq!(read_json(&mut client).await["class"], "VERSION");
}

#[tokio::test]
#[test_log::test]
async fn poll_returns_last_fix() {
    let (mut provider, addr) = registered_provider().await;
    let mut client = connect(addr).await;
    read_json(&mut client).await;

    client.send("?POLL;").await.unwrap();
    let poll = read_json(&mut client).await;
    assert_eq!(poll["class"], "POLL");
    assert_eq!(poll["tpv"].as_array().unwrap().len(), 0);

    provider.set_location(&get_fix()).await.unwrap();
    client.send("?POLL;").await.unwrap();
    let poll = read_json(&mut client).await;
    assert_eq!(poll["tpv"][0]["class"], "TPV");
    assert_eq!(poll["tpv"][0]["lat"], 52.026649);
}

#[tokio::test]
#[test_log::test]
async fn answer_unknown_command_with_error() {
    let (_provider, addr) = registered_provider().await;
    let mut client = connect(addr).await;
    read_json(&mut client).await;

    client.send("?FOO;?VERSION;").await.unwrap();
    let error = read_json(&mut client).await;
    assert_eq!(error["class"], "ERROR");
    assert_eq!(read_json(&mut client).await["class"], "VERSION");
}

#[tokio::test]
#[test_log::test]
async fn close_clients_on_removal() {
    let (mut provider, addr) = registered_provider().await;
    let mut client = connect(addr).await;
    read_json(&mut client).await;

    provider.remove_test_provider().await.unwrap();

    let next = timeout(Duration::from_millis(TIMEOUT_MS), client.next())
        .await
        .expect("Connection not closed in time");
    assert!(!matches!(next, Some(Ok(_))));
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
#[test_log::test]
async fn register_again_on_same_address() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .unwrap();
    let mut provider = GpsdProvider::new(&addr.to_string());

    for _ in 0..20 {
        provider
            .add_test_provider()
            .await
            .expect("Failed to register gpsd provider again");
        assert_eq!(provider.local_addr(), Some(addr));
        let mut client = connect(addr).await;
        assert_eq!(read_json(&mut client).await["class"], "VERSION");

        provider.remove_test_provider().await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[test_log::test]
async fn register_again_on_same_address_multi_thread() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .unwrap();
    let mut provider = GpsdProvider::new(&addr.to_string());

    for _ in 0..50 {
        provider
            .add_test_provider()
            .await
            .expect("Failed to register gpsd provider again");
        provider.remove_test_provider().await.unwrap();
    }
    assert!(TcpStream::connect(addr).await.is_err());
}
