//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::io;
use std::net::SocketAddrV4;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response};
use axum::Router;
use tower::ServiceExt;

use wol_gateway::config::{GatewayConfig, Secret};
use wol_gateway::http::HttpServer;
use wol_gateway::wol::{MagicPacket, PacketTransport};

pub const SECRET: &str = "wol_prod_test_key_1234567890_secure";
pub const DEVICE_ID: &str = "123456789";
pub const DEVICE_MAC: &str = "AA:BB:CC:DD:EE:FF";

/// Records every packet instead of touching the network.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(Vec<u8>, SocketAddrV4)>>,
}

impl RecordingTransport {
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl PacketTransport for RecordingTransport {
    async fn send(&self, packet: &MagicPacket, target: SocketAddrV4) -> io::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((packet.as_bytes().to_vec(), target));
        Ok(())
    }
}

/// Fails every send with a fixed OS error.
pub struct FailingTransport(pub fn() -> io::Error);

#[async_trait]
impl PacketTransport for FailingTransport {
    async fn send(&self, _packet: &MagicPacket, _target: SocketAddrV4) -> io::Result<()> {
        Err((self.0)())
    }
}

pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.wake.secret = Secret::new(SECRET);
    config
        .devices
        .insert(DEVICE_ID.to_string(), DEVICE_MAC.to_string());
    config
        .devices
        .insert("987654321".to_string(), "11:22:33:44:55:66".to_string());
    config
}

pub fn app_with(transport: Arc<dyn PacketTransport>) -> Router {
    HttpServer::with_transport(test_config(), transport)
        .expect("test config is valid")
        .router()
}

pub async fn call(app: &Router, method: Method, uri: &str) -> (Response<Body>, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (Response::from_parts(parts, Body::empty()), json)
}

pub async fn get(app: &Router, uri: &str) -> (Response<Body>, serde_json::Value) {
    call(app, Method::GET, uri).await
}
