// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Network Layer Integration Tests
//!
//! End-to-end scenarios over real TCP connections: framed AddNode and
//! Browse, write/read round trips, liveness, and frame-size enforcement.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpStream;
use tokio::sync::broadcast;

use trellis_core::attributes::{AttributeId, NodeAttributes, VariableAttributes};
use trellis_core::ids::{NodeId, QualifiedName};
use trellis_core::status::StatusCode;
use trellis_core::variant::Variant;
use trellis_net::{FrameCodec, NetConfig, NetServer, Request, Response};
use trellis_space::browse::BrowseDescription;
use trellis_space::{ns0, Server};

// =============================================================================
// Harness
// =============================================================================

struct NetHarness {
    address: SocketAddr,
    codec: FrameCodec,
    shutdown: broadcast::Sender<()>,
    serve_task: tokio::task::JoinHandle<()>,
}

impl NetHarness {
    async fn start() -> Self {
        let config = NetConfig::with_bind_address("127.0.0.1:0");
        let codec = FrameCodec::new(config.max_frame_size);
        let net = NetServer::bind(config, Arc::new(Server::new()))
            .await
            .expect("bind");
        let address = net.local_addr().expect("local addr");
        let (shutdown, rx) = broadcast::channel(1);
        let serve_task = tokio::spawn(async move {
            net.serve(rx).await.expect("serve");
        });
        Self {
            address,
            codec,
            shutdown,
            serve_task,
        }
    }

    async fn connect(&self) -> TcpStream {
        TcpStream::connect(self.address).await.expect("connect")
    }

    async fn call(&self, stream: &mut TcpStream, request: &Request) -> Response {
        let body = self.codec.encode_request(request).expect("encode");
        self.codec.write_frame(stream, &body).await.expect("write");
        let reply = self
            .codec
            .read_frame(stream)
            .await
            .expect("read")
            .expect("response frame");
        self.codec.decode_response(&reply).expect("decode")
    }

    async fn stop(self) {
        let _ = self.shutdown.send(());
        let _ = self.serve_task.await;
    }
}

fn add_answer_request() -> Request {
    Request::AddNode {
        requested_id: NodeId::string(1, "the.answer"),
        parent: ns0::OBJECTS_FOLDER,
        reference_type: ns0::ORGANIZES,
        browse_name: QualifiedName::new(1, "the answer"),
        type_definition: None,
        attributes: NodeAttributes::Variable(
            VariableAttributes::default()
                .with_display_name("the answer")
                .with_value(Variant::Int32(42))
                .writable(),
        ),
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_add_node_then_browse_over_tcp() {
    let harness = NetHarness::start().await;
    let mut stream = harness.connect().await;

    let response = harness.call(&mut stream, &add_answer_request()).await;
    let Response::AddNode { status, node_id } = response else {
        panic!("expected an add_node response");
    };
    assert_eq!(status, StatusCode::Good);
    assert_eq!(node_id, Some(NodeId::string(1, "the.answer")));

    let response = harness
        .call(
            &mut stream,
            &Request::Browse {
                max_references: 0,
                description: BrowseDescription::new(ns0::OBJECTS_FOLDER)
                    .with_reference_type(ns0::ORGANIZES),
            },
        )
        .await;
    let Response::Browse { result } = response else {
        panic!("expected a browse response");
    };
    assert!(result.is_good());
    assert_eq!(result.references_to(&NodeId::string(1, "the.answer")), 1);

    harness.stop().await;
}

#[tokio::test]
async fn test_duplicate_add_reports_status_and_keeps_state() {
    let harness = NetHarness::start().await;
    let mut stream = harness.connect().await;

    let first = harness.call(&mut stream, &add_answer_request()).await;
    assert!(first.is_good());
    let second = harness.call(&mut stream, &add_answer_request()).await;
    assert_eq!(second.status(), StatusCode::BadNodeIdExists);

    let response = harness
        .call(
            &mut stream,
            &Request::Browse {
                max_references: 0,
                description: BrowseDescription::new(ns0::OBJECTS_FOLDER)
                    .with_reference_type(ns0::ORGANIZES),
            },
        )
        .await;
    let Response::Browse { result } = response else {
        panic!("expected a browse response");
    };
    assert_eq!(result.references_to(&NodeId::string(1, "the.answer")), 1);

    harness.stop().await;
}

#[tokio::test]
async fn test_write_and_read_over_tcp() {
    let harness = NetHarness::start().await;
    let mut stream = harness.connect().await;

    harness.call(&mut stream, &add_answer_request()).await;

    let response = harness
        .call(
            &mut stream,
            &Request::Write {
                node_id: NodeId::string(1, "the.answer"),
                value: Variant::Int32(1337),
            },
        )
        .await;
    assert!(response.is_good());

    let response = harness
        .call(
            &mut stream,
            &Request::Read {
                node_id: NodeId::string(1, "the.answer"),
                attribute: AttributeId::Value,
            },
        )
        .await;
    let Response::Read { status, value } = response else {
        panic!("expected a read response");
    };
    assert_eq!(status, StatusCode::Good);
    assert_eq!(value.unwrap().value, Variant::Int32(1337));

    harness.stop().await;
}

#[tokio::test]
async fn test_sessions_share_the_address_space() {
    let harness = NetHarness::start().await;

    let mut writer_session = harness.connect().await;
    harness.call(&mut writer_session, &add_answer_request()).await;

    let mut reader_session = harness.connect().await;
    let response = harness
        .call(
            &mut reader_session,
            &Request::Read {
                node_id: NodeId::string(1, "the.answer"),
                attribute: AttributeId::Value,
            },
        )
        .await;
    assert!(response.is_good());

    harness.stop().await;
}

#[tokio::test]
async fn test_ping_pong() {
    let harness = NetHarness::start().await;
    let mut stream = harness.connect().await;
    let response = harness.call(&mut stream, &Request::Ping).await;
    assert_eq!(response, Response::Pong);
    harness.stop().await;
}

#[tokio::test]
async fn test_garbage_frame_yields_error_response() {
    let harness = NetHarness::start().await;
    let mut stream = harness.connect().await;

    harness
        .codec
        .write_frame(&mut stream, b"this is not json")
        .await
        .expect("write");
    let reply = harness
        .codec
        .read_frame(&mut stream)
        .await
        .expect("read")
        .expect("response frame");
    let response = harness.codec.decode_response(&reply).expect("decode");
    assert_eq!(
        response,
        Response::Error {
            status: StatusCode::BadUnexpectedError
        }
    );

    harness.stop().await;
}
