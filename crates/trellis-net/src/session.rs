// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-connection session loop.
//!
//! Each accepted connection becomes one session running a sequential
//! read-dispatch-respond loop. Within a session, service calls therefore
//! complete in the order they arrived; across sessions ordering is up to the
//! address-space capability. The dispatch itself is synchronous: the core
//! never suspends inside a service call.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::timeout;
use tracing::{debug, info_span, warn, Instrument};

use trellis_core::status::StatusCode;
use trellis_space::Server;

use crate::codec::FrameCodec;
use crate::config::NetConfig;
use crate::error::{NetError, NetResult};
use crate::message::{Request, Response};

// =============================================================================
// Session
// =============================================================================

/// One client connection.
#[derive(Debug)]
pub struct Session {
    id: u64,
    server: Arc<Server>,
    codec: FrameCodec,
    idle_timeout: std::time::Duration,
}

impl Session {
    /// Creates a session over an accepted connection.
    pub fn new(id: u64, server: Arc<Server>, config: &NetConfig) -> Self {
        Self {
            id,
            server,
            codec: FrameCodec::new(config.max_frame_size),
            idle_timeout: config.idle_timeout,
        }
    }

    /// The session identifier.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Runs the session until the peer disconnects, the idle timeout fires,
    /// or a frame-level error occurs.
    pub async fn run<S>(self, stream: S) -> NetResult<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let span = info_span!("session", id = self.id);
        self.run_inner(stream).instrument(span).await
    }

    async fn run_inner<S>(self, stream: S) -> NetResult<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (mut reader, mut writer) = tokio::io::split(stream);

        loop {
            let frame = match timeout(self.idle_timeout, self.codec.read_frame(&mut reader)).await
            {
                Ok(result) => result?,
                Err(_) => {
                    return Err(NetError::IdleTimeout {
                        timeout: self.idle_timeout,
                    })
                }
            };
            let Some(body) = frame else {
                debug!("peer closed the connection");
                return Ok(());
            };

            let response = match self.codec.decode_request(&body) {
                Ok(request) => {
                    debug!(service = request.service_name(), "dispatching");
                    self.dispatch(request)
                }
                Err(error) => {
                    warn!(%error, "undecodable request");
                    Response::Error {
                        status: StatusCode::BadUnexpectedError,
                    }
                }
            };

            let encoded = self.codec.encode_response(&response)?;
            self.codec.write_frame(&mut writer, &encoded).await?;
        }
    }

    /// Maps one request onto the core service surface.
    fn dispatch(&self, request: Request) -> Response {
        match request {
            Request::AddNode {
                requested_id,
                parent,
                reference_type,
                browse_name,
                type_definition,
                attributes,
            } => {
                match self.server.add_node(
                    requested_id,
                    &parent,
                    &reference_type,
                    browse_name,
                    type_definition,
                    attributes,
                    None,
                ) {
                    Ok(node_id) => Response::AddNode {
                        status: StatusCode::Good,
                        node_id: Some(node_id),
                    },
                    Err(status) => Response::AddNode {
                        status,
                        node_id: None,
                    },
                }
            }

            Request::AddReference {
                source,
                reference_type,
                target,
                is_forward,
            } => Response::AddReference {
                status: self
                    .server
                    .add_reference(&source, &reference_type, &target, is_forward)
                    .err()
                    .unwrap_or(StatusCode::Good),
            },

            Request::DeleteNode {
                node_id,
                delete_target_references,
            } => Response::DeleteNode {
                status: self
                    .server
                    .delete_node(&node_id, delete_target_references)
                    .err()
                    .unwrap_or(StatusCode::Good),
            },

            Request::DeleteReference {
                source,
                reference_type,
                target,
                is_forward,
                delete_bidirectional,
            } => Response::DeleteReference {
                status: self
                    .server
                    .delete_reference(
                        &source,
                        &reference_type,
                        &target,
                        is_forward,
                        delete_bidirectional,
                    )
                    .err()
                    .unwrap_or(StatusCode::Good),
            },

            Request::Browse {
                max_references,
                description,
            } => Response::Browse {
                result: self.server.browse(max_references, &description),
            },

            Request::Read { node_id, attribute } => {
                match self.server.read_attribute(&node_id, attribute) {
                    Ok(value) => Response::Read {
                        status: StatusCode::Good,
                        value: Some(value),
                    },
                    Err(status) => Response::Read {
                        status,
                        value: None,
                    },
                }
            }

            Request::Write { node_id, value } => Response::Write {
                status: self
                    .server
                    .write_value(&node_id, value)
                    .err()
                    .unwrap_or(StatusCode::Good),
            },

            Request::Ping => Response::Pong,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::attributes::{AttributeId, NodeAttributes, VariableAttributes};
    use trellis_core::ids::{NodeId, QualifiedName};
    use trellis_core::variant::Variant;
    use trellis_space::browse::BrowseDescription;
    use trellis_space::ns0;

    fn session() -> Session {
        Session::new(1, Arc::new(Server::new()), &NetConfig::default())
    }

    #[test]
    fn test_dispatch_add_and_browse() {
        let session = session();
        let response = session.dispatch(Request::AddNode {
            requested_id: NodeId::string(1, "the.answer"),
            parent: ns0::OBJECTS_FOLDER,
            reference_type: ns0::ORGANIZES,
            browse_name: QualifiedName::new(1, "the answer"),
            type_definition: None,
            attributes: NodeAttributes::Variable(
                VariableAttributes::default().with_value(Variant::Int32(42)),
            ),
        });
        assert!(response.is_good());

        let response = session.dispatch(Request::Browse {
            max_references: 0,
            description: BrowseDescription::new(ns0::OBJECTS_FOLDER)
                .with_reference_type(ns0::ORGANIZES),
        });
        let Response::Browse { result } = response else {
            panic!("expected a browse response");
        };
        assert_eq!(result.references_to(&NodeId::string(1, "the.answer")), 1);
    }

    #[test]
    fn test_dispatch_read() {
        let session = session();
        let response = session.dispatch(Request::Read {
            node_id: ns0::OBJECTS_FOLDER,
            attribute: AttributeId::BrowseName,
        });
        let Response::Read { status, value } = response else {
            panic!("expected a read response");
        };
        assert!(status.is_good());
        assert_eq!(
            value.unwrap().value,
            Variant::QualifiedName(QualifiedName::standard("Objects"))
        );
    }

    #[test]
    fn test_dispatch_error_carries_status() {
        let session = session();
        let response = session.dispatch(Request::DeleteNode {
            node_id: NodeId::numeric(9, 9),
            delete_target_references: true,
        });
        assert_eq!(response.status(), StatusCode::BadNodeIdUnknown);
    }

    #[tokio::test]
    async fn test_session_loop_over_duplex() {
        let session = session();
        let codec = FrameCodec::new(1024 * 1024);
        let (mut client, server_side) = tokio::io::duplex(16 * 1024);

        let task = tokio::spawn(async move { session.run(server_side).await });

        let body = codec.encode_request(&Request::Ping).unwrap();
        codec.write_frame(&mut client, &body).await.unwrap();
        let reply = codec.read_frame(&mut client).await.unwrap().unwrap();
        assert_eq!(codec.decode_response(&reply).unwrap(), Response::Pong);

        drop(client);
        task.await.unwrap().unwrap();
    }
}
