// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Length-prefixed frame codec.
//!
//! Frames are a 4-byte big-endian length followed by a JSON body. The codec
//! enforces the configured maximum frame size in both directions; an
//! oversized announcement fails before any allocation.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{NetError, NetResult};
use crate::message::{Request, Response};

// =============================================================================
// FrameCodec
// =============================================================================

/// Reads and writes length-prefixed JSON frames.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_size: usize,
}

impl FrameCodec {
    /// Creates a codec with the given maximum frame size in bytes.
    pub fn new(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }

    /// Reads one frame body.
    ///
    /// Returns `Ok(None)` on a clean end of stream at a frame boundary.
    pub async fn read_frame<R>(&self, reader: &mut R) -> NetResult<Option<Vec<u8>>>
    where
        R: AsyncRead + Unpin,
    {
        let mut length_bytes = [0_u8; 4];
        match reader.read_exact(&mut length_bytes).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let length = u32::from_be_bytes(length_bytes) as usize;
        if length > self.max_frame_size {
            return Err(NetError::FrameTooLarge {
                size: length,
                max: self.max_frame_size,
            });
        }

        let mut body = vec![0_u8; length];
        reader.read_exact(&mut body).await?;
        Ok(Some(body))
    }

    /// Writes one frame.
    pub async fn write_frame<W>(&self, writer: &mut W, body: &[u8]) -> NetResult<()>
    where
        W: AsyncWrite + Unpin,
    {
        if body.len() > self.max_frame_size {
            return Err(NetError::FrameTooLarge {
                size: body.len(),
                max: self.max_frame_size,
            });
        }
        writer.write_all(&(body.len() as u32).to_be_bytes()).await?;
        writer.write_all(body).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Decodes a request body.
    pub fn decode_request(&self, body: &[u8]) -> NetResult<Request> {
        serde_json::from_slice(body).map_err(|e| NetError::decode(e.to_string()))
    }

    /// Encodes a response body.
    pub fn encode_response(&self, response: &Response) -> NetResult<Vec<u8>> {
        serde_json::to_vec(response).map_err(|e| NetError::encode(e.to_string()))
    }

    /// Encodes a request body (client side, used by the tests).
    pub fn encode_request(&self, request: &Request) -> NetResult<Vec<u8>> {
        serde_json::to_vec(request).map_err(|e| NetError::encode(e.to_string()))
    }

    /// Decodes a response body (client side, used by the tests).
    pub fn decode_response(&self, body: &[u8]) -> NetResult<Response> {
        serde_json::from_slice(body).map_err(|e| NetError::decode(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> FrameCodec {
        FrameCodec::new(1024)
    }

    #[tokio::test]
    async fn test_frame_roundtrip() {
        let codec = codec();
        let (mut client, mut server) = tokio::io::duplex(4096);

        codec.write_frame(&mut client, b"hello").await.unwrap();
        let frame = codec.read_frame(&mut server).await.unwrap();
        assert_eq!(frame.as_deref(), Some(&b"hello"[..]));
    }

    #[tokio::test]
    async fn test_clean_eof_yields_none() {
        let codec = codec();
        let (client, mut server) = tokio::io::duplex(64);
        drop(client);
        let frame = codec.read_frame(&mut server).await.unwrap();
        assert!(frame.is_none());
    }

    #[tokio::test]
    async fn test_oversized_announcement_rejected() {
        let codec = codec();
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_all(&10_000_u32.to_be_bytes()).await.unwrap();

        let result = codec.read_frame(&mut server).await;
        assert!(matches!(result, Err(NetError::FrameTooLarge { size: 10_000, .. })));
    }

    #[tokio::test]
    async fn test_oversized_write_rejected() {
        let codec = FrameCodec::new(4);
        let (mut writer, _reader) = tokio::io::duplex(64);
        let result = codec.write_frame(&mut writer, b"too long").await;
        assert!(matches!(result, Err(NetError::FrameTooLarge { .. })));
    }

    #[tokio::test]
    async fn test_request_codec_roundtrip() {
        let codec = codec();
        let body = codec.encode_request(&Request::Ping).unwrap();
        let request = codec.decode_request(&body).unwrap();
        assert_eq!(request, Request::Ping);

        let garbage = codec.decode_request(b"not json");
        assert!(matches!(garbage, Err(NetError::Decode { .. })));
    }
}
