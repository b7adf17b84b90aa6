//! Splits a response body into text lines.

use futures::stream::BoxStream;
use futures::{Stream, StreamExt};

use crate::error::RelayError;

/// Lines of an event stream, or the transport error that cut it short.
pub type LineStream = BoxStream<'static, Result<String, RelayError>>;

/// Turn a chunked byte stream into lines.
///
/// Bytes are buffered until a `\n` arrives, so a multi-byte character split
/// across chunks decodes intact. A trailing `\r` is dropped and an unterminated
/// final line is flushed when the body ends. A chunk error is yielded once and
/// ends the stream.
pub fn lines_from_bytes<S, B, E>(byte_stream: S) -> LineStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<RelayError> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut buffer: Vec<u8> = Vec::new();
        futures::pin_mut!(byte_stream);

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(e.into());
                    buffer.clear();
                    break;
                }
            };
            buffer.extend_from_slice(chunk.as_ref());

            while let Some(line_end) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=line_end).collect();
                yield Ok(decode_line(&line));
            }
        }

        if !buffer.is_empty() {
            yield Ok(decode_line(&buffer));
        }
    };

    Box::pin(stream)
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
