use std::io::{self, Write as _};

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

pub const MAX_MESSAGE_BYTES: usize = 4 * 1024 * 1024;
pub const MAX_HEADER_LINE_BYTES: usize = 8 * 1024;

pub fn encode_frame(msg: &serde_json::Value) -> Vec<u8> {
    let body = serde_json::to_vec(msg).unwrap_or_else(|_| b"{}".to_vec());
    let mut out = Vec::with_capacity(body.len() + 32);
    let _ = write!(out, "Content-Length: {}\r\n\r\n", body.len());
    out.extend_from_slice(&body);
    out
}

fn invalid(msg: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// `Some(len)` for a `Content-Length` header line, `None` for any other header.
fn content_length(line: &str) -> Option<io::Result<usize>> {
    let (name, value) = line.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    Some(value.trim().parse().map_err(|_| invalid("bad Content-Length")))
}

/// Reads `Content-Length` framed messages off a byte stream.
pub struct FrameReader<R> {
    inner: BufReader<R>,
    line: String,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            line: String::new(),
        }
    }

    /// `Ok(None)` on a clean end of stream between messages.
    pub async fn next(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut len = None;
        let mut saw_header = false;

        loop {
            self.line.clear();
            let n = (&mut self.inner)
                .take(MAX_HEADER_LINE_BYTES as u64)
                .read_line(&mut self.line)
                .await?;
            if n >= MAX_HEADER_LINE_BYTES && !self.line.ends_with('\n') {
                return Err(invalid("frame header line too long"));
            }
            if n == 0 {
                return if saw_header {
                    Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "stream ended inside frame header",
                    ))
                } else {
                    Ok(None)
                };
            }

            let line = self.line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                if saw_header {
                    break;
                }
                // stray blank line between frames
                continue;
            }
            saw_header = true;
            if let Some(parsed) = content_length(line) {
                len = Some(parsed?);
            }
        }

        let len = len.ok_or_else(|| invalid("missing Content-Length"))?;
        if len > MAX_MESSAGE_BYTES {
            return Err(invalid("message too large"));
        }

        let mut body = vec![0u8; len];
        self.inner.read_exact(&mut body).await?;
        Ok(Some(body))
    }
}
