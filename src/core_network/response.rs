use log::trace;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub type ControlWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Writes replies on the control connection.
///
/// Every send completes only once the reply has been flushed, so callers can
/// sequence data-channel work after it (150 before any transfer bytes).
pub struct ReplyWriter {
    inner: ControlWriter,
    peer: String,
}

impl ReplyWriter {
    pub fn new(inner: ControlWriter, peer: impl Into<String>) -> Self {
        Self {
            inner,
            peer: peer.into(),
        }
    }

    /// Sends `"<code> <text>\r\n"`.
    pub async fn send(&mut self, code: u16, text: &str) -> io::Result<()> {
        self.send_raw(&format!("{} {}\r\n", code, text)).await
    }

    /// Sends a multi-line reply: `"<code>-<first>"`, indented body lines,
    /// then `"<code> <last>"`.
    pub async fn send_multiline(
        &mut self,
        code: u16,
        first: &str,
        lines: &[&str],
        last: &str,
    ) -> io::Result<()> {
        let mut reply = format!("{}-{}\r\n", code, first);
        for line in lines {
            reply.push(' ');
            reply.push_str(line);
            reply.push_str("\r\n");
        }
        reply.push_str(&format!("{} {}\r\n", code, last));
        self.send_raw(&reply).await
    }

    /// Sends an already formatted, CRLF-terminated reply.
    pub async fn send_raw(&mut self, reply: &str) -> io::Result<()> {
        trace!("{}: reply: {}", self.peer, reply.trim_end());
        self.inner.write_all(reply.as_bytes()).await?;
        self.inner.flush().await
    }

    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.inner.shutdown().await
    }
}
