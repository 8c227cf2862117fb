//! Offline REPL transport.
//!
//! Reads commands line by line from a local stream and feeds them to
//! the dispatcher as direct messages, so a bot can run without any chat
//! service connection.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio_stream::wrappers::LinesStream;

use crate::message::{BotIdentity, Message, UserId};

use super::{Event, EventStream, Transport, TransportError};

/// Identity announced for the console session.
const CONSOLE_BOT_ID: &str = "console-bot";
/// Author attached to every line read from the stream.
const CONSOLE_USER_ID: &str = "console-user";
/// Direct-conversation designator for the console session.
const CONSOLE_CHANNEL: &str = "Dconsole";

/// Transport reading one command per line from a local stream. The
/// stream ends at EOF.
pub struct ReplTransport<R> {
    reader: Option<R>,
}

impl ReplTransport<BufReader<Stdin>> {
    /// A REPL over stdin.
    pub fn stdin() -> Self {
        Self {
            reader: Some(BufReader::new(tokio::io::stdin())),
        }
    }
}

impl<R: AsyncBufRead + Send + Unpin + 'static> ReplTransport<R> {
    /// A REPL over any buffered reader; tests use in-memory buffers.
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Send + Unpin + 'static> Transport for ReplTransport<R> {
    async fn connect(&mut self) -> Result<EventStream, TransportError> {
        let reader = self.reader.take().ok_or_else(|| {
            TransportError::ConnectionRefused {
                reason: "REPL input already consumed".to_string(),
            }
        })?;

        tracing::info!("Running in local mode");

        let identity = BotIdentity {
            user_id: UserId::new(CONSOLE_BOT_ID),
            name: "console".to_string(),
        };
        let hello = futures::stream::iter([Event::Connected(identity)]);

        let lines = LinesStream::new(reader.lines()).map(|line| match line {
            Ok(text) => Event::Message(Message::standard(
                CONSOLE_CHANNEL,
                CONSOLE_USER_ID,
                text,
            )),
            Err(err) => Event::Error(TransportError::Io(err)),
        });

        Ok(Box::pin(hello.chain(lines)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_identity_announced_before_messages() {
        let mut transport = ReplTransport::new(b"hello\nping\n".as_slice());
        let mut events = transport.connect().await.unwrap();

        match events.next().await {
            Some(Event::Connected(identity)) => {
                assert_eq!(identity.user_id, UserId::new(CONSOLE_BOT_ID));
            }
            other => panic!("expected identity announcement, got {:?}", other),
        }

        match events.next().await {
            Some(Event::Message(msg)) => {
                assert_eq!(msg.text, "hello");
                assert_eq!(msg.author, UserId::new(CONSOLE_USER_ID));
                assert!(msg.channel.is_direct());
                assert!(msg.is_standard());
            }
            other => panic!("expected a message, got {:?}", other),
        }

        match events.next().await {
            Some(Event::Message(msg)) => assert_eq!(msg.text, "ping"),
            other => panic!("expected a message, got {:?}", other),
        }

        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn test_connect_twice_is_refused() {
        let mut transport = ReplTransport::new(b"".as_slice());
        transport.connect().await.unwrap();
        let err = transport.connect().await.err().unwrap();
        assert!(err.is_fatal());
    }
}
