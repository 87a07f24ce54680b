//! External event sources
//!
//! An event source yields opaque signal tokens (button names, characters,
//! remote triggers) to the input loop. Producers usually live on their own
//! thread and hand tokens over through a channel, so the loop only ever
//! awaits a channel receive.

pub mod stdin;

pub use stdin::StdinSource;

use tokio::sync::mpsc;

/// Trait for external event sources
///
/// `next_event` must be cancel-safe: the input loop races it against the
/// internal command queue and drops whichever future loses.
#[async_trait::async_trait]
pub trait EventSource: Send {
    /// Wait for the next token, `None` once the source is exhausted
    async fn next_event(&mut self) -> Option<String>;
}

#[async_trait::async_trait]
impl EventSource for mpsc::Receiver<String> {
    async fn next_event(&mut self) -> Option<String> {
        self.recv().await
    }
}

#[async_trait::async_trait]
impl EventSource for mpsc::UnboundedReceiver<String> {
    async fn next_event(&mut self) -> Option<String> {
        self.recv().await
    }
}

#[async_trait::async_trait]
impl EventSource for Box<dyn EventSource> {
    async fn next_event(&mut self) -> Option<String> {
        (**self).next_event().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_receiver_source() {
        let (tx, mut rx) = mpsc::channel::<String>(4);
        tx.send("a".to_string()).await.unwrap();
        drop(tx);

        assert_eq!(rx.next_event().await, Some("a".to_string()));
        assert_eq!(rx.next_event().await, None);
    }

    #[tokio::test]
    async fn test_boxed_source() {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        tx.send("b".to_string()).unwrap();
        drop(tx);

        let mut source: Box<dyn EventSource> = Box::new(rx);
        assert_eq!(source.next_event().await, Some("b".to_string()));
        assert_eq!(source.next_event().await, None);
    }
}
