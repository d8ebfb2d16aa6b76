use ito_core::codec::{decode_row, DecodeError};
use ito_core::model::Row;
use std::collections::VecDeque;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("{0}")]
    Upstream(String),
    #[error("failed to decode result row: {0}")]
    Decode(#[from] DecodeError),
}

/// Ordered source of result rows, consumed one row at a time.
#[async_trait::async_trait]
pub trait ResultStream: Send {
    /// Next row, or `None` once the stream is exhausted.
    async fn next_row(&mut self) -> Result<Option<Row>, StreamError>;
}

/// Rows already held in memory.
#[derive(Debug, Clone, Default)]
pub struct BufferedRows {
    rows: VecDeque<Row>,
}

impl BufferedRows {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows: rows.into() }
    }

    /// Decodes rows from their JSON wire form.
    pub fn from_json(rows: &[serde_json::Value]) -> Result<Self, DecodeError> {
        let rows = rows.iter().map(decode_row).collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rows))
    }

    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

#[async_trait::async_trait]
impl ResultStream for BufferedRows {
    async fn next_row(&mut self) -> Result<Option<Row>, StreamError> {
        Ok(self.rows.pop_front())
    }
}

pub type RowSender = mpsc::Sender<Result<Row, StreamError>>;

/// Rows pushed by an asynchronous producer through a Tokio channel.
///
/// The stream ends when every sender is dropped.
pub struct ChannelRows {
    receiver: mpsc::Receiver<Result<Row, StreamError>>,
}

impl ChannelRows {
    pub fn new(receiver: mpsc::Receiver<Result<Row, StreamError>>) -> Self {
        Self { receiver }
    }

    pub fn channel(capacity: usize) -> (RowSender, Self) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (sender, Self::new(receiver))
    }
}

#[async_trait::async_trait]
impl ResultStream for ChannelRows {
    async fn next_row(&mut self) -> Result<Option<Row>, StreamError> {
        self.receiver.recv().await.transpose()
    }
}

#[async_trait::async_trait]
impl<S: ResultStream + ?Sized> ResultStream for Box<S> {
    async fn next_row(&mut self) -> Result<Option<Row>, StreamError> {
        (**self).next_row().await
    }
}
