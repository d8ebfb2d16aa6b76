use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use assembly::{BufferedRows, ResultStream, StreamError};
use async_trait::async_trait;
use ito_core::model::Row;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameterized Cypher text handed to a [`GraphSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub text: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: Map::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// Executes read statements and yields their rows as a stream.
#[async_trait]
pub trait GraphSource: Send + Sync {
    async fn run(&self, statement: Statement) -> Result<Box<dyn ResultStream>, StreamError>;
}

/// In-memory source replaying canned result sets in call order.
///
/// Every statement received is recorded. Once the canned results run out,
/// further statements yield empty streams.
#[derive(Default)]
pub struct StaticSource {
    responses: Mutex<VecDeque<Result<Vec<Row>, StreamError>>>,
    statements: Mutex<Vec<Statement>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        lock(&self.responses).push_back(Ok(rows));
        self
    }

    /// Queues result sets decoded from their JSON wire form.
    pub fn with_json_rows(self, rows: &[Value]) -> Result<Self, StreamError> {
        let rows = rows
            .iter()
            .map(ito_core::codec::decode_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.with_rows(rows))
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        lock(&self.responses).push_back(Err(StreamError::Upstream(message.into())));
        self
    }

    pub fn statements(&self) -> Vec<Statement> {
        lock(&self.statements).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl GraphSource for StaticSource {
    async fn run(&self, statement: Statement) -> Result<Box<dyn ResultStream>, StreamError> {
        lock(&self.statements).push(statement);
        let next = lock(&self.responses).pop_front();
        match next {
            Some(Ok(rows)) => Ok(Box::new(BufferedRows::new(rows))),
            Some(Err(err)) => Err(err),
            None => Ok(Box::new(BufferedRows::default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ito_core::model::{EntityNode, RawValue};

    #[tokio::test]
    async fn test_static_source_replays_in_order_and_records_statements() {
        let row: Row = [(
            "n".to_string(),
            RawValue::Node(EntityNode::new("4:a", ["法人"])),
        )]
        .into_iter()
        .collect();
        let source = StaticSource::new()
            .with_rows(vec![row])
            .with_failure("boom");

        let mut first = source.run(Statement::new("MATCH (n) RETURN n")).await.unwrap();
        assert!(first.next_row().await.unwrap().is_some());
        assert!(first.next_row().await.unwrap().is_none());

        let second = source.run(Statement::new("RETURN 1")).await;
        assert!(matches!(second, Err(StreamError::Upstream(message)) if message == "boom"));

        let mut third = source.run(Statement::new("RETURN 2").param("x", 1)).await.unwrap();
        assert!(third.next_row().await.unwrap().is_none());

        let statements = source.statements();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[2].parameters["x"], 1);
    }
}
