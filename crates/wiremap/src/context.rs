//! Extension context: the named values handed to extension code.
//!
//! Alongside plain wire values a context may carry live handles such as the
//! current database transaction. Reading the transaction slot never panics:
//! a slot holding something other than a transaction handle is reported as
//! [`UnrecognizedTransaction`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::scalar::wire_kind;

/// Context key of the transaction slot.
pub const TRANSACTION_KEY: &str = "transaction";

/// A transaction handle owned by the host.
pub trait Transaction: Send + Sync + fmt::Debug {
    fn id(&self) -> &str;
}

/// One context entry.
#[derive(Debug, Clone)]
pub enum ContextEntry {
    Value(Value),
    Transaction(Arc<dyn Transaction>),
}

/// The transaction slot held a value that is not a transaction handle.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unknown transaction type in context: {kind}")]
pub struct UnrecognizedTransaction {
    pub kind: &'static str,
    pub value: Value,
}

#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: HashMap<String, ContextEntry>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.entries.insert(key.into(), ContextEntry::Value(value));
        self
    }

    pub fn set_transaction(&mut self, tx: Arc<dyn Transaction>) -> &mut Self {
        self.entries
            .insert(TRANSACTION_KEY.to_owned(), ContextEntry::Transaction(tx));
        self
    }

    pub fn get(&self, key: &str) -> Option<&ContextEntry> {
        self.entries.get(key)
    }

    /// The plain value stored under `key`, if any.
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.entries.get(key)? {
            ContextEntry::Value(v) => Some(v),
            ContextEntry::Transaction(_) => None,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<ContextEntry> {
        self.entries.remove(key)
    }

    /// The current transaction.
    ///
    /// `Ok(None)` when the slot is absent or null, `Err` when it holds any
    /// other value.
    pub fn transaction(&self) -> Result<Option<Arc<dyn Transaction>>, UnrecognizedTransaction> {
        match self.entries.get(TRANSACTION_KEY) {
            None | Some(ContextEntry::Value(Value::Null)) => Ok(None),
            Some(ContextEntry::Transaction(tx)) => Ok(Some(Arc::clone(tx))),
            Some(ContextEntry::Value(other)) => Err(UnrecognizedTransaction {
                kind: wire_kind(other),
                value: other.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct FakeTx(&'static str);

    impl Transaction for FakeTx {
        fn id(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn absent_transaction() {
        assert!(Context::new().transaction().unwrap().is_none());
    }

    #[test]
    fn null_transaction_is_absent() {
        let mut cx = Context::new();
        cx.insert(TRANSACTION_KEY, json!(null));
        assert!(cx.transaction().unwrap().is_none());
    }

    #[test]
    fn recognized_transaction() {
        let mut cx = Context::new();
        cx.set_transaction(Arc::new(FakeTx("tx-1")));
        let tx = cx.transaction().unwrap().unwrap();
        assert_eq!(tx.id(), "tx-1");
    }

    #[test]
    fn unrecognized_transaction_is_an_error() {
        let mut cx = Context::new();
        cx.insert(TRANSACTION_KEY, json!("not a tx"));
        let err = cx.transaction().unwrap_err();
        assert_eq!(err.kind, "string");
        assert_eq!(err.to_string(), "unknown transaction type in context: string");
    }

    #[test]
    fn plain_values() {
        let mut cx = Context::new();
        cx.insert("schema_id", json!("network"))
            .set_transaction(Arc::new(FakeTx("t")));
        assert_eq!(cx.value("schema_id"), Some(&json!("network")));
        assert!(cx.value(TRANSACTION_KEY).is_none());
        assert!(cx.remove("schema_id").is_some());
        assert!(cx.get("schema_id").is_none());
    }
}
