//! Structure channel whose answers are released by the test
//!
//! Every `fetch_structure` call takes the next scripted responder in
//! issue order and waits until the test resolves it.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use stree_core::StructureParams;
use stree_sync::{ChannelError, StructureChannel};
use tokio::sync::oneshot;

type Answer = Result<Value, ChannelError>;

/// Handle releasing one scripted answer
pub struct Responder {
    tx: oneshot::Sender<Answer>,
}

impl Responder {
    pub fn respond(self, json: Value) {
        let _ = self.tx.send(Ok(json));
    }

    pub fn reject(self, message: &str) {
        let _ = self.tx.send(Err(ChannelError::Rejected(message.to_string())));
    }
}

#[derive(Default)]
pub struct ScriptedChannel {
    pending: Mutex<VecDeque<oneshot::Receiver<Answer>>>,
    requests: Mutex<Vec<StructureParams>>,
    groups: Mutex<Value>,
}

impl ScriptedChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue an answer slot for the next unscripted request
    pub fn script(&self) -> Responder {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().push_back(rx);
        Responder { tx }
    }

    /// Queue an answer that is already available
    pub fn answer(&self, json: Value) {
        self.script().respond(json);
    }

    pub fn set_groups(&self, catalog: Value) {
        *self.groups.lock() = catalog;
    }

    pub fn requests(&self) -> Vec<StructureParams> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl StructureChannel for ScriptedChannel {
    async fn fetch_structure(&self, params: &StructureParams) -> Result<Value, ChannelError> {
        let answer = {
            self.requests.lock().push(params.clone());
            self.pending.lock().pop_front()
        };

        match answer {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ChannelError::Transport("responder dropped".to_string()))),
            None => Err(ChannelError::Transport("no scripted answer".to_string())),
        }
    }

    async fn fetch_groups(&self) -> Result<Value, ChannelError> {
        Ok(self.groups.lock().clone())
    }
}
