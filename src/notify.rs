//! Transaction and error notifications ("toasts").

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use solana_sdk::signature::Signature;
use uuid::Uuid;

use crate::cluster::ClusterConfig;

/// Receives the user-visible outcome of every mutation.
pub trait Notifier: Send + Sync {
    /// A state-changing call was confirmed.
    fn transaction_sent(&self, signature: &Signature, cluster: &ClusterConfig);

    /// A call failed; `message` is shown as-is.
    fn error(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
    pub signature: Option<String>,
    pub explorer_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub const DEFAULT_TOAST_CAPACITY: usize = 50;

/// Bounded in-memory log of recent toasts, oldest evicted first.
pub struct ToastLog {
    capacity: usize,
    toasts: Mutex<VecDeque<Toast>>,
}

impl Default for ToastLog {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_CAPACITY)
    }
}

impl ToastLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            toasts: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn push(&self, toast: Toast) {
        let mut toasts = self.toasts.lock();
        if toasts.len() == self.capacity {
            toasts.pop_front();
        }
        toasts.push_back(toast);
    }

    /// Most recent first.
    pub fn recent(&self) -> Vec<Toast> {
        self.toasts.lock().iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.toasts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.toasts.lock().clear();
    }
}

impl Notifier for ToastLog {
    fn transaction_sent(&self, signature: &Signature, cluster: &ClusterConfig) {
        let signature = signature.to_string();
        tracing::info!("Transaction sent: {} ({})", signature, cluster.name);
        self.push(Toast {
            id: Uuid::new_v4(),
            kind: ToastKind::Success,
            message: "Transaction sent".to_string(),
            explorer_url: Some(cluster.explorer_url(&signature)),
            signature: Some(signature),
            created_at: Utc::now(),
        });
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
        self.push(Toast {
            id: Uuid::new_v4(),
            kind: ToastKind::Error,
            message: message.to_string(),
            signature: None,
            explorer_url: None,
            created_at: Utc::now(),
        });
    }
}
