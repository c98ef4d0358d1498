//! Static task definitions and per-task status.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Unique name of a provisioning task (one per master-data collection).
///
/// Modeled as an opaque string (e.g. "accounts") so the registry stays open to
/// new collections without touching the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskKey(Cow<'static, str>);

impl TaskKey {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TaskKey {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl PartialEq<str> for TaskKey {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for TaskKey {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Static description of one seeding task.
///
/// Created once when the registry is built and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub key: TaskKey,
    /// Human-readable name for progress cards.
    pub label: String,
    /// Upper bound used for progress percentage only.
    pub expected_record_count: usize,
    /// Zero-based position in the registry.
    pub position: usize,
}

/// Lifecycle of a task within one provisioning run.
///
/// `Pending -> Seeding -> Done` on the happy path, `Seeding -> Error` on
/// failure and `Error -> Seeding` through an explicit retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Seeding,
    Done,
    Error,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Seeding => "seeding",
            TaskStatus::Done => "done",
            TaskStatus::Error => "error",
        }
    }

    /// `Done` and `Error` end a seeding pass.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Error)
    }

    pub fn is_retriable(&self) -> bool {
        matches!(self, TaskStatus::Error)
    }
}

impl core::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
