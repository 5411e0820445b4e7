//! In-memory backends for unit tests
//!
//! Every fake records the calls it receives so tests can assert that a code
//! path never reached a service.

use async_trait::async_trait;
use helix_core::domain::artifact::ObjectEntry;
use helix_core::domain::run::{RunRecord, RunStatus};
use helix_core::domain::submission::SubmissionRequest;
use helix_core::dto::identity::CallerIdentity;
use helix_core::dto::run::StartRunResponse;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{IdentityProvider, ObjectStore, StackOutputs, WorkflowService};
use crate::error::{ClientError, Result};

/// Stack outputs keyed by stack name; unknown stacks fail the lookup
#[derive(Default)]
pub struct FakeStacks {
    stacks: HashMap<String, HashMap<String, String>>,
    pub lookups: Mutex<Vec<String>>,
}

impl FakeStacks {
    pub fn with_stack(mut self, name: &str, outputs: &[(&str, &str)]) -> Self {
        let outputs = outputs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.stacks.insert(name.to_string(), outputs);
        self
    }
}

#[async_trait]
impl StackOutputs for FakeStacks {
    async fn stack_outputs(&self, stack_name: &str) -> Result<HashMap<String, String>> {
        self.lookups.lock().unwrap().push(stack_name.to_string());
        self.stacks
            .get(stack_name)
            .cloned()
            .ok_or_else(|| ClientError::StackLookup(format!("Stack {} does not exist", stack_name)))
    }
}

/// Fixed caller identity, or a failing one
pub struct FakeIdentity {
    identity: Option<CallerIdentity>,
    pub calls: AtomicUsize,
}

impl FakeIdentity {
    pub fn new(account_id: &str, region: &str) -> Self {
        Self {
            identity: Some(CallerIdentity {
                account_id: account_id.to_string(),
                region: region.to_string(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            identity: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn caller_identity(&self) -> Result<CallerIdentity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.identity
            .clone()
            .ok_or_else(|| ClientError::Identity("credentials expired".to_string()))
    }
}

/// Workflow service that records submissions and replays scripted run records
#[derive(Default)]
pub struct FakeWorkflows {
    pub submitted: Mutex<Vec<SubmissionRequest>>,
    pub status_queries: AtomicUsize,
    records: Mutex<VecDeque<Result<RunRecord>>>,
    reject_submissions: bool,
}

impl FakeWorkflows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            reject_submissions: true,
            ..Self::default()
        }
    }

    /// Queues records returned by successive `get_run` calls; the last one repeats
    pub fn with_records(self, records: Vec<Result<RunRecord>>) -> Self {
        *self.records.lock().unwrap() = records.into();
        self
    }

    pub fn with_record(self, record: RunRecord) -> Self {
        self.with_records(vec![Ok(record)])
    }

    pub fn submission_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl WorkflowService for FakeWorkflows {
    async fn start_run(&self, request: &SubmissionRequest) -> Result<StartRunResponse> {
        if self.reject_submissions {
            return Err(ClientError::Submission(
                "ValidationException: workflow not found".to_string(),
            ));
        }

        self.submitted.lock().unwrap().push(request.clone());
        Ok(StartRunResponse {
            run_id: "1234567".to_string(),
            status: RunStatus::Pending,
        })
    }

    async fn get_run(&self, run_id: &str) -> Result<RunRecord> {
        self.status_queries.fetch_add(1, Ordering::SeqCst);

        let mut records = self.records.lock().unwrap();
        let next = if records.len() > 1 {
            records.pop_front()
        } else {
            records.front().map(|record| match record {
                Ok(record) => Ok(record.clone()),
                Err(err) => Err(ClientError::Monitor(err.to_string())),
            })
        };

        next.unwrap_or_else(|| Err(ClientError::Monitor(format!("Run {} not found", run_id))))
    }
}

/// Object store over an in-memory map of bucket/key to bytes
#[derive(Default)]
pub struct FakeStore {
    objects: Vec<(String, String, u64, Vec<u8>)>,
    failing_keys: HashSet<String>,
    fail_listing: bool,
    pub list_calls: AtomicUsize,
    pub fetched: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object whose reported size matches its content
    pub fn with_object(self, bucket: &str, key: &str, content: &str) -> Self {
        let size = content.len() as u64;
        self.with_sized_object(bucket, key, size, content)
    }

    /// Adds an object with an explicit reported size
    pub fn with_sized_object(mut self, bucket: &str, key: &str, size: u64, content: &str) -> Self {
        self.objects.push((
            bucket.to_string(),
            key.to_string(),
            size,
            content.as_bytes().to_vec(),
        ));
        self
    }

    pub fn with_raw_object(mut self, bucket: &str, key: &str, bytes: Vec<u8>) -> Self {
        self.objects
            .push((bucket.to_string(), key.to_string(), bytes.len() as u64, bytes));
        self
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst) + self.fetched.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(ClientError::Storage("AccessDenied".to_string()));
        }

        Ok(self
            .objects
            .iter()
            .filter(|(b, key, _, _)| b == bucket && key.starts_with(prefix))
            .map(|(_, key, size, _)| ObjectEntry::new(key.clone(), *size))
            .collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.fetched.lock().unwrap().push(key.to_string());
        if self.failing_keys.contains(key) {
            return Err(ClientError::Storage(format!("NoSuchKey: {}", key)));
        }

        self.objects
            .iter()
            .find(|(b, k, _, _)| b == bucket && k == key)
            .map(|(_, _, _, bytes)| bytes.clone())
            .ok_or_else(|| ClientError::Storage(format!("NoSuchKey: {}", key)))
    }
}
