use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Context;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Member, Subscription, Workout};

/// Full persisted state: every collection plus the id counters.
/// Field names are the on-disk document keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<Member>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub workouts: Vec<Workout>,
    #[serde(default = "first_id")]
    pub next_user_id: u64,
    #[serde(default = "first_id")]
    pub next_subscription_id: u64,
    #[serde(default = "first_id")]
    pub next_workout_id: u64,
}

fn first_id() -> u64 {
    1
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            subscriptions: Vec::new(),
            workouts: Vec::new(),
            next_user_id: first_id(),
            next_subscription_id: first_id(),
            next_workout_id: first_id(),
        }
    }
}

impl Snapshot {
    pub(crate) fn take_user_id(&mut self) -> String {
        take(&mut self.next_user_id)
    }

    pub(crate) fn take_subscription_id(&mut self) -> String {
        take(&mut self.next_subscription_id)
    }

    pub(crate) fn take_workout_id(&mut self) -> String {
        take(&mut self.next_workout_id)
    }

    pub(crate) fn has_member(&self, id: &str) -> bool {
        self.users.iter().any(|m| m.id == id)
    }

    /// Keep every counter at least 1 and past any numeric id already issued
    fn normalize(&mut self) {
        fn past<'a>(counter: &mut u64, ids: impl Iterator<Item = &'a str>) {
            let highest = ids.filter_map(|id| id.parse::<u64>().ok()).max();
            *counter = (*counter).max(1).max(highest.map_or(1, |id| id.saturating_add(1)));
        }

        past(
            &mut self.next_user_id,
            self.users.iter().map(|m| m.id.as_str()),
        );
        past(
            &mut self.next_subscription_id,
            self.subscriptions.iter().map(|s| s.id.as_str()),
        );
        past(
            &mut self.next_workout_id,
            self.workouts.iter().map(|w| w.id.as_str()),
        );
    }
}

fn take(counter: &mut u64) -> String {
    let id = *counter;
    *counter += 1;
    id.to_string()
}

/// Snapshot-file backed record store.
///
/// The whole state lives in memory behind one mutex; every successful mutation
/// rewrites the snapshot file before the lock is released, so mutations and
/// their writes are serialized.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    state: Mutex<Snapshot>,
}

impl Store {
    /// Open the store at `path`, loading whatever snapshot is there
    #[tracing::instrument(name = "Open snapshot store", skip_all)]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let state = load(&path);
        tracing::info!(
            path = %path.display(),
            users = state.users.len(),
            subscriptions = state.subscriptions.len(),
            workouts = state.workouts.len(),
            "Snapshot loaded"
        );

        Self {
            path,
            state: Mutex::new(state),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A copy of the current in-memory state
    pub fn snapshot(&self) -> Snapshot {
        self.lock().clone()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        f(&self.lock())
    }

    /// Apply a mutation and, if it succeeds, persist the new state before
    /// returning. Failed mutations leave both memory and disk untouched.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Snapshot) -> Result<R>) -> Result<R> {
        let mut state = self.lock();
        let output = f(&mut state)?;
        persist(&self.path, &state);
        Ok(output)
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        // Mutations are single push/assign/remove steps, a poisoned state is still whole
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read the snapshot at `path`. A missing, blank or unreadable file yields the
/// empty initial state; this never fails.
pub fn load(path: &Path) -> Snapshot {
    match try_load(path) {
        Ok(Some(mut snapshot)) => {
            snapshot.normalize();
            snapshot
        }
        Ok(None) => Snapshot::default(),
        Err(error) => {
            tracing::error!(
                error.cause_chain = ?error,
                "Failed to load snapshot file, starting fresh"
            );
            Snapshot::default()
        }
    }
}

fn try_load(path: &Path) -> anyhow::Result<Option<Snapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).context("Failed to read snapshot file")?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let snapshot = serde_json::from_str(&raw).context("Failed to parse snapshot file")?;
    Ok(Some(snapshot))
}

/// Replace the snapshot at `path` with `snapshot`. Failures are logged and
/// swallowed: the in-memory state stays authoritative until the next write.
pub fn persist(path: &Path, snapshot: &Snapshot) {
    if let Err(error) = try_persist(path, snapshot) {
        tracing::error!(error.cause_chain = ?error, "Failed to save snapshot file");
    }
}

fn try_persist(path: &Path, snapshot: &Snapshot) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create snapshot directory")?;
    }

    let payload = serde_json::to_vec_pretty(snapshot).context("Failed to serialize snapshot")?;

    // Write beside the target and rename over it, readers only ever see a
    // complete document
    let tmp_path = temp_path(path);
    let replaced = write_file(&tmp_path, &payload)
        .and_then(|()| fs::rename(&tmp_path, path).context("Failed to replace snapshot file"));
    if replaced.is_err() {
        // Best effort, the original error is the one reported
        let _ = fs::remove_file(&tmp_path);
    }

    replaced
}

fn write_file(path: &Path, payload: &[u8]) -> anyhow::Result<()> {
    let mut file = File::create(path).context("Failed to create temporary snapshot")?;
    file.write_all(payload)
        .context("Failed to write temporary snapshot")?;
    file.sync_all().context("Failed to flush temporary snapshot")
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
