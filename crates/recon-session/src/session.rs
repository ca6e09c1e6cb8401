//! The reconciliation session: attach a dataset, auto-match its headers,
//! take manual corrections, and finalize into typed records.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use recon_match::{HeaderMatcher, Suggestion};
use recon_model::{
    AutoMatching, DefaultValue, ExpectedHeader, MatchState, MaterializeConfig, RecordSchema,
    expected_headers_from_schema, same_member_set, validate_headers,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::dataset::{Dataset, DatasetId, FieldProfile, Mutation};
use crate::defaults::apply_defaults;
use crate::error::{DatasetError, Result, SessionError};
use crate::events::{Listeners, SessionEvent};
use crate::tracker::HeaderTracker;
use crate::validation::{ReconcileSummary, match_state, summarize, validate};

/// Session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Mode used by the automatic matching pass.
    pub matching: AutoMatching,
    /// When set, remap, unmap, reset, and value edits are ignored.
    pub frozen: bool,
    /// Passed to the dataset when records are materialized.
    pub materialize: MaterializeConfig,
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// No dataset attached.
    Uninitialized,
    /// A dataset is attached and its headers are being matched.
    Initialized,
    /// Matching is done; manual corrections are accepted.
    Reconciling,
    /// Records were materialized. Further edits return to `Reconciling`.
    Finalized,
}

/// Result of [`ReconcileSession::attach`].
///
/// A dataset the session did not take is handed back.
#[derive(Debug)]
#[must_use]
pub enum AttachOutcome<D> {
    /// The dataset is attached; `matched` headers were mapped automatically.
    Reconciled { matched: usize },
    /// The dataset is the one already attached; nothing changed.
    Unchanged(D),
    /// The dataset has no data loaded; nothing changed.
    NoHeaders(D),
}

impl<D> AttachOutcome<D> {
    pub fn is_reconciled(&self) -> bool {
        matches!(self, Self::Reconciled { .. })
    }
}

/// Reconciles one dataset's headers against a list of expected headers.
#[derive(Debug)]
pub struct ReconcileSession<D> {
    options: SessionOptions,
    expected: Vec<ExpectedHeader>,
    dataset: Option<D>,
    attached: Option<DatasetId>,
    tracker: HeaderTracker,
    /// Default columns the last finalize added to the dataset.
    injected: BTreeSet<String>,
    state: SessionState,
    valid: bool,
    listeners: Listeners,
}

impl<D: Dataset> ReconcileSession<D> {
    /// Create a session for `expected`.
    ///
    /// Fails when a header name is empty or used twice.
    pub fn new(expected: Vec<ExpectedHeader>, options: SessionOptions) -> Result<Self> {
        validate_headers(&expected)?;
        Ok(Self::with_headers(expected, options))
    }

    /// Create a session whose expected headers are the writable fields of
    /// `T`, all optional.
    pub fn for_schema<T: RecordSchema>(options: SessionOptions) -> Self {
        Self::with_headers(expected_headers_from_schema::<T>(), options)
    }

    fn with_headers(expected: Vec<ExpectedHeader>, options: SessionOptions) -> Self {
        Self {
            options,
            expected,
            dataset: None,
            attached: None,
            tracker: HeaderTracker::default(),
            injected: BTreeSet::new(),
            state: SessionState::Uninitialized,
            valid: false,
            listeners: Listeners::default(),
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Mode for the next attach. The current mapping is kept.
    pub fn set_matching(&mut self, mode: AutoMatching) {
        self.options.matching = mode;
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        self.options.frozen = frozen;
    }

    pub fn is_frozen(&self) -> bool {
        self.options.frozen
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Validity as of the last change.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Recompute validity from the current mapping and values.
    pub fn validate(&self) -> bool {
        validate(&self.expected, &self.tracker)
    }

    pub fn expected_headers(&self) -> &[ExpectedHeader] {
        &self.expected
    }

    pub fn expected_header(&self, name: &str) -> Option<&ExpectedHeader> {
        self.expected.iter().find(|h| h.name() == name)
    }

    pub fn dataset(&self) -> Option<&D> {
        self.dataset.as_ref()
    }

    pub fn tracker(&self) -> &HeaderTracker {
        &self.tracker
    }

    pub fn original_to_current(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tracker.original_to_current()
    }

    pub fn original_to_expected(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.tracker.original_to_expected()
    }

    /// State of the expected header named `name`.
    pub fn match_state(&self, name: &str) -> Option<MatchState> {
        self.expected_header(name)
            .map(|header| match_state(header, &self.tracker))
    }

    /// Every expected header with its state, in display order.
    pub fn match_states(&self) -> Vec<(&ExpectedHeader, MatchState)> {
        self.expected
            .iter()
            .map(|header| (header, match_state(header, &self.tracker)))
            .collect()
    }

    pub fn summary(&self) -> ReconcileSummary {
        summarize(&self.expected, &self.tracker)
    }

    /// Expected headers ranked by similarity to `original`, best first.
    pub fn suggestions(&self, original: &str) -> Vec<Suggestion<'_>> {
        HeaderMatcher::new(self.options.matching).suggest(original, &self.expected)
    }

    /// Register a callback for [`SessionEvent`]s.
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Attach `dataset` and run the automatic matching pass.
    ///
    /// Re-attaching the dataset that is already attached does nothing and
    /// hands the argument back; so does a dataset without headers. Otherwise
    /// all prior state is discarded before matching.
    pub async fn attach(&mut self, dataset: D) -> Result<AttachOutcome<D>> {
        let id = dataset.id();
        if self.attached == Some(id) {
            debug!(dataset = %id, "dataset already attached");
            return Ok(AttachOutcome::Unchanged(dataset));
        }
        let Some(headers) = dataset.headers() else {
            warn!(dataset = %id, "dataset has no headers, attach skipped");
            return Ok(AttachOutcome::NoHeaders(dataset));
        };

        self.detach();
        self.tracker = HeaderTracker::from_headers(headers);
        self.dataset = Some(dataset);
        self.attached = Some(id);
        self.state = SessionState::Initialized;

        let matched = self.run_matching_pass().await?;
        self.refresh_validity();
        self.sort_expected_headers();
        self.state = SessionState::Reconciling;

        info!(
            dataset = %id,
            columns = self.tracker.len(),
            matched,
            mode = %self.options.matching,
            valid = self.valid,
            "dataset attached"
        );
        Ok(AttachOutcome::Reconciled { matched })
    }

    /// Map `original` to the expected header named `expected`.
    ///
    /// Any other column mapped to `expected` is unmapped first. Nothing
    /// changes when a rename would give two columns the same name.
    pub async fn remap(&mut self, original: &str, expected: &str) -> Result<()> {
        if self.options.frozen {
            debug!(original, expected, "session frozen, remap ignored");
            return Ok(());
        }
        if self.dataset.is_none() {
            return Ok(());
        }
        self.ensure_original(original)?;
        if self.expected_header(expected).is_none() {
            return Err(SessionError::UnknownExpectedHeader {
                header: expected.to_string(),
            });
        }
        if self.tracker.expected_for(original) == Some(expected) {
            return Ok(());
        }

        let displaced = self
            .tracker
            .original_for(expected)
            .map(str::to_string);
        match displaced.as_deref() {
            Some(holder) => {
                self.check_renames(&[(holder, holder), (original, expected)], Some(expected))?;
            }
            None => self.check_renames(&[(original, expected)], Some(expected))?,
        }

        if let Some(holder) = &displaced {
            info!(displaced = %holder, original, expected, "mapping displaced");
            self.restore_original(holder).await?;
        }
        self.apply_mapping(original, expected).await?;
        self.state = SessionState::Reconciling;
        self.refresh_validity();
        info!(original, expected, "header remapped");
        Ok(())
    }

    /// Undo the mapping of `original`, restoring its column name.
    pub async fn unmap(&mut self, original: &str) -> Result<()> {
        if self.options.frozen {
            debug!(original, "session frozen, unmap ignored");
            return Ok(());
        }
        if self.dataset.is_none() {
            return Ok(());
        }
        self.ensure_original(original)?;
        if self.tracker.expected_for(original).is_none() {
            return Ok(());
        }
        self.check_renames(&[(original, original)], None)?;

        self.restore_original(original).await?;
        self.state = SessionState::Reconciling;
        self.refresh_validity();
        info!(original, "header unmapped");
        Ok(())
    }

    /// Set or clear the manual value of an expected header.
    pub fn set_value(&mut self, expected: &str, value: Option<DefaultValue>) -> Result<()> {
        if self.options.frozen {
            debug!(expected, "session frozen, value edit ignored");
            return Ok(());
        }
        let header = self
            .expected
            .iter_mut()
            .find(|h| h.name() == expected)
            .ok_or_else(|| SessionError::UnknownExpectedHeader {
                header: expected.to_string(),
            })?;
        header.set_value(value)?;
        if self.state == SessionState::Finalized {
            self.state = SessionState::Reconciling;
        }
        self.refresh_validity();
        Ok(())
    }

    /// Discard all session state and hand back the attached dataset.
    ///
    /// Columns already renamed or injected in the dataset stay as they are.
    pub fn reset(&mut self) -> Option<D> {
        if self.options.frozen {
            debug!("session frozen, reset ignored");
            return None;
        }
        self.detach()
    }

    /// Like [`reset`](Self::reset), but also while frozen.
    pub fn detach(&mut self) -> Option<D> {
        for header in &mut self.expected {
            header.clear_value();
        }
        self.tracker.clear();
        self.injected.clear();
        self.attached = None;
        self.state = SessionState::Uninitialized;
        self.refresh_validity();
        self.dataset.take()
    }

    /// Replace the expected headers.
    ///
    /// A list with the same canonical names as the current one is ignored
    /// and `false` returned. Columns mapped to a header that is no longer
    /// expected are unmapped.
    pub async fn set_expected_headers(&mut self, headers: Vec<ExpectedHeader>) -> Result<bool> {
        if same_member_set(&self.expected, &headers) {
            debug!("expected headers unchanged");
            return Ok(false);
        }
        validate_headers(&headers)?;

        let stale: Vec<String> = self
            .tracker
            .entries()
            .iter()
            .filter(|e| {
                e.expected()
                    .is_some_and(|name| !headers.iter().any(|h| h.name() == name))
            })
            .map(|e| e.original().to_string())
            .collect();
        if !stale.is_empty() {
            let renames: Vec<(&str, &str)> =
                stale.iter().map(|o| (o.as_str(), o.as_str())).collect();
            self.check_renames(&renames, None)?;
            for original in &stale {
                self.restore_original(original).await?;
            }
        }

        self.expected = headers;
        self.refresh_validity();
        info!(
            count = self.expected.len(),
            unmapped = stale.len(),
            "expected headers replaced"
        );
        Ok(true)
    }

    /// Move the expected header at `from` to position `to`.
    ///
    /// Returns false when either index is out of range.
    pub fn move_expected_header(&mut self, from: usize, to: usize) -> bool {
        if from >= self.expected.len() || to >= self.expected.len() {
            return false;
        }
        let header = self.expected.remove(from);
        self.expected.insert(to, header);
        true
    }

    /// Inject defaults and build one `T` per row.
    ///
    /// Returns `Ok(None)` without touching the dataset when nothing is
    /// attached or a required header is unresolved. A record construction
    /// failure is logged, reported as [`SessionEvent::MaterializeFailed`],
    /// and also yields `Ok(None)`; the injected columns are removed again so
    /// the mapping can be corrected. A failed mutation is an error.
    ///
    /// Columns injected by an earlier finalize are replaced.
    ///
    /// Without a `profile`, every expected header's column feeds the field
    /// of the same name.
    pub async fn finalize<T: DeserializeOwned>(
        &mut self,
        profile: Option<&FieldProfile>,
    ) -> Result<Option<Vec<T>>> {
        let type_name = std::any::type_name::<T>();
        if self.dataset.is_none() {
            warn!(type_name, "finalize called without a dataset");
            return Ok(None);
        }
        if !self.validate() {
            info!(type_name, "finalize skipped, required headers unresolved");
            return Ok(None);
        }
        let profile = self.field_profile(profile);

        self.drop_injected(None).await?;

        let dataset = self.dataset.as_mut().ok_or(DatasetError::NotLoaded)?;
        let injected = apply_defaults(dataset, &self.expected, &self.tracker).await?;
        self.injected.extend(injected.iter().cloned());

        match dataset.materialize::<T>(&self.options.materialize, &profile) {
            Ok(records) => {
                self.state = SessionState::Finalized;
                info!(
                    type_name,
                    records = records.len(),
                    defaults = injected.len(),
                    "records materialized"
                );
                Ok(Some(records))
            }
            Err(err) => {
                error!(type_name, error = %err, "failed to materialize records");
                self.listeners.emit(&SessionEvent::MaterializeFailed {
                    type_name: type_name.to_string(),
                    message: err.to_string(),
                });
                self.drop_injected(None).await?;
                Ok(None)
            }
        }
    }

    async fn run_matching_pass(&mut self) -> Result<usize> {
        let matcher = HeaderMatcher::new(self.options.matching);
        let originals: Vec<String> = self.tracker.originals().map(str::to_string).collect();
        let mut matched = 0;

        for original in originals {
            let found = {
                let mapped = self.tracker.mapped_names();
                matcher
                    .find_match(
                        &original,
                        self.expected.iter().filter(|h| !mapped.contains(h.name())),
                    )
                    .map(|h| h.name().to_string())
            };
            let Some(expected) = found else {
                continue;
            };
            if self
                .check_renames(
                    &[(original.as_str(), expected.as_str())],
                    Some(expected.as_str()),
                )
                .is_err()
            {
                debug!(
                    original = %original,
                    expected = %expected,
                    "match skipped, another column already has the name"
                );
                continue;
            }
            self.apply_mapping(&original, &expected).await?;
            matched += 1;
        }
        Ok(matched)
    }

    async fn apply_mapping(&mut self, original: &str, expected: &str) -> Result<()> {
        self.drop_injected(Some(expected)).await?;
        let current = self.current_name(original)?;
        let dataset = self.dataset.as_mut().ok_or(DatasetError::NotLoaded)?;
        if current != expected {
            dataset
                .mutate(Mutation::RenameColumn {
                    from: current,
                    to: expected.to_string(),
                })
                .await?;
        }
        self.tracker.record_mapping(original, expected);
        if let Some(header) = self.expected.iter_mut().find(|h| h.name() == expected) {
            header.clear_value();
        }
        debug!(original, expected, "column mapped");
        Ok(())
    }

    async fn restore_original(&mut self, original: &str) -> Result<()> {
        let current = self.current_name(original)?;
        let dataset = self.dataset.as_mut().ok_or(DatasetError::NotLoaded)?;
        if current != original {
            dataset
                .mutate(Mutation::RenameColumn {
                    from: current,
                    to: original.to_string(),
                })
                .await?;
        }
        self.tracker.record_unmapping(original);
        debug!(original, "column restored");
        Ok(())
    }

    /// Remove injected default columns: the one named `only`, or all of
    /// them.
    async fn drop_injected(&mut self, only: Option<&str>) -> Result<()> {
        let columns: Vec<String> = match only {
            Some(name) if self.injected.contains(name) => vec![name.to_string()],
            Some(_) => return Ok(()),
            None => self.injected.iter().cloned().collect(),
        };
        if columns.is_empty() {
            return Ok(());
        }
        let dataset = self.dataset.as_mut().ok_or(DatasetError::NotLoaded)?;
        dataset
            .mutate(Mutation::RemoveColumns(columns.clone()))
            .await?;
        for column in &columns {
            self.injected.remove(column);
        }
        debug!(columns = columns.len(), "injected default columns removed");
        Ok(())
    }

    /// Fails when applying `renames` in order would give two columns the
    /// same name at any step. Injected default columns count as taken,
    /// except `replaced`, which is dropped before the renames run.
    fn check_renames(&self, renames: &[(&str, &str)], replaced: Option<&str>) -> Result<()> {
        let mut names: Vec<(&str, &str)> = self.tracker.original_to_current().collect();
        for &(original, target) in renames {
            let injected = replaced != Some(target) && self.injected.contains(target);
            if injected || names.iter().any(|&(o, c)| o != original && c == target) {
                return Err(SessionError::NameConflict {
                    column: original.to_string(),
                    target: target.to_string(),
                });
            }
            if let Some(entry) = names.iter_mut().find(|(o, _)| *o == original) {
                entry.1 = target;
            }
        }
        Ok(())
    }

    fn ensure_original(&self, original: &str) -> Result<()> {
        if self.tracker.contains(original) {
            Ok(())
        } else {
            Err(SessionError::UnknownOriginalHeader {
                header: original.to_string(),
            })
        }
    }

    fn current_name(&self, original: &str) -> Result<String> {
        self.tracker
            .current_name(original)
            .map(str::to_string)
            .ok_or_else(|| SessionError::UnknownOriginalHeader {
                header: original.to_string(),
            })
    }

    fn field_profile(&self, profile: Option<&FieldProfile>) -> FieldProfile {
        let profile = profile.cloned().unwrap_or_default();
        if profile.has_fields() {
            return profile;
        }
        let fields: Vec<String> = self
            .expected
            .iter()
            .map(|h| profile.field_for(h.name()).to_string())
            .collect();
        profile.with_fields(fields)
    }

    fn refresh_validity(&mut self) {
        let valid = validate(&self.expected, &self.tracker);
        if valid != self.valid {
            self.valid = valid;
            debug!(valid, "validity changed");
            self.listeners.emit(&SessionEvent::ValidityChanged(valid));
        }
    }

    /// Required first, then mapped, keeping list order otherwise.
    fn sort_expected_headers(&mut self) {
        let tracker = &self.tracker;
        self.expected.sort_by_key(|h| {
            (
                Reverse(h.is_required()),
                Reverse(tracker.is_mapped(h.name())),
            )
        });
    }
}
