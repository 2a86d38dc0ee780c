//! The administrative dashboard over all registrations.
//!
//! [`DashboardState`] is a plain value. It only changes through
//! [`DashboardState::reduce`], which applies one [`DashboardEvent`] at a time.
//! [`Dashboard`] runs the API calls and turns their acknowledged outcomes into
//! events. Local state is never mutated ahead of an acknowledgement, and a
//! failed call leaves it exactly as it was.

use tracing::{debug, error, info, instrument};

use crate::aggregate::{age_distribution, gender_distribution, ChartSeries};
use crate::api::RegistrationApi;
use crate::error::{Error, Result};
use crate::registration::{Field, Registration, RegistrationId};

/// Where the dashboard is in fetching the record list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// The list has not arrived yet; nothing should be rendered.
    #[default]
    Loading,
    /// The list was fetched.
    Ready,
    /// The fetch failed; the list is shown as empty.
    Degraded {
        /// Why the fetch failed.
        reason: String,
    },
}

/// Something that happened to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// A fetch of the full list began.
    LoadStarted,
    /// The full list arrived.
    Loaded(Vec<Registration>),
    /// The fetch failed.
    LoadFailed {
        /// Why the fetch failed.
        reason: String,
    },
    /// The operator opened a record for editing.
    EditStarted(RegistrationId),
    /// The operator changed a field of the draft.
    FieldChanged {
        /// The field changed.
        field: Field,
        /// Its new value.
        value: String,
    },
    /// The operator abandoned the draft.
    EditCancelled,
    /// The API acknowledged a full-record update with this content.
    Saved(Registration),
    /// The API acknowledged deletion of this record.
    Deleted(RegistrationId),
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    /// Progress of the initial fetch.
    pub status: LoadStatus,
    /// The records, in the order the API returned them.
    pub records: Vec<Registration>,
    /// The record being edited, with unsaved changes.
    pub draft: Option<Registration>,
}

impl DashboardState {
    /// Apply one event, producing the next state.
    #[must_use]
    pub fn reduce(mut self, event: DashboardEvent) -> Self {
        match event {
            DashboardEvent::LoadStarted => {
                self.status = LoadStatus::Loading;
            }
            DashboardEvent::Loaded(records) => {
                self.status = LoadStatus::Ready;
                self.records = records;
                self.draft = None;
            }
            DashboardEvent::LoadFailed { reason } => {
                self.status = LoadStatus::Degraded { reason };
                self.records.clear();
                self.draft = None;
            }
            DashboardEvent::EditStarted(id) => {
                if let Some(record) = self.find(&id) {
                    self.draft = Some(record.clone());
                }
            }
            DashboardEvent::FieldChanged { field, value } => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.set(field, value);
                }
            }
            DashboardEvent::EditCancelled => {
                self.draft = None;
            }
            DashboardEvent::Saved(saved) => {
                if self.draft.as_ref().is_some_and(|draft| draft.id == saved.id) {
                    self.draft = None;
                }
                if let Some(slot) = self.records.iter_mut().find(|r| r.id == saved.id) {
                    *slot = saved;
                }
            }
            DashboardEvent::Deleted(id) => {
                self.records.retain(|record| record.id != id);
                if self.draft.as_ref().is_some_and(|draft| draft.id == id) {
                    self.draft = None;
                }
            }
        }
        self
    }

    /// Look up a loaded record.
    #[must_use]
    pub fn find(&self, id: &RegistrationId) -> Option<&Registration> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Whether the list is still being fetched.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

/// Drives the dashboard against a registration API.
#[derive(Debug, Default)]
pub struct Dashboard {
    state: DashboardState,
}

impl Dashboard {
    /// Create a dashboard that has not loaded anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// The loaded records.
    #[must_use]
    pub fn records(&self) -> &[Registration] {
        &self.state.records
    }

    /// The draft being edited, if any.
    #[must_use]
    pub fn editing(&self) -> Option<&Registration> {
        self.state.draft.as_ref()
    }

    /// Age distribution of the current records.
    #[must_use]
    pub fn age_chart(&self) -> ChartSeries {
        age_distribution(&self.state.records)
    }

    /// Gender distribution of the current records.
    #[must_use]
    pub fn gender_chart(&self) -> ChartSeries {
        gender_distribution(&self.state.records)
    }

    fn dispatch(&mut self, event: DashboardEvent) {
        debug!(?event, "Dashboard event");
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(event);
    }

    /// Fetch every registration.
    ///
    /// On failure the list becomes empty and the status becomes
    /// [`LoadStatus::Degraded`]; the error is returned as well.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the list request fails.
    #[instrument(skip_all)]
    pub async fn load<A>(&mut self, api: &A) -> Result<usize>
    where
        A: RegistrationApi + ?Sized,
    {
        self.dispatch(DashboardEvent::LoadStarted);
        match api.list().await {
            Ok(records) => {
                let count = records.len();
                info!(count, "Loaded registrations");
                self.dispatch(DashboardEvent::Loaded(records));
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, "Error fetching registrations");
                self.dispatch(DashboardEvent::LoadFailed {
                    reason: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Open a record for editing, discarding any other draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRecord`] if no loaded record has `id`.
    pub fn begin_edit(&mut self, id: &RegistrationId) -> Result<()> {
        if self.state.find(id).is_none() {
            return Err(Error::UnknownRecord(id.clone()));
        }
        self.dispatch(DashboardEvent::EditStarted(id.clone()));
        Ok(())
    }

    /// Change one field of the draft. No validation is applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveEdit`] outside edit mode.
    pub fn update_field(&mut self, field: Field, value: impl Into<String>) -> Result<()> {
        if self.state.draft.is_none() {
            return Err(Error::NoActiveEdit);
        }
        self.dispatch(DashboardEvent::FieldChanged {
            field,
            value: value.into(),
        });
        Ok(())
    }

    /// Leave edit mode without contacting the API.
    pub fn cancel(&mut self) {
        self.dispatch(DashboardEvent::EditCancelled);
    }

    /// Send the draft as a full-record update.
    ///
    /// Once acknowledged, the draft replaces the matching record verbatim and
    /// edit mode ends. On failure the draft and the list are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveEdit`] outside edit mode, or [`Error::Api`]
    /// if the update request fails.
    #[instrument(skip_all)]
    pub async fn save<A>(&mut self, api: &A) -> Result<()>
    where
        A: RegistrationApi + ?Sized,
    {
        let draft = self.state.draft.clone().ok_or(Error::NoActiveEdit)?;
        match api.update(&draft).await {
            Ok(_) => {
                info!(id = %draft.id, "Registration updated");
                self.dispatch(DashboardEvent::Saved(draft));
                Ok(())
            }
            Err(e) => {
                error!(id = %draft.id, error = %e, "Error updating registration");
                Err(e.into())
            }
        }
    }

    /// Delete a record.
    ///
    /// Once acknowledged the record is removed locally. On failure the list
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the delete request fails.
    #[instrument(skip(self, api, id), fields(id = %id))]
    pub async fn delete<A>(&mut self, api: &A, id: &RegistrationId) -> Result<()>
    where
        A: RegistrationApi + ?Sized,
    {
        match api.delete(id).await {
            Ok(()) => {
                info!("Registration deleted");
                self.dispatch(DashboardEvent::Deleted(id.clone()));
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error deleting registration");
                Err(e.into())
            }
        }
    }
}
