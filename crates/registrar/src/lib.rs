//! `registrar` - Event registration form client and administrative dashboard
//!
//! This library submits participant registrations to a REST API and manages
//! them afterwards: listing, editing and deleting records, and summarising
//! them as age and gender distributions.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod registration;
pub mod render;
pub mod submit;

pub use aggregate::{age_distribution, gender_distribution, AgeBucket, ChartSeries, ChartSlice};
pub use api::{ApiError, HttpRegistrationApi, RegistrationApi};
pub use config::Config;
pub use dashboard::{Dashboard, DashboardEvent, DashboardState, LoadStatus};
pub use error::{Error, Result, ValidationError};
pub use logging::init_logging;
pub use registration::{Field, Registration, RegistrationForm, RegistrationId};
pub use submit::{Submitted, Submitter};
