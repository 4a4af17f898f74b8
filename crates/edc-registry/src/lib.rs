//! Employee Data Card workflows on top of `edc-core` and `edc-ledger`:
//! snapshot storage, card lifecycle, provident-fund linking, phone OTP and
//! the reviewer console.

pub mod admin;
pub mod clock;
pub mod config;
pub mod error;
pub mod otp;
pub mod pension;
pub mod repository;
pub mod service;


pub use admin::{
    AdminConsole, AdminError, AdminRole, AdminSession, AdminStats, EmployeeListItem,
    RequestStatus, VerificationKind, VerificationRequest, VerificationRollup,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    AdminConfig, ConfigError, EdcConfig, OtpConfig, PensionConfig, StorageConfig, CONFIG_ENV,
};
pub use error::ServiceError;
pub use otp::{AuthSession, IdentityVerifier, OtpChallenge, OtpError, OtpVerifier};
pub use pension::{ContributionMonth, MockPensionLookup, PensionError, PensionLookup};
pub use repository::{
    InMemoryProfileRepository, JsonFileProfileRepository, ProfileRepository, StorageError,
    PROFILE_KEY,
};
pub use service::EdcService;
