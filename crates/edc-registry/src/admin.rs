//! Reviewer console: session handling, roll-ups and verification decisions.

use crate::clock::Clock;
use crate::config::AdminConfig;
use crate::error::ServiceError;
use crate::repository::ProfileRepository;
use crate::service::EdcService;
use chrono::{DateTime, Duration, Utc};
use edc_core::{
    BackgroundCheck, CheckStatus, CriminalRecordCheck, CriminalRecordStatus,
    DocumentVerification, EmployeeProfile, ProfilePatch, VerificationPatch,
};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

const EMPLOYEE_ID: &str = "1";
const UNASSIGNED: &str = "N/A";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("invalid admin credentials")]
    InvalidCredentials,
    #[error("admin login required")]
    NotLoggedIn,
    #[error("no open verification request {0}")]
    UnknownRequest(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
    Verifier,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub session_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: AdminRole,
    pub login_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_employees: u32,
    pub pending_verifications: u32,
    pub approved_verifications: u32,
    pub rejected_verifications: u32,
    pub new_registrations_today: u32,
    pub new_registrations_this_week: u32,
    pub blockchain_records: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerificationRollup {
    Pending,
    Partial,
    Complete,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListItem {
    pub edc_number: String,
    pub name: String,
    pub email: String,
    pub profile_completion: u8,
    pub verification_status: VerificationRollup,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerificationKind {
    Background,
    Criminal,
    Document,
}

impl VerificationKind {
    pub fn request_id(self) -> &'static str {
        match self {
            Self::Background => "bg-1",
            Self::Criminal => "cr-1",
            Self::Document => "doc-1",
        }
    }

    fn from_request_id(id: &str) -> Option<Self> {
        [Self::Background, Self::Criminal, Self::Document]
            .into_iter()
            .find(|kind| kind.request_id() == id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub edc_number: String,
    #[serde(rename = "type")]
    pub kind: VerificationKind,
    pub status: RequestStatus,
    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

pub fn rollup(profile: &EmployeeProfile) -> VerificationRollup {
    let v = &profile.verification_status;
    if v.background_check.status == CheckStatus::Verified
        && v.criminal_record.status == CriminalRecordStatus::Clear
    {
        VerificationRollup::Complete
    } else if v.background_check.status != CheckStatus::Pending {
        VerificationRollup::Partial
    } else {
        VerificationRollup::Pending
    }
}

fn open_kinds(profile: &EmployeeProfile) -> Vec<VerificationKind> {
    let v = &profile.verification_status;
    let mut kinds = Vec::new();
    if v.background_check.status == CheckStatus::InProgress {
        kinds.push(VerificationKind::Background);
    }
    if v.criminal_record.status == CriminalRecordStatus::InProgress {
        kinds.push(VerificationKind::Criminal);
    }
    if v.document_verification.status == CheckStatus::InProgress {
        kinds.push(VerificationKind::Document);
    }
    kinds
}

/// Console bound to one card service. The session lives in this value only.
pub struct AdminConsole<R, C> {
    service: EdcService<R, C>,
    credentials: AdminConfig,
    session: Mutex<Option<AdminSession>>,
}

impl<R: ProfileRepository, C: Clock> AdminConsole<R, C> {
    pub fn new(service: EdcService<R, C>, credentials: AdminConfig) -> Self {
        Self {
            service,
            credentials,
            session: Mutex::new(None),
        }
    }

    pub fn service(&self) -> &EdcService<R, C> {
        &self.service
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AdminSession, AdminError> {
        if username != self.credentials.username || password != self.credentials.password {
            warn!(username, "admin login rejected");
            return Err(AdminError::InvalidCredentials);
        }
        let session = AdminSession {
            session_id: Uuid::new_v4(),
            username: username.to_string(),
            email: self.credentials.email.clone(),
            role: AdminRole::SuperAdmin,
            login_time: self.service.clock().now(),
        };
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        info!(username, session_id = %session.session_id, "admin logged in");
        Ok(session)
    }

    pub fn logout(&self) {
        if let Some(session) = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            info!(username = %session.username, "admin logged out");
        }
    }

    pub fn session(&self) -> Option<AdminSession> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn require_session(&self) -> Result<AdminSession, AdminError> {
        self.session().ok_or(AdminError::NotLoggedIn)
    }

    pub fn stats(&self) -> Result<AdminStats, ServiceError> {
        let Some(profile) = self.service.profile()? else {
            return Ok(AdminStats::default());
        };
        let now = self.service.clock().now();
        let v = &profile.verification_status;

        let approved = [
            v.background_check.status == CheckStatus::Verified,
            v.criminal_record.status == CriminalRecordStatus::Clear,
            v.document_verification.status == CheckStatus::Verified,
        ];
        let rejected = [
            v.background_check.status == CheckStatus::Failed,
            v.criminal_record.status == CriminalRecordStatus::IssuesFound,
            v.document_verification.status == CheckStatus::Failed,
        ];
        let count = |flags: &[bool]| flags.iter().filter(|f| **f).count() as u32;

        Ok(AdminStats {
            total_employees: 1,
            pending_verifications: open_kinds(&profile).len() as u32,
            approved_verifications: count(&approved),
            rejected_verifications: count(&rejected),
            new_registrations_today: u32::from(profile.created_at.date_naive() == now.date_naive()),
            new_registrations_this_week: u32::from(now - profile.created_at < Duration::days(7)),
            blockchain_records: u32::from(profile.blockchain_record.is_some()),
        })
    }

    pub fn employees(&self) -> Result<Vec<EmployeeListItem>, ServiceError> {
        Ok(self
            .service
            .profile()?
            .map(|profile| EmployeeListItem {
                edc_number: profile.edc_number().unwrap_or(UNASSIGNED).to_string(),
                name: profile.personal_details.full_name(),
                email: profile.personal_details.email.clone(),
                profile_completion: profile.profile_completion,
                verification_status: rollup(&profile),
                created_at: profile.created_at,
                last_active: profile.updated_at,
            })
            .into_iter()
            .collect())
    }

    /// In-progress checks, presented as review requests.
    pub fn pending_verifications(&self) -> Result<Vec<VerificationRequest>, ServiceError> {
        let Some(profile) = self.service.profile()? else {
            return Ok(Vec::new());
        };
        Ok(open_kinds(&profile)
            .into_iter()
            .map(|kind| VerificationRequest {
                id: kind.request_id().to_string(),
                employee_id: EMPLOYEE_ID.to_string(),
                employee_name: profile.personal_details.full_name(),
                edc_number: profile.edc_number().unwrap_or(UNASSIGNED).to_string(),
                kind,
                status: RequestStatus::Pending,
                requested_at: profile.updated_at,
                reviewed_at: None,
                reviewed_by: None,
                remarks: None,
            })
            .collect())
    }

    pub fn approve(
        &self,
        request_id: &str,
        remarks: Option<String>,
    ) -> Result<VerificationRequest, ServiceError> {
        self.review(request_id, RequestStatus::Approved, remarks)
    }

    pub fn reject(
        &self,
        request_id: &str,
        remarks: String,
    ) -> Result<VerificationRequest, ServiceError> {
        self.review(request_id, RequestStatus::Rejected, Some(remarks))
    }

    fn review(
        &self,
        request_id: &str,
        decision: RequestStatus,
        remarks: Option<String>,
    ) -> Result<VerificationRequest, ServiceError> {
        let session = self.require_session()?;
        let unknown = || AdminError::UnknownRequest(request_id.to_string());

        let mut request = self
            .pending_verifications()?
            .into_iter()
            .find(|r| r.id == request_id)
            .ok_or_else(unknown)?;
        let kind = VerificationKind::from_request_id(request_id).ok_or_else(unknown)?;

        let now = self.service.clock().now();
        let approved = decision == RequestStatus::Approved;
        let verified_date = Some(now.to_rfc3339());
        let verified_by = Some(session.username.clone());

        let mut verification = VerificationPatch::default();
        match kind {
            VerificationKind::Background => {
                verification.background_check = Some(BackgroundCheck {
                    status: if approved {
                        CheckStatus::Verified
                    } else {
                        CheckStatus::Failed
                    },
                    verified_by,
                    verified_date,
                    remarks: remarks.clone(),
                });
            }
            VerificationKind::Criminal => {
                verification.criminal_record = Some(CriminalRecordCheck {
                    status: if approved {
                        CriminalRecordStatus::Clear
                    } else {
                        CriminalRecordStatus::IssuesFound
                    },
                    verified_by,
                    verified_date,
                    remarks: remarks.clone(),
                });
            }
            VerificationKind::Document => {
                let prior = self
                    .service
                    .profile()?
                    .map(|p| p.verification_status.document_verification.verified_documents)
                    .unwrap_or_default();
                verification.document_verification = Some(DocumentVerification {
                    status: if approved {
                        CheckStatus::Verified
                    } else {
                        CheckStatus::Failed
                    },
                    verified_documents: prior,
                    remarks: remarks.clone(),
                });
            }
        }

        self.service.update_profile(ProfilePatch {
            verification_status: Some(verification),
            ..ProfilePatch::default()
        })?;
        info!(
            request_id,
            decision = ?decision,
            reviewer = %session.username,
            "verification reviewed"
        );

        request.status = decision;
        request.reviewed_at = Some(now);
        request.reviewed_by = Some(session.username);
        request.remarks = remarks;
        Ok(request)
    }

    /// Case-insensitive match on name, email or EDC number.
    pub fn search(&self, query: &str) -> Result<Vec<EmployeeListItem>, ServiceError> {
        let needle = query.to_lowercase();
        Ok(self
            .employees()?
            .into_iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&needle)
                    || e.email.to_lowercase().contains(&needle)
                    || e.edc_number.to_lowercase().contains(&needle)
            })
            .collect())
    }
}
