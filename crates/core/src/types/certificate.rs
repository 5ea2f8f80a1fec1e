//! Grading certificates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{AssessmentRequestId, CertificateId};
use crate::status::{CertificateStatus, Lifecycle, StatusTransitionError};

/// A certificate for a completed assessment.
///
/// The digital signature and QR payload are produced by the signing service
/// and stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: CertificateId,
    pub certificate_number: String,
    pub assessment_request_id: AssessmentRequestId,
    status: CertificateStatus,
    #[serde(default)]
    pub digital_signature: Option<String>,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revoked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revocation_reason: Option<String>,
}

impl Certificate {
    /// A new draft certificate.
    #[must_use]
    pub fn draft(
        id: CertificateId,
        certificate_number: impl Into<String>,
        assessment_request_id: AssessmentRequestId,
    ) -> Self {
        Self {
            id,
            certificate_number: certificate_number.into(),
            assessment_request_id,
            status: CertificateStatus::Draft,
            digital_signature: None,
            qr_code: None,
            issued_at: None,
            revoked_at: None,
            revocation_reason: None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> CertificateStatus {
        self.status
    }

    /// Issue the certificate with its signature and QR payload.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] unless the certificate is a draft.
    pub fn issue(
        &mut self,
        digital_signature: String,
        qr_code: String,
    ) -> Result<(), StatusTransitionError> {
        self.status = self.status.transition(CertificateStatus::Issued)?;
        self.digital_signature = Some(digital_signature);
        self.qr_code = Some(qr_code);
        self.issued_at = Some(Utc::now());
        Ok(())
    }

    /// Revoke an issued certificate.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] unless the certificate is issued.
    pub fn revoke(&mut self, reason: impl Into<String>) -> Result<(), StatusTransitionError> {
        self.status = self.status.transition(CertificateStatus::Revoked)?;
        self.revoked_at = Some(Utc::now());
        self.revocation_reason = Some(reason.into());
        Ok(())
    }

    /// Whether the certificate currently vouches for the stone.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status == CertificateStatus::Issued
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> Certificate {
        Certificate::draft(CertificateId::new(1), "DA-2026-0001", AssessmentRequestId::new(5))
    }

    #[test]
    fn test_issue_then_revoke() {
        let mut cert = draft();
        assert!(!cert.is_valid());

        cert.issue("sig".to_string(), "qr".to_string()).unwrap();
        assert!(cert.is_valid());
        assert!(cert.issued_at.is_some());

        cert.revoke("re-graded").unwrap();
        assert_eq!(cert.status(), CertificateStatus::Revoked);
        assert_eq!(cert.revocation_reason.as_deref(), Some("re-graded"));
    }

    #[test]
    fn test_cannot_revoke_draft() {
        let mut cert = draft();
        assert!(cert.revoke("mistake").is_err());
        assert!(cert.revoked_at.is_none());
    }

    #[test]
    fn test_cannot_reissue() {
        let mut cert = draft();
        cert.issue("sig".to_string(), "qr".to_string()).unwrap();
        cert.revoke("lost").unwrap();
        assert!(cert.issue("sig2".to_string(), "qr2".to_string()).is_err());
        assert_eq!(cert.digital_signature.as_deref(), Some("sig"));
    }
}
