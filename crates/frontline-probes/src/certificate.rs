// crates/frontline-probes/src/certificate.rs
// ============================================================================
// Module: Certificate Inspection
// Description: X.509 subject and issuer extraction for peer certificates.
// Purpose: Classify the leaf certificate issuer and summarize the chain.
// Dependencies: frontline-core, rustls-pki-types, x509-parser
// ============================================================================

//! ## Overview
//! Certificates are parsed only to read names; no validation is performed.
//! A leaf whose subject common name contains the Amazon domain suffix is
//! classified as Amazon-issued.

// ============================================================================
// SECTION: Imports
// ============================================================================

use frontline_core::CertIssuer;
use frontline_core::CertificateSummary;
use frontline_core::ProbeError;
use rustls_pki_types::CertificateDer;
use x509_parser::prelude::FromDer;
use x509_parser::prelude::X509Certificate;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Common-name fragment identifying Amazon-issued endpoint certificates.
pub const AMAZON_DOMAIN_SUFFIX: &str = ".amazonaws.com";

// ============================================================================
// SECTION: Inspection
// ============================================================================

/// Names read from one certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    /// First subject common name, if any.
    pub common_name: Option<String>,
    /// Subject distinguished name.
    pub subject: String,
    /// Issuer distinguished name.
    pub issuer: String,
}

impl CertificateInfo {
    /// Classifies the issuer from the subject common name.
    #[must_use]
    pub fn issuer_class(&self) -> CertIssuer {
        match &self.common_name {
            Some(name) if name.contains(AMAZON_DOMAIN_SUFFIX) => CertIssuer::Amazon,
            _ => CertIssuer::NonAmazon,
        }
    }

    /// Returns the subject and issuer summary.
    #[must_use]
    pub fn summary(&self) -> CertificateSummary {
        CertificateSummary {
            subject: self.subject.clone(),
            issuer: self.issuer.clone(),
        }
    }
}

/// Parses a DER certificate and reads its names.
///
/// # Errors
///
/// Returns [`ProbeError::Tls`] when the certificate cannot be parsed.
pub fn inspect(der: &[u8]) -> Result<CertificateInfo, ProbeError> {
    let (_, cert) = X509Certificate::from_der(der)
        .map_err(|err| ProbeError::Tls(format!("invalid peer certificate: {err}")))?;
    let common_name = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .map(ToString::to_string);
    Ok(CertificateInfo {
        common_name,
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
    })
}

/// Inspects every certificate in a chain, leaf first.
///
/// # Errors
///
/// Returns [`ProbeError::Tls`] when any certificate cannot be parsed.
pub fn inspect_chain(chain: &[CertificateDer<'_>]) -> Result<Vec<CertificateInfo>, ProbeError> {
    chain.iter().map(|cert| inspect(cert)).collect()
}
