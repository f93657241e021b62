// crates/frontline-probes/src/tls.rs
// ============================================================================
// Module: Raw TLS Client
// Description: Async TLS connections with certificate verification disabled.
// Purpose: Expose negotiated session details and the peer chain to probes.
// Dependencies: rustls, rustls-pki-types, tokio, tokio-rustls
// ============================================================================

//! ## Overview
//! Fingerprinting must work against self-signed and third-party certificates,
//! so chain validation is skipped. Handshake signatures are still verified
//! with the provider's algorithms, so the peer must hold the key for the
//! certificate it presents.
//!
//! Every socket operation is an awaited future bounded by the configured
//! timeouts, so dropping the probe future closes the connection at once.
//!
//! Security posture: the peer is untrusted; nothing read from it is trusted
//! beyond its use as fingerprint evidence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::IpAddr;
use std::net::SocketAddr;
use std::sync::Arc;

use frontline_core::ProbeError;
use rustls::CipherSuite;
use rustls::ClientConfig;
use rustls::ClientConnection;
use rustls::DigitallySignedStruct;
use rustls::ProtocolVersion;
use rustls::SignatureScheme;
use rustls::client::danger::HandshakeSignatureValid;
use rustls::client::danger::ServerCertVerified;
use rustls::client::danger::ServerCertVerifier;
use rustls::crypto::WebPkiSupportedAlgorithms;
use rustls::crypto::verify_tls12_signature;
use rustls::crypto::verify_tls13_signature;
use rustls_pki_types::CertificateDer;
use rustls_pki_types::ServerName;
use rustls_pki_types::UnixTime;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream as ClientTlsStream;

use crate::network::ProbeNetworkConfig;

// ============================================================================
// SECTION: Session Summary
// ============================================================================

/// TLS client stream over a TCP socket.
pub type TlsStream = ClientTlsStream<TcpStream>;

/// Negotiated session details captured after the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSession {
    /// Protocol version label such as `TLS 1.3`.
    pub protocol_version: String,
    /// Cipher suite label.
    pub cipher_suite: String,
    /// Peer certificate chain in DER form, leaf first.
    pub peer_certificates: Vec<CertificateDer<'static>>,
}

impl TlsSession {
    /// Returns the leaf certificate.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Tls`] when the peer sent no certificate.
    pub fn leaf(&self) -> Result<&CertificateDer<'static>, ProbeError> {
        self.peer_certificates
            .first()
            .ok_or_else(|| ProbeError::Tls("peer presented no certificate".to_string()))
    }
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Accepts any certificate chain while still checking handshake signatures.
#[derive(Debug)]
struct AcceptAnyCertificate {
    /// Signature algorithms of the active crypto provider.
    algorithms: WebPkiSupportedAlgorithms,
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}

/// Builds a client configuration that skips certificate chain validation.
///
/// # Errors
///
/// Returns [`ProbeError::Tls`] when the crypto provider rejects the defaults.
pub fn insecure_client_config() -> Result<Arc<ClientConfig>, ProbeError> {
    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let verifier = AcceptAnyCertificate {
        algorithms: provider.signature_verification_algorithms,
    };
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|err| ProbeError::Tls(err.to_string()))?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(verifier))
        .with_no_client_auth();
    Ok(Arc::new(config))
}

// ============================================================================
// SECTION: Connect
// ============================================================================

/// Opens a TLS connection to `address`, presenting `host` for SNI.
///
/// The TCP connect is bounded by the connect timeout and the handshake by the
/// I/O timeout.
///
/// # Errors
///
/// Returns [`ProbeError::Connect`] when TCP fails or times out and
/// [`ProbeError::Tls`] when the handshake fails or times out.
pub async fn connect_insecure(
    host: &str,
    address: SocketAddr,
    client_config: &Arc<ClientConfig>,
    network: &ProbeNetworkConfig,
) -> Result<(TlsStream, TlsSession), ProbeError> {
    let server_name = ServerName::try_from(host.to_string())
        .map_err(|err| ProbeError::Tls(format!("invalid server name {host}: {err}")))?;
    let tcp = timeout(network.connect_timeout(), TcpStream::connect(address))
        .await
        .map_err(|_| {
            ProbeError::Connect(format!(
                "{address}: connect timed out after {} ms",
                network.connect_timeout_ms
            ))
        })?
        .map_err(|err| ProbeError::Connect(format!("{address}: {err}")))?;
    let connector = TlsConnector::from(Arc::clone(client_config));
    let stream = timeout(network.io_timeout(), connector.connect(server_name, tcp))
        .await
        .map_err(|_| {
            ProbeError::Tls(format!(
                "{address}: handshake timed out after {} ms",
                network.io_timeout_ms
            ))
        })?
        .map_err(|err| ProbeError::Tls(err.to_string()))?;

    let session = session_summary(stream.get_ref().1);
    Ok((stream, session))
}

/// Reads negotiated parameters from a completed handshake.
fn session_summary(conn: &ClientConnection) -> TlsSession {
    TlsSession {
        protocol_version: conn.protocol_version().map_or("Unknown", version_label).to_string(),
        cipher_suite: conn
            .negotiated_cipher_suite()
            .map_or("Unknown", |suite| cipher_suite_label(suite.suite()))
            .to_string(),
        peer_certificates: conn
            .peer_certificates()
            .map(|chain| chain.iter().map(|cert| cert.clone().into_owned()).collect())
            .unwrap_or_default(),
    }
}

/// Connects to the first reachable address, trying each in resolver order.
///
/// # Errors
///
/// Returns the last connection error when no address succeeds, or
/// [`ProbeError::Connect`] when `addresses` is empty.
pub async fn connect_any(
    host: &str,
    addresses: &[IpAddr],
    port: u16,
    client_config: &Arc<ClientConfig>,
    network: &ProbeNetworkConfig,
) -> Result<(TlsStream, TlsSession), ProbeError> {
    let mut last_error: Option<ProbeError> = None;
    for ip in addresses {
        match connect_insecure(host, SocketAddr::new(*ip, port), client_config, network).await {
            Ok(connected) => return Ok(connected),
            Err(err) => last_error = Some(err),
        }
    }
    Err(last_error
        .unwrap_or_else(|| ProbeError::Connect(format!("no addresses to connect for {host}"))))
}

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Returns a display label for a negotiated protocol version.
#[must_use]
pub const fn version_label(version: ProtocolVersion) -> &'static str {
    match version {
        ProtocolVersion::TLSv1_3 => "TLS 1.3",
        ProtocolVersion::TLSv1_2 => "TLS 1.2",
        ProtocolVersion::TLSv1_1 => "TLS 1.1",
        ProtocolVersion::TLSv1_0 => "TLS 1.0",
        _ => "Unknown",
    }
}

/// Returns the IANA name for a negotiated cipher suite.
#[must_use]
pub const fn cipher_suite_label(suite: CipherSuite) -> &'static str {
    match suite {
        CipherSuite::TLS13_AES_128_GCM_SHA256 => "TLS_AES_128_GCM_SHA256",
        CipherSuite::TLS13_AES_256_GCM_SHA384 => "TLS_AES_256_GCM_SHA384",
        CipherSuite::TLS13_CHACHA20_POLY1305_SHA256 => "TLS_CHACHA20_POLY1305_SHA256",
        CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256 => {
            "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256"
        }
        CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384 => {
            "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"
        }
        CipherSuite::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256 => {
            "TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256"
        }
        CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256 => {
            "TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256"
        }
        CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384 => {
            "TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384"
        }
        CipherSuite::TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256 => {
            "TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256"
        }
        _ => "Unknown",
    }
}
