// crates/frontline-probes/src/http.rs
// ============================================================================
// Module: HTTPS Probe
// Description: HTTP/1.1 GET over TLS plus address and certificate inspection.
// Purpose: Collect response headers, address fan-out, and issuer evidence.
// Dependencies: frontline-core, async-trait, reqwest, rustls, tokio-rustls
// ============================================================================

//! ## Overview
//! The probe issues one GET with certificate validation disabled and follows
//! redirects. It then resolves the final response host, partitions the
//! addresses by family, and opens a second raw TLS connection to the target to
//! read the leaf certificate. Only the first value of each response header is
//! kept.
//!
//! Security posture: the target is untrusted; the response body is never read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use frontline_core::CertIssuer;
use frontline_core::CertificateSummary;
use frontline_core::Evidence;
use frontline_core::HttpEvidence;
use frontline_core::Probe;
use frontline_core::ProbeError;
use frontline_core::ProbeId;
use frontline_core::Target;
use frontline_core::TlsDetails;
use frontline_core::canonical_header_name;
use reqwest::Client;
use reqwest::Response;
use rustls::ClientConfig;

use crate::certificate::CertificateInfo;
use crate::certificate::inspect;
use crate::certificate::inspect_chain;
use crate::dns::DnsResolver;
use crate::dns::resolve_addresses;
use crate::network::ProbeNetworkConfig;
use crate::tls::connect_any;
use crate::tls::insecure_client_config;

// ============================================================================
// SECTION: Probe
// ============================================================================

/// HTTPS probe.
pub struct HttpProbe {
    /// Resolver used for address lookups and request pinning.
    resolver: Arc<dyn DnsResolver>,
    /// Socket limits.
    network: ProbeNetworkConfig,
    /// TLS client configuration for the certificate connection.
    client_config: Arc<ClientConfig>,
}

impl HttpProbe {
    /// Creates an HTTPS probe.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Tls`] when the TLS client cannot be configured.
    pub fn new(
        resolver: Arc<dyn DnsResolver>,
        network: ProbeNetworkConfig,
    ) -> Result<Self, ProbeError> {
        Ok(Self {
            resolver,
            network,
            client_config: insecure_client_config()?,
        })
    }

    /// Sends the GET request with resolution pinned to `addresses`.
    async fn fetch(&self, host: &str, addresses: &[IpAddr]) -> Result<Response, ProbeError> {
        let port = self.network.https_port;
        let url = request_url(host, port);
        let mut builder = Client::builder()
            .danger_accept_invalid_certs(true)
            .http1_only()
            .connect_timeout(self.network.connect_timeout())
            .timeout(self.network.connect_timeout() + self.network.io_timeout())
            .user_agent(self.network.user_agent.clone());
        if host.parse::<IpAddr>().is_err() {
            let pinned: Vec<SocketAddr> =
                addresses.iter().map(|ip| SocketAddr::new(*ip, port)).collect();
            builder = builder.resolve_to_addrs(host, &pinned);
        }
        let client = builder.build().map_err(|err| ProbeError::Http(err.to_string()))?;
        client.get(url).send().await.map_err(|err| {
            if err.is_connect() {
                ProbeError::Connect(err.to_string())
            } else if err.is_timeout() {
                ProbeError::Timeout(self.network.connect_timeout() + self.network.io_timeout())
            } else {
                ProbeError::Http(err.to_string())
            }
        })
    }

    /// Reads the peer chain over a separate raw TLS connection.
    async fn inspect_certificate(
        &self,
        host: &str,
        addresses: &[IpAddr],
    ) -> Result<(CertIssuer, TlsDetails), ProbeError> {
        let (_stream, session) = connect_any(
            host,
            addresses,
            self.network.https_port,
            &self.client_config,
            &self.network,
        )
        .await?;

        let issuer = inspect(session.leaf()?)?.issuer_class();
        let certificates: Vec<CertificateSummary> =
            inspect_chain(&session.peer_certificates)?
                .iter()
                .map(CertificateInfo::summary)
                .collect();
        let tls = TlsDetails {
            protocol_version: session.protocol_version,
            cipher_suite: session.cipher_suite,
            certificates,
        };
        Ok((issuer, tls))
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn id(&self) -> ProbeId {
        ProbeId::Http
    }

    async fn collect(&self, target: &Target) -> Result<Evidence, ProbeError> {
        let host = target.hostname();
        let addresses = resolve_addresses(self.resolver.as_ref(), host)
            .await
            .map_err(|err| ProbeError::Dns(err.to_string()))?;

        let response = self.fetch(host, &addresses).await?;
        let final_host = response.url().host_str().map_or(host, unbracket).to_string();
        let headers = first_header_values(&response);
        drop(response);

        let final_addresses = resolve_addresses(self.resolver.as_ref(), &final_host)
            .await
            .map_err(|err| ProbeError::Dns(err.to_string()))?;
        let (ipv4, ipv6) = partition_addresses(&final_addresses);

        let (cert_issuer, tls) = self.inspect_certificate(host, &addresses).await?;
        Ok(Evidence::Http(HttpEvidence {
            final_host,
            ipv4,
            ipv6,
            cert_issuer,
            headers,
            tls,
        }))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the request URL, bracketing IPv6 literals and omitting port 443.
pub(crate) fn request_url(host: &str, port: u16) -> String {
    let authority = match host.parse::<IpAddr>() {
        Ok(IpAddr::V6(v6)) => format!("[{v6}]"),
        _ => host.to_string(),
    };
    if port == 443 { format!("https://{authority}/") } else { format!("https://{authority}:{port}/") }
}

/// Strips the brackets URL syntax puts around IPv6 literals.
pub(crate) fn unbracket(host: &str) -> &str {
    host.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')).unwrap_or(host)
}

/// Collects the first value of every response header under its canonical name.
fn first_header_values(response: &Response) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    for (name, value) in response.headers() {
        headers
            .entry(canonical_header_name(name.as_str()))
            .or_insert_with(|| String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    headers
}

/// Splits addresses into IPv4 and IPv6 lists, preserving order.
fn partition_addresses(addresses: &[IpAddr]) -> (Vec<Ipv4Addr>, Vec<Ipv6Addr>) {
    let mut ipv4 = Vec::new();
    let mut ipv6 = Vec::new();
    for address in addresses {
        match address {
            IpAddr::V4(v4) => ipv4.push(*v4),
            IpAddr::V6(v6) => ipv6.push(*v6),
        }
    }
    (ipv4, ipv6)
}
