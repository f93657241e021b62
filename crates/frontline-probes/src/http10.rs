// crates/frontline-probes/src/http10.rs
// ============================================================================
// Module: HTTP/1.0 Probe
// Description: Minimal `GET / HTTP/1.0` request over a raw TLS stream.
// Purpose: Observe how fronting proxies answer a request without a Host header.
// Dependencies: frontline-core, async-trait, rustls, tokio, tokio-rustls
// ============================================================================

//! ## Overview
//! The request line is sent verbatim with no headers at all. CDN-fronted
//! endpoints answer this differently from direct regional endpoints, which
//! makes the `Server` header of the reply a useful discriminator. All socket
//! work is async, so a probe cancelled at its timeout releases its connection
//! immediately.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use frontline_core::Evidence;
use frontline_core::Http10Evidence;
use frontline_core::Probe;
use frontline_core::ProbeError;
use frontline_core::ProbeId;
use frontline_core::Target;
use rustls::ClientConfig;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

use crate::dns::DnsResolver;
use crate::dns::resolve_addresses;
use crate::headers::parse_response_head;
use crate::headers::read_response_head;
use crate::network::ProbeNetworkConfig;
use crate::tls::connect_any;
use crate::tls::insecure_client_config;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Literal request bytes: request line and the terminating blank line only.
pub const HTTP10_REQUEST: &[u8] = b"GET / HTTP/1.0\r\n\r\n";

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Raw HTTP/1.0 probe.
pub struct Http10Probe {
    /// Resolver used to find the target's addresses.
    resolver: Arc<dyn DnsResolver>,
    /// Socket limits.
    network: ProbeNetworkConfig,
    /// TLS client configuration without certificate validation.
    client_config: Arc<ClientConfig>,
}

impl Http10Probe {
    /// Creates an HTTP/1.0 probe.
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
}

#[async_trait]
impl Probe for Http10Probe {
    fn id(&self) -> ProbeId {
        ProbeId::Http10
    }

    async fn collect(&self, target: &Target) -> Result<Evidence, ProbeError> {
        let host = target.hostname();
        let addresses = resolve_addresses(self.resolver.as_ref(), host)
            .await
            .map_err(|err| ProbeError::Dns(err.to_string()))?;
        request_http10(host, &addresses, &self.client_config, &self.network).await
    }
}

/// Sends the raw request and parses the response head.
async fn request_http10(
    host: &str,
    addresses: &[IpAddr],
    client_config: &Arc<ClientConfig>,
    network: &ProbeNetworkConfig,
) -> Result<Evidence, ProbeError> {
    let (mut stream, _session) =
        connect_any(host, addresses, network.https_port, client_config, network).await?;
    let exchange = async {
        stream.write_all(HTTP10_REQUEST).await?;
        stream.flush().await
    };
    timeout(network.io_timeout(), exchange)
        .await
        .map_err(|_| ProbeError::Http("request write timed out".to_string()))?
        .map_err(|err| ProbeError::Http(err.to_string()))?;
    let raw = timeout(
        network.io_timeout(),
        read_response_head(&mut stream, network.max_response_head_bytes),
    )
    .await
    .map_err(|_| {
        ProbeError::Http(format!("no response head within {} ms", network.io_timeout_ms))
    })??;
    let head = parse_response_head(&raw)?;
    Ok(Evidence::Http10(Http10Evidence {
        status: head.status,
        headers: head.headers,
    }))
}
