// crates/frontline-probes/tests/common/mod.rs
// ============================================================================
// Module: Common Probe Fixtures
// Description: Fixed-answer resolver and a loopback TLS server.
// Purpose: Exercise the built-in probes without touching the public network.
// Dependencies: frontline-probes, rcgen, rustls
// ============================================================================

//! ## Overview
//! [`FakeResolver`] answers from in-memory tables. [`TlsTestServer`] accepts
//! any number of loopback TLS connections, records each request head, and
//! answers every connection with the same canned response.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::io::Read;
use std::io::Write;
use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use async_trait::async_trait;
use frontline_core::Target;
use frontline_probes::DnsError;
use frontline_probes::DnsResolver;
use frontline_probes::ProbeNetworkConfig;
use rcgen::CertificateParams;
use rcgen::DistinguishedName;
use rcgen::DnType;
use rcgen::KeyPair;
use rustls::ServerConfig;
use rustls::ServerConnection;
use rustls::StreamOwned;
use rustls::pki_types::PrivateKeyDer;
use rustls::pki_types::PrivatePkcs8KeyDer;

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Loopback address used by every TLS fixture.
pub const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

#[derive(Default)]
pub struct FakeResolver {
    addresses: BTreeMap<String, Vec<IpAddr>>,
    cnames: BTreeMap<String, Result<Option<String>, DnsError>>,
    ptr: BTreeMap<IpAddr, Result<Vec<String>, DnsError>>,
}

impl FakeResolver {
    pub fn with_addresses(mut self, host: &str, addresses: Vec<IpAddr>) -> Self {
        self.addresses.insert(host.to_string(), addresses);
        self
    }

    pub fn with_cname(mut self, host: &str, result: Result<Option<String>, DnsError>) -> Self {
        self.cnames.insert(host.to_string(), result);
        self
    }

    pub fn with_ptr(mut self, address: IpAddr, result: Result<Vec<String>, DnsError>) -> Self {
        self.ptr.insert(address, result);
        self
    }

    pub fn shared(self) -> Arc<dyn DnsResolver> {
        Arc::new(self)
    }
}

#[async_trait]
impl DnsResolver for FakeResolver {
    async fn canonical_name(&self, host: &str) -> Result<Option<String>, DnsError> {
        self.cnames.get(host).cloned().unwrap_or(Ok(None))
    }

    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, DnsError> {
        self.addresses.get(host).cloned().ok_or_else(|| DnsError::NoRecords(host.to_string()))
    }

    async fn reverse_lookup(&self, address: IpAddr) -> Result<Vec<String>, DnsError> {
        self.ptr
            .get(&address)
            .cloned()
            .unwrap_or_else(|| Err(DnsError::NoRecords(address.to_string())))
    }
}

pub fn target(host: &str) -> Target {
    Target::new(host).unwrap()
}

// ============================================================================
// SECTION: TLS Server
// ============================================================================

pub struct TlsTestServer {
    pub port: u16,
    requests: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl TlsTestServer {
    /// Starts a server whose certificate carries `common_name` and a
    /// `localhost` subject alternative name.
    pub fn start(common_name: &str, response: &'static [u8]) -> Self {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
        let mut name = DistinguishedName::new();
        name.push(DnType::CommonName, common_name);
        params.distinguished_name = name;
        let cert = params.self_signed(&key).unwrap();
        let key_der = PrivateKeyDer::from(PrivatePkcs8KeyDer::from(key.serialize_der()));
        let config = ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(vec![cert.der().clone()], key_der)
            .unwrap();
        let config = Arc::new(config);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for tcp in listener.incoming() {
                let Ok(tcp) = tcp else { break };
                let config = Arc::clone(&config);
                let recorded = Arc::clone(&recorded);
                thread::spawn(move || {
                    let conn = ServerConnection::new(config).unwrap();
                    let mut stream = StreamOwned::new(conn, tcp);
                    let request = read_request(&mut stream);
                    if request.is_empty() {
                        return;
                    }
                    recorded.lock().unwrap().push(request);
                    let _ = stream.write_all(response);
                    stream.conn.send_close_notify();
                    let _ = stream.flush();
                });
            }
        });

        Self {
            port,
            requests,
        }
    }

    pub fn network(&self) -> ProbeNetworkConfig {
        ProbeNetworkConfig {
            https_port: self.port,
            connect_timeout_ms: 2_000,
            io_timeout_ms: 2_000,
            ..ProbeNetworkConfig::default()
        }
    }

    pub fn requests(&self) -> Vec<Vec<u8>> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut impl Read) -> Vec<u8> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(read) => request.extend_from_slice(&buf[.. read]),
        }
    }
    request
}
