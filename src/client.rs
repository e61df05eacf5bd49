//! `async-imap` implementation of the transport seam
//!
//! Connects over plain TCP or upgrades with STARTTLS after the
//! greeting. Server NO/BAD responses become
//! [`CommandResult::Failed`]; everything else `async-imap` reports is
//! a transport error.

use crate::command::CommandResult;
use crate::config::{BenchConfig, Security};
use crate::error::{Error, Result};
use crate::folder::quote;
use crate::transport::{FetchSummary, SelectedFolder, Session, Transport};
use async_imap::types::{Fetch, Name, NameAttribute};
use futures::TryStreamExt;
use futures::io::{AsyncRead, AsyncWrite};
use rustls::pki_types::ServerName;
use std::fmt;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{debug, info};

/// Byte stream underneath a session, plain or TLS.
pub trait SessionStream: AsyncRead + AsyncWrite + Unpin + Send + fmt::Debug {}

impl<T> SessionStream for T where T: AsyncRead + AsyncWrite + Unpin + Send + fmt::Debug {}

type BoxedStream = Box<dyn SessionStream>;

/// Transport to a real IMAP server.
#[derive(Debug, Clone)]
pub struct ImapTransport {
    host: String,
    port: u16,
    security: Security,
}

impl ImapTransport {
    #[must_use]
    pub const fn new(host: String, port: u16, security: Security) -> Self {
        Self {
            host,
            port,
            security,
        }
    }

    #[must_use]
    pub fn from_config(config: &BenchConfig) -> Self {
        Self::new(config.host.clone(), config.port, config.security)
    }

    async fn start_tls(&self, tcp_stream: TcpStream) -> Result<BoxedStream> {
        let mut client = async_imap::Client::new(tcp_stream.compat());
        read_greeting(&mut client).await?;

        client
            .run_command_and_check_ok("STARTTLS", None)
            .await
            .map_err(|e| Error::Tls(format!("STARTTLS failed: {e}")))?;

        let connector = tls_connector()?;
        let server_name = ServerName::try_from(self.host.clone())
            .map_err(|e| Error::Tls(format!("Invalid server name: {e}")))?;

        let inner = client.into_inner().into_inner();
        let tls_stream = connector
            .connect(server_name, inner)
            .await
            .map_err(|e| Error::Tls(e.to_string()))?;

        Ok(Box::new(tls_stream.compat()))
    }
}

/// A connection that has received its greeting.
pub struct Greeted(async_imap::Client<BoxedStream>);

/// An authenticated `async-imap` session.
pub struct ImapSession(async_imap::Session<BoxedStream>);

impl Transport for ImapTransport {
    type Greeted = Greeted;
    type Session = ImapSession;

    async fn open(&self) -> Result<Greeted> {
        let addr = format!("{}:{}", self.host, self.port);
        debug!("Connecting to IMAP server at {}", addr);

        let tcp_stream = TcpStream::connect(&addr).await?;
        // Commands go out in several small writes and are timed.
        tcp_stream.set_nodelay(true)?;
        let client = match self.security {
            Security::Plain => {
                let stream: BoxedStream = Box::new(tcp_stream.compat());
                let mut client = async_imap::Client::new(stream);
                read_greeting(&mut client).await?;
                client
            }
            // The greeting is read on the plain stream before upgrading.
            Security::StartTls => async_imap::Client::new(self.start_tls(tcp_stream).await?),
        };

        Ok(Greeted(client))
    }

    async fn login(
        &self,
        greeted: Greeted,
        username: &str,
        password: &str,
    ) -> Result<CommandResult<ImapSession>> {
        let session = greeted
            .0
            .login(username, password)
            .await
            .map_err(|(e, _client)| e);

        if session.is_ok() {
            info!("Connected to IMAP server");
        }
        classify(session.map(ImapSession))
    }
}

impl Session for ImapSession {
    async fn list(&mut self, reference: &str, pattern: &str) -> Result<CommandResult<Vec<String>>> {
        let names = match self.0.list(Some(reference), Some(pattern)).await {
            Ok(stream) => stream.try_collect::<Vec<Name>>().await,
            Err(e) => Err(e),
        };
        classify(names.map(|names| listing_lines("LIST", &names)))
    }

    async fn lsub(&mut self, reference: &str, pattern: &str) -> Result<CommandResult<Vec<String>>> {
        let names = match self.0.lsub(Some(reference), Some(pattern)).await {
            Ok(stream) => stream.try_collect::<Vec<Name>>().await,
            Err(e) => Err(e),
        };
        classify(names.map(|names| listing_lines("LSUB", &names)))
    }

    async fn select(&mut self, folder: &str) -> Result<CommandResult<SelectedFolder>> {
        let mailbox = self.0.select(folder).await;
        classify(mailbox.map(|mailbox| SelectedFolder {
            exists: mailbox.exists,
        }))
    }

    async fn uid_search(&mut self, criteria: &str) -> Result<CommandResult<Vec<u32>>> {
        let uids = self.0.uid_search(criteria).await;
        classify(uids.map(|uids| {
            let mut uids: Vec<u32> = uids.into_iter().collect();
            uids.sort_unstable();
            uids
        }))
    }

    async fn uid_fetch(
        &mut self,
        uid_set: &str,
        items: &str,
    ) -> Result<CommandResult<FetchSummary>> {
        let summary = match self.0.uid_fetch(uid_set, items).await {
            Ok(stream) => {
                stream
                    .try_fold(FetchSummary::default(), |mut summary, fetch| async move {
                        summary.messages += 1;
                        summary.bytes += fetched_bytes(&fetch);
                        Ok(summary)
                    })
                    .await
            }
            Err(e) => Err(e),
        };
        classify(summary)
    }

    async fn logout(&mut self) -> Result<CommandResult<()>> {
        let result = self.0.logout().await;
        classify(result)
    }
}

/// RFC822.SIZE when the server sent it, else the body length.
fn fetched_bytes(fetch: &Fetch) -> u64 {
    if let Some(size) = fetch.size {
        return u64::from(size);
    }
    fetch
        .body()
        .map_or(0, |body| u64::try_from(body.len()).unwrap_or(u64::MAX))
}

/// Split an `async-imap` result into server verdict and transport error.
fn classify<T>(result: async_imap::error::Result<T>) -> Result<CommandResult<T>> {
    use async_imap::error::Error as ImapError;

    match result {
        Ok(payload) => Ok(CommandResult::Ok(payload)),
        Err(ImapError::No(reason) | ImapError::Bad(reason)) => Ok(CommandResult::Failed(reason)),
        Err(ImapError::Io(e)) => Err(Error::Io(e)),
        Err(e) => Err(Error::Imap(e.to_string())),
    }
}

async fn read_greeting<T>(client: &mut async_imap::Client<T>) -> Result<()>
where
    T: AsyncRead + AsyncWrite + Unpin + Send + fmt::Debug,
{
    match client.read_response().await {
        Ok(Some(_greeting)) => Ok(()),
        Ok(None) => Err(Error::Imap("Connection closed before greeting".into())),
        Err(e) => Err(Error::Imap(format!("Failed to read greeting: {e}"))),
    }
}

/// Render parsed LIST/LSUB names back into raw listing lines.
///
/// Each line is `(<attributes>) <delimiter> <name>`; a completion line
/// closes the listing.
fn listing_lines(kind: &str, names: &[Name]) -> Vec<String> {
    let mut lines: Vec<String> = names
        .iter()
        .map(|name| {
            let attributes: Vec<String> = name.attributes().iter().map(attribute_str).collect();
            let delimiter = name.delimiter().map_or_else(|| "NIL".to_string(), quote);
            format!(
                "({}) {delimiter} {}",
                attributes.join(" "),
                quote(name.name())
            )
        })
        .collect();
    lines.push(format!("{kind} completed"));
    lines
}

fn attribute_str(attribute: &NameAttribute<'_>) -> String {
    match attribute {
        NameAttribute::NoSelect => "\\Noselect".to_string(),
        NameAttribute::NoInferiors => "\\Noinferiors".to_string(),
        NameAttribute::Extension(name) => name.to_string(),
        other => format!("\\{other:?}"),
    }
}

/// Build a TLS connector that accepts all certificates.
///
/// Benchmark targets commonly run with self-signed certificates, so
/// verification is skipped entirely.
fn tls_connector() -> Result<TlsConnector> {
    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| Error::Tls(e.to_string()))?
    .dangerous()
    .with_custom_certificate_verifier(Arc::new(AcceptAnyCert))
    .with_no_client_auth();
    Ok(TlsConnector::from(Arc::new(config)))
}

/// Certificate verifier that accepts all certificates.
#[derive(Debug)]
struct AcceptAnyCert;

impl rustls::client::danger::ServerCertVerifier for AcceptAnyCert {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
