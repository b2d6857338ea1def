//! WebSocket connection setup.
//!
//! TLS connections accept any server certificate. FunASR deployments
//! commonly run with self-signed certificates, so the client trusts the
//! configured host regardless of identity. Handshake signatures are still
//! checked against the presented certificate; only chain and hostname
//! validation are skipped. Integrators who need server authentication must
//! not use `ssl` mode as-is.

use crate::error::{FunasrError, Result};
use crate::session::SessionConfig;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::{Connector, MaybeTlsStream, WebSocketStream, connect_async_tls_with_config};
use tracing::{info, warn};

/// An open connection to the server.
pub type Connection = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Certificate verifier that trusts every server certificate.
#[derive(Debug)]
struct AcceptAnyCertificate {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// rustls client config with certificate verification disabled.
pub fn insecure_tls_config() -> Result<ClientConfig> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate { provider }))
        .with_no_client_auth();
    Ok(config)
}

/// Open a WebSocket connection for the session.
pub async fn connect(config: &SessionConfig) -> Result<Connection> {
    let uri = config.uri();

    let connector = if config.ssl {
        warn!(
            host = %config.host,
            "TLS certificate verification is disabled for this connection"
        );
        Some(Connector::Rustls(Arc::new(insecure_tls_config()?)))
    } else {
        None
    };

    info!(uri = %uri, "connecting");
    let (stream, _response) = connect_async_tls_with_config(uri.as_str(), None, false, connector)
        .await
        .map_err(|e| FunasrError::Connection {
            uri: uri.clone(),
            message: e.to_string(),
        })?;
    info!(uri = %uri, "connected");

    Ok(stream)
}
