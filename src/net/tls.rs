//! TLS configuration and certificate loading.

use std::path::Path;
use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsConfig;

/// Error loading TLS material.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("Certificate file not found: {0}")]
    MissingCertificate(String),

    #[error("Private key file not found: {0}")]
    MissingKey(String),

    #[error("Could not load TLS certificate/key: {0}")]
    Load(#[from] std::io::Error),
}

/// Load a rustls server configuration from PEM certificate and key files.
pub async fn load_tls_config(tls: &TlsConfig) -> Result<RustlsConfig, TlsError> {
    let cert_path = Path::new(&tls.cert_file);
    let key_path = Path::new(&tls.key_file);

    if !cert_path.exists() {
        return Err(TlsError::MissingCertificate(tls.cert_file.clone()));
    }
    if !key_path.exists() {
        return Err(TlsError::MissingKey(tls.key_file.clone()));
    }

    Ok(RustlsConfig::from_pem_file(cert_path, key_path).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_files_are_reported() {
        let tls = TlsConfig::new("/nonexistent/cert.pem", "/nonexistent/key.pem");
        let err = load_tls_config(&tls).await.unwrap_err();
        assert!(matches!(err, TlsError::MissingCertificate(path) if path == "/nonexistent/cert.pem"));
    }

    #[tokio::test]
    async fn garbage_pem_fails_to_load() {
        let dir = std::env::temp_dir();
        let cert = dir.join(format!("proxy-gateway-cert-{}.pem", std::process::id()));
        let key = dir.join(format!("proxy-gateway-key-{}.pem", std::process::id()));
        std::fs::write(&cert, "not a certificate").unwrap();
        std::fs::write(&key, "not a key").unwrap();

        let tls = TlsConfig::new(cert.to_string_lossy(), key.to_string_lossy());
        let result = load_tls_config(&tls).await;
        let _ = std::fs::remove_file(&cert);
        let _ = std::fs::remove_file(&key);

        assert!(matches!(result, Err(TlsError::Load(_))));
    }
}
