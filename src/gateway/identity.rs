use std::fs;
use std::path::{Path, PathBuf};

use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::{Signature, SigningKey};
use p256::pkcs8::DecodePrivateKey;
use prost::Message;
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{CertificateDer, PrivatePkcs8KeyDer};

use crate::gateway::error::IdentityError;
use crate::gateway::proto::SerializedIdentity;

/// Client identity presented to the gateway: MSP id plus the PEM-encoded
/// X.509 certificate.
#[derive(Debug, Clone)]
pub struct Identity {
    msp_id: String,
    credentials: Vec<u8>,
}

impl Identity {
    pub fn new(msp_id: impl Into<String>, credentials: Vec<u8>) -> Self {
        Identity {
            msp_id: msp_id.into(),
            credentials,
        }
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    /// Protobuf `SerializedIdentity`, used as the creator of every
    /// transaction and commit status request.
    pub fn serialize(&self) -> Vec<u8> {
        SerializedIdentity {
            mspid: self.msp_id.clone(),
            id_bytes: self.credentials.clone(),
        }
        .encode_to_vec()
    }
}

/// ECDSA P-256 signer over SHA-256 digests.
pub struct Signer {
    key: SigningKey,
}

impl Signer {
    pub fn new(key: SigningKey) -> Self {
        Signer { key }
    }

    /// DER-encoded signature with a low S value, as the peers require.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature: Signature = self.key.sign(message);
        let signature = signature.normalize_s().unwrap_or(signature);
        signature.to_der().as_bytes().to_vec()
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, IdentityError> {
    fs::read(path).map_err(|source| IdentityError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a PEM certificate, returning the file contents once they parse.
pub fn load_certificate(path: &Path) -> Result<Vec<u8>, IdentityError> {
    let pem = read_file(path)?;
    CertificateDer::from_pem_slice(&pem).map_err(|source| IdentityError::Certificate {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(pem)
}

pub fn new_identity(msp_id: &str, cert_path: &Path) -> Result<Identity, IdentityError> {
    let certificate = load_certificate(cert_path)?;
    Ok(Identity::new(msp_id, certificate))
}

/// Picks the signing key out of a key store directory.
///
/// Entries are tried in file name order and the first PKCS#8 P-256 key wins.
/// Anything else in the directory is skipped.
pub fn new_signer(key_dir: &Path) -> Result<Signer, IdentityError> {
    let entries = fs::read_dir(key_dir).map_err(|source| IdentityError::Read {
        path: key_dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    candidates.sort();

    let mut chosen: Option<(PathBuf, SigningKey)> = None;
    for path in candidates {
        match parse_private_key(&path) {
            Ok(key) if chosen.is_none() => chosen = Some((path, key)),
            Ok(_) => log::warn!(
                "Ignoring additional private key {} in {}",
                path.display(),
                key_dir.display()
            ),
            Err(reason) => log::debug!("Skipping {}: {}", path.display(), reason),
        }
    }

    match chosen {
        Some((path, key)) => {
            log::info!("Using private key {}", path.display());
            Ok(Signer::new(key))
        }
        None => Err(IdentityError::NoPrivateKey {
            dir: key_dir.to_path_buf(),
        }),
    }
}

fn parse_private_key(path: &Path) -> Result<SigningKey, String> {
    let pem = fs::read(path).map_err(|e| e.to_string())?;
    let der = PrivatePkcs8KeyDer::from_pem_slice(&pem).map_err(|e| e.to_string())?;
    SigningKey::from_pkcs8_der(der.secret_pkcs8_der()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::signature::Verifier;
    use p256::ecdsa::VerifyingKey;
    use p256::pkcs8::{EncodePrivateKey, LineEnding};
    use rand::rngs::OsRng;

    fn write_key(dir: &Path, name: &str) -> SigningKey {
        let key = SigningKey::random(&mut OsRng);
        let pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();
        fs::write(dir.join(name), pem.as_bytes()).unwrap();
        key
    }

    #[test]
    fn signer_uses_first_valid_key_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("0_readme.txt"), "not a key").unwrap();
        let expected = write_key(dir.path(), "a_sk");
        write_key(dir.path(), "b_sk");

        let signer = new_signer(dir.path()).unwrap();
        let signature = signer.sign(b"payload");

        let signature = Signature::from_der(&signature).unwrap();
        VerifyingKey::from(&expected)
            .verify(b"payload", &signature)
            .unwrap();
        assert!(signature.normalize_s().is_none());
    }

    #[test]
    fn signer_fails_when_directory_has_no_key() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cert.pem"), "garbage").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let err = new_signer(dir.path()).err().unwrap();
        assert!(matches!(err, IdentityError::NoPrivateKey { .. }));
    }

    #[test]
    fn signer_fails_when_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = new_signer(&dir.path().join("keystore")).err().unwrap();
        assert!(matches!(err, IdentityError::Read { .. }));
    }

    #[test]
    fn certificate_must_be_pem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cert.pem");
        fs::write(&path, "definitely not pem").unwrap();

        let err = load_certificate(&path).unwrap_err();
        assert!(matches!(err, IdentityError::Certificate { .. }));
    }

    #[test]
    fn serialized_identity_carries_msp_and_certificate() {
        let identity = Identity::new("Org1MSP", b"-----BEGIN CERTIFICATE-----".to_vec());
        let decoded = SerializedIdentity::decode(identity.serialize().as_slice()).unwrap();
        assert_eq!(decoded.mspid, "Org1MSP");
        assert_eq!(decoded.id_bytes, b"-----BEGIN CERTIFICATE-----");
    }
}
