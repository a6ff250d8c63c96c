//! End-to-end request signing and verification with real ed25519 keys.
//!
//! The library never touches key material itself; these tests inject an
//! ed25519 signer/verifier pair and a canned domain resolver, mirroring how
//! a wallet would wire the crate up.

use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use sep7_lib::{
    parse_sep7_uri, DomainMetadata, DomainResolver, PayRequestBuilder, PaymentBlueprint,
    RequestSigner, Result, Sep7Error, Sep7Uri, SignatureVerifier,
};

struct Ed25519Signer(SigningKey);

impl Ed25519Signer {
    fn from_seed(seed: u8) -> Self {
        Self(SigningKey::from_bytes(&[seed; 32]))
    }

    fn public_key_hex(&self) -> String {
        hex::encode(self.0.verifying_key().to_bytes())
    }
}

impl RequestSigner for Ed25519Signer {
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        Ok(self.0.sign(payload).to_bytes().to_vec())
    }
}

struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, signing_key: &str, payload: &[u8], signature: &[u8]) -> Result<bool> {
        let raw = hex::decode(signing_key).map_err(|e| Sep7Error::Signing(e.to_string()))?;
        let raw: [u8; 32] = raw
            .as_slice()
            .try_into()
            .map_err(|_| Sep7Error::Signing("signing key must be 32 bytes".to_string()))?;
        let key =
            VerifyingKey::from_bytes(&raw).map_err(|e| Sep7Error::Signing(e.to_string()))?;
        let signature =
            Signature::try_from(signature).map_err(|e| Sep7Error::Signing(e.to_string()))?;
        Ok(key.verify(payload, &signature).is_ok())
    }
}

/// Serves one domain's metadata, faults on everything else.
struct TableResolver {
    domain: &'static str,
    metadata: DomainMetadata,
}

impl TableResolver {
    fn serving_key(domain: &'static str, key: String) -> Self {
        Self {
            domain,
            metadata: DomainMetadata {
                uri_request_signing_key: Some(key),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl DomainResolver for TableResolver {
    async fn resolve(&self, domain: &str) -> Result<DomainMetadata> {
        if domain == self.domain {
            Ok(self.metadata.clone())
        } else {
            Err(Sep7Error::Resolver(format!("unknown domain {domain}")))
        }
    }
}

fn signed_request(signer: &Ed25519Signer) -> Sep7Uri {
    Sep7Uri::parse("web+stellar:pay?destination=GABC&amount=10&origin_domain=example.com")
        .unwrap()
        .sign(signer)
        .unwrap()
}

#[tokio::test]
async fn signed_request_verifies_against_its_origin_domain() {
    let signer = Ed25519Signer::from_seed(7);
    let resolver = TableResolver::serving_key("example.com", signer.public_key_hex());
    let signed = signed_request(&signer);

    assert!(signed.verify_signature(&resolver, &Ed25519Verifier).await);
}

#[tokio::test]
async fn verification_survives_a_serialization_round_trip() {
    let signer = Ed25519Signer::from_seed(7);
    let resolver = TableResolver::serving_key("example.com", signer.public_key_hex());

    let request = PayRequestBuilder::new(PaymentBlueprint {
        destination: "GABC".to_string(),
        amount: Some("10".to_string()),
        asset: None,
        memo: None,
    })
    .set("origin_domain", "example.com")
    .build()
    .unwrap();

    let signed = request.sign(&signer).unwrap();
    let reparsed = parse_sep7_uri(&signed.to_string()).unwrap();
    assert!(
        reparsed
            .uri()
            .verify_signature(&resolver, &Ed25519Verifier)
            .await
    );
}

#[tokio::test]
async fn tampering_after_signing_breaks_verification() {
    let signer = Ed25519Signer::from_seed(7);
    let resolver = TableResolver::serving_key("example.com", signer.public_key_hex());
    let signed = signed_request(&signer);

    // Flip a parameter byte post-signing: same signature, different payload.
    let tampered = signed.to_string().replace("amount=10", "amount=99");
    let tampered = Sep7Uri::parse(&tampered).unwrap();
    assert_eq!(tampered.signature(), signed.signature());
    assert!(!tampered.verify_signature(&resolver, &Ed25519Verifier).await);
}

#[tokio::test]
async fn a_foreign_key_does_not_verify() {
    let signer = Ed25519Signer::from_seed(7);
    let other = Ed25519Signer::from_seed(8);
    let resolver = TableResolver::serving_key("example.com", other.public_key_hex());
    let signed = signed_request(&signer);

    assert!(!signed.verify_signature(&resolver, &Ed25519Verifier).await);
}

#[tokio::test]
async fn an_unresolvable_domain_fails_closed() {
    let signer = Ed25519Signer::from_seed(7);
    let resolver = TableResolver::serving_key("elsewhere.org", signer.public_key_hex());
    let signed = signed_request(&signer);

    assert!(!signed.verify_signature(&resolver, &Ed25519Verifier).await);
}

#[tokio::test]
async fn a_malformed_published_key_fails_closed() {
    let signer = Ed25519Signer::from_seed(7);
    let resolver = TableResolver::serving_key("example.com", "not-hex-at-all".to_string());
    let signed = signed_request(&signer);

    // The verifier errors on the key; verification reports false.
    assert!(!signed.verify_signature(&resolver, &Ed25519Verifier).await);
}

#[tokio::test]
async fn re_signing_replaces_the_signature() {
    let first = Ed25519Signer::from_seed(7);
    let second = Ed25519Signer::from_seed(9);
    let resolver = TableResolver::serving_key("example.com", second.public_key_hex());

    let signed_once = signed_request(&first);
    let signed_twice = signed_once.sign(&second).unwrap();

    assert_ne!(signed_once.signature(), signed_twice.signature());
    assert!(
        signed_twice
            .verify_signature(&resolver, &Ed25519Verifier)
            .await
    );
}
