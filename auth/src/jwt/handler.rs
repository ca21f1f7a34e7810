use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Signs with HS256 using a single symmetric key. The same handler type is
/// used by the issuer and by the gateway, so both sides must be built from
/// the same secret.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler from raw key bytes.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    ///
    /// # Errors
    /// * `InvalidKey` - Key is empty
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("key must not be empty".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Create a new JWT handler from a base64-encoded shared secret.
    ///
    /// # Arguments
    /// * `secret` - Standard-alphabet base64 encoding of the key bytes
    ///
    /// # Errors
    /// * `InvalidKey` - Secret is not valid base64 or decodes to an empty key
    ///
    /// # Security Notes
    /// - The decoded key should be at least 256 bits (32 bytes) for HS256
    /// - The gateway and the auth service must be configured with the same value
    pub fn from_base64_secret(secret: &str) -> Result<Self, JwtError> {
        let key = STANDARD
            .decode(secret.trim())
            .map_err(|e| JwtError::InvalidKey(e.to_string()))?;

        Self::new(&key)
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token.
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not verify under this key
    /// * `Malformed` - Token structure, encoding or required claims are invalid
    /// * `Expired` - Current time is at or past the `exp` claim
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = self.verify(token, &validation)?;

        // jsonwebtoken accepts `exp == now`; the token is already dead at that instant
        if claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }

    /// Check whether a correctly signed token has passed its expiry.
    ///
    /// Returns `false` for tokens that fail for any other reason (bad
    /// signature, malformed structure); use [`JwtHandler::decode`] to
    /// establish validity.
    pub fn is_expired(&self, token: &str) -> bool {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        self.verify(token, &validation)
            .map(|claims| claims.is_expired(Utc::now().timestamp()))
            .unwrap_or(false)
    }

    fn verify(&self, token: &str, validation: &Validation) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Malformed(e.to_string()),
            })
    }
}
