use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

/// Identity claims embedded in a signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub iat: i64,
}

/// Issues and verifies HS256 bearer tokens. Keys are built once at startup
/// from the process-wide secret.
///
/// Tokens carry no `exp` claim: a correctly signed token stays valid until
/// the signing secret changes. There is no server-side revocation.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn sign(&self, user_id: i64, email: &str) -> anyhow::Result<String> {
        let claims = Claims {
            sub: user_id,
            email: email.to_owned(),
            iat: OffsetDateTime::now_utc().unix_timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "token signed");
        Ok(token)
    }

    /// Checks signature and structure only. Fails on malformed input, a
    /// signature mismatch, or a token signed with another algorithm.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.sub, "token verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_roundtrip() {
        let tokens = TokenService::new("dev-secret");
        let before = OffsetDateTime::now_utc().unix_timestamp();
        let token = tokens.sign(42, "nico.test@mail.com").expect("sign");
        let claims = tokens.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "nico.test@mail.com");
        assert!(claims.iat >= before);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let good = TokenService::new("secret-a");
        let bad = TokenService::new("secret-b");
        let token = good.sign(1, "a@mail.com").expect("sign");
        assert!(bad.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let tokens = TokenService::new("dev-secret");
        let token = tokens.sign(1, "a@mail.com").expect("sign");
        let mut parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        // Swap in the payload of a token for another user, keep the signature.
        let other = tokens.sign(2, "b@mail.com").expect("sign");
        let other_payload: Vec<&str> = other.split('.').collect();
        parts[1] = other_payload[1];
        let forged = parts.join(".");
        assert!(tokens.verify(&forged).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        let tokens = TokenService::new("dev-secret");
        assert!(tokens.verify("").is_err());
        assert!(tokens.verify("not-a-jwt").is_err());
        assert!(tokens.verify("aaa.bbb.ccc").is_err());
    }

    #[test]
    fn tokens_have_no_expiry() {
        let tokens = TokenService::new("dev-secret");
        let token = tokens.sign(7, "a@mail.com").expect("sign");
        // No exp claim is emitted, and verification does not require one.
        let claims = tokens.verify(&token).expect("verify");
        assert_eq!(claims.sub, 7);
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("exp").is_none());
    }
}
