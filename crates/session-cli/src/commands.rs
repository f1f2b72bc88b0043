//! Command implementations.

use serde::Serialize;
use session_config_and_utils::Config;
use session_store::{
    AuthState, AuthStateStream, ClaimsDecoder, HttpCredentialClient, JwtClaimsDecoder,
    LoginRequest, SessionStore,
};
use std::error::Error;
use std::io::Write;

/// Run the two-phase flow: verify credentials, then install the token.
pub async fn login(
    config: &Config,
    username: &str,
    password: &str,
    admin: bool,
) -> Result<(), Box<dyn Error>> {
    let client =
        HttpCredentialClient::with_timeout(config.api_base_url.as_str(), config.request_timeout())?;
    let store = SessionStore::new(client);
    let mut states = store.subscribe();

    let request = LoginRequest::new(username, password).with_admin(admin);
    let payload = store.login(&request).await.into_result()?;

    let token = payload
        .token()
        .ok_or("credential endpoint did not return a token")?
        .to_string();
    store.set_session(username, &token)?;

    let mut out = std::io::stdout().lock();
    for state in drain(&mut states) {
        write_json(&mut out, &state)?;
    }
    Ok(())
}

/// Print the claims of `token`.
pub fn decode(token: &str) -> Result<(), Box<dyn Error>> {
    let claims = JwtClaimsDecoder.decode(token)?;
    write_json(&mut std::io::stdout().lock(), &claims)?;
    Ok(())
}

fn drain(states: &mut AuthStateStream) -> Vec<AuthState> {
    std::iter::from_fn(|| states.try_next_state()).collect()
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_emits_one_line_per_value() {
        let mut out = Vec::new();
        write_json(&mut out, &AuthState::unauthenticated()).unwrap();
        write_json(&mut out, &AuthState::unauthenticated()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["is_authenticated"], serde_json::Value::Bool(false));
    }

    #[test]
    fn test_decode_rejects_malformed_token() {
        assert!(decode("not-a-token").is_err());
    }

    #[tokio::test]
    async fn test_login_against_unreachable_endpoint_fails() {
        let config = Config {
            api_base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: Some(2),
            ..Config::default()
        };

        let result = login(&config, "bob", "x", false).await;
        assert!(result.is_err());
    }
}
