//! Authentication for the Firestore REST API.
//!
//! Obtains OAuth2 access tokens from a service account key file. With no
//! key file configured (emulator or tests) requests go out without an
//! Authorization header.

use std::{error::Error, path::Path};
use yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator};

/// Scope covering Firestore document access.
const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Obtains an OAuth2 access token for Firestore.
///
/// Reads the service account key from `key_path` and requests a token with
/// the datastore scope.
///
/// # Errors
///
/// Fails when the key file cannot be read, authentication with Google's
/// OAuth2 service fails, or no token is returned.
pub async fn get_access_token(key_path: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let sa_key = read_service_account_key(Path::new(key_path)).await?;

    let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;

    let auth_token = auth.token(&[DATASTORE_SCOPE]).await?;
    let token = match auth_token.token() {
        Some(token) => token,
        None => {
            return Err("No token available".into());
        }
    };

    Ok(token.to_string())
}
