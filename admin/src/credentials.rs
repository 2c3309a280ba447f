use rusoto_credential::ProvideAwsCredentials;

use crate::error::AdminError;

/// Ask the provider for credentials once, up front, so a misconfigured machine fails before any
/// table is touched.
pub async fn check_credentials<P>(credentials_provider: &P) -> Result<(), AdminError>
where
    P: ProvideAwsCredentials + Sync,
{
    match credentials_provider.credentials().await {
        Ok(credentials) => {
            log::debug!(
                "Resolved AWS credentials for access key {}",
                mask_key(credentials.aws_access_key_id())
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Could not resolve AWS credentials: {}", e);
            Err(AdminError::CredentialsMissing(e.to_string()))
        }
    }
}

/// Keep the last four characters of an access key id, eg. "****MPLE".
fn mask_key(key: &str) -> String {
    let visible: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", visible)
}
