use std::collections::HashMap;

use anyhow::Context;
use rusoto_core::Region;
use rusoto_credential::{DefaultCredentialsProvider, ProvideAwsCredentials};
use rusoto_dynamodb::{AttributeValue, DynamoDbClient};

use crate::config::AwsConfig;
use crate::credentials;
use crate::error::AdminError;

pub mod store;

pub use store::TableStore;

/// A DynamoDB item, keyed by attribute name.
pub type Item = HashMap<String, AttributeValue>;

/// Shorthand to create `AttributeValue` entry with string type `S`.
pub fn av_s(key: &str, value: &str) -> (String, AttributeValue) {
    (
        key.to_string(),
        AttributeValue {
            s: Some(value.to_string()),
            ..Default::default()
        },
    )
}

/// Shorthand. Turn an array of `AttributeValue` entries into a hash map.
///
/// eg.
/// ```text
/// let input = PutItemInput {
///     item: av_map(&[
///         av_s("id", "8d1f..."),
///         av_s("email", "jane@smith.com"),
///     ])
/// }
/// ```
pub fn av_map(arr: &[(String, AttributeValue)]) -> Item {
    arr.iter().cloned().collect()
}

/// Shorthand. Retrieve the `S` string value for a given key in a Dynamo item.
pub fn av_get_s<'a>(item: &'a Item, key: &str) -> Option<&'a str> {
    Some(item.get(key)?.s.as_ref()?.as_str())
}

pub fn create_dynamodb_client<P>(
    region: Region,
    credentials_provider: P,
) -> anyhow::Result<DynamoDbClient>
where
    P: ProvideAwsCredentials + Send + Sync + 'static,
{
    let request_dispatcher =
        rusoto_core::request::HttpClient::new().context("Failed to create HTTP client")?;
    Ok(DynamoDbClient::new_with(
        request_dispatcher,
        credentials_provider,
        region,
    ))
}

/// Resolve ambient AWS credentials (environment, profile, container or instance role) and build a
/// client for the configured region. Fails fast with `CredentialsMissing` before any request is
/// made if nothing in the chain yields credentials.
pub async fn connect(aws_config: &AwsConfig) -> Result<DynamoDbClient, AdminError> {
    let credentials_provider = DefaultCredentialsProvider::new()
        .map_err(|e| AdminError::CredentialsMissing(e.to_string()))?;
    connect_with(aws_config, credentials_provider).await
}

pub async fn connect_with<P>(
    aws_config: &AwsConfig,
    credentials_provider: P,
) -> Result<DynamoDbClient, AdminError>
where
    P: ProvideAwsCredentials + Send + Sync + 'static,
{
    credentials::check_credentials(&credentials_provider).await?;
    log::debug!("Using DynamoDB region {:?}", &aws_config.region);
    let client = create_dynamodb_client(aws_config.region.clone(), credentials_provider)?;
    Ok(client)
}
