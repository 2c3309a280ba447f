use std::error::Error;

use rusoto_core::RusotoError;
use rusoto_dynamodb::{CreateTableError, DescribeTableError, PutItemError, QueryError};

/// Every way an admin command can fail. All of them are terminal: the binaries print the message
/// and exit with status 1.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("AWS credentials not found. {0}")]
    CredentialsMissing(String),

    #[error("{0}")]
    Validation(String),

    #[error("User with email '{0}' already exists.")]
    DuplicateUser(String),

    #[error("Creation of table '{0}' was cancelled.")]
    TableCreationDeclined(String),

    #[error("Table '{table_name}' did not become active after {attempts} status checks.")]
    WaitTimeout { table_name: String, attempts: u32 },

    /// The provider rejected a request. `code` is the DynamoDB error code, eg.
    /// "ResourceInUseException".
    #[error("{operation} failed: {code} - {message}")]
    Provider {
        operation: &'static str,
        code: String,
        message: String,
    },

    #[error("Failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Failed to read answer from console: {0}")]
    Prompt(#[from] std::io::Error),

    #[error(transparent)]
    Client(#[from] anyhow::Error),
}

impl AdminError {
    /// Classify an error returned by a rusoto call. Credential failures surface as
    /// `CredentialsMissing` no matter which call hit them.
    pub fn from_rusoto<E>(operation: &'static str, err: RusotoError<E>) -> Self
    where
        E: Error + ErrorCode + 'static,
    {
        let (code, message) = match err {
            RusotoError::Service(e) => (e.error_code().to_string(), e.to_string()),
            RusotoError::Credentials(e) => {
                return AdminError::CredentialsMissing(e.to_string());
            }
            RusotoError::HttpDispatch(e) => ("HttpDispatchError".to_string(), e.to_string()),
            RusotoError::Validation(msg) => ("ValidationException".to_string(), msg),
            RusotoError::ParseError(msg) => ("ParseError".to_string(), msg),
            RusotoError::Unknown(response) => (
                format!("HTTP {}", response.status.as_u16()),
                String::from_utf8_lossy(&response.body).into_owned(),
            ),
            e => ("Unknown".to_string(), e.to_string()),
        };
        AdminError::Provider {
            operation,
            code,
            message,
        }
    }
}

/// The DynamoDB error code for a service error, eg. "ResourceNotFoundException".
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

impl ErrorCode for DescribeTableError {
    fn error_code(&self) -> &'static str {
        match self {
            DescribeTableError::InternalServerError(_) => "InternalServerError",
            DescribeTableError::ResourceNotFound(_) => "ResourceNotFoundException",
        }
    }
}

impl ErrorCode for CreateTableError {
    fn error_code(&self) -> &'static str {
        match self {
            CreateTableError::InternalServerError(_) => "InternalServerError",
            CreateTableError::LimitExceeded(_) => "LimitExceededException",
            CreateTableError::ResourceInUse(_) => "ResourceInUseException",
        }
    }
}

impl ErrorCode for QueryError {
    fn error_code(&self) -> &'static str {
        match self {
            QueryError::InternalServerError(_) => "InternalServerError",
            QueryError::ProvisionedThroughputExceeded(_) => {
                "ProvisionedThroughputExceededException"
            }
            QueryError::RequestLimitExceeded(_) => "RequestLimitExceeded",
            QueryError::ResourceNotFound(_) => "ResourceNotFoundException",
        }
    }
}

impl ErrorCode for PutItemError {
    fn error_code(&self) -> &'static str {
        match self {
            PutItemError::ConditionalCheckFailed(_) => "ConditionalCheckFailedException",
            PutItemError::InternalServerError(_) => "InternalServerError",
            PutItemError::ItemCollectionSizeLimitExceeded(_) => {
                "ItemCollectionSizeLimitExceededException"
            }
            PutItemError::ProvisionedThroughputExceeded(_) => {
                "ProvisionedThroughputExceededException"
            }
            PutItemError::RequestLimitExceeded(_) => "RequestLimitExceeded",
            PutItemError::ResourceNotFound(_) => "ResourceNotFoundException",
            PutItemError::TransactionConflict(_) => "TransactionConflictException",
        }
    }
}
