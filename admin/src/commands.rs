//! The two admin commands, minus their console output.
//!
//! Each command takes a `connect` function that resolves credentials and returns a store. It is
//! only called once the arguments have been validated, so bad input never reaches the network.

use std::future::Future;

use chrono::Utc;

use crate::config::CreateUserConfig;
use crate::dynamodb::TableStore;
use crate::error::AdminError;
use crate::prompt::Confirm;
use crate::tables::{self, ProvisionOutcome, WaitOpts};
use crate::users::{self, CreatedUser, NewUser, RegistrarOpts};
use crate::utils::time;

pub const CREDENTIALS_HELP: &str = "Please configure your AWS credentials using one of these methods:
  1. AWS CLI: aws configure
  2. Environment variables: AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY
  3. IAM role (if running on EC2 or ECS)";

pub async fn create_oauth_users_table<S, F, Fut>(
    connect: F,
    wait_opts: &WaitOpts,
) -> Result<ProvisionOutcome, AdminError>
where
    S: TableStore,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<S, AdminError>>,
{
    let store = connect().await?;
    let table_def = dynamodb_schema::oauth_users_table(&time::date_time_iso_str(&Utc::now()));
    tables::ensure_table(&store, &table_def, wait_opts).await
}

pub async fn create_user<S, F, Fut>(
    config: &CreateUserConfig,
    prompt: &mut dyn Confirm,
    connect: F,
) -> Result<CreatedUser, AdminError>
where
    S: TableStore,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<S, AdminError>>,
{
    let new_user = NewUser::parse(&config.email, &config.password, config.name.as_deref())?;
    let store = connect().await?;
    let opts = RegistrarOpts {
        table_name: config.table_name.clone(),
        bcrypt_cost: config.bcrypt_cost,
        wait: WaitOpts::default(),
    };
    users::register_user(&store, prompt, &opts, &new_user).await
}
