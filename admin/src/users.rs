use std::fmt;

use chrono::Utc;
use rusoto_dynamodb::{PutItemInput, QueryInput};
use uuid::Uuid;

use crate::dynamodb::{av_map, av_s, Item, TableStore};
use crate::error::AdminError;
use crate::prompt::Confirm;
use crate::tables::{self, WaitOpts};
use crate::utils::time;

pub const MIN_PASSWORD_LEN: usize = 8;

/// A validated request to create a user. The password is still in plaintext here, so `Debug`
/// leaves it out.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    password: String,
    pub name: Option<String>,
}

impl NewUser {
    /// Basic sanity checks, done before any request goes out. The email must contain "@" and "."
    /// and the password must be at least `MIN_PASSWORD_LEN` characters. An empty name counts as
    /// no name.
    pub fn parse(email: &str, password: &str, name: Option<&str>) -> Result<Self, AdminError> {
        if !email.contains('@') || !email.contains('.') {
            return Err(AdminError::Validation(
                "Please provide a valid email address.".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AdminError::Validation(format!(
                "Password must be at least {} characters long.",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(NewUser {
            email: email.to_string(),
            password: password.to_string(),
            name: name.filter(|name| !name.is_empty()).map(String::from),
        })
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish()
    }
}

/// The record we wrote.
#[derive(Clone, Debug)]
pub struct CreatedUser {
    pub id: String,
    pub email: String,
    pub hashed_password: String,
    pub name: Option<String>,
    pub created_at: String,
}

impl CreatedUser {
    fn to_item(&self) -> Item {
        let mut item = av_map(&[
            av_s("id", &self.id),
            av_s("email", &self.email),
            av_s("password", &self.hashed_password),
            av_s("createdAt", &self.created_at),
            av_s("updatedAt", &self.created_at),
        ]);
        if let Some(name) = self.name.as_ref() {
            let (key, value) = av_s("name", name);
            item.insert(key, value);
        }
        item
    }
}

#[derive(Clone, Debug)]
pub struct RegistrarOpts {
    pub table_name: String,
    pub bcrypt_cost: u32,
    pub wait: WaitOpts,
}

impl Default for RegistrarOpts {
    fn default() -> Self {
        RegistrarOpts {
            table_name: dynamodb_schema::USERS_TABLE_NAME.to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            wait: WaitOpts::default(),
        }
    }
}

/// Salted bcrypt hash of `password`.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AdminError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Look the email up in the table's email index.
pub async fn find_user_by_email(
    store: &dyn TableStore,
    table_name: &str,
    email: &str,
) -> Result<Option<Item>, AdminError> {
    let input = QueryInput {
        table_name: table_name.to_string(),
        index_name: Some(dynamodb_schema::USERS_EMAIL_INDEX_NAME.to_string()),
        key_condition_expression: Some("email = :email".to_string()),
        expression_attribute_values: Some(av_map(&[av_s(":email", email)])),
        limit: Some(1),
        ..Default::default()
    };
    let output = store.query(input).await.map_err(|e| {
        log::error!("Error checking if user exists: {}", e);
        AdminError::from_rusoto("Query", e)
    })?;
    Ok(output.items.unwrap_or_default().into_iter().next())
}

/// Create the users table if it is missing, but only if the operator says so.
async fn ensure_users_table(
    store: &dyn TableStore,
    prompt: &mut dyn Confirm,
    opts: &RegistrarOpts,
) -> Result<(), AdminError> {
    let table_name = &opts.table_name;
    if let Some(description) = tables::table_exists(store, table_name).await? {
        tables::wait_if_not_active(store, table_name, description, &opts.wait).await?;
        return Ok(());
    }

    log::warn!("DynamoDB table '{}' not found.", table_name);
    let question = format!(
        "Would you like to create the '{}' table automatically?",
        table_name
    );
    if !prompt.confirm(&question)? {
        return Err(AdminError::TableCreationDeclined(table_name.clone()));
    }
    let table_def = dynamodb_schema::users_table(table_name);
    tables::ensure_table(store, &table_def, &opts.wait).await?;
    Ok(())
}

/// Create one user record for `new_user.email`.
///
/// The duplicate check and the write are two separate requests, so two registrations racing on
/// the same email can both succeed. The write is conditioned on the generated id being unused,
/// which keeps a colliding id from overwriting someone else's record.
pub async fn register_user(
    store: &dyn TableStore,
    prompt: &mut dyn Confirm,
    opts: &RegistrarOpts,
    new_user: &NewUser,
) -> Result<CreatedUser, AdminError> {
    ensure_users_table(store, prompt, opts).await?;

    if find_user_by_email(store, &opts.table_name, &new_user.email)
        .await?
        .is_some()
    {
        return Err(AdminError::DuplicateUser(new_user.email.clone()));
    }

    let user = CreatedUser {
        id: Uuid::new_v4().to_string(),
        email: new_user.email.clone(),
        hashed_password: hash_password(&new_user.password, opts.bcrypt_cost)?,
        name: new_user.name.clone(),
        created_at: time::date_time_iso_str(&Utc::now()),
    };
    let input = PutItemInput {
        table_name: opts.table_name.clone(),
        item: user.to_item(),
        condition_expression: Some("attribute_not_exists(id)".to_string()),
        ..Default::default()
    };
    store.put_item(input).await.map_err(|e| {
        log::error!("Error creating user: {}", e);
        AdminError::from_rusoto("PutItem", e)
    })?;
    log::info!("Created user {} in table '{}'", &user.id, &opts.table_name);
    Ok(user)
}
