//! Table provisioning: create a table if it does not exist, then block until DynamoDB reports it
//! `ACTIVE`.
//!
//! There is no retry policy. The only loop is the readiness poll, which mirrors the AWS SDK
//! `table_exists` waiter: check immediately, then every `delay`, at most `max_attempts` times.

use std::io::{self, Write};
use std::time::Duration;

use rusoto_core::RusotoError;
use rusoto_dynamodb::{CreateTableInput, DescribeTableError, DescribeTableInput, TableDescription};

use crate::dynamodb::TableStore;
use crate::error::AdminError;

pub const TABLE_STATUS_ACTIVE: &str = "ACTIVE";

#[derive(Clone, Debug)]
pub struct WaitOpts {
    pub delay: Duration,
    pub max_attempts: u32,
}

impl Default for WaitOpts {
    fn default() -> Self {
        WaitOpts {
            delay: Duration::from_secs(20),
            max_attempts: 25,
        }
    }
}

#[derive(Clone, Debug)]
pub enum ProvisionOutcome {
    /// The table was already there. Nothing was written.
    AlreadyExists(TableDescription),

    /// We created the table and it is now active.
    Created(TableDescription),
}

impl ProvisionOutcome {
    pub fn description(&self) -> &TableDescription {
        match self {
            ProvisionOutcome::AlreadyExists(description) => description,
            ProvisionOutcome::Created(description) => description,
        }
    }
}

/// Describe the table. `Ok(None)` means DynamoDB answered `ResourceNotFoundException`. Any other
/// failure is an error.
pub async fn table_exists(
    store: &dyn TableStore,
    table_name: &str,
) -> Result<Option<TableDescription>, AdminError> {
    let input = DescribeTableInput {
        table_name: table_name.to_string(),
    };
    match store.describe_table(input).await {
        Ok(output) => Ok(Some(output.table.unwrap_or_default())),
        Err(RusotoError::Service(DescribeTableError::ResourceNotFound(_))) => Ok(None),
        Err(e) => {
            log::error!("Error checking whether table '{}' exists: {}", table_name, e);
            Err(AdminError::from_rusoto("DescribeTable", e))
        }
    }
}

pub async fn wait_until_table_exists(
    store: &dyn TableStore,
    table_name: &str,
    opts: &WaitOpts,
) -> Result<TableDescription, AdminError> {
    for attempt in 1..=opts.max_attempts {
        match table_exists(store, table_name).await? {
            Some(description) if is_active(&description) => return Ok(description),
            Some(description) => log::debug!(
                "Table '{}' is {} ({}/{})",
                table_name,
                description.table_status.as_deref().unwrap_or("UNKNOWN"),
                attempt,
                opts.max_attempts
            ),
            None => log::debug!(
                "Table '{}' not visible yet ({}/{})",
                table_name,
                attempt,
                opts.max_attempts
            ),
        }
        if attempt < opts.max_attempts {
            tokio::time::sleep(opts.delay).await;
        }
    }
    Err(AdminError::WaitTimeout {
        table_name: table_name.to_string(),
        attempts: opts.max_attempts,
    })
}

fn is_active(description: &TableDescription) -> bool {
    description.table_status.as_deref() == Some(TABLE_STATUS_ACTIVE)
}

/// Wait out a table that exists but is not `ACTIVE` yet, eg. one another process just created.
pub async fn wait_if_not_active(
    store: &dyn TableStore,
    table_name: &str,
    description: TableDescription,
    wait_opts: &WaitOpts,
) -> Result<TableDescription, AdminError> {
    if is_active(&description) {
        return Ok(description);
    }
    log::info!(
        "Table '{}' is {}. Waiting for it to become active...",
        table_name,
        description.table_status.as_deref().unwrap_or("UNKNOWN")
    );
    wait_until_table_exists(store, table_name, wait_opts).await
}

/// Make sure the table described by `table_def` exists and is active. Creates it when
/// `DescribeTable` says it is missing. Calling this twice in a row issues exactly one
/// `CreateTable`.
pub async fn ensure_table(
    store: &dyn TableStore,
    table_def: &CreateTableInput,
    wait_opts: &WaitOpts,
) -> Result<ProvisionOutcome, AdminError> {
    let table_name = &table_def.table_name;
    if let Some(description) = table_exists(store, table_name).await? {
        log::info!("Table '{}' already exists.", table_name);
        let description = wait_if_not_active(store, table_name, description, wait_opts).await?;
        return Ok(ProvisionOutcome::AlreadyExists(description));
    }

    log::info!("Creating table '{}'...", table_name);
    let output = store
        .create_table(table_def.clone())
        .await
        .map_err(|e| {
            log::error!("Error creating table '{}': {}", table_name, e);
            AdminError::from_rusoto("CreateTable", e)
        })?;
    if let Some(arn) = output
        .table_description
        .as_ref()
        .and_then(|description| description.table_arn.as_deref())
    {
        log::info!("Table '{}' creation initiated. ARN: {}", table_name, arn);
    }

    log::info!("Waiting for table '{}' to be created...", table_name);
    let description = wait_until_table_exists(store, table_name, wait_opts).await?;
    log::info!("Table '{}' created successfully.", table_name);
    Ok(ProvisionOutcome::Created(description))
}

/// Print what DynamoDB told us about a table, for the operator.
pub fn write_table_summary<W: Write>(out: &mut W, description: &TableDescription) -> io::Result<()> {
    let or_unknown = |value: Option<&str>| value.unwrap_or("-").to_string();

    writeln!(out, "Table Information:")?;
    writeln!(
        out,
        "  Table Name: {}",
        or_unknown(description.table_name.as_deref())
    )?;
    writeln!(
        out,
        "  Table Status: {}",
        or_unknown(description.table_status.as_deref())
    )?;
    writeln!(
        out,
        "  Table ARN: {}",
        or_unknown(description.table_arn.as_deref())
    )?;
    writeln!(out, "  Item Count: {}", description.item_count.unwrap_or(0))?;
    // DynamoDB leaves out the billing mode summary for provisioned tables.
    let billing_mode = description
        .billing_mode_summary
        .as_ref()
        .and_then(|summary| summary.billing_mode.as_deref())
        .unwrap_or("PROVISIONED");
    writeln!(out, "  Billing Mode: {}", billing_mode)?;

    writeln!(out)?;
    writeln!(out, "Key Schema:")?;
    for key in description.key_schema.iter().flatten() {
        writeln!(out, "  {}: {}", &key.attribute_name, &key.key_type)?;
    }

    writeln!(out)?;
    writeln!(out, "Attributes:")?;
    for attr in description.attribute_definitions.iter().flatten() {
        writeln!(out, "  {}: {}", &attr.attribute_name, &attr.attribute_type)?;
    }

    if let Some(indexes) = description.global_secondary_indexes.as_ref() {
        writeln!(out)?;
        writeln!(out, "Global Secondary Indexes:")?;
        for index in indexes.iter() {
            writeln!(
                out,
                "  {}: {}",
                or_unknown(index.index_name.as_deref()),
                or_unknown(index.index_status.as_deref())
            )?;
        }
    }
    Ok(())
}
