//! An in-memory `TableStore`.
//!
//! Good enough to exercise the admin commands: tables are created `CREATING` and turn `ACTIVE`
//! after a configurable number of `DescribeTable` polls, queries support a single
//! `attr = :placeholder` key condition, and puts honor `attribute_not_exists(<hash key>)`.
//! Every call is counted, and the next call to an operation can be made to fail.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusoto_core::RusotoError;
use rusoto_dynamodb::{
    BillingModeSummary, CreateTableError, CreateTableInput, CreateTableOutput,
    DescribeTableError, DescribeTableInput, DescribeTableOutput, GlobalSecondaryIndexDescription,
    PutItemError, PutItemInput, PutItemOutput, QueryError, QueryInput, QueryOutput,
    TableDescription,
};

use crate::dynamodb::{Item, TableStore};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CallCounts {
    pub describe_table: usize,
    pub create_table: usize,
    pub query: usize,
    pub put_item: usize,
}

#[derive(Clone, Default)]
pub struct FakeTableStore {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    tables: HashMap<String, FakeTable>,
    calls: CallCounts,
    creating_polls: u32,
    describe_table_failure: Option<RusotoError<DescribeTableError>>,
    create_table_failure: Option<RusotoError<CreateTableError>>,
    query_failure: Option<RusotoError<QueryError>>,
    put_item_failure: Option<RusotoError<PutItemError>>,
}

struct FakeTable {
    description: TableDescription,
    hash_key: String,
    // Number of DescribeTable calls that still report CREATING.
    pending_polls: u32,
    items: Vec<Item>,
}

impl FakeTableStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Tables created through `create_table` report `CREATING` for this many polls.
    pub fn with_creating_polls(self, polls: u32) -> Self {
        self.state.lock().unwrap().creating_polls = polls;
        self
    }

    /// Add an already active table without counting a `CreateTable` call.
    pub fn add_table(&self, table_def: &CreateTableInput) {
        let mut state = self.state.lock().unwrap();
        state
            .tables
            .insert(table_def.table_name.clone(), FakeTable::new(table_def, 0));
    }

    pub fn insert_item(&self, table_name: &str, item: Item) {
        let mut state = self.state.lock().unwrap();
        let table = state
            .tables
            .get_mut(table_name)
            .unwrap_or_else(|| panic!("No table named {}", table_name));
        table.items.push(item);
    }

    pub fn items(&self, table_name: &str) -> Vec<Item> {
        let state = self.state.lock().unwrap();
        state
            .tables
            .get(table_name)
            .map(|table| table.items.clone())
            .unwrap_or_default()
    }

    pub fn table_description(&self, table_name: &str) -> Option<TableDescription> {
        let state = self.state.lock().unwrap();
        state.tables.get(table_name).map(|table| {
            let mut description = table.description.clone();
            description.table_status = Some(table.status().to_string());
            description.item_count = Some(table.items.len() as i64);
            description
        })
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().unwrap().calls
    }

    pub fn fail_describe_table(&self, err: RusotoError<DescribeTableError>) {
        self.state.lock().unwrap().describe_table_failure = Some(err);
    }

    pub fn fail_create_table(&self, err: RusotoError<CreateTableError>) {
        self.state.lock().unwrap().create_table_failure = Some(err);
    }

    pub fn fail_query(&self, err: RusotoError<QueryError>) {
        self.state.lock().unwrap().query_failure = Some(err);
    }

    pub fn fail_put_item(&self, err: RusotoError<PutItemError>) {
        self.state.lock().unwrap().put_item_failure = Some(err);
    }
}

impl FakeTable {
    fn new(table_def: &CreateTableInput, pending_polls: u32) -> Self {
        let hash_key = table_def
            .key_schema
            .iter()
            .find(|key| key.key_type == "HASH")
            .map(|key| key.attribute_name.clone())
            .unwrap_or_default();
        let description = TableDescription {
            table_name: Some(table_def.table_name.clone()),
            table_arn: Some(format!(
                "arn:aws:dynamodb:us-east-1:000000000000:table/{}",
                &table_def.table_name
            )),
            key_schema: Some(table_def.key_schema.clone()),
            attribute_definitions: Some(table_def.attribute_definitions.clone()),
            billing_mode_summary: table_def.billing_mode.as_ref().map(|billing_mode| {
                BillingModeSummary {
                    billing_mode: Some(billing_mode.clone()),
                    ..Default::default()
                }
            }),
            global_secondary_indexes: table_def.global_secondary_indexes.as_ref().map(|indexes| {
                indexes
                    .iter()
                    .map(|index| GlobalSecondaryIndexDescription {
                        index_name: Some(index.index_name.clone()),
                        key_schema: Some(index.key_schema.clone()),
                        index_status: Some("ACTIVE".to_string()),
                        ..Default::default()
                    })
                    .collect()
            }),
            ..Default::default()
        };
        FakeTable {
            description,
            hash_key,
            pending_polls,
            items: Vec::new(),
        }
    }

    fn status(&self) -> &'static str {
        if self.pending_polls > 0 {
            "CREATING"
        } else {
            "ACTIVE"
        }
    }

    fn has_index(&self, index_name: &str) -> bool {
        self.description
            .global_secondary_indexes
            .iter()
            .flatten()
            .any(|index| index.index_name.as_deref() == Some(index_name))
    }

    fn position_of(&self, item: &Item) -> Option<usize> {
        let key = string_attr(item, &self.hash_key)?;
        self.items
            .iter()
            .position(|existing| string_attr(existing, &self.hash_key) == Some(key))
    }
}

fn string_attr<'a>(item: &'a Item, attr: &str) -> Option<&'a str> {
    item.get(attr)?.s.as_deref()
}

/// Split "email = :email" into ("email", ":email").
fn parse_key_condition(expression: &str) -> Option<(&str, &str)> {
    let mut parts = expression.split('=');
    let attr = parts.next()?.trim();
    let placeholder = parts.next()?.trim();
    if parts.next().is_some() || attr.is_empty() || !placeholder.starts_with(':') {
        return None;
    }
    Some((attr, placeholder))
}

#[async_trait]
impl TableStore for FakeTableStore {
    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, RusotoError<DescribeTableError>> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        state.calls.describe_table += 1;
        if let Some(err) = state.describe_table_failure.take() {
            return Err(err);
        }
        let table = state.tables.get_mut(&input.table_name).ok_or_else(|| {
            RusotoError::Service(DescribeTableError::ResourceNotFound(format!(
                "Requested resource not found: Table: {} not found",
                &input.table_name
            )))
        })?;
        let mut description = table.description.clone();
        description.table_status = Some(table.status().to_string());
        description.item_count = Some(table.items.len() as i64);
        if table.pending_polls > 0 {
            table.pending_polls -= 1;
        }
        Ok(DescribeTableOutput {
            table: Some(description),
        })
    }

    async fn create_table(
        &self,
        input: CreateTableInput,
    ) -> Result<CreateTableOutput, RusotoError<CreateTableError>> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        state.calls.create_table += 1;
        if let Some(err) = state.create_table_failure.take() {
            return Err(err);
        }
        if state.tables.contains_key(&input.table_name) {
            return Err(RusotoError::Service(CreateTableError::ResourceInUse(
                format!("Table already exists: {}", &input.table_name),
            )));
        }
        let table = FakeTable::new(&input, state.creating_polls);
        let mut description = table.description.clone();
        description.table_status = Some("CREATING".to_string());
        state.tables.insert(input.table_name.clone(), table);
        Ok(CreateTableOutput {
            table_description: Some(description),
        })
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, RusotoError<QueryError>> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        state.calls.query += 1;
        if let Some(err) = state.query_failure.take() {
            return Err(err);
        }
        let table = state.tables.get(&input.table_name).ok_or_else(|| {
            RusotoError::Service(QueryError::ResourceNotFound(
                "Requested resource not found".to_string(),
            ))
        })?;
        if let Some(index_name) = input.index_name.as_deref() {
            if !table.has_index(index_name) {
                return Err(RusotoError::Validation(
                    "The table does not have the specified index".to_string(),
                ));
            }
        }
        let (attr, placeholder) = input
            .key_condition_expression
            .as_deref()
            .and_then(parse_key_condition)
            .ok_or_else(|| {
                RusotoError::Validation("Unsupported key condition expression".to_string())
            })?;
        let value = input
            .expression_attribute_values
            .as_ref()
            .and_then(|values| values.get(placeholder))
            .and_then(|value| value.s.as_deref());

        let mut items: Vec<Item> = table
            .items
            .iter()
            .filter(|item| value.is_some() && string_attr(item, attr) == value)
            .cloned()
            .collect();
        if let Some(limit) = input.limit {
            items.truncate(limit as usize);
        }
        Ok(QueryOutput {
            count: Some(items.len() as i64),
            items: Some(items),
            ..Default::default()
        })
    }

    async fn put_item(
        &self,
        input: PutItemInput,
    ) -> Result<PutItemOutput, RusotoError<PutItemError>> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        state.calls.put_item += 1;
        if let Some(err) = state.put_item_failure.take() {
            return Err(err);
        }
        let table = state.tables.get_mut(&input.table_name).ok_or_else(|| {
            RusotoError::Service(PutItemError::ResourceNotFound(
                "Requested resource not found".to_string(),
            ))
        })?;
        let existing = table.position_of(&input.item);
        if let Some(condition) = input.condition_expression.as_deref() {
            let not_exists = format!("attribute_not_exists({})", &table.hash_key);
            if condition != not_exists {
                return Err(RusotoError::Validation(format!(
                    "Unsupported condition expression: {}",
                    condition
                )));
            }
            if existing.is_some() {
                return Err(RusotoError::Service(PutItemError::ConditionalCheckFailed(
                    "The conditional request failed".to_string(),
                )));
            }
        }
        match existing {
            Some(idx) => table.items[idx] = input.item,
            None => table.items.push(input.item),
        }
        Ok(PutItemOutput::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dynamodb::{av_map, av_s};

    #[test]
    fn test_parse_key_condition() {
        assert_eq!(
            parse_key_condition("email = :email"),
            Some(("email", ":email"))
        );
        assert_eq!(parse_key_condition("email = email"), None);
        assert_eq!(parse_key_condition("a = :a AND b = :b"), None);
    }

    #[tokio::test]
    async fn test_put_respects_attribute_not_exists() {
        let store = FakeTableStore::new();
        store.add_table(&dynamodb_schema::users_table("users"));
        let item = av_map(&[av_s("id", "1"), av_s("email", "a@b.co")]);
        let put = || PutItemInput {
            table_name: "users".to_string(),
            item: item.clone(),
            condition_expression: Some("attribute_not_exists(id)".to_string()),
            ..Default::default()
        };
        assert!(store.put_item(put()).await.is_ok());
        let result = store.put_item(put()).await;
        assert!(matches!(
            result,
            Err(RusotoError::Service(PutItemError::ConditionalCheckFailed(_)))
        ));
        assert_eq!(store.items("users").len(), 1);
        assert_eq!(store.calls().put_item, 2);
    }
}
