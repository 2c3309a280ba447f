//! The slice of the DynamoDB API the admin commands use.
//!
//! `rusoto_dynamodb::DynamoDb` has dozens of operations. Commands take a `&dyn TableStore` instead
//! so tests can swap in an in-memory store that implements only these four.

use async_trait::async_trait;
use rusoto_core::RusotoError;
use rusoto_dynamodb::{
    CreateTableError, CreateTableInput, CreateTableOutput, DescribeTableError, DescribeTableInput,
    DescribeTableOutput, DynamoDb, DynamoDbClient, PutItemError, PutItemInput, PutItemOutput,
    QueryError, QueryInput, QueryOutput,
};

#[async_trait]
pub trait TableStore: Send + Sync {
    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, RusotoError<DescribeTableError>>;

    async fn create_table(
        &self,
        input: CreateTableInput,
    ) -> Result<CreateTableOutput, RusotoError<CreateTableError>>;

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, RusotoError<QueryError>>;

    async fn put_item(
        &self,
        input: PutItemInput,
    ) -> Result<PutItemOutput, RusotoError<PutItemError>>;
}

#[async_trait]
impl TableStore for DynamoDbClient {
    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, RusotoError<DescribeTableError>> {
        DynamoDb::describe_table(self, input).await
    }

    async fn create_table(
        &self,
        input: CreateTableInput,
    ) -> Result<CreateTableOutput, RusotoError<CreateTableError>> {
        DynamoDb::create_table(self, input).await
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, RusotoError<QueryError>> {
        DynamoDb::query(self, input).await
    }

    async fn put_item(
        &self,
        input: PutItemInput,
    ) -> Result<PutItemOutput, RusotoError<PutItemError>> {
        DynamoDb::put_item(self, input).await
    }
}
