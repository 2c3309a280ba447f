/// Schema for the DynamoDB tables managed by the admin tools.
///
/// NOTE: When you are choosing attribute names, avoid using DynamoDB Reserved Words unless you
/// have no other choice. Query ergonomics get bad otherwise.
///
/// Here is the list of DynamoDB Reserved Words:
/// https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html

use lazy_static::lazy_static;
use rusoto_dynamodb::{
    AttributeDefinition, CreateTableInput, GlobalSecondaryIndex, KeySchemaElement, Projection,
    ProvisionedThroughput, Tag,
};

pub const USERS_TABLE_NAME: &str = "users";
pub const USERS_EMAIL_INDEX_NAME: &str = "email-index";
pub const OAUTH_USERS_TABLE_NAME: &str = "oauth_users";

pub const BILLING_MODE_PAY_PER_REQUEST: &str = "PAY_PER_REQUEST";

lazy_static! {
    /*
     * users
     *
     *   id: string, uuid v4
     *   email: string
     *   password: string, bcrypt hash
     *   name: string, optional
     *   createdAt: string, iso 8601 date time
     *   updatedAt: string, iso 8601 date time
     *
     * primary key:
     *
     *   [id]
     *
     * global secondary indexes:
     *
     *   email-index: [email]
     */
    pub static ref USERS_TABLE: CreateTableInput = CreateTableInput {
        table_name: USERS_TABLE_NAME.to_string(),
        attribute_definitions: vec![attr_def("id", "S"), attr_def("email", "S")],
        key_schema: vec![key_schema_elem("id", "HASH")],
        global_secondary_indexes: Some(vec![GlobalSecondaryIndex {
            index_name: USERS_EMAIL_INDEX_NAME.to_string(),
            key_schema: vec![key_schema_elem("email", "HASH")],
            projection: Projection {
                projection_type: Some("ALL".to_string()),
                ..Default::default()
            },
            provisioned_throughput: default_provisioned_throughput(),
        }]),
        provisioned_throughput: default_provisioned_throughput(),
        ..Default::default()
    };
}

/// The `users` table definition under a different table name, eg. "staging-users".
pub fn users_table(table_name: &str) -> CreateTableInput {
    let mut table_def = USERS_TABLE.clone();
    table_def.table_name = table_name.to_string();
    table_def
}

/*
 * oauth_users
 *
 *   email: string
 *   id: string
 *   name: string
 *   image: string
 *   createdAt: string, iso 8601 date time
 *   updatedAt: string, iso 8601 date time
 *
 * primary key:
 *
 *   [email]
 *
 * Rows are written by the OAuth sign-in flow. We only provision the table.
 */
pub fn oauth_users_table(created_at: &str) -> CreateTableInput {
    CreateTableInput {
        table_name: OAUTH_USERS_TABLE_NAME.to_string(),
        attribute_definitions: vec![attr_def("email", "S")],
        key_schema: vec![key_schema_elem("email", "HASH")],
        billing_mode: Some(BILLING_MODE_PAY_PER_REQUEST.to_string()),
        tags: Some(vec![
            tag("Purpose", "OAuth Authentication"),
            tag("CreatedBy", "Migration Script"),
            tag("CreatedAt", created_at),
        ]),
        ..Default::default()
    }
}

/// Render the `aws dynamodb create-table` command that creates `table_def` by hand. Printed for
/// operators who would rather not let the tools create tables for them.
pub fn create_table_cli_command(table_def: &CreateTableInput) -> String {
    let mut lines = vec![
        "aws dynamodb create-table".to_string(),
        format!("    --table-name {}", &table_def.table_name),
        "    --attribute-definitions".to_string(),
    ];
    for attr in table_def.attribute_definitions.iter() {
        lines.push(format!(
            "        AttributeName={},AttributeType={}",
            &attr.attribute_name, &attr.attribute_type
        ));
    }
    lines.push(format!(
        "    --key-schema {}",
        table_def
            .key_schema
            .iter()
            .map(|key| format!("AttributeName={},KeyType={}", &key.attribute_name, &key.key_type))
            .collect::<Vec<_>>()
            .join(" ")
    ));
    if let Some(indexes) = table_def.global_secondary_indexes.as_ref() {
        lines.push("    --global-secondary-indexes".to_string());
        for index in indexes.iter() {
            lines.push(format!("        '{}'", global_secondary_index_arg(index)));
        }
    }
    if let Some(billing_mode) = table_def.billing_mode.as_ref() {
        lines.push(format!("    --billing-mode {}", billing_mode));
    }
    if let Some(throughput) = table_def.provisioned_throughput.as_ref() {
        lines.push(format!(
            "    --provisioned-throughput {}",
            throughput_arg(throughput)
        ));
    }
    if let Some(tags) = table_def.tags.as_ref() {
        lines.push("    --tags".to_string());
        for t in tags.iter() {
            lines.push(format!("        'Key={},Value={}'", &t.key, &t.value));
        }
    }
    lines.join(" \\\n")
}

fn global_secondary_index_arg(index: &GlobalSecondaryIndex) -> String {
    let key_schema = index
        .key_schema
        .iter()
        .map(|key| {
            format!(
                "{{AttributeName={},KeyType={}}}",
                &key.attribute_name, &key.key_type
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    let mut arg = format!(
        "IndexName={},KeySchema=[{}],Projection={{ProjectionType={}}}",
        &index.index_name,
        key_schema,
        index.projection.projection_type.as_deref().unwrap_or("ALL"),
    );
    if let Some(throughput) = index.provisioned_throughput.as_ref() {
        arg.push_str(&format!(",ProvisionedThroughput={{{}}}", throughput_arg(throughput)));
    }
    arg
}

fn throughput_arg(throughput: &ProvisionedThroughput) -> String {
    format!(
        "ReadCapacityUnits={},WriteCapacityUnits={}",
        throughput.read_capacity_units, throughput.write_capacity_units
    )
}

fn attr_def(attribute_name: &str, attribute_type: &str) -> AttributeDefinition {
    AttributeDefinition {
        attribute_name: attribute_name.to_string(),
        attribute_type: attribute_type.to_string(),
    }
}

fn key_schema_elem(attribute_name: &str, key_type: &str) -> KeySchemaElement {
    KeySchemaElement {
        attribute_name: attribute_name.to_string(),
        key_type: key_type.to_string(),
    }
}

fn tag(key: &str, value: &str) -> Tag {
    Tag {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn default_provisioned_throughput() -> Option<ProvisionedThroughput> {
    Some(ProvisionedThroughput {
        read_capacity_units: 5,
        write_capacity_units: 5,
    })
}
