//! Administrative tools for the DynamoDB user tables: provisioning the `oauth_users` table and
//! creating password users in the `users` table.

pub mod commands;
pub mod config;
pub mod credentials;
pub mod dynamodb;
pub mod error;
pub mod prompt;
pub mod tables;
pub mod users;
pub mod utils;
