use std::ffi::OsString;
use std::fmt;

use clap::{value_t, App, Arg, ArgMatches};
use rusoto_core::Region;

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Clone, Debug)]
pub struct AwsConfig {
    pub region: Region,
}

#[derive(Clone, Debug)]
pub struct CreateTableConfig {
    pub aws: AwsConfig,
    pub log_level: log::LevelFilter,
}

#[derive(Clone)]
pub struct CreateUserConfig {
    pub aws: AwsConfig,
    pub log_level: log::LevelFilter,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub table_name: String,
    pub assume_yes: bool,
    pub bcrypt_cost: u32,
}

impl fmt::Debug for CreateUserConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CreateUserConfig")
            .field("aws", &self.aws)
            .field("log_level", &self.log_level)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("table_name", &self.table_name)
            .field("assume_yes", &self.assume_yes)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl CreateTableConfig {
    pub fn from_args<I, T>(args: I) -> clap::Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = common_args(App::new("create_oauth_users_table"))
            .version("0.1")
            .about("Creates the oauth_users DynamoDB table used by Google OAuth sign-in")
            .get_matches_from_safe(args)?;

        Ok(CreateTableConfig {
            aws: aws_config(&matches)?,
            log_level: value_t!(matches, "log_level", log::LevelFilter)?,
        })
    }
}

impl CreateUserConfig {
    pub fn from_args<I, T>(args: I) -> clap::Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = common_args(App::new("create_user"))
            .version("0.1")
            .about("Creates a user with a bcrypt-hashed password in the DynamoDB users table")
            .after_help(
                "EXAMPLES:\n    \
                 create_user user@example.com mypassword123\n    \
                 create_user user@example.com mypassword123 \"John Doe\"\n\n\
                 The users table is created on request if it does not exist.",
            )
            .arg(
                Arg::with_name("email")
                    .help("User email address")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::with_name("password")
                    .help("User password (will be hashed)")
                    .required(true)
                    .index(2),
            )
            .arg(
                Arg::with_name("name")
                    .help("User display name")
                    .index(3),
            )
            .arg(
                Arg::with_name("table")
                    .help("The DynamoDB table to write the user to")
                    .long("table")
                    .takes_value(true)
                    .value_name("TABLE")
                    .default_value(dynamodb_schema::USERS_TABLE_NAME),
            )
            .arg(
                Arg::with_name("yes")
                    .help("Create the users table without asking if it is missing")
                    .long("yes")
                    .short("y"),
            )
            .arg(
                Arg::with_name("bcrypt_cost")
                    .help("The bcrypt work factor, 4 to 31")
                    .long("bcrypt-cost")
                    .takes_value(true)
                    .value_name("COST")
                    .default_value("12")
                    .validator(validate_bcrypt_cost),
            )
            .get_matches_from_safe(args)?;

        Ok(CreateUserConfig {
            aws: aws_config(&matches)?,
            log_level: value_t!(matches, "log_level", log::LevelFilter)?,
            email: value_t!(matches, "email", String)?,
            password: value_t!(matches, "password", String)?,
            name: matches.value_of("name").map(String::from),
            table_name: value_t!(matches, "table", String)?,
            assume_yes: matches.is_present("yes"),
            bcrypt_cost: value_t!(matches, "bcrypt_cost", u32)?,
        })
    }
}

fn common_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(
        Arg::with_name("region")
            .help("The AWS region of the DynamoDB tables")
            .long("region")
            .takes_value(true)
            .value_name("REGION")
            .env("AWS_REGION")
            .default_value(DEFAULT_REGION),
    )
    .arg(
        Arg::with_name("endpoint")
            .help("A custom DynamoDB endpoint, eg. http://127.0.0.1:8000 for DynamoDB Local")
            .long("endpoint")
            .takes_value(true)
            .value_name("URL")
            .env("DYNAMODB_ENDPOINT"),
    )
    .arg(
        Arg::with_name("log_level")
            .help("error, warn, info, debug or trace")
            .long("log-level")
            .takes_value(true)
            .value_name("LEVEL")
            .default_value("info"),
    )
}

fn aws_config(matches: &ArgMatches) -> clap::Result<AwsConfig> {
    let region = value_t!(matches, "region", Region)?;
    let region = match matches.value_of("endpoint") {
        Some(endpoint) => Region::Custom {
            name: region.name().to_string(),
            endpoint: endpoint.to_string(),
        },
        None => region,
    };
    Ok(AwsConfig { region })
}

fn validate_bcrypt_cost(value: String) -> Result<(), String> {
    match value.parse::<u32>() {
        Ok(cost) if (4..=31).contains(&cost) => Ok(()),
        _ => Err(format!("bcrypt cost must be between 4 and 31, got {}", value)),
    }
}
