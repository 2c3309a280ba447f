use admin::commands::{self, CREDENTIALS_HELP};
use admin::config::CreateUserConfig;
use admin::dynamodb;
use admin::error::AdminError;
use admin::prompt::{AssumeYes, Confirm, ConsolePrompt};

#[tokio::main]
async fn main() {
    let config = CreateUserConfig::from_args(std::env::args_os()).unwrap_or_else(|e| e.exit());
    if let Err(e) = simple_logger::SimpleLogger::new()
        .with_level(config.log_level)
        .init()
    {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let mut prompt: Box<dyn Confirm> = if config.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(ConsolePrompt::stdio())
    };

    let result =
        commands::create_user(&config, prompt.as_mut(), || dynamodb::connect(&config.aws)).await;
    match result {
        Ok(user) => {
            println!("User created successfully!");
            println!("   ID: {}", &user.id);
            println!("   Email: {}", &user.email);
            if let Some(name) = user.name.as_ref() {
                println!("   Name: {}", name);
            }
            println!("   Created: {}", &user.created_at);
        }
        Err(AdminError::TableCreationDeclined(table_name)) => {
            println!("Table creation cancelled.");
            println!(
                "Please create the '{}' table manually using the AWS CLI:",
                &table_name
            );
            println!();
            println!(
                "{}",
                dynamodb_schema::create_table_cli_command(&dynamodb_schema::users_table(
                    &table_name
                ))
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let AdminError::CredentialsMissing(_) = e {
                eprintln!("{}", CREDENTIALS_HELP);
            }
            std::process::exit(1);
        }
    }
}
