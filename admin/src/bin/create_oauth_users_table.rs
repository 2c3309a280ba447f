use std::io;

use admin::commands::{self, CREDENTIALS_HELP};
use admin::config::CreateTableConfig;
use admin::dynamodb;
use admin::error::AdminError;
use admin::tables::{self, ProvisionOutcome, WaitOpts};

fn print_next_steps() {
    println!();
    println!("Migration completed successfully!");
    println!();
    println!("Next steps:");
    println!("1. Set up Google OAuth credentials in your environment:");
    println!("   - GOOGLE_CLIENT_ID");
    println!("   - GOOGLE_CLIENT_SECRET");
    println!("   - NEXTAUTH_SECRET");
    println!("2. Update your Google Cloud Console OAuth settings");
    println!("3. Test the OAuth login flow");
}

#[tokio::main]
async fn main() {
    let config = CreateTableConfig::from_args(std::env::args_os()).unwrap_or_else(|e| e.exit());
    if let Err(e) = simple_logger::SimpleLogger::new()
        .with_level(config.log_level)
        .init()
    {
        eprintln!("Failed to initialize logger: {}", e);
    }

    println!("DynamoDB OAuth Users Table Creation Script");
    println!("{}", "=".repeat(50));

    let result =
        commands::create_oauth_users_table(|| dynamodb::connect(&config.aws), &WaitOpts::default())
            .await;
    match result {
        Ok(ProvisionOutcome::AlreadyExists(description)) => {
            println!(
                "Table '{}' already exists.",
                description.table_name.as_deref().unwrap_or_default()
            );
            println!(
                "Table status: {}",
                description.table_status.as_deref().unwrap_or("UNKNOWN")
            );
            print_next_steps();
        }
        Ok(ProvisionOutcome::Created(description)) => {
            println!();
            if let Err(e) = tables::write_table_summary(&mut io::stdout(), &description) {
                log::error!("Failed to print table summary: {}", e);
            }
            print_next_steps();
        }
        Err(e) => {
            match &e {
                AdminError::CredentialsMissing(_) => {
                    eprintln!("Error: {}", e);
                    eprintln!("{}", CREDENTIALS_HELP);
                }
                _ => eprintln!("Error creating table: {}", e),
            }
            eprintln!();
            eprintln!("Migration failed. Please check the errors above.");
            std::process::exit(1);
        }
    }
}
