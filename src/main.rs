use clap::Parser;
use crm_migrate::config::{Cli, Command, MoveCustomFieldsArgs, UpdateCountriesArgs};
use crm_migrate::core::countries;
use crm_migrate::utils::{logger, validation::Validate};
use crm_migrate::{
    CloseClient, CountryCodeUpdater, CustomFieldMigrator, MigrateError, Result,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::UpdateCountries(args) => {
            logger::init_cli_logger(args.verbose);
            run_update_countries(args).await
        }
        Command::MoveCustomFields(args) => {
            logger::init_cli_logger(args.verbose);
            run_move_custom_fields(args).await
        }
    };

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run_update_countries(args: UpdateCountriesArgs) -> Result<()> {
    if args.list_countries {
        for (code, name) in countries::all() {
            println!("{}  {}", code, name);
        }
        return Ok(());
    }

    args.validate()?;
    let config = args.job_config()?;
    let api_key = args.api_key.as_deref().ok_or(MigrateError::MissingConfig {
        field: "api_key".to_string(),
    })?;

    if !config.confirmed {
        tracing::info!("DRY RUN: no data will be modified");
    }
    tracing::info!(
        "old country: {} ({}) -> new country: {} ({})",
        config.old_code,
        countries::display_name(&config.old_code).unwrap_or("?"),
        config.new_code,
        countries::display_name(&config.new_code).unwrap_or("?"),
    );

    let api = CloseClient::new(api_key, &args.base_url);
    let summary = CountryCodeUpdater::new(api, config).run().await?;

    tracing::info!(
        "done: {} leads scanned, {} updated",
        summary.leads_scanned,
        summary.leads_updated
    );
    Ok(())
}

async fn run_move_custom_fields(args: MoveCustomFieldsArgs) -> Result<()> {
    args.validate()?;
    let config = args.job_config();

    if !config.confirmed {
        tracing::info!("DRY RUN: no data will be modified");
    }
    tracing::info!(
        "phones field: '{}', emails field: '{}', title field: '{}', use existing contact: {}",
        config.phones_custom_field,
        config.emails_custom_field,
        config.title_custom_field,
        config.use_existing_contact
    );

    let api = CloseClient::new(&args.api_key, &args.base_url);
    let summary = CustomFieldMigrator::new(api, config).run().await?;

    tracing::info!(
        "done: {} leads scanned, {} contacts created, {} updated, {} skipped, {} ignored",
        summary.leads_scanned,
        summary.contacts_created,
        summary.contacts_updated,
        summary.leads_skipped,
        summary.leads_ignored
    );
    Ok(())
}
