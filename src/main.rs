use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use mandi::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Record and inspect commodity rates
    #[command(subcommand)]
    Rate(RateCommands),
    /// Record and inspect sauda (deal) ledgers
    #[command(subcommand)]
    Sauda(SaudaCommands),
    /// Manage registered companies
    #[command(subcommand)]
    Company(CompanyCommands),
}

#[derive(Subcommand)]
enum RateCommands {
    /// Submit today's rate for a company/location/commodity
    Submit {
        #[arg(long)]
        company: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        commodity: String,
        #[arg(long)]
        rate: f64,
        /// Submitter's mobile number
        #[arg(long)]
        mobile: String,
    },
    /// List rate records with day-aware freshness
    List {
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        commodity: Option<String>,
    },
    /// Delete every rate record
    Clear {
        /// Confirm the bulk delete
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SaudaCommands {
    /// Submit deal lines for one or more units from a YAML file
    Submit {
        #[arg(long)]
        company: String,
        /// Ledger day, DD-MM-YYYY; defaults to today
        #[arg(long)]
        date: Option<String>,
        /// YAML file holding a list of {location, commodity, lines}
        #[arg(long)]
        file: PathBuf,
    },
    /// Show a day's ledger
    Show {
        #[arg(long)]
        company: String,
        /// Ledger day, DD-MM-YYYY; defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Today's completion status for a company
    Status {
        #[arg(long)]
        company: String,
    },
}

#[derive(Subcommand)]
enum CompanyCommands {
    /// Register a company, or merge units into an existing one
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        state: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long = "location")]
        locations: Vec<String>,
        #[arg(long = "commodity")]
        commodities: Vec<String>,
        #[arg(long = "sub-commodity")]
        sub_commodities: Vec<String>,
        /// Repeatable: 'location|commodity|mobile|person'
        #[arg(long = "contact")]
        contacts: Vec<String>,
    },
    /// List registered companies
    List,
    /// Delete a company profile
    Remove {
        #[arg(long)]
        name: String,
    },
    /// Rename a company, keeping its stable id
    Rename {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

fn into_app_command(cmd: Commands) -> Result<mandi::AppCommand> {
    use mandi::AppCommand;

    Ok(match cmd {
        Commands::Setup => unreachable!("Setup command should be handled separately"),
        Commands::Rate(RateCommands::Submit {
            company,
            location,
            commodity,
            rate,
            mobile,
        }) => AppCommand::SubmitRate {
            company,
            location,
            commodity,
            rate,
            mobile,
        },
        Commands::Rate(RateCommands::List { company, commodity }) => {
            AppCommand::ListRates { company, commodity }
        }
        Commands::Rate(RateCommands::Clear { yes }) => AppCommand::ClearRates { confirmed: yes },
        Commands::Sauda(SaudaCommands::Submit {
            company,
            date,
            file,
        }) => AppCommand::SubmitSauda {
            company,
            date,
            entries_file: file,
        },
        Commands::Sauda(SaudaCommands::Show { company, date }) => {
            AppCommand::ShowSauda { company, date }
        }
        Commands::Sauda(SaudaCommands::Status { company }) => AppCommand::SaudaStatus { company },
        Commands::Company(CompanyCommands::Add {
            name,
            state,
            category,
            locations,
            commodities,
            sub_commodities,
            contacts,
        }) => {
            let mut registration = mandi::core::company::CompanyRegistration {
                name,
                state,
                category,
                locations,
                commodities,
                sub_commodities,
                contacts: Default::default(),
            };
            for raw in &contacts {
                let (unit, card) = mandi::cli::company::parse_contact(raw)?;
                registration.contacts.insert(unit, card);
            }
            AppCommand::AddCompany(Box::new(registration))
        }
        Commands::Company(CompanyCommands::List) => AppCommand::ListCompanies,
        Commands::Company(CompanyCommands::Remove { name }) => AppCommand::RemoveCompany { name },
        Commands::Company(CompanyCommands::Rename { from, to }) => {
            AppCommand::RenameCompany { from, to }
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => mandi::cli::setup::setup(),
        Some(cmd) => match into_app_command(cmd) {
            Ok(app_cmd) => mandi::run_command(app_cmd, cli.config_path.as_deref()).await,
            Err(e) => Err(e),
        },
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
