use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use edc_core::{Address, Gender, PersonalDetails};
use edc_registry::EdcConfig;

mod commands;

#[derive(Parser)]
#[command(author, version, about = "Employee Data Card tooling")]
struct Cli {
    /// JSON config file; falls back to $EDC_CONFIG, then defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the completion score and its breakdown for a profile file
    Score { file: PathBuf },
    /// Print the integrity fingerprint of a profile file
    Hash { file: PathBuf },
    /// Check a profile file against an expected fingerprint
    Verify { file: PathBuf, hash: String },
    /// Aggregate fingerprints into one root
    Merkle { hashes: Vec<String> },
    /// Create a card in the configured data directory
    Create(CreateArgs),
    /// Print the stored card
    Show,
    /// Attest the stored card on the mock ledger
    Attest,
    /// Compare the stored card with its attested fingerprint
    CheckIntegrity,
    /// Print Prometheus metrics for the stored card
    Metrics,
}

#[derive(Clone, Copy, ValueEnum)]
enum GenderArg {
    Male,
    Female,
    Other,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
            GenderArg::Other => Gender::Other,
        }
    }
}

#[derive(clap::Args)]
struct CreateArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    date_of_birth: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long, value_enum, default_value = "other")]
    gender: GenderArg,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long)]
    aadhaar: Option<String>,
    #[arg(long)]
    pan: Option<String>,
}

impl From<CreateArgs> for PersonalDetails {
    fn from(args: CreateArgs) -> Self {
        PersonalDetails {
            edc_number: None,
            first_name: args.first_name,
            last_name: args.last_name,
            date_of_birth: args.date_of_birth,
            gender: args.gender.into(),
            email: args.email,
            phone: args.phone,
            address: Address {
                city: args.city,
                ..Address::default()
            },
            aadhaar_number: args.aadhaar,
            pan_number: args.pan,
            photo: None,
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<PathBuf>) -> Result<EdcConfig> {
    Ok(match path {
        Some(path) => EdcConfig::load(path)?,
        None => EdcConfig::from_env()?,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Score { file } => commands::score(&mut out, &file)?,
        Commands::Hash { file } => commands::hash(&mut out, &file)?,
        Commands::Verify { file, hash } => commands::verify(&mut out, &file, &hash)?,
        Commands::Merkle { hashes } => commands::merkle(&mut out, &hashes)?,
        Commands::Create(args) => {
            commands::create(&mut out, &load_config(cli.config)?, args.into())?
        }
        Commands::Show => commands::show(&mut out, &load_config(cli.config)?)?,
        Commands::Attest => commands::attest(&mut out, &load_config(cli.config)?).await?,
        Commands::CheckIntegrity => {
            commands::check_integrity(&mut out, &load_config(cli.config)?)?
        }
        Commands::Metrics => commands::metrics(&mut out, &load_config(cli.config)?)?,
    }

    Ok(())
}
