use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use rawmat::common::{pad, write_string_to_file};
use rawmat::database::schema::create_raw_materials_table;
use rawmat::database::{establish_connection, get_database_url, OpenMode};
use rawmat::extractor::extract;
use rawmat::plan::Plan;
use rawmat::services::{run_import, RawMaterialService};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// YAML plan naming the source files and database
    #[clap(short, long)]
    plan: Option<String>,
    /// Database file, overrides the plan
    #[clap(short, long)]
    database: Option<String>,
    /// Recipe CSV file, repeatable; replaces the plan's source list
    #[clap(short, long = "source")]
    sources: Vec<String>,
}

#[derive(Args, Debug)]
struct DatabaseArgs {
    #[clap(short, long)]
    plan: Option<String>,
    #[clap(short, long)]
    database: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the raw_materials table with the materials found in the sources
    Import {
        #[clap(flatten)]
        args: SourceArgs,
    },
    /// Read the sources and print the materials without touching the database
    Extract {
        #[clap(flatten)]
        args: SourceArgs,
        #[clap(long)]
        json: bool,
    },
    /// Print the current raw_materials table
    List {
        #[clap(flatten)]
        args: DatabaseArgs,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    /// Write a plan file to fill in
    Init {
        #[clap(short, long)]
        plan: String,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    /// Create the raw_materials table if it does not exist
    Init {
        #[clap(flatten)]
        args: DatabaseArgs,
    },
}

fn load_plan(plan: Option<&str>) -> Result<Plan> {
    match plan {
        Some(path) => {
            info!("Using plan: {}", path);
            Ok(Plan::load(path)?)
        }
        None => Ok(Plan::default()),
    }
}

fn resolve(args: SourceArgs) -> Result<Plan> {
    Ok(load_plan(args.plan.as_deref())?.with_overrides(args.database, args.sources))
}

fn resolve_database(args: DatabaseArgs) -> Result<String> {
    let plan = load_plan(args.plan.as_deref())?.with_overrides(args.database, vec![]);
    Ok(plan.database()?.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Import { args } => {
            let plan = resolve(args)?;
            let options = plan.extract_options()?;
            let report = run_import(&options, plan.database()?).await?;
            if let (Some(first), Some(last)) = (&report.first_code, &report.last_code) {
                info!(
                    "Replaced {} rows with {} ({} .. {})",
                    report.deleted, report.inserted, first, last
                );
            } else {
                info!("Replaced {} rows with an empty table", report.deleted);
            }
        }
        Commands::Extract { args, json } => {
            let plan = resolve(args)?;
            let extraction = extract(&plan.extract_options()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&extraction.materials)?);
            } else {
                for material in extraction.materials.values() {
                    println!(
                        "{}{}  {}",
                        pad(&material.name, 32),
                        pad(&material.unit, 8),
                        material.quantity
                    );
                }
            }
        }
        Commands::List { args } => {
            let database = resolve_database(args)?;
            let db = establish_connection(&get_database_url(&database, OpenMode::ReadWrite)).await?;
            let service = RawMaterialService::new(db);
            let rows = service.list().await;
            service.close().await?;

            let rows = rows?;
            for row in &rows {
                println!("{}  {}({})", row.code, pad(&row.name, 32), row.unit);
            }
            println!("\nTotal raw materials: {}", rows.len());
        }
        Commands::Db { command } => match command {
            DbCommands::Init { args } => {
                let database = resolve_database(args)?;
                info!("Initializing database: {}", database);
                let db = establish_connection(&get_database_url(
                    &database,
                    OpenMode::ReadWriteCreate,
                ))
                .await?;
                let result = create_raw_materials_table(&db).await;
                db.close().await?;
                result?;
            }
        },
        Commands::Init { plan } => {
            info!("Initializing plan: {}", plan);
            let serialized_plan = serde_yaml::to_string(&Plan::template())?;
            write_string_to_file(&plan, &serialized_plan)?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_string()))
        .without_time()
        .init();
}
