use std::{
    error::Error,
    io::{BufRead, Write},
    path::PathBuf,
};

use clap::{Args, Parser, Subcommand};

use api_types::{Activity, CategoryId, CompanyId, SliderId, category::CategoryNew};
use feed_client::FeedClient;
use relations::RelationshipManager;

#[derive(Parser, Debug)]
#[command(name = "riviera_admin")]
#[command(about = "Admin utilities for the riviera feed (categories, sliders, company links)")]
struct Cli {
    /// Feed base URL (also read from `RIVIERA_FEED_URL`).
    #[arg(long, env = "RIVIERA_FEED_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Category(Category),
    Slider(Slider),
    Company(Company),
    Link(Link),
}

#[derive(Args, Debug)]
struct Category {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    List,
    Create(CategoryCreateArgs),
    Delete(CategoryDeleteArgs),
}

#[derive(Args, Debug)]
struct CategoryCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, default_value_t = 0)]
    order: u32,
    /// Activity tag: water or land.
    #[arg(long)]
    activity: String,
}

#[derive(Args, Debug)]
struct CategoryDeleteArgs {
    #[arg(long)]
    id: CategoryId,
}

#[derive(Args, Debug)]
struct Slider {
    #[command(subcommand)]
    command: SliderCommand,
}

#[derive(Subcommand, Debug)]
enum SliderCommand {
    List,
    Delete(SliderDeleteArgs),
}

#[derive(Args, Debug)]
struct SliderDeleteArgs {
    #[arg(long)]
    id: SliderId,
}

#[derive(Args, Debug)]
struct Company {
    #[command(subcommand)]
    command: CompanyCommand,
}

#[derive(Subcommand, Debug)]
enum CompanyCommand {
    List(CompanyListArgs),
}

#[derive(Args, Debug)]
struct CompanyListArgs {
    /// Export the catalog to a CSV file instead of printing it.
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct Link {
    #[command(subcommand)]
    command: LinkCommand,
}

#[derive(Subcommand, Debug)]
enum LinkCommand {
    List(LinkListArgs),
    Add(LinkPairArgs),
    Remove(LinkRemoveArgs),
}

#[derive(Args, Debug)]
struct LinkListArgs {
    #[arg(long)]
    category: CategoryId,
}

#[derive(Args, Debug)]
struct LinkPairArgs {
    #[arg(long)]
    company: CompanyId,
    #[arg(long)]
    category: CategoryId,
}

#[derive(Args, Debug)]
struct LinkRemoveArgs {
    #[arg(long)]
    company: CompanyId,
    #[arg(long)]
    category: CategoryId,
    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
}

fn parse_activity(raw: &str) -> Result<Activity, String> {
    match raw {
        "water" => Ok(Activity::Water),
        "land" => Ok(Activity::Land),
        other => Err(format!("unsupported activity: {other} (water or land)")),
    }
}

fn confirm(prompt: &str) -> Result<bool, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_linked(category: CategoryId, companies: &[api_types::company::Company]) {
    if companies.is_empty() {
        println!("no companies connected to category {category}");
        return;
    }
    println!("companies connected to category {category}:");
    for company in companies {
        let status = if company.is_active { "active" } else { "inactive" };
        println!("  {:>5}  {}  ({status})", company.id, company.name);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let client = FeedClient::new(&cli.base_url)?;

    match cli.command {
        Command::Category(Category { command }) => match command {
            CategoryCommand::List => {
                for category in client.list_categories().await? {
                    println!(
                        "{:>5}  {:>3}  {:<6}  {}",
                        category.id,
                        category.order,
                        category.activity.as_str(),
                        category.name
                    );
                }
            }
            CategoryCommand::Create(args) => {
                let activity = match parse_activity(&args.activity) {
                    Ok(activity) => activity,
                    Err(err) => {
                        eprintln!("{err}");
                        std::process::exit(2);
                    }
                };
                let payload = CategoryNew {
                    name: args.name.clone(),
                    description: args.description,
                    order: args.order,
                    activity,
                };
                client.create_category(&payload).await?;
                println!("created category: {}", args.name);
            }
            CategoryCommand::Delete(args) => {
                client.delete_category(args.id).await?;
                println!("deleted category: {}", args.id);
            }
        },
        Command::Slider(Slider { command }) => match command {
            SliderCommand::List => {
                for slider in client.list_sliders().await? {
                    let link = slider.link.as_deref().unwrap_or("-");
                    println!("{:>5}  {:<30}  {link}", slider.id, slider.title);
                }
            }
            SliderCommand::Delete(args) => {
                client.delete_slider(args.id).await?;
                println!("deleted slider: {}", args.id);
            }
        },
        Command::Company(Company { command }) => match command {
            CompanyCommand::List(args) => {
                let companies = client.list_companies().await?;
                match args.csv {
                    Some(path) => {
                        let mut writer = csv::Writer::from_path(&path)?;
                        for company in &companies {
                            writer.serialize(company)?;
                        }
                        writer.flush()?;
                        println!("exported {} companies to {}", companies.len(), path.display());
                    }
                    None => {
                        for company in &companies {
                            let status = if company.is_active { "active" } else { "inactive" };
                            println!("{:>5}  {:<30}  {status}", company.id, company.name);
                        }
                    }
                }
            }
        },
        Command::Link(Link { command }) => {
            // Link maintenance goes through the relationship manager so the
            // CLI gets the same no-optimistic-update and re-fetch semantics
            // as the console.
            let manager = RelationshipManager::new(client.clone());
            match command {
                LinkCommand::List(args) => {
                    let linked = manager.load_linked_companies(args.category).await?;
                    print_linked(args.category, &linked);
                }
                LinkCommand::Add(args) => {
                    manager.link(Some(args.company), Some(args.category)).await?;
                    println!("linked company {} to category {}", args.company, args.category);
                    let linked = manager.load_linked_companies(args.category).await?;
                    print_linked(args.category, &linked);
                }
                LinkCommand::Remove(args) => {
                    if !args.yes {
                        let prompt = format!(
                            "Unlink company {} from category {}?",
                            args.company, args.category
                        );
                        if !confirm(&prompt)? {
                            println!("aborted");
                            return Ok(());
                        }
                    }
                    manager
                        .unlink(Some(args.company), Some(args.category))
                        .await?;
                    println!(
                        "unlinked company {} from category {}",
                        args.company, args.category
                    );
                    let linked = manager.load_linked_companies(args.category).await?;
                    print_linked(args.category, &linked);
                }
            }
        }
    }

    Ok(())
}
