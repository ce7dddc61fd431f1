use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use url::Url;

#[derive(Parser)]
#[command(name = "employee-cli")]
#[command(about = "Command-line client for the employee API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(long, default_value = "user")]
    username: String,

    #[arg(long, default_value = "user123")]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every employee
    List,
    /// Search employees by name fragment
    Search { fragment: String },
    /// Show one employee
    Get { id: String },
    /// Show the highest salary
    HighestSalary,
    /// Show the ten best-paid employee names
    TopEarners,
    /// Create an employee (admin only)
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        salary: i64,
        #[arg(long)]
        age: i64,
        #[arg(long)]
        title: String,
    },
    /// Delete an employee by id (admin only)
    Delete { id: String },
    /// Check service liveness
    Health,
}

/// `base` with each of `segments` appended as one escaped path segment.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("'{base}' cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let root = Url::parse(&cli.url)?;
    let api = endpoint(&root, &["api", "v1", "employee"])?;

    let request = match cli.command {
        Commands::List => client.get(api),
        Commands::Search { fragment } => {
            client.get(endpoint(&api, &["search", fragment.as_str()])?)
        }
        Commands::Get { id } => client.get(endpoint(&api, &[id.as_str()])?),
        Commands::HighestSalary => client.get(endpoint(&api, &["highestSalary"])?),
        Commands::TopEarners => {
            client.get(endpoint(&api, &["topTenHighestEarningEmployeeNames"])?)
        }
        Commands::Create {
            name,
            salary,
            age,
            title,
        } => client.post(api).json(&json!({
            "name": name,
            "salary": salary,
            "age": age,
            "title": title,
        })),
        Commands::Delete { id } => client.delete(endpoint(&api, &[id.as_str()])?),
        Commands::Health => client.get(endpoint(&root, &["health"])?),
    };

    let res = request
        .basic_auth(&cli.username, Some(&cli.password))
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
