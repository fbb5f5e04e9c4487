//! Command-line front end.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use repojira::api::{JiraClient, Project};
use repojira::config::{self, Config};
use repojira::credentials::KeyringCredentialStore;
use repojira::registry::{Repository, RepositoryRegistry};
use repojira::{logging, AppError, Integration, Result};

/// Environment variable read for the password or API token on login.
const SECRET_ENV: &str = "REPOJIRA_SECRET";

#[derive(Parser, Debug)]
#[command(name = "repojira", version)]
#[command(about = "Link local repositories to Jira projects", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate and store Jira credentials
    Login {
        /// Jira server address, e.g. company.atlassian.net
        #[arg(short, long)]
        server: String,
        /// Username or account email
        #[arg(short, long)]
        username: String,
        /// Read the password or API token from REPOJIRA_SECRET instead of stdin
        #[arg(long)]
        secret_from_env: bool,
    },
    /// Forget the stored credentials
    Logout,
    /// Show the profile of the stored account
    Whoami,
    /// List Jira projects
    Projects,
    /// Look up a project by key
    Project {
        /// Project key, case-insensitive
        key: String,
    },
    /// Print an avatar as a data URI
    Avatar {
        /// Avatar URL, absolute or server-relative
        #[arg(conflicts_with = "project", required_unless_present = "project")]
        url: Option<String>,
        /// Print the avatar of this project instead
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Manage registered repositories
    #[command(subcommand)]
    Repo(RepoCommand),
    /// Show where configuration, data and logs are stored
    Config,
}

#[derive(Subcommand, Debug)]
pub enum RepoCommand {
    /// Register a repository
    Add {
        /// Path to the repository
        path: PathBuf,
        /// Jira project key to link
        #[arg(short, long, default_value = "")]
        project: String,
    },
    /// List registered repositories
    List,
    /// Link a repository to a Jira project
    Link {
        /// Repository id
        id: u64,
        /// Jira project key
        key: String,
    },
    /// Remove a repository's Jira link
    Unlink {
        /// Repository id
        id: u64,
    },
    /// Remove a repository from the registry
    Remove {
        /// Repository id
        id: u64,
    },
}

/// Execute a parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    match cli.command {
        Command::Config => print_paths(&config),
        command => run_command(&config, command).await,
    }
}

async fn run_command(config: &Config, command: Command) -> Result<()> {
    let client = JiraClient::new(&config.settings)?;
    let registry = RepositoryRegistry::open(config.registry_path()?)?;
    let mut jira = Integration::new(client, KeyringCredentialStore::new(), registry);

    match command {
        Command::Login {
            server,
            username,
            secret_from_env,
        } => {
            let secret = read_secret(secret_from_env)?;
            let credentials = jira
                .validate_and_save_credentials(&server, &username, &secret)
                .await?;
            println!("Logged in to {} as {}", credentials.server, credentials.username);
        }
        Command::Logout => {
            jira.clear_credentials()?;
            println!("Credentials removed");
        }
        Command::Whoami => match jira.profile().await? {
            Some(profile) => {
                println!("{}", profile.display_name);
                if !profile.avatar_url.is_empty() {
                    println!("avatar: {}", profile.avatar_url);
                }
            }
            None => println!("Not logged in. Run 'repojira login'."),
        },
        Command::Projects => {
            let projects = jira.projects().await;
            if projects.is_empty() {
                println!("No projects (not logged in or Jira unreachable)");
            }
            for project in &projects {
                print_project(project);
            }
        }
        Command::Project { key } => match jira.resolve_project_by_key(&key).await {
            Some(project) => print_project(&project),
            None => return Err(AppError::other(format!("No Jira project with key '{}'", key))),
        },
        Command::Avatar { url, project } => {
            let image = match (url, project) {
                (_, Some(key)) => jira.project_avatar(&key).await,
                (Some(url), None) => jira.avatar(&url).await,
                (None, None) => None,
            };
            match image {
                Some(image) => println!("{}", image.to_data_uri()),
                None => return Err(AppError::other("No avatar available")),
            }
        }
        Command::Repo(command) => run_repo(&mut jira, command).await?,
        Command::Config => print_paths(config)?,
    }

    Ok(())
}

async fn run_repo(
    jira: &mut Integration<KeyringCredentialStore>,
    command: RepoCommand,
) -> Result<()> {
    match command {
        RepoCommand::Add { path, project } => {
            let path = path.to_string_lossy();
            let repo = jira.add_repository(&path, &project).await?;
            if !project.trim().is_empty() && repo.jira.is_none() {
                eprintln!("warning: project '{}' not found, added without a link", project);
            }
            print_repository(&repo);
        }
        RepoCommand::List => {
            for repo in jira.repositories() {
                print_repository(repo);
            }
        }
        RepoCommand::Link { id, key } => {
            let repo = jira.link_repository(id, &key).await?;
            if repo.jira.is_none() {
                eprintln!("warning: project '{}' not found, link cleared", key);
            }
            print_repository(&repo);
        }
        RepoCommand::Unlink { id } => {
            let repo = jira.link_repository(id, "").await?;
            print_repository(&repo);
        }
        RepoCommand::Remove { id } => {
            let repo = jira.remove_repository(id)?;
            println!("Removed {} ({})", repo.name, repo.path);
        }
    }
    Ok(())
}

fn read_secret(from_env: bool) -> Result<String> {
    if from_env {
        return std::env::var(SECRET_ENV)
            .map_err(|_| AppError::other(format!("{} is not set", SECRET_ENV)));
    }

    eprint!("Password or API token: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_paths(config: &Config) -> Result<()> {
    println!("config:   {}", config::config_path()?.display());
    println!("registry: {}", config.registry_path()?.display());
    if let Some(logs) = logging::log_directory() {
        println!("logs:     {}", logs.display());
    }
    Ok(())
}

fn print_project(project: &Project) {
    println!("{:<12} {}", project.key, project.name);
}

fn print_repository(repo: &Repository) {
    match &repo.jira {
        Some(link) => println!(
            "{:>4}  {:<24} {} [{}: {}]",
            repo.id, repo.name, repo.path, link.key, link.name
        ),
        None => println!("{:>4}  {:<24} {}", repo.id, repo.name, repo.path),
    }
}
