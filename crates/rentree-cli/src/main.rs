use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password, Select};
use dotenvy::dotenv;
use rentree_cli::preview::{Snapshot, print_report};
use rentree_cli::seeder::{self, SeedConfig};
use rentree_config::SchoolYearConfig;
use rentree_db::{DatabaseConfig, PgPool, init_db_pool, run_migrations};
use rentree_models::{
    CreateUserDto, Placement, StudentId, StudentIdentity, age_at, assign_grade, roles,
};
use rentree_roster::{MemoryRosterStore, PgRosterStore, RosterStore, parse_csv};

#[derive(Parser)]
#[command(name = "rentree-cli")]
#[command(about = "Rentree CLI - Administrative tools for Rentree", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a staff account
    CreateUser {
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// `admin` or `secretary`
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
    /// Seed secretary accounts sharing one password
    SeedStaff {
        #[arg(short = 'n', long, default_value = "3")]
        count: usize,

        #[arg(short = 'p', long, default_value = "password123")]
        password: String,
    },
    /// Seed fake students and place them in classes
    SeedStudents {
        #[arg(short = 'n', long, default_value = "200")]
        count: usize,

        /// Reference date, `YYYY-MM-DD`; defaults to this year's rentrée
        #[arg(long)]
        rentree: Option<NaiveDate>,

        #[arg(long, default_value = "2")]
        min_age: i32,

        #[arg(long, default_value = "10")]
        max_age: i32,

        /// Place the students in memory only and print the result
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the class a child born on `birth_date` enters
    Assign {
        birth_date: NaiveDate,

        #[arg(long)]
        rentree: Option<NaiveDate>,
    },
    /// Show what a promotion would do, without writing anything
    PreviewPromotion {
        /// CSV of repeating students (`Nom`, `Prenom`, `Date de naissance`)
        #[arg(long)]
        repeating: Option<PathBuf>,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    let school_year = SchoolYearConfig::from_env();

    match cli.command {
        Commands::CreateUser {
            first_name,
            last_name,
            email,
            password,
            role,
        } => {
            let dto = prompt_user(first_name, last_name, email, password, role)?;
            let pool = connect().await?;
            let id = seeder::create_user(&pool, &dto).await?;
            println!("\n✅ User created successfully!");
            println!("   ID: {}", id);
            println!("   Email: {}", dto.email);
            println!("   Role: {}", dto.role);
        }
        Commands::SeedStaff { count, password } => {
            let pool = connect().await?;
            seeder::seed_staff(&pool, count, &password).await?;
        }
        Commands::SeedStudents {
            count,
            rentree,
            min_age,
            max_age,
            dry_run,
        } => {
            let rentree = rentree.unwrap_or_else(|| school_year.current_rentree());
            let config = SeedConfig::new(count, rentree).with_ages(min_age, max_age);

            if dry_run {
                let mut store = MemoryRosterStore::new();
                let outcome = seeder::seed_students(&mut store, &config).await;
                let names: HashMap<StudentId, StudentIdentity> = store
                    .list_students()
                    .await?
                    .into_iter()
                    .map(|student| (student.id, student.identity()))
                    .collect();
                for enrolled in &outcome.enrolled {
                    if let Some(identity) = names.get(&enrolled.student_id) {
                        println!("   {} -> {}", identity, enrolled.grade_level);
                    }
                }
            } else {
                let pool = connect().await?;
                let mut store = PgRosterStore::acquire(&pool).await?;
                seeder::seed_students(&mut store, &config).await;
            }
        }
        Commands::Assign {
            birth_date,
            rentree,
        } => {
            let rentree = rentree.unwrap_or_else(|| school_year.current_rentree());
            let age = age_at(birth_date, rentree);
            match assign_grade(birth_date, rentree) {
                Placement::Grade(level) => {
                    println!("{} ({} years old on {})", level, age, rentree)
                }
                Placement::NotEligible => {
                    println!("No class ({} years old on {})", age, rentree)
                }
            }
        }
        Commands::PreviewPromotion { repeating } => {
            let repeating = match repeating {
                Some(path) => read_repeating(&path)?,
                None => HashSet::new(),
            };
            let pool = connect().await?;
            let mut source = PgRosterStore::acquire(&pool).await?;
            let mut snapshot = Snapshot::load(&mut source).await?;
            let outcome = snapshot.promote(&repeating).await?;
            print_report(&snapshot, &outcome);
        }
        Commands::Migrate => {
            let pool = connect().await?;
            run_migrations(&pool).await?;
            println!("✅ Migrations applied at {}", Utc::now().format("%Y-%m-%d %H:%M:%S"));
        }
    }

    Ok(())
}

async fn connect() -> anyhow::Result<PgPool> {
    let config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;
    init_db_pool(&config)
        .await
        .context("Failed to connect to database")
}

fn read_repeating(path: &PathBuf) -> anyhow::Result<HashSet<StudentIdentity>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed = parse_csv(&content)?;
    for error in &parsed.rejected {
        eprintln!("⚠️  line {}: {}", error.line, error.reason);
    }
    Ok(parsed
        .records
        .iter()
        .map(StudentIdentity::normalized)
        .collect())
}

fn prompt_user(
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
) -> anyhow::Result<CreateUserDto> {
    let first_name = match first_name {
        Some(v) => v,
        None => Input::new().with_prompt("First name").interact_text()?,
    };
    let last_name = match last_name {
        Some(v) => v,
        None => Input::new().with_prompt("Last name").interact_text()?,
    };
    let email = match email {
        Some(v) => v,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };
    let password = match password {
        Some(v) => v,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };
    let role = match role {
        Some(v) => v,
        None => {
            let idx = Select::new()
                .with_prompt("Role")
                .items(roles::ALL)
                .default(0)
                .interact()?;
            roles::ALL[idx].to_string()
        }
    };

    Ok(CreateUserDto {
        first_name,
        last_name,
        email,
        password,
        role,
    })
}
