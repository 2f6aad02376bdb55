use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{CategoryKind, Engine, EngineError, Money};
use migration::MigratorTrait;
use sea_orm::Database;

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "ledger_admin")]
#[command(about = "Admin utilities for the ledger (bootstrap users, accounts and categories)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./ledger.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage login users.
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Manage accounts.
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },
    /// Manage the shared category list.
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a user; the password is asked on the terminal.
    Create {
        #[arg(long)]
        username: String,
    },
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    Create(AccountCreateArgs),
    /// List the accounts of a user with their balance.
    List {
        #[arg(long)]
        owner: String,
    },
}

#[derive(Args, Debug)]
struct AccountCreateArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    name: String,
    /// Opening balance, e.g. `1250.00`.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    initial_balance: String,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// Create a category, or print the existing one with the same name.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        kind: Kind,
    },
    List {
        #[arg(long, value_enum)]
        kind: Option<Kind>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Income,
    Expense,
}

impl From<Kind> for CategoryKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Income => CategoryKind::Income,
            Kind::Expense => CategoryKind::Expense,
        }
    }
}

/// Restores cooked mode when the prompt ends, even on error.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> CliResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn print_line(out: &mut std::io::Stderr, message: &str) -> CliResult<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

/// Reads a line without echoing it, printing `*` for each character.
fn read_secret(prompt: &str) -> CliResult<String> {
    let _raw = RawModeGuard::enter()?;
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };
        let control = modifiers.contains(KeyModifiers::CONTROL);

        match code {
            KeyCode::Enter => break,
            KeyCode::Char('c') if control => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Backspace => {
                if secret.pop().is_none() {
                    continue;
                }
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            KeyCode::Char(ch) if !control => {
                secret.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => continue,
        }
        out.flush()?;
    }

    execute!(out, Print("\r\n"))?;
    out.flush()?;
    Ok(secret)
}

fn ask_new_password() -> CliResult<String> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let first = read_secret("Password: ")?;
        if first.is_empty() {
            print_line(&mut out, "Password must not be empty.")?;
            continue;
        }
        if read_secret("Confirm password: ")? == first {
            return Ok(first);
        }
        print_line(&mut out, "Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}

async fn connect_engine(database_url: &str) -> CliResult<Engine> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Engine::builder().database(db).build().await?)
}

fn fail(err: EngineError) -> ! {
    eprintln!("{err}");
    std::process::exit(if err.is_validation() { 2 } else { 1 });
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let engine = connect_engine(&cli.database_url).await?;

    match cli.command {
        Command::User {
            command: UserCommand::Create { username },
        } => {
            let password = ask_new_password()?;
            match engine.create_user(&username, &password).await {
                Ok(()) => println!("created user: {}", username.trim()),
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {username}");
                    std::process::exit(1);
                }
                Err(err) => fail(err),
            }
        }
        Command::Account {
            command: AccountCommand::Create(args),
        } => {
            let initial_balance: Money = match args.initial_balance.parse() {
                Ok(value) => value,
                Err(err) => fail(err),
            };
            let account = match engine
                .create_account(&args.owner, &args.name, initial_balance)
                .await
            {
                Ok(account) => account,
                Err(err) => fail(err),
            };
            println!("created account: {} ({})", account.name, account.id);
        }
        Command::Account {
            command: AccountCommand::List { owner },
        } => {
            for balance in engine.account_balances(&owner).await? {
                println!(
                    "{}\t{}\t{}",
                    balance.account.id, balance.account.name, balance.balance
                );
            }
        }
        Command::Category {
            command: CategoryCommand::Create { name, kind },
        } => match engine.add_category(&name, kind.into()).await {
            Ok(category) => println!(
                "category: {} [{}] ({})",
                category.name,
                category.kind.as_str(),
                category.id
            ),
            Err(err) => fail(err),
        },
        Command::Category {
            command: CategoryCommand::List { kind },
        } => {
            for category in engine.categories(kind.map(Into::into)).await? {
                println!(
                    "{}\t{}\t{}",
                    category.id,
                    category.kind.as_str(),
                    category.name
                );
            }
        }
    }

    Ok(())
}
