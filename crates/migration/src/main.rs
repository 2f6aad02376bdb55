use sea_orm_migration::prelude::*;

/// `DATABASE_URL=sqlite:./ledger.db?mode=rwc cargo run -p migration -- up`
#[tokio::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
