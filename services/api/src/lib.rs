mod check;
mod cli;
mod infra;
mod routes;
mod server;

use eligibility::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
