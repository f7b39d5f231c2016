use clap::{Parser, Subcommand};

mod coupon;

#[derive(Debug, Parser)]
#[command(name = "hearth-app", about = "Hearth admin CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Coupon(coupon::CouponCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Coupon(command) => coupon::run(command).await,
        }
    }
}
