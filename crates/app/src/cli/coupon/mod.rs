use clap::{Args, Subcommand};
use hearth_app::{
    database::{self, Db},
    domain::coupons::PgCouponsService,
};

mod create;
mod usable;

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    /// Create a coupon
    Create(create::CreateCouponArgs),

    /// Allow a coupon to be redeemed again
    Enable(usable::SetUsableArgs),

    /// Stop a coupon from being redeemed
    Disable(usable::SetUsableArgs),
}

pub(crate) async fn run(command: CouponCommand) -> Result<(), String> {
    match command.command {
        CouponSubcommand::Create(args) => create::run(args).await,
        CouponSubcommand::Enable(args) => usable::run(args, true).await,
        CouponSubcommand::Disable(args) => usable::run(args, false).await,
    }
}

async fn connect(database_url: &str) -> Result<PgCouponsService, String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(PgCouponsService::new(Db::new(pool)))
}
