use clap::Args;
use hearth_app::domain::coupons::{CouponsService, records::CouponUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct SetUsableArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Coupon UUID
    #[arg(long)]
    uuid: Uuid,
}

pub(crate) async fn run(args: SetUsableArgs, usable: bool) -> Result<(), String> {
    let service = super::connect(&args.database_url).await?;

    let coupon = service
        .set_usable(CouponUuid::from_uuid(args.uuid), usable)
        .await
        .map_err(|error| format!("failed to update coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("coupon_code: {}", coupon.code);
    println!("is_usable: {}", coupon.is_usable);

    Ok(())
}
