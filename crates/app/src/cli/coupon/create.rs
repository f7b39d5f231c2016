use clap::Args;
use hearth_app::domain::coupons::{
    CouponsService,
    data::{NewCoupon, generate_coupon_code},
    records::CouponUuid,
};

#[derive(Debug, Args)]
pub(crate) struct CreateCouponArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Coupon code; generated when omitted
    #[arg(long)]
    code: Option<String>,

    /// Whole-percent discount, 0 to 100
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    discount: u8,

    /// Create the coupon switched off
    #[arg(long)]
    disabled: bool,
}

pub(crate) async fn run(args: CreateCouponArgs) -> Result<(), String> {
    let service = super::connect(&args.database_url).await?;

    let coupon = service
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code: args.code.unwrap_or_else(generate_coupon_code),
            discount_percent: args.discount,
            is_usable: !args.disabled,
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("coupon_code: {}", coupon.code);
    println!("discount_percent: {}", coupon.discount_percent);
    println!("is_usable: {}", coupon.is_usable);

    Ok(())
}
