//! Coupons service.

use async_trait::async_trait;
use hearth::{coupons::CouponCode, discounts::DiscountPercent};
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::coupons::{
        data::NewCoupon,
        errors::CouponsServiceError,
        records::{CouponRecord, CouponUuid, ValidatedCoupon},
        repository::PgCouponsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

/// Look up a presented code and check it may be applied. Never mutates the coupon.
///
/// The code is trimmed but otherwise matched exactly against the stored,
/// upper-cased code; a code that could never have been stored is reported as not found.
pub(crate) async fn resolve_coupon(
    repository: &PgCouponsRepository,
    tx: &mut Transaction<'_, Postgres>,
    raw_code: &str,
) -> Result<ValidatedCoupon, CouponsServiceError> {
    let code = CouponCode::parse(raw_code).map_err(|_ignored| CouponsServiceError::NotFound)?;

    let coupon = repository
        .find_coupon_by_code(tx, code.as_str())
        .await?
        .ok_or(CouponsServiceError::NotFound)?;

    coupon.state().ensure_redeemable()?;

    Ok(ValidatedCoupon {
        uuid: coupon.uuid,
        code: coupon.code,
        discount_percent: coupon.discount_percent,
    })
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.create_coupon",
        skip(self, coupon),
        fields(
            coupon_uuid = %coupon.uuid,
            discount_percent = coupon.discount_percent,
            code = tracing::field::Empty
        ),
        err
    )]
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        let code = CouponCode::normalized(&coupon.code)?;

        let discount_percent = DiscountPercent::new(coupon.discount_percent)
            .map_err(|_ignored| CouponsServiceError::InvalidDiscount)?;

        Span::current().record("code", code.as_str());

        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .create_coupon(
                &mut tx,
                coupon.uuid,
                code.as_str(),
                discount_percent,
                coupon.is_usable,
            )
            .await?;

        tx.commit().await?;

        info!(coupon_uuid = %record.uuid, code = %record.code, "created coupon");

        Ok(record)
    }

    async fn get_coupon(&self, coupon: CouponUuid) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_coupon(&mut tx, coupon).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "coupons.service.set_usable",
        skip(self),
        fields(coupon_uuid = %coupon),
        err
    )]
    async fn set_usable(
        &self,
        coupon: CouponUuid,
        is_usable: bool,
    ) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.set_usable(&mut tx, coupon, is_usable).await?;

        tx.commit().await?;

        info!(coupon_uuid = %record.uuid, is_usable, "updated coupon");

        Ok(record)
    }

    #[tracing::instrument(
        name = "coupons.service.validate_coupon",
        skip(self, code),
        fields(coupon_uuid = tracing::field::Empty),
        err
    )]
    async fn validate_coupon(&self, code: &str) -> Result<ValidatedCoupon, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let validated = resolve_coupon(&self.repository, &mut tx, code).await?;

        tx.commit().await?;

        Span::current().record("coupon_uuid", tracing::field::display(validated.uuid));

        Ok(validated)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Creates a coupon. The code is trimmed and upper-cased before storage.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;

    /// Retrieve a single coupon.
    async fn get_coupon(&self, coupon: CouponUuid) -> Result<CouponRecord, CouponsServiceError>;

    /// Enable or disable a coupon. Independent of whether it has been used.
    async fn set_usable(
        &self,
        coupon: CouponUuid,
        is_usable: bool,
    ) -> Result<CouponRecord, CouponsServiceError>;

    /// Check a presented code without consuming it.
    async fn validate_coupon(&self, code: &str) -> Result<ValidatedCoupon, CouponsServiceError>;
}
