//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    activity::{ActivityPublisher, BroadcastActivityFeed},
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        apartments::{ApartmentsService, PgApartmentsService},
        availability::{AvailabilityService, PgAvailabilityService},
        bookings::{BookingsService, PgBookingsService, data::CheckoutSettings},
        coupons::{CouponsService, PgCouponsService},
        payments::{PaymentsService, PgPaymentsService},
    },
    gateway::{GatewayError, PaymentGateway, PaystackConfig, PaystackGateway},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),

    #[error("failed to build payment gateway client")]
    Gateway(#[source] GatewayError),
}

/// Everything needed to assemble the application services.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub run_migrations: bool,
    pub paystack: PaystackConfig,
    pub checkout: CheckoutSettings,
    pub activity_capacity: usize,
}

#[derive(Clone)]
pub struct AppContext {
    pub apartments: Arc<dyn ApartmentsService>,
    pub availability: Arc<dyn AvailabilityService>,
    pub coupons: Arc<dyn CouponsService>,
    pub bookings: Arc<dyn BookingsService>,
    pub payments: Arc<dyn PaymentsService>,
    pub auth: Arc<dyn AuthService>,
    pub feed: Arc<BroadcastActivityFeed>,
}

impl AppContext {
    /// Connect to the database and wire every service against it.
    ///
    /// # Errors
    ///
    /// Returns an error when the database connection, migrations, or the
    /// payment gateway client cannot be set up.
    pub async fn from_settings(settings: AppSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(&settings.database_url)
            .await
            .map_err(AppInitError::Database)?;

        if settings.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        let webhook_secret = settings.paystack.secret_key.clone();

        let gateway: Arc<dyn PaymentGateway> = Arc::new(
            PaystackGateway::new(settings.paystack).map_err(AppInitError::Gateway)?,
        );

        let feed = Arc::new(BroadcastActivityFeed::new(settings.activity_capacity));
        let activity: Arc<dyn ActivityPublisher> = feed.clone();

        let db = Db::new(pool.clone());

        Ok(Self {
            apartments: Arc::new(PgApartmentsService::new(db.clone())),
            availability: Arc::new(PgAvailabilityService::new(db.clone())),
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            bookings: Arc::new(PgBookingsService::new(
                db.clone(),
                gateway.clone(),
                activity.clone(),
                settings.checkout,
            )),
            payments: Arc::new(PgPaymentsService::new(
                db,
                gateway,
                activity,
                webhook_secret,
            )),
            auth: Arc::new(PgAuthService::new(pool)),
            feed,
        })
    }
}
