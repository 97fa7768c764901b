pub mod assets;
pub mod auth;
pub mod categories;
pub mod conversations;
pub mod medias;
pub mod payments;
pub mod provinces;
pub mod reports;
pub mod resource;
pub mod tax;
pub mod users;
pub mod withdrawals;

pub use assets::AssetsService;
pub use auth::AuthService;
pub use categories::CategoriesService;
pub use conversations::ConversationsService;
pub use medias::MediasService;
pub use payments::PaymentsService;
pub use provinces::ProvincesService;
pub use reports::ReportsService;
pub use resource::{ReadResource, StatusFilter, WriteResource};
pub use tax::TaxService;
pub use users::UsersService;
pub use withdrawals::WithdrawalsService;

use crate::api::ApiClient;

/// Every resource service, built over one shared client and session.
#[derive(Clone, Debug)]
pub struct Backend {
    pub client: ApiClient,
    pub auth: AuthService,
    pub users: UsersService,
    pub assets: AssetsService,
    pub categories: CategoriesService,
    pub reports: ReportsService,
    pub payments: PaymentsService,
    pub withdrawals: WithdrawalsService,
    pub conversations: ConversationsService,
    pub provinces: ProvincesService,
    pub tax: TaxService,
    pub medias: MediasService,
}

impl Backend {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthService::new(client.clone()),
            users: UsersService::new(client.clone()),
            assets: AssetsService::new(client.clone()),
            categories: CategoriesService::new(client.clone()),
            reports: ReportsService::new(client.clone()),
            payments: PaymentsService::new(client.clone()),
            withdrawals: WithdrawalsService::new(client.clone()),
            conversations: ConversationsService::new(client.clone()),
            provinces: ProvincesService::new(client.clone()),
            tax: TaxService::new(client.clone()),
            medias: MediasService::new(client.clone()),
            client,
        }
    }
}
