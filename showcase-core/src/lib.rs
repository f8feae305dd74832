pub mod banner;
pub mod engagement;
pub mod identity;
pub mod navigation;
pub mod repository;
pub mod search;
pub mod session;
pub mod validation;

pub use banner::{Banner, BannerKind, BannerTiming, Notifier};
pub use engagement::{DuplicateEngagement, EngagementPolicy};
pub use identity::{AuthGrant, Credentials, Session};
pub use navigation::{Location, NavigationGuard, NavigationTicket};
pub use repository::{
    AuthError, AuthService, Document, DocumentStore, Fields, KeyValueStorage, StorageError, StoreError,
};
pub use session::SessionManager;
pub use validation::{FieldError, FormData, ValidationError, ValidationReport};
