pub mod repository;
pub mod subscriptions;

pub use repository::FsStackRepository;
pub use subscriptions::FsSubscriptionSource;
