mod api_key;
mod reading;
mod room;
mod user;

pub use api_key::ApiKeyRepository;
pub use reading::ReadingRepository;
pub use room::RoomRepository;
pub use user::UserRepository;
