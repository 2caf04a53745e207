mod api_key;
mod reading;
mod room;
mod user;

pub use api_key::{ApiKey, ApiKeyTable};
pub use reading::{Reading, ReadingTable};
pub use room::{Room, RoomTable};
pub use user::{User, UserTable};

pub trait Table {
    /// The name of the table
    fn name(&self) -> &'static str;

    /// The SQL statement to create the table
    fn create(&self) -> String;

    /// The SQL statement to dispose the table
    fn dispose(&self) -> String;
}
