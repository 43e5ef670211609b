pub mod init;
pub mod inspect;
pub mod menu;
pub mod resolve;

pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use menu::{menu, MenuArgs};
pub use resolve::{resolve, ResolveArgs};
