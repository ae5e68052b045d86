pub mod events;
pub mod server;


pub use events::RemoteCommand;
pub use server::RemoteServer;
