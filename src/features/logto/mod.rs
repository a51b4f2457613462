//! Logto Management API access, reachable only through
//! [`ElevatedIdentityBridge`].

pub mod bridge;
pub mod directory;
pub mod token_manager;

pub use bridge::ElevatedIdentityBridge;
pub use directory::LogtoIdentityDirectory;
pub use token_manager::LogtoTokenManager;
