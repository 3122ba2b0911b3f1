#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod bitboard;
mod board;
mod common;
mod config;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod player;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod transport;
#[cfg(feature = "std")]
pub mod ui;

pub use bitboard::{BitBoard, BitBoardError};
pub use board::*;
pub use common::*;
pub use config::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, level_from_env};
#[cfg(feature = "std")]
pub use player::*;
#[cfg(feature = "std")]
pub use protocol::*;
#[cfg(feature = "std")]
pub use session::*;
#[cfg(feature = "std")]
pub use transport::{InMemoryTransport, LineChannel, TcpTransport};
