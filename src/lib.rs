//! Classic container exercises: a bare singly-linked list driven by free
//! functions, a doubly-linked list with cursors, a growable array, and a
//! small lottery game built on the array.

pub mod config;
pub mod container;
pub mod dlist;
pub mod error;
pub mod lottery;
pub mod slist;

pub use config::{ConfigError, LotteryConfig, PrizeTable};
pub use container::Container;
pub use dlist::{Cursor, CursorMut, DList};
pub use error::{ContainerError, Result};
pub use slist::SimpleList;
