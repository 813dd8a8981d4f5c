pub mod cell;
pub mod discover;
pub mod driver;
pub mod expand;

pub use cell::{Cell, CellTree};
pub use discover::{DiscoveryError, discover};
pub use driver::{Engine, FitReport};
pub use expand::expand;
