pub mod config;
pub mod error;
pub mod filesys;
pub mod help;
pub mod path;
pub mod vars;
pub mod wp;

pub use error::{Error, Result};
pub use filesys::ListDir;
pub use path::{Ancestors, Segment, WinPath};
pub use wp::Wp;
