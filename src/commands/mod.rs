//! CLI command implementations.

pub mod browse;
pub mod list;
pub mod show;

pub use browse::BrowseCommand;
pub use list::ListCommand;
pub use show::ShowCommand;
