pub mod accounts;
pub mod dashboard;
pub mod system;
pub mod trades;
