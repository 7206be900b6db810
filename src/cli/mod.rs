pub mod company;
pub mod rates;
pub mod sauda;
pub mod setup;
pub mod ui;
