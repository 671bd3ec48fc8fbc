pub mod alert;
pub mod binance;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod input;
pub mod model;
pub mod monitor;
pub mod series;
pub mod stats;
pub mod ui;
