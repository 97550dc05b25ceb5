pub mod assets;
pub mod audit;
pub mod pair;
pub mod prices;
pub mod ui;
pub mod watch;
