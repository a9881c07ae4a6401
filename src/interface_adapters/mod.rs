// Interface adapters: external service clients, dataset sources and the terminal UI.

pub mod clients;
pub mod datasets;
pub mod protocol;
pub mod terminal;
