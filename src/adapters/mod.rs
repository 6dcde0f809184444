// Adapters layer: concrete implementations for external systems (http, storage, csv input).

pub mod csv_input;
pub mod http;
pub mod storage;
