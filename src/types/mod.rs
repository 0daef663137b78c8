pub mod status;

pub use status::{InfoResponse, InitDbResponse, KnownEndpoints, ReadyResponse, UsersResponse};
