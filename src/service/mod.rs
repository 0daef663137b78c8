pub mod mode;
pub mod poller;
pub mod secrets;
pub mod startup;
