pub mod principal;
pub mod token;
