pub mod principal_id;
pub mod role;
pub mod token_kind;
