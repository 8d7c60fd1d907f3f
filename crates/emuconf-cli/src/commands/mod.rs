pub mod context;
pub mod edit;
pub mod inspect;
