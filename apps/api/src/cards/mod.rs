// Career card persistence: create, replace, and read-by-id of the card document.

pub mod handlers;
pub mod models;
pub mod store;
pub mod validation;
