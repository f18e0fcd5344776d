pub mod fragment;
pub mod present;
pub mod reconcile;
pub mod schema;
