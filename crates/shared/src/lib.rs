pub mod assessment;
pub mod domain;
pub mod error;
pub mod protocol;
