pub mod email;
pub mod pricing;
pub mod season;
pub mod wizard;
