pub mod interface;
pub mod mongo;
pub mod mongo_store;
