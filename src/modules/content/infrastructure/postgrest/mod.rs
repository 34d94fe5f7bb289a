pub mod client;
pub mod dto;
pub mod filters;
pub mod mapper;

pub use client::ContentStoreClient;
pub use mapper::ContentMapper;
