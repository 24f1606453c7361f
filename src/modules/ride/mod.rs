pub mod dto;
pub mod fare;
pub mod lifecycle;
pub mod model;
pub mod repository;
pub mod service;
