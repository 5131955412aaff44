pub mod poll_service;
pub mod vote_service;
