pub mod agent;
pub mod catalog;
pub mod conception;
pub mod config;
pub mod dna;
pub mod dominance;
pub mod error;
pub mod genome;
pub mod nucleotide;
pub mod readiness;
pub mod service;
pub mod sim;
pub mod store;
pub mod training;
