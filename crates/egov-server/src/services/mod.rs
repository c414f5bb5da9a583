//! Out-of-band services

pub mod seed;

pub use seed::Seeder;
