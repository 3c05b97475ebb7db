pub mod checksum;
pub mod cleanup;
pub mod config;
pub mod download;
pub mod error;
pub mod manifest;
pub mod partition;
pub mod path_safety;
pub mod pipeline;
pub mod tree;
pub mod verify;
