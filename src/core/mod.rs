//! Core export and catalogue services

pub mod archive;
pub mod attributes;
pub mod duplicate;
pub mod export;
pub mod geometry;
pub mod layers;
