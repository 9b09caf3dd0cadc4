//! Durable object storage adapters

mod cloudinary;

pub use cloudinary::CloudinaryStorage;
