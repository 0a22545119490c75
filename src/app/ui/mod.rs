pub mod chat;
pub mod landing;
pub mod overlay;
