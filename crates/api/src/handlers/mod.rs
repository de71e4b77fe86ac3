pub mod admin_photos;
pub mod auth;
pub mod contact;
pub mod gallery;
pub mod health;
