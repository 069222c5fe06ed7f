pub mod notify;
pub mod pages;
