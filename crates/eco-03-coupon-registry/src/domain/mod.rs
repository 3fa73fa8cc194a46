//! # Domain Layer - Coupon Registry

pub mod coupon_book;
pub mod entities;
pub mod errors;
pub mod policy;
pub mod seed;

pub use coupon_book::*;
pub use entities::*;
pub use errors::*;
pub use policy::*;
pub use seed::*;
