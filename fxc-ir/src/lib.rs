//! Typed IR for the effect compiler.
//!
//! This crate is the shared data model both backends lower from: value
//! types (`ty`), constants (`constant`), the access-chain expression model
//! (`expr`), backend-neutral locators (`locator`), entity descriptors
//! (`descriptor`), and the top-level frontend-supplied module (`module`).

pub mod constant;
pub mod descriptor;
pub mod expr;
pub mod locator;
pub mod module;
pub mod ty;

pub use constant::Constant;
pub use expr::{AccessOp, Expr, ValueId};
pub use module::Module;
pub use ty::Type;
