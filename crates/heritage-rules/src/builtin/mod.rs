//! Built-in rules

pub mod controller_inheritance;

pub use controller_inheritance::{
    CONTROLLER_INHERITANCE, Category, ControllerInheritance, ControllerInheritanceFix,
};
